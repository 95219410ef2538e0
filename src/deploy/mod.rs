mod schedule;
mod zoned;

use std::fs;
use std::io;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

pub use schedule::ScheduleTarget;
pub use zoned::{RouteUploadResult, ZonedTarget};

use crate::error::{Error, ValidationError};
use crate::http::{self, WorkerScript, WorkersApi};
use crate::settings::binding;
use crate::settings::Project;
use crate::terminal::message::{Message, StdErr};
use crate::upload::{Metadata, ScriptUpload};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeployOptions {
    pub dry_run: bool,
}

/// What a dry run would have sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DryRunReport {
    pub worker_name: String,
    pub script_size: usize,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentResult {
    pub worker_name: String,
    pub script_size: usize,
    pub script: WorkerScript,
    pub routes: Vec<RouteUploadResult>,
    pub schedules: Vec<String>,
    /// Set when the script went up but its cron triggers were not replaced.
    pub schedules_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Deployment {
    DryRun(DryRunReport),
    Uploaded(DeploymentResult),
}

/// Validates the project and its script, then uploads it along with its
/// bindings. Routes and cron triggers are only touched once the upload has
/// gone through, and failures there are reported in the result rather than
/// as an error. With `dry_run` set, `api` is never called.
pub fn deploy(
    api: &impl WorkersApi,
    project: &Project,
    script_path: &Path,
    options: DeployOptions,
) -> Result<Deployment, Error> {
    let upload = prepare(project, script_path)?;

    if options.dry_run {
        log::info!("dry run, not uploading {}", project.worker_name);
        return Ok(Deployment::DryRun(DryRunReport {
            worker_name: project.worker_name.clone(),
            script_size: upload.script_size(),
            metadata: upload.metadata,
        }));
    }

    let style = ProgressStyle::default_spinner().template("{spinner}   {msg}");
    let spinner = ProgressBar::new_spinner().with_style(style);
    spinner.enable_steady_tick(20);

    spinner.set_message("Uploading script...");
    let uploaded = api.upload_script(&project.worker_name, &upload);
    let script = match uploaded {
        Ok(script) => script,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let routes = publish_routes(api, project, &spinner);
    let (schedules, schedules_error) = publish_schedules(api, project, &spinner);
    spinner.finish_and_clear();

    Ok(Deployment::Uploaded(DeploymentResult {
        worker_name: project.worker_name.clone(),
        script_size: upload.script_size(),
        script,
        routes,
        schedules,
        schedules_error,
    }))
}

/// Everything up to the network call: the checks a dry run performs.
pub fn prepare(project: &Project, script_path: &Path) -> Result<ScriptUpload, Error> {
    project.validate()?;
    let script = read_script(script_path)?;
    let bindings = binding::translate(project)?;

    let script_name = script_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.main.clone());

    Ok(ScriptUpload::new(
        script_name,
        project.format,
        bindings,
        project.compatibility_date.clone(),
        script,
    ))
}

fn read_script(script_path: &Path) -> Result<Vec<u8>, ValidationError> {
    if !script_path.is_file() {
        return Err(ValidationError::ScriptNotFound(script_path.to_path_buf()));
    }

    let script = fs::read(script_path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ValidationError::ScriptNotFound(script_path.to_path_buf()),
        _ => ValidationError::ScriptUnreadable {
            path: script_path.to_path_buf(),
            source,
        },
    })?;

    if script.is_empty() {
        return Err(ValidationError::ScriptEmpty(script_path.to_path_buf()));
    }

    Ok(script)
}

fn publish_routes(
    api: &impl WorkersApi,
    project: &Project,
    spinner: &ProgressBar,
) -> Vec<RouteUploadResult> {
    if project.is_zoned() {
        spinner.set_message("Configuring routes...");
        let zone_id = project.zone_id.as_deref().unwrap_or_default();
        return ZonedTarget::build(&project.worker_name, zone_id, &project.routes).deploy(api);
    }
    if !project.routes.is_empty() {
        StdErr::warn("field `zone_id` is required to deploy to routes; skipping routes");
    }
    Vec::new()
}

fn publish_schedules(
    api: &impl WorkersApi,
    project: &Project,
    spinner: &ProgressBar,
) -> (Vec<String>, Option<String>) {
    if project.triggers.crons.is_empty() {
        return (Vec::new(), None);
    }

    spinner.set_message("Configuring schedules...");
    let target = ScheduleTarget::build(project.worker_name.clone(), project.triggers.crons.clone());
    match target.deploy(api) {
        Ok(schedules) => (schedules, None),
        Err(e) => {
            log::warn!("could not update schedules for {}: {}", project.worker_name, e);
            (Vec::new(), Some(http::format_error(&e)))
        }
    }
}
