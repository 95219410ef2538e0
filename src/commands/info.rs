use anyhow::Result;
use serde::Serialize;

use crate::http::{WorkerScript, WorkersApi};
use crate::settings::Project;
use crate::terminal::message::{Message, StdOut};
use crate::terminal::to_display_string;

use super::remote_error;

#[derive(Debug, Serialize)]
pub struct WorkerInfo {
    #[serde(flatten)]
    pub script: WorkerScript,
    pub settings: serde_json::Value,
}

pub fn info(api: &impl WorkersApi, project: &Project) -> Result<()> {
    let info = fetch(api, &project.worker_name)?;

    StdOut::success("Worker information:");
    println!("{}", to_display_string(&info)?);

    Ok(())
}

pub fn fetch(api: &impl WorkersApi, worker_name: &str) -> Result<WorkerInfo> {
    // The settings endpoint knows nothing about timestamps; the listing does.
    let script = api
        .list_scripts()
        .map_err(remote_error)?
        .into_iter()
        .find(|script| script.id == worker_name);

    let script = match script {
        Some(script) => script,
        None => anyhow::bail!(
            "Worker \"{}\" is not deployed on this account. Run `cfworker deploy` first.",
            worker_name
        ),
    };

    let settings = api.get_script_settings(worker_name).map_err(remote_error)?;

    Ok(WorkerInfo { script, settings })
}
