use anyhow::Result;

use crate::deploy::{self, DeployOptions, Deployment, DeploymentResult, DryRunReport};
use crate::error::Error;
use crate::http::WorkersApi;
use crate::settings::Settings;
use crate::terminal::message::{Message, StdOut};
use crate::terminal::{styles, to_display_string};

use super::remote_error;

pub fn deploy(api: &impl WorkersApi, settings: &Settings, dry_run: bool) -> Result<()> {
    if !dry_run {
        super::whoami::validate_token(api)?;
        StdOut::success("API connection verified");
    }

    let deployment = deploy::deploy(
        api,
        &settings.project,
        &settings.script_path(),
        DeployOptions { dry_run },
    )
    .map_err(|e| match e {
        Error::Remote(e) => remote_error(e),
        e => e.into(),
    })?;

    match deployment {
        Deployment::DryRun(report) => print_dry_run(&report),
        Deployment::Uploaded(result) => print_deployment(&result),
    }
}

fn print_dry_run(report: &DryRunReport) -> Result<()> {
    StdOut::success("Validation successful");
    println!("Worker name: {}", report.worker_name);
    println!("Script size: {} bytes", report.script_size);
    println!("Metadata:\n{}", to_display_string(&report.metadata)?);
    Ok(())
}

fn print_deployment(result: &DeploymentResult) -> Result<()> {
    StdOut::success("Worker deployed successfully!");
    println!("Worker name: {}", result.worker_name);
    println!("Script size: {} bytes", result.script_size);
    if let Some(etag) = &result.script.etag {
        log::info!("etag {}", etag);
    }

    println!(
        "\nYour worker is now live at:\n{}",
        styles::url(format!("https://{}.workers.dev", result.worker_name))
    );

    for route in &result.routes {
        if route.needs_attention() {
            StdOut::warn(&route.to_string());
        } else {
            StdOut::info(&route.to_string());
        }
    }

    if !result.schedules.is_empty() {
        StdOut::info(&format!("Schedules: {}", result.schedules.join(", ")));
    }
    if let Some(error) = &result.schedules_error {
        StdOut::warn(&format!("Schedules were not updated:\n{}", error));
    }

    Ok(())
}
