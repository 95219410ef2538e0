use anyhow::Result;

use crate::http::WorkersApi;
use crate::settings::Project;
use crate::terminal::interactive;
use crate::terminal::message::{Message, StdOut};

use super::remote_error;

/// Removes the deployed worker. Asks first unless `force` is set.
pub fn delete(api: &impl WorkersApi, project: &Project, force: bool) -> Result<()> {
    let worker_name = &project.worker_name;

    if !force {
        let prompt = format!(
            "Are you sure you want to delete the worker \"{}\"? This action cannot be undone.",
            worker_name
        );
        if !interactive::confirm(&prompt)? {
            StdOut::info("Not deleting.");
            return Ok(());
        }
    }

    StdOut::working(&format!("Deleting worker \"{}\"...", worker_name));
    api.delete_script(worker_name).map_err(remote_error)?;
    StdOut::success(&format!("Worker '{}' deleted successfully", worker_name));

    Ok(())
}
