use anyhow::Result;
use prettytable::{Cell, Row, Table};

use crate::http::{WorkerScript, WorkersApi};
use crate::terminal::message::{Message, StdOut};

use super::remote_error;

const NOT_AVAILABLE: &str = "N/A";

pub fn list(api: &impl WorkersApi) -> Result<()> {
    let scripts = api.list_scripts().map_err(remote_error)?;

    if scripts.is_empty() {
        StdOut::info("No workers found in your account.");
        return Ok(());
    }

    StdOut::info(&format!("Workers ({})", scripts.len()));
    table(&scripts).printstd();

    Ok(())
}

fn table(scripts: &[WorkerScript]) -> Table {
    let mut table = Table::new();
    let table_head = Row::new(vec![
        Cell::new("Name"),
        Cell::new("Created"),
        Cell::new("Modified"),
    ]);
    table.add_row(table_head);

    for script in scripts {
        let row = Row::new(vec![
            Cell::new(&script.id),
            Cell::new(script.created_on.as_deref().unwrap_or(NOT_AVAILABLE)),
            Cell::new(script.modified_on.as_deref().unwrap_or(NOT_AVAILABLE)),
        ]);
        table.add_row(row);
    }
    table
}
