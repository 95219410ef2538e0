use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::error::ConfigError;
use crate::settings::project::{validate_worker_name, Project};
use crate::settings::{write_private, ACCOUNT_ID_VAR, API_TOKEN_VAR};
use crate::terminal::message::{Message, StdOut};
use crate::terminal::styles;

pub const CONFIG_FILE_NAME: &str = ".cfworker.json";
pub const SECRETS_FILE_NAME: &str = ".env";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Template {
    Edge,
    Api,
    Static,
}

impl Template {
    pub const VARIANTS: [&'static str; 3] = ["edge", "api", "static"];

    pub fn contents(&self) -> &'static str {
        match self {
            Template::Edge => include_str!("templates/edge.js"),
            Template::Api => include_str!("templates/api.js"),
            Template::Static => include_str!("templates/static.js"),
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Template::Edge
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            Template::Edge => "edge",
            Template::Api => "api",
            Template::Static => "static",
        };
        write!(f, "{}", printable)
    }
}

impl FromStr for Template {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge" => Ok(Template::Edge),
            "api" => Ok(Template::Api),
            "static" => Ok(Template::Static),
            _ => anyhow::bail!("{} is not a valid template!", s),
        }
    }
}

/// Scaffolds a project in `dir`: the project file, an entry script from
/// `template`, and a secrets file with placeholders unless one exists.
pub fn init(dir: &Path, worker_name: &str, template: Template, force: bool) -> Result<()> {
    if !validate_worker_name(worker_name) {
        return Err(ConfigError::InvalidWorkerName(worker_name.to_string()).into());
    }

    let project = Project::generate(worker_name.to_string());
    let config_path = dir.join(CONFIG_FILE_NAME);
    let script_path = dir.join(&project.main);
    let secrets_path = dir.join(SECRETS_FILE_NAME);

    for path in &[&config_path, &script_path] {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }

    project.write(&config_path)?;
    StdOut::success(&format!("Created {}", CONFIG_FILE_NAME));

    log::info!("Writing {} from the {} template", script_path.display(), template);
    fs::write(&script_path, template.contents())?;
    StdOut::success(&format!(
        "Created {} from '{}' template",
        project.main, template
    ));

    let mut steps = Vec::new();
    if !secrets_path.exists() {
        let placeholder = format!(
            "{}=your_account_id_here\n{}=your_api_token_here\n",
            ACCOUNT_ID_VAR, API_TOKEN_VAR
        );
        write_private(&secrets_path, &placeholder)?;
        StdOut::success(&format!("Created {} file", SECRETS_FILE_NAME));
        steps.push(format!(
            "Edit {} and add your Cloudflare credentials",
            SECRETS_FILE_NAME
        ));
    }
    steps.push(format!(
        "Edit {} to implement your worker logic",
        project.main
    ));
    steps.push(format!(
        "Run {} to deploy your worker",
        styles::highlight("cfworker deploy")
    ));

    println!("\nNext steps:");
    for (i, step) in steps.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }

    Ok(())
}
