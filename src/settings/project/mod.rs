mod d1_database;
mod kv_namespace;
mod r2_bucket;
mod script_format;
mod triggers;

pub use d1_database::D1Database;
pub use kv_namespace::KvNamespace;
pub use r2_bucket::R2Bucket;
pub use script_format::ScriptFormat;
pub use triggers::Triggers;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::binding::{check_names, D1_DATABASES, KV_NAMESPACES, R2_BUCKETS, VARS};
use super::DEFAULT_CONFIG_PATH;
use crate::error::ConfigError;
use crate::terminal::message::{Message, StdErr};

pub const DEFAULT_MAIN: &str = "worker.js";
pub const DEFAULT_COMPATIBILITY_DATE: &str = "2024-01-01";

static WORKER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_][a-z0-9-_]*$").expect("worker name regex is valid"));

/// The contents of a `.cfworker.json` project file.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub worker_name: String,
    #[serde(default = "default_main")]
    pub main: String,
    #[serde(default = "default_compatibility_date")]
    pub compatibility_date: String,
    #[serde(default, skip_serializing_if = "ScriptFormat::is_default")]
    pub format: ScriptFormat,
    #[serde(default)]
    pub routes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub kv_namespaces: Vec<KvNamespace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub d1_databases: Vec<D1Database>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r2_buckets: Vec<R2Bucket>,
    #[serde(default)]
    pub vars: IndexMap<String, String>,
    #[serde(default)]
    pub triggers: Triggers,
}

// Whatever `Project` does not claim ends up in `unknown`.
#[derive(Deserialize)]
struct ProjectFile {
    #[serde(flatten)]
    project: Project,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

// `"worker_name": null` is reported as missing rather than as a type error.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_main() -> String {
    DEFAULT_MAIN.to_string()
}

fn default_compatibility_date() -> String {
    DEFAULT_COMPATIBILITY_DATE.to_string()
}

impl Project {
    /// A fresh project for `init`, dated today.
    pub fn generate(worker_name: String) -> Project {
        Project {
            worker_name,
            main: default_main(),
            compatibility_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            format: ScriptFormat::default(),
            routes: Vec::new(),
            zone_id: None,
            kv_namespaces: Vec::new(),
            d1_databases: Vec::new(),
            r2_buckets: Vec::new(),
            vars: IndexMap::new(),
            triggers: Triggers::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Project, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                    default_path: path == Path::new(DEFAULT_CONFIG_PATH),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let file: ProjectFile = serde_json::from_str(&contents)
            .map_err(|source| parse_error(path, &contents, source))?;

        for key in file.unknown.keys() {
            log::warn!("ignoring unknown key `{}` in {}", key, path.display());
            StdErr::warn(&format!(
                "Unknown key `{}` in {} will be ignored",
                key,
                path.display()
            ));
        }

        let project = file.project;
        project.validate()?;
        log::info!("Loaded project {} from {}", project.worker_name, path.display());

        Ok(project)
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let to_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut json = serde_json::to_string_pretty(self).map_err(|e| to_err(io::Error::from(e)))?;
        json.push('\n');

        log::info!("Writing a project file at {}", path.display());
        fs::write(path, json).map_err(to_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_name.trim().is_empty() {
            return Err(ConfigError::MissingField("worker_name"));
        }
        if !validate_worker_name(&self.worker_name) {
            return Err(ConfigError::InvalidWorkerName(self.worker_name.clone()));
        }
        if self.main.trim().is_empty() {
            return Err(ConfigError::MissingField("main"));
        }
        if chrono::NaiveDate::parse_from_str(&self.compatibility_date, "%Y-%m-%d").is_err() {
            return Err(ConfigError::InvalidCompatibilityDate(
                self.compatibility_date.clone(),
            ));
        }

        check_names(KV_NAMESPACES, self.kv_namespaces.iter().map(|kv| kv.binding.as_str()))?;
        check_names(D1_DATABASES, self.d1_databases.iter().map(|db| db.binding.as_str()))?;
        check_names(R2_BUCKETS, self.r2_buckets.iter().map(|r2| r2.binding.as_str()))?;
        check_names(VARS, self.vars.keys().map(String::as_str))?;

        Ok(())
    }

    /// Routes are only published when the zone that owns them is known.
    pub fn is_zoned(&self) -> bool {
        !self.routes.is_empty() && self.zone_id.as_deref().map_or(false, |z| !z.is_empty())
    }
}

fn parse_error(path: &Path, contents: &str, source: serde_json::Error) -> ConfigError {
    if source.is_data() {
        if let Some((field, source)) = invalid_field(contents) {
            return ConfigError::InvalidField {
                path: path.to_path_buf(),
                field,
                source,
            };
        }
    }
    ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

// Flattening drops the key a type error came from, so each top-level entry
// is decoded on its own until one fails.
fn invalid_field(contents: &str) -> Option<(String, serde_json::Error)> {
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(contents).ok()?;

    entries.into_iter().find_map(|(key, value)| {
        let mut single = serde_json::Map::new();
        single.insert(key.clone(), value);
        serde_json::from_value::<Project>(serde_json::Value::Object(single))
            .err()
            .map(|e| (key, e))
    })
}

pub fn validate_worker_name(name: &str) -> bool {
    WORKER_NAME.is_match(name)
}

#[cfg(test)]
mod tests;
