pub mod binding;
mod credentials;
mod environment;
mod http_config;
pub mod project;

pub use credentials::{Credentials, ACCOUNT_ID_VAR, API_TOKEN_VAR};
pub use environment::{DotenvFile, Environment};
pub use http_config::HttpConfig;
pub use project::Project;

pub(crate) use credentials::write_private;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "./.cfworker.json";
pub const DEFAULT_SECRETS_PATH: &str = "./.env";

/// Everything a command needs from disk and the environment, loaded up front
/// so a bad configuration fails before any request is made.
#[derive(Clone, Debug)]
pub struct Settings {
    pub config_path: PathBuf,
    pub project: Project,
    pub credentials: Credentials,
    pub http: HttpConfig,
}

impl Settings {
    pub fn load(config_path: &Path, secrets_path: &Path) -> Result<Settings, ConfigError> {
        let project = Project::load(config_path)?;
        let (credentials, http) = load_account(secrets_path)?;

        Ok(Settings {
            config_path: config_path.to_path_buf(),
            project,
            credentials,
            http,
        })
    }

    /// The entry script, relative to the directory holding the project file.
    pub fn script_path(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(dir) => dir.join(&self.project.main),
            None => PathBuf::from(&self.project.main),
        }
    }
}

/// Credentials and transport settings, for commands that don't need a
/// project file.
pub fn load_account(secrets_path: &Path) -> Result<(Credentials, HttpConfig), ConfigError> {
    let credentials = Credentials::new(Some(secrets_path))?;
    let http = HttpConfig::new(Some(secrets_path))?;
    Ok((credentials, http))
}
