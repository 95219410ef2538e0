use std::fmt;
use std::fs;
use std::path::Path;

use config::{Config, Source};
use serde::Deserialize;

use super::environment::{DotenvFile, Environment};
use crate::error::ConfigError;

pub const ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const API_TOKEN_VAR: &str = "CLOUDFLARE_API_TOKEN";
const PREFIX: &str = "CLOUDFLARE_";
const WHITELIST: [&str; 2] = [ACCOUNT_ID_VAR, API_TOKEN_VAR];

/// The account a worker is deployed to and the token used to do it.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub account_id: String,
    pub api_token: String,
}

// Both keys are optional here so that an absent one can be reported by its
// variable name instead of as a serde "missing field".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCredentials {
    account_id: Option<String>,
    api_token: Option<String>,
}

impl Credentials {
    /// Reads the secrets file (if it exists) and then the process
    /// environment, which wins when both set a key.
    pub fn new(secrets_path: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = Environment::with_whitelist(PREFIX, WHITELIST.to_vec());
        Self::load(secrets_path, environment)
    }

    pub fn load<S>(
        secrets_path: Option<&Path>,
        environment: S,
    ) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut s = Config::new();

        match secrets_path {
            Some(path) if path.exists() => {
                log::info!("Reading credentials from {}", path.display());
                s.merge(DotenvFile::load(path, PREFIX, &WHITELIST)?)?;
            }
            Some(path) => log::info!("No secrets file at {}", path.display()),
            None => {}
        }
        s.merge(environment)?;

        let raw: RawCredentials = s.try_into()?;
        let account_id = non_empty(raw.account_id).ok_or(ConfigError::MissingCredential(ACCOUNT_ID_VAR))?;
        let api_token = non_empty(raw.api_token).ok_or(ConfigError::MissingCredential(API_TOKEN_VAR))?;

        Ok(Credentials {
            account_id,
            api_token,
        })
    }

    /// Writes the pair out as a dotenv file readable only by the current user.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = format!(
            "{}={}\n{}={}\n",
            ACCOUNT_ID_VAR, self.account_id, API_TOKEN_VAR, self.api_token
        );
        write_private(path, &contents)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn write_private(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let to_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, contents).map_err(to_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(to_err)?;
    }

    Ok(())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_token", &"[redacted]")
            .finish()
    }
}
