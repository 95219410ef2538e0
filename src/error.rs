use std::fmt;
use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything that can go wrong while turning a project on disk into a
/// deployed worker.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Missing or malformed local configuration. Always raised before any
/// request leaves the machine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} not found{}", .path.display(), init_hint(.default_path))]
    NotFound { path: PathBuf, default_path: bool },
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("{} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("field `{field}` in {} is invalid: {source}", .path.display())]
    InvalidField {
        path: PathBuf,
        field: String,
        source: serde_json::Error,
    },
    #[error("field `{0}` is required in your configuration file")]
    MissingField(&'static str),
    #[error("Worker name \"{0}\" invalid. Ensure that you only use lowercase letters, dashes, underscores, and numbers.")]
    InvalidWorkerName(String),
    #[error("compatibility_date \"{0}\" must be a date in the form YYYY-MM-DD")]
    InvalidCompatibilityDate(String),
    #[error("{category} entry #{index} is missing its `{field}` field")]
    MissingBindingField {
        category: &'static str,
        index: usize,
        field: &'static str,
    },
    #[error("binding \"{binding}\" in {category} is invalid. A binding can only have alphanumeric and _ characters, and cannot begin with a number")]
    InvalidBindingName {
        category: &'static str,
        binding: String,
    },
    #[error("binding \"{binding}\" is declared more than once in {category}; each binding must be unique")]
    DuplicateBinding {
        category: &'static str,
        binding: String,
    },
    #[error("{0} is not set. Add it to your .env file or export it, or run `cfworker config-setup`")]
    MissingCredential(&'static str),
    #[error("{0} contains characters that cannot be sent in an HTTP header")]
    InvalidHeader(&'static str),
    #[error("could not read secrets file {}: {source}", .path.display())]
    Secrets {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

/// A local precondition of a deployment that does not hold.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Script file not found: {}", .0.display())]
    ScriptNotFound(PathBuf),
    #[error("Script file is empty: {}", .0.display())]
    ScriptEmpty(PathBuf),
    #[error("could not read script file {}: {source}", .path.display())]
    ScriptUnreadable { path: PathBuf, source: io::Error },
}

/// One entry of the `errors` array of an API response, kept exactly as the
/// platform sent it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ApiError {
    pub code: u32,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Code {}: {}", self.code, self.message)
    }
}

/// The platform refused or could not serve a request.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API request failed ({status}): {}", join_errors(.errors))]
    Api {
        status: StatusCode,
        errors: Vec<ApiError>,
    },
    #[error("invalid response from API ({status}): {body}")]
    InvalidResponse { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RemoteError {
    /// The platform's error list, untouched. Empty for failures that never
    /// produced an envelope.
    pub fn errors(&self) -> &[ApiError] {
        match self {
            RemoteError::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Api { status, .. } | RemoteError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            RemoteError::Transport(e) => e.status(),
            RemoteError::Encode(_) => None,
        }
    }

    /// Whether a read-only request that failed this way may be sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => self
                .status()
                .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
                .unwrap_or(false),
        }
    }
}

fn init_hint(default_path: &bool) -> &'static str {
    if *default_path {
        "; run `cfworker init` to create one."
    } else {
        ""
    }
}

fn join_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no error details were returned".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
