use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum ScriptFormat {
    #[serde(rename = "service-worker")]
    ServiceWorker,
    #[serde(rename = "modules")]
    Modules,
}

impl Default for ScriptFormat {
    fn default() -> Self {
        ScriptFormat::Modules
    }
}

impl ScriptFormat {
    pub fn is_default(&self) -> bool {
        *self == ScriptFormat::default()
    }

    /// Content type of the script part of an upload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::ServiceWorker => "application/javascript",
            Self::Modules => "application/javascript+module",
        }
    }
}

impl fmt::Display for ScriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            Self::ServiceWorker => "service-worker",
            Self::Modules => "modules",
        };
        write!(f, "{}", printable)
    }
}

impl FromStr for ScriptFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service-worker" => Ok(Self::ServiceWorker),
            "modules" => Ok(Self::Modules),
            _ => anyhow::bail!("{} is not a valid script format!", s),
        }
    }
}
