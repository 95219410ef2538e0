use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use config::{ConfigError, Source, Value};

use crate::error;

/// Whitelisted process environment variables as a `config::Source`.
///
/// Rather than pulling the whole environment in on `collect`, only the
/// listed variables are read. Keys are stripped of `prefix` and downcased, so
/// with a prefix of `CLOUDFLARE_` the variable `CLOUDFLARE_API_TOKEN` lands on
/// the `api_token` key.
#[derive(Clone, Debug)]
pub struct Environment {
    prefix: &'static str,
    whitelist: Vec<&'static str>,
}

impl Environment {
    pub fn with_whitelist(prefix: &'static str, whitelist: Vec<&'static str>) -> Self {
        Environment { prefix, whitelist }
    }
}

impl Source for Environment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<HashMap<String, Value>, ConfigError> {
        let uri: String = "env".into();
        let vars = self
            .whitelist
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (*key, value)));

        Ok(collect_stripped(self.prefix, vars, &uri))
    }
}

/// The same whitelisted keys, read from a dotenv-style file instead of the
/// process environment. The file is parsed eagerly so a malformed file is
/// reported with its path rather than as a generic settings error.
#[derive(Clone, Debug)]
pub struct DotenvFile {
    path: PathBuf,
    prefix: &'static str,
    vars: Vec<(&'static str, String)>,
}

impl DotenvFile {
    pub fn load(
        path: &Path,
        prefix: &'static str,
        whitelist: &[&'static str],
    ) -> Result<Self, error::ConfigError> {
        let to_err = |source| error::ConfigError::Secrets {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = Vec::new();
        for item in dotenvy::from_path_iter(path).map_err(to_err)? {
            let (key, value) = item.map_err(to_err)?;
            if let Some(known) = whitelist.iter().find(|k| **k == key) {
                vars.push((*known, value));
            } else {
                log::debug!("ignoring {} from {}", key, path.display());
            }
        }

        Ok(DotenvFile {
            path: path.to_path_buf(),
            prefix,
            vars,
        })
    }
}

impl Source for DotenvFile {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<HashMap<String, Value>, ConfigError> {
        let uri = self.path.display().to_string();
        let vars = self.vars.iter().map(|(key, value)| (*key, value.clone()));

        Ok(collect_stripped(self.prefix, vars, &uri))
    }
}

fn collect_stripped<I>(prefix: &str, vars: I, uri: &String) -> HashMap<String, Value>
where
    I: Iterator<Item = (&'static str, String)>,
{
    let mut m = HashMap::new();
    for (key, value) in vars {
        let key = key.strip_prefix(prefix).unwrap_or(key);
        m.insert(key.to_lowercase(), Value::new(Some(uri), value));
    }
    m
}

/// Stand-in for the process environment so tests don't race on `env::set_var`.
#[derive(Clone, Debug, Default)]
#[cfg(test)]
pub struct MockEnvironment {
    prefix: &'static str,
    vars: Vec<(&'static str, &'static str)>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn with_prefix(prefix: &'static str) -> Self {
        MockEnvironment {
            prefix,
            vars: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'static str, value: &'static str) -> Self {
        self.vars.push((key, value));

        self
    }
}

#[cfg(test)]
impl Source for MockEnvironment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<HashMap<String, Value>, ConfigError> {
        let uri: String = "env".into();
        let vars = self.vars.iter().map(|(k, v)| (*k, v.to_string()));

        Ok(collect_stripped(self.prefix, vars, &uri))
    }
}
