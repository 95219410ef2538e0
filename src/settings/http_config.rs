use std::convert::TryFrom;
use std::path::Path;
use std::{fmt, marker::PhantomData, time::Duration};

use config::{Config, Source};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use super::environment::{DotenvFile, Environment};
use crate::error::ConfigError;
use crate::http::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_HTTP_TIMEOUT_SECONDS,
    DEFAULT_MAX_RETRIES, MAX_RETRIES_LIMIT,
};

const PREFIX: &str = "CFWORKER_";
const WHITELIST: [&str; 4] = [
    "CFWORKER_CONNECT_TIMEOUT",
    "CFWORKER_HTTP_TIMEOUT",
    "CFWORKER_MAX_RETRIES",
    "CFWORKER_API_BASE_URL",
];

/// Transport tuning, read from `CFWORKER_*` variables in the secrets file or
/// the environment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HttpConfig {
    #[serde(default, deserialize_with = "string_or_number")]
    pub connect_timeout: Option<u64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub http_timeout: Option<u64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_retries: Option<u64>,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl HttpConfig {
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
        if let Some(path) = secrets_path.filter(|p| p.exists()) {
            s.merge(DotenvFile::load(path, PREFIX, &WHITELIST)?)?;
        }
        s.merge(environment)?;

        Ok(s.try_into()?)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        )
    }

    pub fn get_http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS))
    }

    pub fn get_max_retries(&self) -> u32 {
        match self.max_retries {
            Some(n) if n > u64::from(MAX_RETRIES_LIMIT) => {
                log::warn!(
                    "CFWORKER_MAX_RETRIES={} is above the limit, using {}",
                    n,
                    MAX_RETRIES_LIMIT
                );
                MAX_RETRIES_LIMIT
            }
            Some(n) => u32::try_from(n).unwrap_or(MAX_RETRIES_LIMIT),
            None => DEFAULT_MAX_RETRIES,
        }
    }

    pub fn get_api_base_url(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }
}

/// Values read from the environment are always strings, so numbers are
/// accepted in either form.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber(PhantomData<fn() -> Option<u64>>);

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("`str`, `u64`, or `none`")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(value), &self))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v)
                .map(Some)
                .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumber(PhantomData))
}
