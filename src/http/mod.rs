mod client;
mod format;
#[cfg(test)]
pub(crate) mod mock;
mod response;
mod retry;

pub use client::ApiClient;
pub use format::{format_error, status_code_context};
pub use response::{Envelope, ResultInfo};
pub use retry::Backoff;

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::upload::ScriptUpload;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const MAX_RETRIES_LIMIT: u32 = 10;
pub const KV_NAMESPACES_PER_PAGE: u32 = 100;

/// A script as the scripts endpoints describe it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct WorkerScript {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_model: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WorkersKvNamespace {
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WorkersRoute {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub script: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Schedule {
    pub cron: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TokenStatus {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
}

impl TokenStatus {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// The calls `cfworker` makes against the Workers API.
///
/// `upload_script`, `delete_script` and the other writes are attempted exactly
/// once. Implementations may retry the reads.
pub trait WorkersApi {
    fn upload_script(&self, script_name: &str, upload: &ScriptUpload)
        -> Result<WorkerScript, RemoteError>;

    fn get_script_settings(&self, script_name: &str) -> Result<serde_json::Value, RemoteError>;

    fn list_scripts(&self) -> Result<Vec<WorkerScript>, RemoteError>;

    fn delete_script(&self, script_name: &str) -> Result<(), RemoteError>;

    fn list_kv_namespaces(&self) -> Result<Vec<WorkersKvNamespace>, RemoteError>;

    fn create_kv_namespace(&self, title: &str) -> Result<WorkersKvNamespace, RemoteError>;

    fn list_routes(&self, zone_id: &str) -> Result<Vec<WorkersRoute>, RemoteError>;

    fn create_route(
        &self,
        zone_id: &str,
        pattern: &str,
        script_name: &str,
    ) -> Result<WorkersRoute, RemoteError>;

    fn update_schedules(
        &self,
        script_name: &str,
        crons: &[String],
    ) -> Result<Vec<Schedule>, RemoteError>;

    fn verify_token(&self) -> Result<TokenStatus, RemoteError>;
}
