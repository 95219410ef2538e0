use std::cell::RefCell;

use reqwest::StatusCode;

use super::{Schedule, TokenStatus, WorkerScript, WorkersApi, WorkersKvNamespace, WorkersRoute};
use crate::error::{ApiError, RemoteError};
use crate::upload::ScriptUpload;

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct MockApi {
    pub calls: RefCell<Vec<String>>,
    pub uploads: RefCell<Vec<ScriptUpload>>,
    pub existing_routes: Vec<WorkersRoute>,
    pub scripts: Vec<WorkerScript>,
    pub namespaces: Vec<WorkersKvNamespace>,
    pub fail_with: Option<ApiError>,
    pub fail_on: Option<&'static str>,
}

impl MockApi {
    pub fn failing(code: u32, message: &str) -> Self {
        MockApi {
            fail_with: Some(ApiError {
                code,
                message: message.to_string(),
            }),
            ..MockApi::default()
        }
    }

    /// Only calls named `call` fail; the rest succeed.
    pub fn failing_on(call: &'static str, code: u32, message: &str) -> Self {
        MockApi {
            fail_on: Some(call),
            ..MockApi::failing(code, message)
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), RemoteError> {
        let fails = self.fail_on.map_or(true, |name| call.split(' ').next() == Some(name));
        self.calls.borrow_mut().push(call);
        match &self.fail_with {
            Some(error) if fails => Err(RemoteError::Api {
                status: StatusCode::BAD_REQUEST,
                errors: vec![error.clone()],
            }),
            _ => Ok(()),
        }
    }
}

impl WorkersApi for MockApi {
    fn upload_script(
        &self,
        script_name: &str,
        upload: &ScriptUpload,
    ) -> Result<WorkerScript, RemoteError> {
        self.record(format!("upload_script {}", script_name))?;
        self.uploads.borrow_mut().push(upload.clone());
        Ok(WorkerScript {
            id: script_name.to_string(),
            etag: Some("etag".to_string()),
            ..WorkerScript::default()
        })
    }

    fn get_script_settings(&self, script_name: &str) -> Result<serde_json::Value, RemoteError> {
        self.record(format!("get_script_settings {}", script_name))?;
        Ok(serde_json::json!({ "bindings": [] }))
    }

    fn list_scripts(&self) -> Result<Vec<WorkerScript>, RemoteError> {
        self.record("list_scripts".to_string())?;
        Ok(self.scripts.clone())
    }

    fn delete_script(&self, script_name: &str) -> Result<(), RemoteError> {
        self.record(format!("delete_script {}", script_name))
    }

    fn list_kv_namespaces(&self) -> Result<Vec<WorkersKvNamespace>, RemoteError> {
        self.record("list_kv_namespaces".to_string())?;
        Ok(self.namespaces.clone())
    }

    fn create_kv_namespace(&self, title: &str) -> Result<WorkersKvNamespace, RemoteError> {
        self.record(format!("create_kv_namespace {}", title))?;
        Ok(WorkersKvNamespace {
            id: format!("{}-id", title),
            title: title.to_string(),
        })
    }

    fn list_routes(&self, zone_id: &str) -> Result<Vec<WorkersRoute>, RemoteError> {
        self.record(format!("list_routes {}", zone_id))?;
        Ok(self.existing_routes.clone())
    }

    fn create_route(
        &self,
        zone_id: &str,
        pattern: &str,
        script_name: &str,
    ) -> Result<WorkersRoute, RemoteError> {
        self.record(format!("create_route {} {}", zone_id, pattern))?;
        Ok(WorkersRoute {
            id: format!("route-{}", self.calls.borrow().len()),
            pattern: pattern.to_string(),
            script: Some(script_name.to_string()),
        })
    }

    fn update_schedules(
        &self,
        script_name: &str,
        crons: &[String],
    ) -> Result<Vec<Schedule>, RemoteError> {
        self.record(format!("update_schedules {}", script_name))?;
        Ok(crons
            .iter()
            .map(|cron| Schedule {
                cron: cron.clone(),
                created_on: None,
                modified_on: None,
            })
            .collect())
    }

    fn verify_token(&self) -> Result<TokenStatus, RemoteError> {
        self.record("verify_token".to_string())?;
        Ok(TokenStatus {
            id: "token-id".to_string(),
            status: "active".to_string(),
            expires_on: None,
        })
    }
}
