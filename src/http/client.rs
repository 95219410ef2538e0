use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::response::{self, Envelope};
use super::retry::{with_retries, Backoff};
use super::{
    Schedule, TokenStatus, WorkerScript, WorkersApi, WorkersKvNamespace, WorkersRoute,
    KV_NAMESPACES_PER_PAGE,
};
use crate::error::{ConfigError, Error, RemoteError};
use crate::settings::{Credentials, HttpConfig, API_TOKEN_VAR};
use crate::upload::ScriptUpload;

/// `WorkersApi` over HTTPS, authenticated with an API token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    account_id: String,
    max_retries: u32,
    backoff: Backoff,
}

impl ApiClient {
    pub fn new(credentials: &Credentials, http: &HttpConfig) -> Result<Self, Error> {
        let client = builder(http)
            .default_headers(headers(&credentials.api_token)?)
            .redirect(Policy::none())
            .build()
            .map_err(RemoteError::from)?;

        Ok(ApiClient {
            client,
            base_url: http.get_api_base_url(),
            account_id: credentials.account_id.clone(),
            max_retries: http.get_max_retries(),
            backoff: Backoff::default(),
        })
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn account_url(&self, path: &str) -> String {
        self.url(&format!("accounts/{}/{}", self.account_id, path))
    }

    fn script_url(&self, script_name: &str, suffix: &str) -> String {
        self.account_url(&format!("workers/scripts/{}{}", script_name, suffix))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, RemoteError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        log::debug!("{} {}", status, body);

        response::decode(status, &body)
    }

    /// GETs are safe to repeat, so they go through the retry loop.
    fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, RemoteError> {
        log::info!("GET {}", url);
        with_retries(url, self.max_retries, &self.backoff, || {
            self.send(self.client.get(url).query(query))
        })
    }
}

fn builder(http: &HttpConfig) -> ClientBuilder {
    Client::builder()
        .connect_timeout(http.get_connect_timeout())
        .timeout(http.get_http_timeout())
}

fn headers(api_token: &str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent()));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_token))
        .map_err(|_| ConfigError::InvalidHeader(API_TOKEN_VAR))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}

fn user_agent() -> &'static str {
    if cfg!(debug_assertions) {
        "cfworker/dev"
    } else {
        concat!("cfworker/", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Deserialize)]
struct CreatedRoute {
    id: String,
}

#[derive(Deserialize)]
struct Schedules {
    #[serde(default)]
    schedules: Vec<Schedule>,
}

impl WorkersApi for ApiClient {
    fn upload_script(
        &self,
        script_name: &str,
        upload: &ScriptUpload,
    ) -> Result<WorkerScript, RemoteError> {
        let url = self.script_url(script_name, "");
        log::info!("PUT {} ({} bytes)", url, upload.script_size());

        let request = self.client.put(&url).multipart(upload.form()?);
        Ok(self.send(request)?.result)
    }

    fn get_script_settings(&self, script_name: &str) -> Result<serde_json::Value, RemoteError> {
        let url = self.script_url(script_name, "/settings");
        Ok(self.get(&url, &[])?.result)
    }

    fn list_scripts(&self) -> Result<Vec<WorkerScript>, RemoteError> {
        let url = self.account_url("workers/scripts");
        Ok(self.get(&url, &[])?.result)
    }

    fn delete_script(&self, script_name: &str) -> Result<(), RemoteError> {
        let url = self.script_url(script_name, "");
        log::info!("DELETE {}", url);

        self.send::<serde_json::Value>(self.client.delete(&url))?;
        Ok(())
    }

    fn list_kv_namespaces(&self) -> Result<Vec<WorkersKvNamespace>, RemoteError> {
        let url = self.account_url("storage/kv/namespaces");
        let mut namespaces = Vec::new();
        let mut page = 1;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", KV_NAMESPACES_PER_PAGE.to_string()),
            ];
            let envelope: Envelope<Vec<WorkersKvNamespace>> = self.get(&url, &query)?;
            let fetched = envelope.result.len() as u32;
            namespaces.extend(envelope.result);

            let total_pages = envelope.result_info.and_then(|info| info.total_pages);
            let done = match total_pages {
                Some(total) => page >= total,
                None => fetched < KV_NAMESPACES_PER_PAGE,
            };
            if done || fetched == 0 {
                break;
            }
            page += 1;
        }

        Ok(namespaces)
    }

    fn create_kv_namespace(&self, title: &str) -> Result<WorkersKvNamespace, RemoteError> {
        let url = self.account_url("storage/kv/namespaces");
        log::info!("POST {} ({})", url, title);

        let request = self.client.post(&url).json(&json!({ "title": title }));
        Ok(self.send(request)?.result)
    }

    fn list_routes(&self, zone_id: &str) -> Result<Vec<WorkersRoute>, RemoteError> {
        let url = self.url(&format!("zones/{}/workers/routes", zone_id));
        Ok(self.get(&url, &[])?.result)
    }

    fn create_route(
        &self,
        zone_id: &str,
        pattern: &str,
        script_name: &str,
    ) -> Result<WorkersRoute, RemoteError> {
        let url = self.url(&format!("zones/{}/workers/routes", zone_id));
        log::info!("Creating your route {:#?}", pattern);

        let request = self
            .client
            .post(&url)
            .json(&json!({ "pattern": pattern, "script": script_name }));
        let created: CreatedRoute = self.send(request)?.result;

        Ok(WorkersRoute {
            id: created.id,
            pattern: pattern.to_string(),
            script: Some(script_name.to_string()),
        })
    }

    fn update_schedules(
        &self,
        script_name: &str,
        crons: &[String],
    ) -> Result<Vec<Schedule>, RemoteError> {
        let url = self.script_url(script_name, "/schedules");
        log::info!("Pushing {} schedule(s)...", crons.len());

        let body: Vec<serde_json::Value> = crons.iter().map(|cron| json!({ "cron": cron })).collect();
        let schedules: Schedules = self.send(self.client.put(&url).json(&body))?.result;
        Ok(schedules.schedules)
    }

    fn verify_token(&self) -> Result<TokenStatus, RemoteError> {
        let url = self.url("user/tokens/verify");
        Ok(self.get(&url, &[])?.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_token_is_sent_as_a_bearer_header() {
        let headers = headers("secret-token").unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer secret-token");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert!(headers[USER_AGENT].to_str().unwrap().starts_with("cfworker/"));
    }

    #[test]
    fn a_token_with_a_newline_is_rejected() {
        let err = headers("secret\ntoken").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidHeader(API_TOKEN_VAR)));
    }

    #[test]
    fn urls_are_scoped_to_the_account() {
        let credentials = Credentials {
            account_id: "acct".to_string(),
            api_token: "tok".to_string(),
        };
        let client = ApiClient::new(&credentials, &HttpConfig::default()).unwrap();

        assert_eq!(
            client.script_url("demo", "/settings"),
            "https://api.cloudflare.com/client/v4/accounts/acct/workers/scripts/demo/settings"
        );
    }
}
