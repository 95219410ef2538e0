use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, RemoteError};

/// Paging details some list endpoints attach to their result.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResultInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub count: Option<u32>,
    pub total_count: Option<u32>,
    pub total_pages: Option<u32>,
}

/// A successful response with its `result` decoded.
#[derive(Debug)]
pub struct Envelope<T> {
    pub result: T,
    pub result_info: Option<ResultInfo>,
    pub messages: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    errors: Vec<ApiError>,
    #[serde(default)]
    messages: Vec<serde_json::Value>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

/// Every endpoint answers with the same `{success, result, errors, messages}`
/// shape. Anything else is reported with the body it came with.
pub(crate) fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Envelope<T>, RemoteError> {
    let invalid = || RemoteError::InvalidResponse {
        status,
        body: body.to_string(),
    };

    let raw: RawEnvelope = serde_json::from_str(body).map_err(|_| invalid())?;

    if !raw.success || !status.is_success() {
        return Err(RemoteError::Api {
            status,
            errors: raw.errors,
        });
    }

    for message in &raw.messages {
        log::info!("API message: {}", message);
    }

    let result = serde_json::from_value(raw.result).map_err(|e| {
        log::debug!("could not decode result: {}", e);
        invalid()
    })?;

    Ok(Envelope {
        result,
        result_info: raw.result_info,
        messages: raw.messages,
    })
}
