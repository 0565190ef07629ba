use crate::models::Payload;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const METRICS_PATH: &str = "/v1/metrics/performance";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures of the upstream fetch. These surface as an inline banner on the
/// page; the transform layer never sees them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("metrics API rejected the key")]
    Unauthorized,
    #[error("metrics API returned status {0}")]
    UpstreamStatus(u16),
    #[error("metrics API unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metrics body malformed: {0}")]
    Decode(serde_json::Error),
}

/// Client for the remote metrics API. The key is sent verbatim both as the
/// `secure_api_key` query parameter and the `x-api-key` header, matching what
/// the endpoint expects.
#[derive(Clone)]
pub struct MetricsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MetricsClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// One snapshot of `GET /v1/metrics/performance`. Only a 200 with a JSON
    /// object body counts as success.
    pub async fn fetch_payload(&self) -> Result<Payload, FetchError> {
        let url = format!("{}{METRICS_PATH}", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[("secure_api_key", self.api_key.as_str())])
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
            status => return Err(FetchError::UpstreamStatus(status.as_u16())),
        }

        let body = response.bytes().await?;
        let document: Value = serde_json::from_slice(&body).map_err(FetchError::Decode)?;
        unwrap_envelope(document)
    }
}

/// The API answers either `{ "payload": <doc>, ... }` or the document
/// directly; both shapes are accepted.
fn unwrap_envelope(document: Value) -> Result<Payload, FetchError> {
    let inner = match document {
        Value::Object(mut fields) if fields.contains_key("payload") => {
            fields.remove("payload").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(FetchError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enveloped_body_is_unwrapped() {
        let payload = unwrap_envelope(json!({
            "status": "ok",
            "payload": { "user": { "total_count": 3 } }
        }))
        .unwrap();
        assert_eq!(payload.user.total_count, 3);
    }

    #[test]
    fn bare_body_is_accepted() {
        let payload = unwrap_envelope(json!({ "user": { "total_count": 5 } })).unwrap();
        assert_eq!(payload.user.total_count, 5);
    }

    #[test]
    fn non_object_body_is_a_decode_error() {
        assert!(matches!(
            unwrap_envelope(json!("nope")),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            unwrap_envelope(json!({ "payload": 42 })),
            Err(FetchError::Decode(_))
        ));
    }
}
