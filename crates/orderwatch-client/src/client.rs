//! HTTP client for the upstream order endpoint.
//!
//! One GET per call, no retries: a failed fetch fails the run and the next
//! scheduled trigger tries again.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ClientError;
use crate::nested::parse_embedded_json;

/// Longest slice of a response body carried inside an error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// An order record as returned upstream: an open JSON object with no field
/// guaranteed to be present.
pub type RawOrder = serde_json::Map<String, Value>;

/// Client for the configured order endpoint.
///
/// Use [`OrderClient::from_config`] in the binaries or [`OrderClient::new`]
/// to point at a mock server in tests.
pub struct OrderClient {
    client: Client,
    endpoint: Url,
}

impl OrderClient {
    /// Creates a client for `endpoint`, sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the endpoint is not a valid
    /// URL or a header name/value is malformed, and [`ClientError::Http`] if
    /// the underlying `reqwest::Client` cannot be constructed.
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        headers: &[(String, String)],
    ) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ClientError::InvalidConfig(format!("invalid order URL '{endpoint}': {e}"))
        })?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid header name '{name}': {e}"))
            })?;
            let mut header_value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid value for header '{name}': {e}"))
            })?;
            header_value.set_sensitive(true);
            default_headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(default_headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Creates a client from the endpoint, auth headers and HTTP settings in
    /// `config`.
    ///
    /// # Errors
    ///
    /// See [`OrderClient::new`].
    pub fn from_config(config: &orderwatch_core::AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.order_url,
            config.request_timeout_secs,
            &config.user_agent,
            &config.auth_headers(),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends the GET request, asserts a 2xx status and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status, with the
    ///   (truncated) response text.
    /// - [`ClientError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_raw(&self) -> Result<Value, ClientError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body_len = body.len(),
                "order endpoint returned an error status"
            );
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: self.endpoint.path().to_string(),
            body: truncate_body(&body),
            source: e,
        })
    }

    /// Fetches the order and unwraps a `{ "data": { ... } }` envelope.
    ///
    /// # Errors
    ///
    /// Everything [`Self::fetch_raw`] returns, plus
    /// [`ClientError::UnexpectedShape`] when the payload is not an object.
    pub async fn fetch_order(&self) -> Result<RawOrder, ClientError> {
        let body = self.fetch_raw().await?;
        let order = unwrap_envelope(body)?;
        tracing::debug!(fields = order.len(), "fetched order record");
        Ok(order)
    }
}

/// Returns the order record carried by `body`.
///
/// An object under `data` (or a JSON string encoding one) is the record;
/// any other `data` value means the payload is the record itself.
///
/// # Errors
///
/// Returns [`ClientError::UnexpectedShape`] if `body` is not a JSON object.
pub fn unwrap_envelope(body: Value) -> Result<RawOrder, ClientError> {
    let Value::Object(map) = body else {
        return Err(ClientError::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            json_kind(&body)
        )));
    };

    match map.get("data").and_then(parse_embedded_json) {
        Some(inner) => Ok(inner),
        None => Ok(map),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
