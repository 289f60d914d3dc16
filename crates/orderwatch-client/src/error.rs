use thiserror::Error;

/// Errors returned by the order API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    ///
    /// `body` may carry buyer data, so `Display` reports only its length.
    #[error(
        "unexpected HTTP status {status} from order endpoint ({} byte body)",
        .body.len()
    )]
    UnexpectedStatus { status: u16, body: String },

    /// The response body was not JSON.
    #[error(
        "JSON deserialization error for {context}: {source} ({} byte body)",
        .body.len()
    )]
    Deserialize {
        context: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON payload was not an object (or an envelope wrapping one).
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}
