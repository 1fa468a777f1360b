use thiserror::Error;

/// Failures talking to the RINSR backend.
///
/// Callers on the fail-closed paths (permission and notification loads)
/// catch these at the boundary, log them, and fall back to a safe default;
/// CLI paths surface them through anyhow.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid backend base URL '{0}'")]
    BaseUrl(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn request(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Request { endpoint: endpoint.into(), source }
    }

    pub fn status(status: u16, endpoint: impl Into<String>) -> Self {
        ApiError::Status { status, endpoint: endpoint.into() }
    }

    pub fn decode(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Decode { endpoint: endpoint.into(), source }
    }
}
