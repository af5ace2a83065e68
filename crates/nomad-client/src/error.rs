//! Error types for the Nomad SDK

/// Error type for Nomad API operations
#[derive(Debug, thiserror::Error)]
pub enum NomadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    ErrorResponse { status: u16, body: String },

    #[error("failed to parse response: {message}")]
    ResponseParsing { message: String, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid address {address}: {source}")]
    InvalidAddress {
        address: String,
        source: url::ParseError,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("timed out waiting for a matching response")]
    Timeout,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl NomadError {
    /// HTTP status the server answered with, for error responses
    pub fn server_error_code(&self) -> Option<u16> {
        match self {
            NomadError::ErrorResponse { status, .. } => Some(*status),
            NomadError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.server_error_code() == Some(404)
    }

    pub(crate) fn parsing(message: impl Into<String>, body: impl Into<String>) -> Self {
        NomadError::ResponseParsing {
            message: message.into(),
            body: body.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NomadError>;
