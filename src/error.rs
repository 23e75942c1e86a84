use thiserror::Error;

/// Errors returned by the ZIQX Auth client
#[derive(Debug, Error)]
pub enum ZAuthError {
    /// Redirector or service was constructed with missing or malformed settings
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An operation was called with a missing or empty required parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP transport failed (connection refused, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a body that is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The system browser could not be opened
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    /// The gateway redirected back with an error or an unusable callback
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The local callback server failed
    #[error("Callback server error: {0}")]
    CallbackServer(String),
}

impl ZAuthError {
    /// Check if this is a precondition failure on an operation argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ZAuthError::InvalidArgument(_))
    }

    /// Check if this is a construction-time configuration failure
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, ZAuthError::InvalidConfiguration(_))
    }

    /// Check if this is a network-level failure
    pub fn is_transport(&self) -> bool {
        matches!(self, ZAuthError::Http(_))
    }
}

/// Result type for ZIQX Auth operations
pub type Result<T> = std::result::Result<T, ZAuthError>;
