use thiserror::Error;

/// Result type for Engagespot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the Engagespot API.
#[derive(Debug, Error)]
pub enum Error {
    /// The API rejected the credentials (HTTP 401)
    #[error(
        "Authentication failed. Make sure you're using the right API Credentials. Please read our docs at https://documentation.engagespot.co"
    )]
    AuthFail,

    /// A notification was sent without any recipients
    #[error("Insufficient number of recipients configured")]
    InsufficientRecipients,

    /// The API answered with a non-success status other than 401
    #[error("Engagespot API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value could not be used as an HTTP header
    #[error("Invalid value for header {name}")]
    InvalidHeader { name: String },

    /// Configuration is missing or inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The HTTP status associated with this error, if the API produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthFail => Some(401),
            Error::Status { status, .. } => Some(*status),
            Error::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
