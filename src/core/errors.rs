use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Non-2xx HTTP response. Checked before the body is looked at.
    #[error("HTTP status {code}: {status}")]
    Status {
        code: u16,
        status: String,
        body: String,
    },

    /// 2xx response whose body did not match the venue envelope.
    #[error("unexpected response body: {}", String::from_utf8_lossy(.0))]
    Body(Vec<u8>),

    /// Business-level failure reported by the venue, carried verbatim.
    #[error("API error: {code} - {message}")]
    Application { code: String, message: String },

    /// Streaming decode failure (read, decompress or parse).
    #[error("Frame error: {0}")]
    Frame(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// Whether the failure happened below the application layer
    /// (socket, TLS, timeouts).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::ConnectionTimeout(_))
    }

    /// Status code of a non-2xx response, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
