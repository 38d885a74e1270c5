/*
[INPUT]:  Error sources (validation, transport, protocol, API, cache, serialization)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the Afdian client
#[derive(Error, Debug)]
pub enum AfdianError {
    /// Endpoint name was empty; nothing was sent
    #[error("Empty api endpoint")]
    EmptyEndpoint,

    /// Endpoint name is not a single path segment under the API root
    #[error("Invalid api endpoint: {0}")]
    InvalidEndpoint(String),

    /// A lookup was given an empty result set or an empty key
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// A lookup found no matching record
    #[error("{0} not found")]
    NotFound(&'static str),

    /// `&redis=` descriptor without a usable host:port pair
    #[error("Failed to connect redis server: invalid server address")]
    InvalidCacheAddress,

    /// Connection or timeout failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-200 HTTP status
    #[error("HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    /// Status 200 but the body is not a JSON object
    #[error("Cannot parse json string")]
    UnparseableBody { body: String },

    /// Envelope parsed but `ec` was not 200
    #[error("API error (code {code:?}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        code: Option<i64>,
        message: Option<String>,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache backend failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AfdianError {
    /// Check if the error was raised locally, before any network I/O
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AfdianError::EmptyEndpoint
                | AfdianError::InvalidEndpoint(_)
                | AfdianError::EmptyInput(_)
                | AfdianError::NotFound(_)
                | AfdianError::InvalidCacheAddress
                | AfdianError::Config(_)
        )
    }

    /// Check if the error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, AfdianError::Transport(_))
    }

    /// Message the server attached to an application error, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AfdianError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<redis::RedisError> for AfdianError {
    fn from(err: redis::RedisError) -> Self {
        AfdianError::Cache(err.to_string())
    }
}

/// Result type alias for Afdian operations
pub type Result<T> = std::result::Result<T, AfdianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_local() {
        assert!(AfdianError::EmptyEndpoint.is_local());
        assert!(AfdianError::InvalidCacheAddress.is_local());
        assert!(AfdianError::EmptyInput("order id").is_local());
        assert!(!AfdianError::Transport("timeout".to_string()).is_local());
    }

    #[test]
    fn test_error_is_transport() {
        assert!(AfdianError::Transport("connection refused".to_string()).is_transport());
        assert!(!AfdianError::HttpStatus { status: 502, body: String::new() }.is_transport());
    }

    #[test]
    fn test_invalid_cache_address_message() {
        assert_eq!(
            AfdianError::InvalidCacheAddress.to_string(),
            "Failed to connect redis server: invalid server address"
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = AfdianError::Api {
            code: Some(400005),
            message: Some("sign validation failed".to_string()),
        };
        assert_eq!(err.server_message(), Some("sign validation failed"));
        assert_eq!(err.to_string(), "API error (code Some(400005)): sign validation failed");

        let bare = AfdianError::Api { code: None, message: None };
        assert_eq!(bare.server_message(), None);
    }
}
