//! Error types for hits-core

use thiserror::Error;

/// Main error type for the hits-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport or response decoding error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Overlay channel error
    #[error("overlay error: {0}")]
    Overlay(String),
}

impl Error {
    /// Short label for the failure, shown in overlay diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Http(e) if e.is_timeout() => "timeout",
            Error::Http(e) if e.is_connect() => "connect",
            Error::Http(e) if e.is_decode() => "decode",
            Error::Http(_) => "http",
            Error::Config(_) => "config",
            Error::Overlay(_) => "overlay",
        }
    }
}

/// Result type alias for hits-core
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(Error::Config("bad".to_string()).kind(), "config");
        assert_eq!(Error::Overlay("gone".to_string()).kind(), "overlay");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), "json");
    }

    #[test]
    fn test_error_display() {
        let err = Error::Overlay("connection refused".to_string());
        assert_eq!(err.to_string(), "overlay error: connection refused");
    }
}
