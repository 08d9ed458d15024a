//! Error types for provider calls

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// The upstream answered with an error before any content was streamed.
    #[error("provider error: {0}")]
    Provider(String),

    /// The upstream could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The stream broke or produced an unreadable chunk after it opened.
    #[error("stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn provider_error(message: impl Into<String>) -> Self {
        Error::Provider(message.into())
    }

    pub fn connection_error(message: impl Into<String>) -> Self {
        Error::Connection(message.into())
    }

    pub fn stream_error(message: impl Into<String>) -> Self {
        Error::Stream(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::MissingApiKey("openai".into()).to_string(),
            "missing API key for provider 'openai'"
        );
        assert_eq!(
            Error::stream_error("connection reset").to_string(),
            "stream error: connection reset"
        );
        assert_eq!(
            Error::provider_error("401 Unauthorized").to_string(),
            "provider error: 401 Unauthorized"
        );
    }
}
