use thiserror::Error;

use crate::core::config::ConfigError;

#[derive(Error, Debug)]
pub enum MindmateError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Session expired: {0}")]
    Unauthorized(String),

    #[error("Not signed in")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Custom(String),
}

impl MindmateError {
    /// True when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, MindmateError::Unauthorized(_) | MindmateError::MissingToken)
    }

    /// Transport failures never reached the backend, so they say nothing about the token.
    pub fn is_transport(&self) -> bool {
        match self {
            MindmateError::Reqwest(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for MindmateError {
    fn from(error: std::io::Error) -> Self {
        MindmateError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for MindmateError {
    fn from(error: reqwest::Error) -> Self {
        MindmateError::Reqwest(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let err = MindmateError::Api { status: 404, message: "Document not found".to_string() };
        assert_eq!(err.to_string(), "Document not found");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn missing_token_counts_as_unauthorized() {
        assert!(MindmateError::MissingToken.is_unauthorized());
        assert!(MindmateError::Unauthorized("expired".into()).is_unauthorized());
        assert!(!MindmateError::Custom("x".into()).is_transport());
    }
}
