// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by every sync component.

/// Application error type returned by all network-facing operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No access token available")]
    MissingCredential,

    /// Another request of the same kind is still outstanding.
    #[error("Request already in progress")]
    RequestInProgress,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Failed to decode response: {0}")]
    Decoding(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Superseded by a newer request before it completed.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the server rejected our credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::HttpStatus(401))
    }

    /// True for the benign single-flight rejection.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, AppError::RequestInProgress)
    }

    /// Message suitable for showing to the user: a generic summary
    /// followed by the underlying cause.
    pub fn user_message(&self) -> String {
        let summary = match self {
            AppError::MissingCredential => "You are not signed in",
            AppError::RequestInProgress => "Please wait for the current request",
            AppError::HttpStatus(401) => "Your session has expired",
            _ => "Something went wrong",
        };
        format!("{}: {}", summary, self)
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        assert!(AppError::HttpStatus(401).is_unauthorized());
        assert!(!AppError::HttpStatus(403).is_unauthorized());
        assert!(!AppError::Network("reset".to_string()).is_unauthorized());
    }

    #[test]
    fn test_user_message_includes_cause() {
        let msg = AppError::HttpStatus(500).user_message();
        assert_eq!(msg, "Something went wrong: HTTP status 500");

        let msg = AppError::HttpStatus(401).user_message();
        assert!(msg.starts_with("Your session has expired"));
    }
}
