//! Unified error handling for lottomate-core

use thiserror::Error;

/// Core error type for lottomate-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("No account found with this email address")]
    AccountNotFound,

    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,

    #[error("An account with this email already exists")]
    AccountAlreadyExists,

    /// Raw invalid-credentials signal from the remote auth service.
    /// The session manager reclassifies this as [`Error::IncorrectPassword`]
    /// once it has confirmed the account exists.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Auth service error: {0}")]
    AuthService(String),

    #[error("Failed to fetch user profile")]
    ProfileFetch,

    #[error("Failed to create user profile")]
    ProfileCreation,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lottomate-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an auth service error
    pub fn auth_service(msg: impl Into<String>) -> Self {
        Error::AuthService(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

// Convert to String for UI-facing returns
impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AccountNotFound;
        assert_eq!(err.to_string(), "No account found with this email address");
    }

    #[test]
    fn test_auth_service_carries_message() {
        let err = Error::auth_service("rate limited");
        assert_eq!(err.to_string(), "Auth service error: rate limited");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = Error::validation("All fields are required");
        let s: String = err.into();
        assert!(s.contains("Validation error"));
    }
}
