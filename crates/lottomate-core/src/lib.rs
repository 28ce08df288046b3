//! # lottomate-core
//!
//! Core logic for Lottomate - shared between the CLI and app shells.
//!
//! This crate provides:
//! - The session/auth state machine (`session` module)
//! - The remote auth/database backend contract and HTTP client (`backend` module)
//! - Data models (`models` module)
//! - Draw history, predictions, and subscription services (`services` module)
//! - Local configuration and app state (`config` and `store` modules)
//! - Unified error handling (`error` module)

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use error::{Error, Result};

pub use backend::{AuthBackend, AuthedUser, HttpBackend, HttpBackendConfig, SessionChange};
pub use config::{load_config, save_config, AppConfig};
pub use models::{
    normalize_email, AuthSnapshot, Combination, Draw, Identity, ProfileRow, Session,
    SubscriptionDetails,
};
pub use services::{DrawHistory, PredictionConfig, PredictionService, SubscriptionState};
pub use session::SessionManager;
pub use store::{AppState, AppStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_format() {
        let v = version();
        // Should be semver format: x.y.z
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}
