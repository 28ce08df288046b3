//! Remote auth/database backend
//!
//! Capability contract for the externally hosted auth and profile store,
//! abstracted behind a trait so the session manager can be exercised
//! against an in-memory backend in tests.

pub mod http;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::{ProfileRow, Session};

pub use http::{HttpBackend, HttpBackendConfig};

/// A session state change pushed by the remote service: the new session,
/// or `None` when the session was invalidated.
pub type SessionChange = Option<Session>;

/// Result of a successful credential exchange with the auth service
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub subject_id: String,
    pub email: String,
    pub session: Session,
}

/// Remote auth/database service contract.
///
/// Every method is a suspension point; implementations perform a single
/// attempt per call and never retry on their own.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Current session as the remote service sees it, if any
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Open the session-change event channel.
    ///
    /// The returned receiver is fed for the process lifetime; there is no
    /// unsubscribe path. Changes are delivered in arrival order of the
    /// underlying remote responses.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionChange>;

    /// Verify credentials. Fails with [`crate::Error::InvalidCredentials`]
    /// on a credential mismatch, any other error on service failure.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthedUser>;

    /// Create an account at the auth layer
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthedUser>;

    /// Invalidate the current session remotely
    async fn sign_out(&self) -> Result<()>;

    /// Look up a profile row by (already normalized) email
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<ProfileRow>>;

    /// Look up a profile row by subject id
    async fn find_profile_by_subject(&self, id: &str) -> Result<Option<ProfileRow>>;

    /// Insert a profile row; fails on uniqueness violations
    async fn insert_profile(&self, profile: &ProfileRow) -> Result<()>;
}
