//! Data models for the Lottomate application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque credential bundle issued by the remote auth service.
///
/// The token fields are stored and forwarded verbatim; nothing in this
/// crate inspects them. Validity is controlled by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Subject id of the authenticated account
    pub subject_id: String,
    /// Email the remote service has on record for the subject
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as reported by the remote service, if it reported one
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether the remote-reported validity window has passed
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => at <= Utc::now(),
            None => false,
        }
    }
}

/// Local projection of "who is signed in", joining the session's subject
/// id with the display name from the profile row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Remote profile row, keyed by subject id, searchable by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// The atomic `{session, identity}` pair observers read.
///
/// Replaced wholesale on every transition; identity is present exactly
/// when a session is present, never a stale mix of the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub session: Option<Session>,
    pub identity: Option<Identity>,
}

impl AuthSnapshot {
    /// The fully-signed-out snapshot
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// A historical lottery draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
}

/// A generated number combination with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
    pub explanation: String,
}

/// Premium subscription details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDetails {
    pub plan: String,
    pub renewal_date: NaiveDate,
}

/// Normalize an email (trim, lower-case) before any remote lookup,
/// comparison, or mutation, so case variants never become distinct accounts.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
