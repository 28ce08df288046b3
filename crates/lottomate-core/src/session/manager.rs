//! Session manager
//!
//! State machine over `{session, identity}`. Every transition replaces the
//! snapshot wholesale through a watch channel, so observers never see a
//! session paired with a stale identity. Operations are not serialized
//! against each other or against the change pump: whichever remote call
//! completes last wins the snapshot (accepted last-writer-wins policy;
//! callers wanting stricter ordering disable input while a call is in
//! flight).

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::backend::{AuthBackend, SessionChange};
use crate::error::{Error, Result};
use crate::models::{normalize_email, AuthSnapshot, Identity, ProfileRow};

/// Display name used when a session exists but its profile row is missing
const PLACEHOLDER_NAME: &str = "User";

const MIN_PASSWORD_LEN: usize = 6;

/// Owns the auth state; cheap to clone, all clones share one snapshot.
///
/// Constructed once at process start and passed by reference (or clone) to
/// whatever needs it.
pub struct SessionManager<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for SessionManager<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B> {
    backend: B,
    snapshot: watch::Sender<AuthSnapshot>,
}

impl<B: AuthBackend + 'static> SessionManager<B> {
    pub fn new(backend: B) -> Self {
        let (snapshot, _) = watch::channel(AuthSnapshot::signed_out());
        Self {
            inner: Arc::new(Inner { backend, snapshot }),
        }
    }

    /// Current snapshot; a local read that never contacts the remote service
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Shorthand for the identity half of the snapshot
    pub fn identity(&self) -> Option<Identity> {
        self.inner.snapshot.borrow().identity.clone()
    }

    /// Subscribe to snapshot replacements
    pub fn watch(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.snapshot.subscribe()
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        self.inner.snapshot.send_replace(snapshot);
    }

    /// Restore any persisted session and start draining backend
    /// session-change events for the rest of the process lifetime.
    ///
    /// Never fails: any error degrades to the fully-signed-out snapshot
    /// and is logged, not surfaced.
    pub async fn initialize(&self) {
        if let Err(err) = self.try_initialize().await {
            log::error!("auth initialization failed: {}", err);
            self.publish(AuthSnapshot::signed_out());
        }
    }

    async fn try_initialize(&self) -> Result<()> {
        if let Some(session) = self.inner.backend.current_session().await? {
            let name = self.profile_name_or_placeholder(&session.subject_id).await;
            let identity = Identity {
                id: session.subject_id.clone(),
                email: session.email.clone(),
                name,
            };
            self.publish(AuthSnapshot {
                session: Some(session),
                identity: Some(identity),
            });
        }

        self.spawn_change_pump(self.inner.backend.subscribe());
        Ok(())
    }

    /// Drain backend session changes on our own cooperative turn instead of
    /// letting the backend call into us from an arbitrary context
    fn spawn_change_pump(&self, mut rx: mpsc::UnboundedReceiver<SessionChange>) {
        let manager = self.clone();
        tokio::spawn(async move {
            while let Some(change) = rx.recv().await {
                manager.handle_session_change(change).await;
            }
        });
    }

    /// Apply a session change delivered by the remote service (session
    /// established elsewhere, token refreshed, or session invalidated)
    pub(crate) async fn handle_session_change(&self, change: SessionChange) {
        match change {
            Some(session) => {
                let name = self.profile_name_or_placeholder(&session.subject_id).await;
                let identity = Identity {
                    id: session.subject_id.clone(),
                    email: session.email.clone(),
                    name,
                };
                self.publish(AuthSnapshot {
                    session: Some(session),
                    identity: Some(identity),
                });
            }
            None => self.publish(AuthSnapshot::signed_out()),
        }
    }

    /// Display name for a subject, falling back to a placeholder rather
    /// than failing the surrounding operation
    async fn profile_name_or_placeholder(&self, subject_id: &str) -> String {
        match self.inner.backend.find_profile_by_subject(subject_id).await {
            Ok(Some(profile)) => profile.name,
            Ok(None) => PLACEHOLDER_NAME.to_string(),
            Err(err) => {
                log::warn!("profile lookup failed for {}: {}", subject_id, err);
                PLACEHOLDER_NAME.to_string()
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// The profile table is consulted first so "no such account" and
    /// "wrong password" stay distinguishable for the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(Error::validation("Please enter a valid email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::validation(
                "Password must be at least 6 characters long",
            ));
        }

        match self.inner.backend.find_profile_by_email(&email).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(Error::AccountNotFound),
            Err(err) => {
                log::error!("account lookup failed for {}: {}", email, err);
                return Err(Error::AccountNotFound);
            }
        }

        let authed = match self.inner.backend.sign_in_with_password(&email, password).await {
            Ok(authed) => authed,
            // The account exists (checked above), so a credential rejection
            // means the password was wrong
            Err(Error::InvalidCredentials) => return Err(Error::IncorrectPassword),
            Err(err) => return Err(classify_service_error(err)),
        };

        // By subject id, not email: one normalization-dependent lookup is enough
        let profile = match self.inner.backend.find_profile_by_subject(&authed.subject_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(Error::ProfileFetch),
            Err(err) => {
                log::error!("profile fetch after login failed: {}", err);
                return Err(Error::ProfileFetch);
            }
        };

        let identity = Identity {
            id: authed.subject_id,
            email: authed.email,
            name: profile.name,
        };
        self.publish(AuthSnapshot {
            session: Some(authed.session),
            identity: Some(identity.clone()),
        });
        Ok(identity)
    }

    /// Create an account, then its profile row.
    ///
    /// The exists-check and the later insert are not atomic against a
    /// concurrent registration; the remote uniqueness rejection then
    /// surfaces from the insert as an auth service error.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Identity> {
        let email = normalize_email(email);
        let name = name.trim();
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }

        match self.inner.backend.find_profile_by_email(&email).await {
            Ok(Some(_)) => return Err(Error::AccountAlreadyExists),
            Ok(None) => {}
            Err(err) => {
                log::warn!("pre-registration lookup failed for {}: {}", email, err);
            }
        }

        let authed = match self.inner.backend.sign_up(&email, password).await {
            Ok(authed) => authed,
            Err(err) => return Err(classify_service_error(err)),
        };

        let profile = ProfileRow {
            id: authed.subject_id.clone(),
            email: email.clone(),
            name: name.to_string(),
        };
        if let Err(err) = self.inner.backend.insert_profile(&profile).await {
            // The auth-layer account now exists without a profile row;
            // there is no compensating rollback
            log::error!(
                "profile creation failed for {}: {}",
                authed.subject_id,
                err
            );
            return Err(Error::ProfileCreation);
        }

        let identity = Identity {
            id: authed.subject_id,
            email,
            name: name.to_string(),
        };
        self.publish(AuthSnapshot {
            session: Some(authed.session),
            identity: Some(identity.clone()),
        });
        Ok(identity)
    }

    /// Sign out remotely, then clear the snapshot.
    ///
    /// On failure the snapshot is left untouched: the session is presumed
    /// valid until the remote service confirms invalidation.
    pub async fn logout(&self) -> Result<()> {
        match self.inner.backend.sign_out().await {
            Ok(()) => {
                self.publish(AuthSnapshot::signed_out());
                Ok(())
            }
            Err(err) => Err(classify_service_error(err)),
        }
    }
}

/// Fold transport and serialization failures into the auth-service bucket;
/// already-classified service errors pass through unchanged
fn classify_service_error(err: Error) -> Error {
    if matches!(err, Error::AuthService(_)) {
        err
    } else {
        Error::auth_service(err.to_string())
    }
}
