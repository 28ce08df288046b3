//! HTTP implementation of the auth/database backend
//!
//! Talks to a hosted auth + row-store service over its REST surface:
//! `/auth/v1/*` for credential operations and `/rest/v1/profiles` for the
//! profile table. The issued token bundle is persisted to a local JSON
//! file so `current_session` survives process restarts.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::models::{ProfileRow, Session};

use super::{AuthBackend, AuthedUser, SessionChange};

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Service base URL, e.g. `https://xyzcompany.example.co`
    pub base_url: String,
    /// Public (anonymous) API key sent with every request
    pub anon_key: String,
    /// Where the issued session bundle is persisted between runs
    pub session_file: PathBuf,
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            session_file: default_session_path()?,
        })
    }

    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session_file = path;
        self
    }
}

/// Session persistence path
/// Priority: LOTTOMATE_SESSION_PATH env var > default app data directory
pub fn default_session_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("LOTTOMATE_SESSION_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("com", "lottomate", "Lottomate")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.data_dir().join("session.json"))
}

pub struct HttpBackend {
    config: HttpBackendConfig,
    client: reqwest::Client,
    listeners: Mutex<Vec<mpsc::UnboundedSender<SessionChange>>>,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the API key plus the strongest available bearer token
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .load_session()
            .ok()
            .flatten()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone());

        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Push a change to every live subscriber, dropping closed channels
    fn emit(&self, change: &SessionChange) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.retain(|tx| tx.send(change.clone()).is_ok());
    }

    // ---- local session persistence ----

    fn load_session(&self) -> Result<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.config.session_file) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // A corrupt session file is recoverable: discard and start signed out
                log::warn!("discarding unreadable session file: {}", err);
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    fn persist_session(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.config.session_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &self.config.session_file,
            serde_json::to_string_pretty(session)?,
        )?;
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        match std::fs::remove_file(&self.config.session_file) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    // ---- token exchange ----

    async fn exchange_token(&self, path: &str, body: serde_json::Value) -> Result<Session> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::BAD_REQUEST
                || status == StatusCode::UNAUTHORIZED
                || text.contains("Invalid login credentials")
            {
                log::info!("credential exchange rejected ({}): {}", status, text);
                return Err(Error::InvalidCredentials);
            }
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }

        let wire: WireSession = response.json().await?;
        wire.into_session()
    }

    async fn refresh_session(&self, stale: &Session) -> Result<Option<Session>> {
        let body = serde_json::json!({ "refresh_token": stale.refresh_token });
        let response = self
            .client
            .post(self.endpoint("/auth/v1/token?grant_type=refresh_token"))
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            // The service rejected the refresh token: the session is gone
            let text = response.text().await.unwrap_or_default();
            log::info!("session refresh rejected ({}): {}", status, text);
            self.clear_session()?;
            self.emit(&None);
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }

        let wire: WireSession = response.json().await?;
        let session = wire.into_session()?;
        self.persist_session(&session)?;
        self.emit(&Some(session.clone()));
        Ok(Some(session))
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.load_session()? else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }
        self.refresh_session(&session).await
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.lock().unwrap().push(tx);
        rx
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthedUser> {
        let body = serde_json::json!({ "email": email, "password": password });
        let mut session = self
            .exchange_token("/auth/v1/token?grant_type=password", body)
            .await?;
        if session.email.is_empty() {
            session.email = email.to_string();
        }

        self.persist_session(&session)?;
        self.emit(&Some(session.clone()));

        Ok(AuthedUser {
            subject_id: session.subject_id.clone(),
            email: session.email.clone(),
            session,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthedUser> {
        let body = serde_json::json!({ "email": email, "password": password });
        let mut session = match self.exchange_token("/auth/v1/signup", body).await {
            Ok(session) => session,
            // Sign-up has no credential check; surface rejections verbatim
            Err(Error::InvalidCredentials) => {
                return Err(Error::auth_service("Signup rejected by auth service"))
            }
            Err(err) => return Err(err),
        };
        if session.email.is_empty() {
            session.email = email.to_string();
        }

        self.persist_session(&session)?;
        self.emit(&Some(session.clone()));

        Ok(AuthedUser {
            subject_id: session.subject_id.clone(),
            email: session.email.clone(),
            session,
        })
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.load_session()? else {
            // Nothing to invalidate remotely
            self.emit(&None);
            return Ok(());
        };

        let response = self
            .client
            .post(self.endpoint("/auth/v1/logout"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::UNAUTHORIZED {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }

        self.clear_session()?;
        self.emit(&None);
        Ok(())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<ProfileRow>> {
        let filter = format!("eq.{}", email);
        let request = self.client.get(self.endpoint("/rest/v1/profiles")).query(&[
            ("select", "id,email,name"),
            ("email", filter.as_str()),
            ("limit", "1"),
        ]);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }

        let rows: Vec<ProfileRow> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn find_profile_by_subject(&self, id: &str) -> Result<Option<ProfileRow>> {
        let filter = format!("eq.{}", id);
        let request = self.client.get(self.endpoint("/rest/v1/profiles")).query(&[
            ("select", "id,email,name"),
            ("id", filter.as_str()),
            ("limit", "1"),
        ]);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }

        let rows: Vec<ProfileRow> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(&self, profile: &ProfileRow) -> Result<()> {
        let request = self
            .client
            .post(self.endpoint("/rest/v1/profiles"))
            .header("Prefer", "return=minimal")
            .json(&[profile]);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Uniqueness violations land here as well
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth_service(format!("{}: {}", status, text)));
        }
        Ok(())
    }
}

/// Token-grant response shape shared by sign-in, sign-up, and refresh
#[derive(Debug, Serialize, Deserialize)]
struct WireSession {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<WireUser>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl WireSession {
    fn into_session(self) -> Result<Session> {
        let user = self
            .user
            .ok_or_else(|| Error::auth_service("auth response missing user"))?;
        let access_token = self
            .access_token
            .ok_or_else(|| Error::auth_service("auth response missing session tokens"))?;

        Ok(Session {
            subject_id: user.id,
            email: user.email.unwrap_or_default(),
            access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            expires_at: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}
