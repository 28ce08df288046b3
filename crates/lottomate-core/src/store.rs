//! Local app state persistence
//!
//! Draws, generated combinations, and the subscription live in a JSON
//! state file so CLI runs compose; the remote backend never sees any of
//! this.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Combination;
use crate::services::{DrawHistory, SubscriptionState};

/// Everything the app keeps locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub draws: DrawHistory,
    pub combinations: Vec<Combination>,
    pub subscription: SubscriptionState,
}

impl AppState {
    /// Record a generated combination ahead of the existing ones
    pub fn record_combination(&mut self, combination: Combination) {
        self.combinations.insert(0, combination);
    }
}

/// File-backed store for [`AppState`]
pub struct AppStore {
    path: PathBuf,
}

impl AppStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Open the store at its default location
    /// Priority: LOTTOMATE_STATE_PATH env var > default app data directory
    pub fn open_default() -> Result<Self> {
        if let Ok(path) = std::env::var("LOTTOMATE_STATE_PATH") {
            return Ok(Self::new(PathBuf::from(path)));
        }

        let dirs = directories::ProjectDirs::from("com", "lottomate", "Lottomate")
            .ok_or_else(|| Error::config("Could not determine project directories"))?;

        Ok(Self::new(dirs.data_dir().join("state.json")))
    }

    /// Load the state; a missing file yields the seeded default
    pub fn load(&self) -> Result<AppState> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppState::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_state_is_seeded() {
        let state = AppState::default();
        assert_eq!(state.draws.len(), 3);
        assert!(state.combinations.is_empty());
        assert!(!state.subscription.is_subscribed());
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), AppState::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(dir.path().join("nested").join("state.json"));

        let mut state = AppState::default();
        state.record_combination(Combination {
            date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            numbers: vec![1, 2, 3, 4, 5, 6],
            explanation: "test".to_string(),
        });
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_record_combination_prepends() {
        let mut state = AppState::default();
        let first = Combination {
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            numbers: vec![1, 2, 3, 4, 5, 6],
            explanation: "first".to_string(),
        };
        let second = Combination {
            date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            numbers: vec![7, 8, 9, 10, 11, 12],
            explanation: "second".to_string(),
        };

        state.record_combination(first);
        state.record_combination(second.clone());

        assert_eq!(state.combinations[0], second);
        assert_eq!(state.combinations.len(), 2);
    }
}
