//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod auth;
pub mod config;
pub mod draws;
pub mod predict;
pub mod subscription;

use crate::output::OutputFormat;
use lottomate_core::{AppConfig, AppStore};

/// Shared context for all commands
pub struct Context {
    pub config: AppConfig,
    pub store: AppStore,
    pub format: OutputFormat,
    pub quiet: bool,
}
