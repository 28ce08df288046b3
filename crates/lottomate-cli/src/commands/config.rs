//! Config commands
//!
//! Commands for managing CLI configuration.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use lottomate_core::config::save_config;

use super::Context;
use crate::output::{print_output, print_success};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Set { key, value } => set_config(ctx, key, value),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let rows = vec![
        ConfigRow {
            key: "backend_url".to_string(),
            value: config.backend_url.clone(),
        },
        ConfigRow {
            key: "backend_anon_key".to_string(),
            value: mask(&config.backend_anon_key),
        },
        ConfigRow {
            key: "llm_provider".to_string(),
            value: config.llm_provider.clone(),
        },
        ConfigRow {
            key: "llm_model".to_string(),
            value: config.llm_model.clone(),
        },
        ConfigRow {
            key: "llm_api_key".to_string(),
            value: mask(config.llm_api_key.as_deref().unwrap_or_default()),
        },
        ConfigRow {
            key: "llm_base_url".to_string(),
            value: config.llm_base_url.clone().unwrap_or_default(),
        },
    ];
    print_output(&rows, ctx.format)
}

fn set_config(ctx: &Context, key: String, value: String) -> Result<()> {
    let mut config = ctx.config.clone();

    match key.to_lowercase().as_str() {
        "backend_url" => {
            config.backend_url = value.clone();
            print_success(&format!("Set backend_url = {}", value), ctx.quiet);
        }
        "backend_anon_key" => {
            config.backend_anon_key = value;
            print_success("Set backend_anon_key = ****", ctx.quiet);
        }
        "llm_provider" => {
            config.llm_provider = value.clone();
            print_success(&format!("Set llm_provider = {}", value), ctx.quiet);
        }
        "llm_model" => {
            config.llm_model = value.clone();
            print_success(&format!("Set llm_model = {}", value), ctx.quiet);
        }
        "llm_api_key" => {
            config.llm_api_key = Some(value);
            print_success("Set llm_api_key = ****", ctx.quiet);
        }
        "llm_base_url" => {
            config.llm_base_url = Some(value.clone());
            print_success(&format!("Set llm_base_url = {}", value), ctx.quiet);
        }
        other => anyhow::bail!("Unknown config key: {}", other),
    }

    save_config(&config)?;
    Ok(())
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
