//! Prediction commands
//!
//! AI-generated number combinations, gated on an active subscription.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use lottomate_core::{Combination, PredictionConfig, PredictionService};

use super::draws::format_numbers;
use super::Context;
use crate::output::{print_info, print_output, print_single};

#[derive(Subcommand)]
pub enum PredictAction {
    /// Generate a new combination
    New,

    /// List generated combinations, newest first
    List,
}

/// Combination row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct CombinationRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Numbers")]
    pub numbers: String,
    #[tabled(rename = "Explanation")]
    pub explanation: String,
}

impl From<&Combination> for CombinationRow {
    fn from(combination: &Combination) -> Self {
        Self {
            date: combination.date.to_string(),
            numbers: format_numbers(&combination.numbers),
            explanation: combination.explanation.clone(),
        }
    }
}

pub async fn execute(ctx: &Context, action: PredictAction) -> Result<()> {
    match action {
        PredictAction::New => generate(ctx).await,
        PredictAction::List => list(ctx),
    }
}

async fn generate(ctx: &Context) -> Result<()> {
    let mut state = ctx.store.load()?;
    if !state.subscription.is_subscribed() {
        anyhow::bail!(
            "Premium subscription required to generate predictions. Run 'lottomate subscription activate' first"
        );
    }

    let service = PredictionService::new(PredictionConfig {
        provider: ctx.config.llm_provider.clone(),
        model: ctx.config.llm_model.clone(),
        api_key: ctx.config.llm_api_key.clone(),
        base_url: ctx.config.llm_base_url.clone(),
    });
    if !service.is_configured() {
        print_info(
            "Generative API not configured; using the statistical fallback combination.",
            ctx.quiet,
        );
    }

    let combination = service.generate_combination().await;
    state.record_combination(combination.clone());
    ctx.store.save(&state)?;

    print_single(&CombinationRow::from(&combination), ctx.format)
}

fn list(ctx: &Context) -> Result<()> {
    let state = ctx.store.load()?;
    let rows: Vec<CombinationRow> = state.combinations.iter().map(CombinationRow::from).collect();
    print_output(&rows, ctx.format)
}
