//! Subscription commands
//!
//! Premium plan activation and cancellation.

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use lottomate_core::SubscriptionDetails;

use super::Context;
use crate::output::{print_single, print_success};

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// Show subscription status
    Show,

    /// Activate the premium plan
    Activate {
        /// Plan name
        #[arg(long, default_value = "Premium")]
        plan: String,
    },

    /// Cancel the subscription
    Cancel,
}

/// Subscription row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct SubscriptionRow {
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Plan")]
    pub plan: String,
    #[tabled(rename = "Renews")]
    pub renews: String,
}

pub async fn execute(ctx: &Context, action: SubscriptionAction) -> Result<()> {
    match action {
        SubscriptionAction::Show => show(ctx),
        SubscriptionAction::Activate { plan } => activate(ctx, plan),
        SubscriptionAction::Cancel => cancel(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let state = ctx.store.load()?;
    let row = match state.subscription.details() {
        Some(details) => SubscriptionRow {
            status: "active".to_string(),
            plan: details.plan.clone(),
            renews: details.renewal_date.to_string(),
        },
        None => SubscriptionRow {
            status: "inactive".to_string(),
            plan: "-".to_string(),
            renews: "-".to_string(),
        },
    };
    print_single(&row, ctx.format)
}

fn activate(ctx: &Context, plan: String) -> Result<()> {
    let mut state = ctx.store.load()?;
    state.subscription.set_subscription(SubscriptionDetails {
        plan: plan.clone(),
        renewal_date: Utc::now().date_naive() + Duration::days(30),
    });
    ctx.store.save(&state)?;

    print_success(&format!("Subscribed to the {} plan", plan), ctx.quiet);
    Ok(())
}

fn cancel(ctx: &Context) -> Result<()> {
    let mut state = ctx.store.load()?;
    state.subscription.cancel();
    ctx.store.save(&state)?;

    print_success("Subscription cancelled", ctx.quiet);
    Ok(())
}
