//! Draw commands
//!
//! Viewing and recording historical draw results.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use lottomate_core::Draw;

use super::Context;
use crate::output::{print_output, print_success};

#[derive(Subcommand)]
pub enum DrawsAction {
    /// List historical draws, newest first
    List,

    /// Record a draw result
    Add {
        /// Draw date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Drawn numbers, comma-separated (e.g. 7,14,21,28,35,40)
        #[arg(long)]
        numbers: String,
    },
}

/// Draw row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct DrawRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Numbers")]
    pub numbers: String,
}

impl From<&Draw> for DrawRow {
    fn from(draw: &Draw) -> Self {
        Self {
            date: draw.date.to_string(),
            numbers: format_numbers(&draw.numbers),
        }
    }
}

pub async fn execute(ctx: &Context, action: DrawsAction) -> Result<()> {
    match action {
        DrawsAction::List => list_draws(ctx),
        DrawsAction::Add { date, numbers } => add_draw(ctx, date, &numbers),
    }
}

fn list_draws(ctx: &Context) -> Result<()> {
    let state = ctx.store.load()?;
    let rows: Vec<DrawRow> = state.draws.draws().iter().map(DrawRow::from).collect();
    print_output(&rows, ctx.format)
}

fn add_draw(ctx: &Context, date: NaiveDate, numbers: &str) -> Result<()> {
    let numbers = parse_numbers(numbers)?;

    let mut state = ctx.store.load()?;
    state.draws.add_draw(Draw { date, numbers });
    ctx.store.save(&state)?;

    print_success(&format!("Recorded draw for {}", date), ctx.quiet);
    Ok(())
}

/// Parse a comma-separated list of draw numbers
fn parse_numbers(raw: &str) -> Result<Vec<u8>> {
    let numbers = raw
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| anyhow::anyhow!("Invalid numbers list: {}", raw))?;

    if numbers.is_empty() {
        anyhow::bail!("At least one number is required");
    }
    Ok(numbers)
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("7,14, 21").unwrap(), vec![7, 14, 21]);
        assert!(parse_numbers("7,x,21").is_err());
        assert!(parse_numbers("").is_err());
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[7, 14, 21]), "7 14 21");
        assert_eq!(format_numbers(&[]), "");
    }
}
