//! Auth commands
//!
//! Sign in, register, sign out, and identity inspection against the
//! hosted backend.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use lottomate_core::{HttpBackend, HttpBackendConfig, SessionManager};

use super::Context;
use crate::output::{print_single, print_success};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create a new account
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Display name for the profile
        #[arg(long)]
        name: String,
    },

    /// Sign out and invalidate the remote session
    Logout,

    /// Show the currently signed-in identity
    Whoami,
}

/// Identity row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct IdentityRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

pub async fn execute(ctx: &Context, action: AuthAction) -> Result<()> {
    let manager = build_manager(ctx)?;

    match action {
        AuthAction::Login { email, password } => {
            let identity = manager.login(&email, &password).await?;
            print_success(
                &format!("Signed in as {} <{}>", identity.name, identity.email),
                ctx.quiet,
            );
            Ok(())
        }
        AuthAction::Register { email, password, name } => {
            let identity = manager.register(&email, &password, &name).await?;
            print_success(
                &format!("Account created for {} <{}>", identity.name, identity.email),
                ctx.quiet,
            );
            Ok(())
        }
        AuthAction::Logout => {
            manager.logout().await?;
            print_success("Signed out", ctx.quiet);
            Ok(())
        }
        AuthAction::Whoami => {
            manager.initialize().await;
            match manager.identity() {
                Some(identity) => print_single(
                    &IdentityRow {
                        id: identity.id,
                        email: identity.email,
                        name: identity.name,
                    },
                    ctx.format,
                ),
                None => {
                    println!("Not signed in.");
                    Ok(())
                }
            }
        }
    }
}

fn build_manager(ctx: &Context) -> Result<SessionManager<HttpBackend>> {
    if !ctx.config.backend_configured() {
        anyhow::bail!(
            "Backend not configured. Run 'lottomate config set backend_url <url>' and 'lottomate config set backend_anon_key <key>' first"
        );
    }

    let config = HttpBackendConfig::new(
        ctx.config.backend_url.as_str(),
        ctx.config.backend_anon_key.as_str(),
    )?;
    Ok(SessionManager::new(HttpBackend::new(config)))
}
