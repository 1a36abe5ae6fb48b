//! Command-line interface definitions and command handlers.

use clap::{Parser, Subcommand};

use ragrelay_types::identity::UserRole;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "ragrelay")]
#[command(about = "Authenticated chat relay for RAG providers", version)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Create a user account from the terminal
    CreateUser {
        /// Username for the new account
        username: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}

/// Create a user, prompting for the password interactively.
pub async fn create_user(state: &AppState, username: &str, admin: bool) -> anyhow::Result<()> {
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let roles = if admin {
        vec![UserRole::User, UserRole::Admin]
    } else {
        Vec::new()
    };

    let user = state.auth_service.register(username, &password, roles).await?;

    println!();
    println!(
        "  {} User '{}' created",
        console::style("✓").green(),
        console::style(&user.username).cyan()
    );
    println!("  id: {}", user.id);
    println!();

    Ok(())
}
