//! Unified marzban-gw CLI.
//!
//! This binary provides a unified interface to the gateway:
//! - `marzban-gw serve` - Run the HTTP gateway
//! - `marzban-gw users` - Manage panel users from the command line
//!
//! The server can also be run as the standalone `marzban-server` binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Marzban gateway unified CLI.
#[derive(Parser)]
#[command(
    name = "marzban-gw",
    version,
    about = "HTTP gateway in front of the Marzban VPN panel API",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway.
    #[command(name = "serve", alias = "server")]
    Serve(Box<marzban_server::ServeArgs>),

    /// Manage panel users.
    #[command(name = "users")]
    Users(Box<marzban_server::UsersArgs>),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => marzban_server::cli::run(*args).await,
        Commands::Users(args) => marzban_server::users::run(*args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
