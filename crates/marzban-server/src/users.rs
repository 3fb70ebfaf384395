//! CLI for managing panel users without the HTTP layer.
//!
//! Drives the same [`SubscriptionService`] as the server and prints JSON
//! (or a table for `list`).
//!
//! # Usage
//!
//! ```bash
//! # List users as a table
//! marzban-gw users --panel-url https://panel.example.com list
//!
//! # Create a 12 month subscription for a telegram user
//! marzban-gw users create --telegram-id 42 --plan M12 --months 12
//!
//! # Extend a subscription by 30 days
//! marzban-gw users extend alice --days 30
//!
//! # Delete a user
//! marzban-gw users delete alice
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use marzban_config::{CliOverrides, ListView};
use marzban_lifecycle::{CreateUserRequest, UserSummary, summarize};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::{init_tracing, resolve_config};
use crate::server::build_service;
use crate::service::UserListing;

/// User management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "marzban-users", version, about = "Manage Marzban panel users")]
pub struct UsersArgs {
    /// Config file path (json/yaml/toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,

    #[command(subcommand)]
    pub command: UsersCommands,
}

/// Users CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UsersCommands {
    /// List all users.
    List {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Create a user; unspecified fields get gateway defaults.
    Create {
        /// Explicit username (otherwise <telegram-id>_<plan>_<random>).
        #[arg(short, long)]
        username: Option<String>,

        /// Telegram id used for the generated username.
        #[arg(long)]
        telegram_id: Option<String>,

        /// Plan tag used for the generated username.
        #[arg(long)]
        plan: Option<String>,

        /// Subscription length in calendar months.
        #[arg(short, long)]
        months: Option<i64>,

        /// Absolute expiry (Unix seconds); takes precedence over --months.
        #[arg(short, long)]
        expire: Option<i64>,

        /// Data limit in bytes (omit for unlimited).
        #[arg(long)]
        data_limit: Option<i64>,

        /// Free-form note.
        #[arg(long)]
        note: Option<String>,
    },

    /// Extend a subscription.
    Extend {
        /// Username to extend.
        username: String,

        /// Days to add (defaults to api.default_days).
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Delete a user.
    Delete {
        /// Username to delete.
        username: String,
    },
}

/// Output format for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

/// User display struct for table output.
#[derive(Tabled)]
struct UserDisplay {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Expires")]
    expire: String,
}

impl From<UserSummary> for UserDisplay {
    fn from(summary: UserSummary) -> Self {
        Self {
            username: summary.username,
            status: summary.status,
            expire: summary.expire,
        }
    }
}

/// Run the users CLI with the given arguments.
pub async fn run(args: UsersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    init_tracing(&config.logging, "warn");

    let service = build_service(&config)?.with_list_view(ListView::Raw);

    match args.command {
        UsersCommands::List { format } => {
            let UserListing::Raw(body) = service.list().await? else {
                return Err("unexpected list presentation".into());
            };
            match format {
                ListFormat::Json => print_json(&body)?,
                ListFormat::Table => println!("{}", render_table(summarize(&body))),
            }
        }
        UsersCommands::Create {
            username,
            telegram_id,
            plan,
            months,
            expire,
            data_limit,
            note,
        } => {
            let request = CreateUserRequest {
                username,
                telegram_id,
                plan,
                months,
                expire,
                data_limit,
                note,
                ..Default::default()
            };
            print_json(&service.create(request).await?)?;
        }
        UsersCommands::Extend { username, days } => {
            let days = days.unwrap_or(config.api.default_days);
            print_json(&service.extend(&username, days).await?)?;
        }
        UsersCommands::Delete { username } => {
            print_json(&service.remove(&username).await?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_table(rows: Vec<UserSummary>) -> String {
    if rows.is_empty() {
        return "No users found.".to_string();
    }
    let rows: Vec<UserDisplay> = rows.into_iter().map(UserDisplay::from).collect();
    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_create_command() {
        let args = UsersArgs::try_parse_from([
            "marzban-users",
            "create",
            "--telegram-id",
            "42",
            "--plan",
            "M12",
            "--months",
            "12",
        ])
        .unwrap();
        match args.command {
            UsersCommands::Create {
                telegram_id,
                plan,
                months,
                username,
                ..
            } => {
                assert_eq!(telegram_id.as_deref(), Some("42"));
                assert_eq!(plan.as_deref(), Some("M12"));
                assert_eq!(months, Some(12));
                assert!(username.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_extend_and_list() {
        let args = UsersArgs::try_parse_from(["marzban-users", "extend", "bob", "--days", "10"])
            .unwrap();
        assert!(matches!(
            args.command,
            UsersCommands::Extend { ref username, days: Some(10) } if username == "bob"
        ));

        let args =
            UsersArgs::try_parse_from(["marzban-users", "list", "--format", "json"]).unwrap();
        assert!(matches!(
            args.command,
            UsersCommands::List {
                format: ListFormat::Json
            }
        ));
    }

    #[test]
    fn table_lists_each_user() {
        let rows = vec![
            UserSummary {
                username: "alice".into(),
                status: "active".into(),
                expire: "unlimited".into(),
            },
            UserSummary {
                username: "bob".into(),
                status: "expired".into(),
                expire: "2023-11-14 22:13:20 UTC".into(),
            },
        ];
        let table = render_table(rows);
        assert!(table.contains("Username"));
        assert!(table.contains("alice"));
        assert!(table.contains("2023-11-14 22:13:20 UTC"));
        assert_eq!(render_table(Vec::new()), "No users found.");
    }
}
