//! Tally CLI - Expense and budget tracker
//!
//! Usage:
//!   tally init                   Initialize database
//!   tally user add NAME          Provision a user and bearer token
//!   tally expense add ...        Record an expense
//!   tally dashboard --user NAME  Show the monthly summary
//!   tally serve --port 3000      Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref());

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &db_path,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::User { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                None | Some(UserAction::List) => commands::cmd_user_list(&db),
                Some(UserAction::Add { name }) => commands::cmd_user_add(&db, &name),
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                ExpenseAction::Add {
                    user,
                    amount,
                    category,
                    kind,
                    date,
                    note,
                } => commands::cmd_expense_add(
                    &db,
                    &user,
                    amount,
                    &category,
                    &kind,
                    date.as_deref(),
                    note,
                ),
                ExpenseAction::List { user, month, year } => {
                    commands::cmd_expense_list(&db, &user, month, year)
                }
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                BudgetAction::Set {
                    user,
                    month,
                    year,
                    amount,
                } => commands::cmd_budget_set(&db, &user, month, year, amount),
                BudgetAction::Get { user, month, year } => {
                    commands::cmd_budget_get(&db, &user, month, year)
                }
            }
        }
        Commands::Dashboard { user, month, year } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &user, month, year)
        }
    }
}
