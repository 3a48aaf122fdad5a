//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses and monthly budgets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted expense and budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a
        /// network. By default, every request must carry a bearer token
        /// provisioned with 'tally user add'.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage users (provision bearer tokens)
    User {
        #[command(subcommand)]
        action: Option<UserAction>,
    },

    /// Manage expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage monthly budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Show the monthly dashboard summary
    Dashboard {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Month (1-12, defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Provision a new user and print their bearer token
    Add {
        /// User name
        name: String,
    },
    /// List provisioned users
    List,
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record a new expense
    Add {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category: Food, Travel, Shopping, Study, Other
        #[arg(short, long)]
        category: String,

        /// Type: Necessary or Waste
        #[arg(short = 't', long = "type", default_value = "Necessary")]
        kind: String,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List expenses
    List {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Restrict to a month (requires --year)
        #[arg(short, long)]
        month: Option<u32>,

        /// Restrict to a year (requires --month)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set or update the budget for a month
    Set {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Month (1-12)
        #[arg(short, long)]
        month: u32,

        /// Year
        #[arg(short, long)]
        year: i32,

        /// Budget amount
        #[arg(short, long)]
        amount: f64,
    },
    /// Show the budget for a month
    Get {
        /// User name
        #[arg(short, long)]
        user: String,

        /// Month (1-12)
        #[arg(short, long)]
        month: u32,

        /// Year
        #[arg(short, long)]
        year: i32,
    },
}
