//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_path` / `open_db` - Shared database helpers
//! - `resolve_user` - Look up a user by name
//! - `cmd_init` - Initialize the database

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::User;

/// Resolve the database path: explicit --db flag, else the platform data
/// directory (~/.local/share/tally/tally.db on Linux), else the working
/// directory.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("tally").join("tally.db"))
        .unwrap_or_else(|| PathBuf::from("tally.db"))
}

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
    }

    let path_str = db_path.to_str().context("Database path must be valid UTF-8")?;
    tracing::debug!("Opening database at {}", path_str);
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up a user by name, with a helpful error when missing
pub fn resolve_user(db: &Database, name: &str) -> Result<User> {
    db.get_user_by_name(name)?
        .with_context(|| format!("Unknown user '{}'. Provision with: tally user add {}", name, name))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Provision a user: tally user add NAME");
    println!("  2. Start the web server: tally serve");

    Ok(())
}
