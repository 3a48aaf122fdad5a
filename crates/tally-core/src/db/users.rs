//! User provisioning and token lookup

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Generate an opaque bearer token for a new user
fn generate_token(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b":");
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    hex::encode(hasher.finalize())
}

impl Database {
    /// Provision a new user with a freshly generated bearer token
    pub fn create_user(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("User name must not be empty".into()));
        }

        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::InvalidData(format!(
                "User '{}' already exists",
                name
            )));
        }

        let token = generate_token(name);
        conn.execute(
            "INSERT INTO users (name, token) VALUES (?, ?)",
            params![name, token],
        )?;

        let id = conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound("User not found after creation".into()))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, token, created_at FROM users WHERE id = ?",
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by name
    pub fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, token, created_at FROM users WHERE name = ?",
                params![name],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Resolve a bearer token to its user (the auth gate's lookup)
    pub fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, token, created_at FROM users WHERE token = ?",
                params![token],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// First provisioned user, if any (used by the server's --no-auth mode)
    pub fn first_user(&self) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, token, created_at FROM users ORDER BY id LIMIT 1",
                [],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, token, created_at FROM users ORDER BY name")?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            token: row.get(2)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
