//! Budget operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Budget;

impl Database {
    /// Get a user's budget for (month, year), if one has been set
    ///
    /// A missing budget is not an error; callers surface a zero default.
    pub fn get_budget(&self, user_id: i64, month: u32, year: i32) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                "SELECT id, user_id, month, year, amount, created_at
                 FROM budgets WHERE user_id = ? AND month = ? AND year = ?",
                params![user_id, month, year],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// Set or update a user's budget for (month, year)
    ///
    /// Single atomic upsert keyed on the UNIQUE(user_id, month, year)
    /// constraint, so concurrent writers cannot produce duplicate rows.
    pub fn set_budget(&self, user_id: i64, month: u32, year: i32, amount: f64) -> Result<Budget> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget amount must be a non-negative number, got {}",
                amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (user_id, month, year, amount)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, month, year) DO UPDATE SET amount = excluded.amount
            "#,
            params![user_id, month, year, amount],
        )?;
        drop(conn);

        self.get_budget(user_id, month, year)?
            .ok_or_else(|| Error::NotFound("Budget not found after upsert".into()))
    }

    fn row_to_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
        let created_at_str: String = row.get(5)?;
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            month: row.get(2)?,
            year: row.get(3)?,
            amount: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
