//! Expense operations
//!
//! Every operation is scoped to the owning user; mutations re-check
//! ownership on the loaded row before writing.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, parse_naive_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, Expense, ExpenseKind, ExpensePatch, NewExpense};

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount, category, kind, date, note, created_at, updated_at";

/// Reject NaN/infinite and negative amounts before they reach the store
fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

impl Database {
    /// Create an expense owned by `user_id`; date defaults to now
    pub fn create_expense(&self, user_id: i64, new: &NewExpense) -> Result<Expense> {
        validate_amount(new.amount)?;

        let date = new.date.unwrap_or_else(|| Utc::now().naive_utc());
        let note = new.note.as_deref().map(str::trim);

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, kind, date, note)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                new.amount,
                new.category.as_str(),
                new.kind.as_str(),
                format_datetime(date),
                note,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound("Expense not found after creation".into()))
    }

    /// Get an expense by ID (not tenant-filtered; callers check ownership)
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// List a user's expenses, newest date first
    ///
    /// `range` restricts to an inclusive date interval; `search` filters by
    /// case-insensitive substring on the note text.
    pub fn list_expenses(
        &self,
        user_id: i64,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        search: Option<&str>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        // Build dynamic WHERE clause
        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some((start, end)) = range {
            conditions.push("date BETWEEN ? AND ?".to_string());
            params.push(Box::new(format_datetime(start)));
            params.push(Box::new(format_datetime(end)));
        }

        if let Some(q) = search {
            if !q.trim().is_empty() {
                conditions.push("note LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        let sql = format!(
            "SELECT {} FROM expenses WHERE {} ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS,
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let expenses = stmt
            .query_map(params_refs.as_slice(), Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Apply a partial update to an expense owned by `user_id`
    ///
    /// Fails with `NotFound` when the id is absent and `Unauthorized` when
    /// the expense belongs to another user. Fields absent from the patch
    /// keep their stored values; present fields overwrite, including
    /// explicit zero amounts and empty notes.
    pub fn update_expense(&self, user_id: i64, id: i64, patch: &ExpensePatch) -> Result<Expense> {
        let expense = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound("Expense not found".into()))?;

        if expense.user_id != user_id {
            return Err(Error::Unauthorized("User not authorized".into()));
        }

        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let amount = patch.amount.unwrap_or(expense.amount);
        let category = patch.category.unwrap_or(expense.category);
        let kind = patch.kind.unwrap_or(expense.kind);
        let date = patch.date.unwrap_or(expense.date);
        let note = match &patch.note {
            Some(n) => Some(n.trim().to_string()),
            None => expense.note,
        };

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, kind = ?, date = ?, note = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                amount,
                category.as_str(),
                kind.as_str(),
                format_datetime(date),
                note,
                id,
            ],
        )?;
        drop(conn);

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound("Expense not found after update".into()))
    }

    /// Delete an expense owned by `user_id`
    ///
    /// Same NotFound/Unauthorized contract as `update_expense`.
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<()> {
        let expense = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound("Expense not found".into()))?;

        if expense.user_id != user_id {
            return Err(Error::Unauthorized("User not authorized".into()));
        }

        let conn = self.conn()?;
        conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        Ok(())
    }

    fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
        let category_str: String = row.get(3)?;
        let kind_str: String = row.get(4)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(7)?;
        let updated_at_str: String = row.get(8)?;

        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            category: category_str.parse().unwrap_or(Category::Other),
            kind: kind_str.parse().unwrap_or(ExpenseKind::Necessary),
            date: parse_naive_datetime(&date_str),
            note: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}
