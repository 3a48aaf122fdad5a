//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Database access and migrations
//! - Domain models (users, expenses, budgets)
//! - Monthly analytics aggregation (totals, breakdowns, insights)

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;

pub use analytics::{month_bounds, monthly_summary, summarize, MonthRange};
pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use models::{
    Budget, Category, Expense, ExpenseKind, ExpensePatch, MonthlySummary, NewExpense, User,
};
