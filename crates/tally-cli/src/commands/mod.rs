//! Command implementations for the Tally CLI
//!
//! Each submodule implements one command area; shared helpers live in `core`.

mod budget;
mod core;
mod dashboard;
mod expenses;
mod serve;
mod users;

pub use budget::{cmd_budget_get, cmd_budget_set};
pub use core::{cmd_init, open_db, resolve_db_path, resolve_user};
pub use dashboard::cmd_dashboard;
pub use expenses::{cmd_expense_add, cmd_expense_list};
pub use serve::cmd_serve;
pub use users::{cmd_user_add, cmd_user_list};
