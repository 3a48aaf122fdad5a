//! Budget management commands

use anyhow::Result;
use tally_core::db::Database;

use super::resolve_user;

pub fn cmd_budget_set(
    db: &Database,
    user_name: &str,
    month: u32,
    year: i32,
    amount: f64,
) -> Result<()> {
    let user = resolve_user(db, user_name)?;
    let budget = db.set_budget(user.id, month, year, amount)?;

    println!(
        "✅ Budget for {}/{} set to {:.2}",
        budget.month, budget.year, budget.amount
    );

    Ok(())
}

pub fn cmd_budget_get(db: &Database, user_name: &str, month: u32, year: i32) -> Result<()> {
    let user = resolve_user(db, user_name)?;

    match db.get_budget(user.id, month, year)? {
        Some(budget) => println!("💰 Budget for {}/{}: {:.2}", month, year, budget.amount),
        None => println!("💰 No budget set for {}/{} (treated as 0)", month, year),
    }

    Ok(())
}
