//! Expense management commands

use anyhow::{anyhow, Result};
use tally_core::analytics::month_bounds;
use tally_core::db::Database;
use tally_core::models::{parse_date_input, Category, ExpenseKind, NewExpense};

use super::resolve_user;

#[allow(clippy::too_many_arguments)]
pub fn cmd_expense_add(
    db: &Database,
    user_name: &str,
    amount: f64,
    category: &str,
    kind: &str,
    date: Option<&str>,
    note: Option<String>,
) -> Result<()> {
    let user = resolve_user(db, user_name)?;

    let category: Category = category
        .parse()
        .map_err(|e: String| anyhow!("{} (valid: Food, Travel, Shopping, Study, Other)", e))?;
    let kind: ExpenseKind = kind
        .parse()
        .map_err(|e: String| anyhow!("{} (valid: Necessary, Waste)", e))?;
    let date = date.map(parse_date_input).transpose().map_err(|e| anyhow!(e))?;

    let expense = db.create_expense(
        user.id,
        &NewExpense {
            amount,
            category,
            kind,
            date,
            note,
        },
    )?;

    println!(
        "✅ Recorded {:.2} ({}) for {} on {}",
        expense.amount,
        expense.category,
        user.name,
        expense.date.format("%Y-%m-%d")
    );

    Ok(())
}

pub fn cmd_expense_list(
    db: &Database,
    user_name: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let user = resolve_user(db, user_name)?;

    let range = match (month, year) {
        (Some(month), Some(year)) => {
            let bounds = month_bounds(year, month)?;
            Some((bounds.start, bounds.end))
        }
        (None, None) => None,
        _ => return Err(anyhow!("--month and --year must be given together")),
    };

    let expenses = db.list_expenses(user.id, range, None)?;

    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    println!("💸 Expenses for {}", user.name);
    println!("   ──────────────────────────────────────────────");
    for expense in &expenses {
        println!(
            "   {:>4}  {}  {:>10.2}  {:<9}{:<10}{}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.amount,
            expense.category.to_string(),
            expense.kind.to_string(),
            expense.note.as_deref().unwrap_or("")
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ──────────────────────────────────────────────");
    println!("   {} expenses, total {:.2}", expenses.len(), total);

    Ok(())
}
