//! Dashboard command implementation

use anyhow::Result;
use chrono::{Datelike, Utc};
use tally_core::analytics::monthly_summary;
use tally_core::db::Database;

use super::resolve_user;

pub fn cmd_dashboard(
    db: &Database,
    user_name: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let user = resolve_user(db, user_name)?;

    let today = Utc::now().date_naive();
    let month = month.unwrap_or_else(|| today.month());
    let year = year.unwrap_or_else(|| today.year());

    let summary = monthly_summary(db, user.id, month, year)?;

    println!("📊 Dashboard for {} — {}/{}", user.name, month, year);
    println!("   ─────────────────────────────");
    println!("   Budget:      {:>10.2}", summary.budget);
    println!("   Spent:       {:>10.2}", summary.total_spent);
    println!("   Wasted:      {:>10.2}", summary.total_wasted);
    println!("   Remaining:   {:>10.2}", summary.remaining);

    if !summary.category_data.is_empty() {
        println!();
        println!("   By category:");
        for (category, amount) in &summary.category_data {
            println!("     {:<10} {:>10.2}", category.to_string(), amount);
        }
    }

    println!();
    if summary.alert {
        println!("⚠️  {}", summary.insight);
    } else {
        println!("💡 {}", summary.insight);
    }

    Ok(())
}
