//! Monthly analytics aggregation
//!
//! Computes the dashboard summary for one (user, month, year): totals,
//! per-category and per-day breakdowns, remaining balance, and a short
//! rule-based insight. The summary is derived on every request from the
//! budget and expense tables and is never persisted.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, Expense, ExpenseKind, MonthlySummary};

/// Inclusive datetime range covering one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// First day of the month, 00:00:00
    pub start: NaiveDateTime,
    /// Last day of the month, 23:59:59
    pub end: NaiveDateTime,
    /// Number of calendar days in the month (28-31)
    pub days: u32,
}

/// Resolve the inclusive [day 1 00:00:00, last-day 23:59:59] range for a
/// calendar month. Leap years fall out of the first-of-next-month
/// arithmetic; no special casing.
pub fn month_bounds(year: i32, month: u32) -> Result<MonthRange> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::InvalidData(format!("Invalid month/year: {}/{}", month, year))
    })?;

    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::InvalidData(format!("Invalid month/year: {}/{}", month, year)))?;

    let last = next_first - Duration::days(1);

    Ok(MonthRange {
        start: first.and_hms_opt(0, 0, 0).unwrap(),
        end: last.and_hms_opt(23, 59, 59).unwrap(),
        days: last.day(),
    })
}

/// Single-pass reduction over one month's expenses.
///
/// Pure function of its inputs: calling it twice with the same data yields
/// an identical summary. `days_in_month` sizes the daily bucket array;
/// expenses are assumed to fall inside the month.
pub fn summarize(budget: f64, expenses: &[Expense], days_in_month: u32) -> MonthlySummary {
    let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
    let total_wasted: f64 = expenses
        .iter()
        .filter(|e| e.kind == ExpenseKind::Waste)
        .map(|e| e.amount)
        .sum();
    let remaining = budget - total_spent;

    // Category breakdown: only categories actually present
    let mut category_data: BTreeMap<Category, f64> = BTreeMap::new();
    for expense in expenses {
        *category_data.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    // Daily breakdown, one bucket per calendar day
    let mut daily_data = vec![0.0; days_in_month as usize];
    for expense in expenses {
        let idx = expense.date.day() as usize - 1;
        if let Some(slot) = daily_data.get_mut(idx) {
            *slot += expense.amount;
        }
    }

    // Insight rule chain; order matters, sentences concatenate
    let mut insight = String::from("You are doing great!");
    if budget > 0.0 {
        if total_spent > budget {
            insight = String::from("You have exceeded your monthly budget!");
        } else if total_spent > 0.8 * budget {
            insight = String::from("Alert: You have reached 80% of your budget.");
        }
    }

    // Top category by strict comparison: ties keep the earlier category
    // (BTreeMap iterates in Category declaration order), and an all-zero
    // month names no category at all.
    let mut max_category: Option<Category> = None;
    let mut max_value = 0.0;
    for (category, value) in &category_data {
        if *value > max_value {
            max_value = *value;
            max_category = Some(*category);
        }
    }
    if let Some(category) = max_category {
        insight.push_str(&format!(
            " You spent the most on {} this month.",
            category
        ));
    }

    if total_wasted > 0.3 * total_spent && total_spent > 0.0 {
        insight.push_str(" Try to cut down on wasted expenses.");
    }

    MonthlySummary {
        budget,
        total_spent,
        total_wasted,
        remaining,
        category_data,
        daily_data,
        insight,
        alert: budget > 0.0 && total_spent >= 0.8 * budget,
    }
}

/// Compute the monthly summary for a user: budget (zero when unset) plus
/// all expenses dated inside the month.
pub fn monthly_summary(
    db: &Database,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<MonthlySummary> {
    let range = month_bounds(year, month)?;

    let budget = db
        .get_budget(user_id, month, year)?
        .map(|b| b.amount)
        .unwrap_or(0.0);

    let expenses = db.list_expenses(user_id, Some((range.start, range.end)), None)?;

    Ok(summarize(budget, &expenses, range.days))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::parse_date_input;

    fn expense(amount: f64, category: Category, kind: ExpenseKind, date: &str) -> Expense {
        Expense {
            id: 0,
            user_id: 1,
            amount,
            category,
            kind,
            date: parse_date_input(date).unwrap(),
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_month_bounds_day_counts() {
        assert_eq!(month_bounds(2024, 1).unwrap().days, 31);
        assert_eq!(month_bounds(2024, 4).unwrap().days, 30);
        // 2024 is a leap year, 2023 is not
        assert_eq!(month_bounds(2024, 2).unwrap().days, 29);
        assert_eq!(month_bounds(2023, 2).unwrap().days, 28);
        // Century rules: 2000 leap, 1900 not
        assert_eq!(month_bounds(2000, 2).unwrap().days, 29);
        assert_eq!(month_bounds(1900, 2).unwrap().days, 28);
    }

    #[test]
    fn test_month_bounds_range_endpoints() {
        let range = month_bounds(2024, 6).unwrap();
        assert_eq!(range.start.to_string(), "2024-06-01 00:00:00");
        assert_eq!(range.end.to_string(), "2024-06-30 23:59:59");

        // December rolls into the next year
        let range = month_bounds(2024, 12).unwrap();
        assert_eq!(range.end.to_string(), "2024-12-31 23:59:59");
    }

    #[test]
    fn test_month_bounds_rejects_bad_month() {
        assert!(month_bounds(2024, 0).is_err());
        assert!(month_bounds(2024, 13).is_err());
    }

    #[test]
    fn test_summarize_over_budget_scenario() {
        let expenses = vec![
            expense(100.0, Category::Food, ExpenseKind::Necessary, "2024-06-01"),
            expense(50.0, Category::Food, ExpenseKind::Waste, "2024-06-02"),
        ];

        let summary = summarize(120.0, &expenses, 30);

        assert_eq!(summary.total_spent, 150.0);
        assert_eq!(summary.total_wasted, 50.0);
        assert_eq!(summary.remaining, -30.0);
        assert_eq!(summary.category_data.len(), 1);
        assert_eq!(summary.category_data[&Category::Food], 150.0);
        assert_eq!(summary.daily_data.len(), 30);
        assert_eq!(summary.daily_data[0], 100.0);
        assert_eq!(summary.daily_data[1], 50.0);
        // 50/150 = 0.333 > 0.3, so the waste warning is appended
        assert_eq!(
            summary.insight,
            "You have exceeded your monthly budget! You spent the most on Food this month. \
             Try to cut down on wasted expenses."
        );
        assert!(summary.alert);
    }

    #[test]
    fn test_summarize_conservation_properties() {
        let expenses = vec![
            expense(12.5, Category::Food, ExpenseKind::Necessary, "2024-02-03"),
            expense(7.5, Category::Travel, ExpenseKind::Waste, "2024-02-03"),
            expense(30.0, Category::Study, ExpenseKind::Necessary, "2024-02-29"),
        ];

        let summary = summarize(500.0, &expenses, 29);

        let daily_sum: f64 = summary.daily_data.iter().sum();
        let category_sum: f64 = summary.category_data.values().sum();
        assert_eq!(daily_sum, summary.total_spent);
        assert_eq!(category_sum, summary.total_spent);
        assert_eq!(summary.total_spent, 50.0);
        assert_eq!(summary.remaining, 450.0);
    }

    #[test]
    fn test_summarize_no_expenses_no_budget() {
        let summary = summarize(0.0, &[], 31);

        assert_eq!(summary.total_spent, 0.0);
        assert_eq!(summary.remaining, 0.0);
        assert!(summary.category_data.is_empty());
        assert_eq!(summary.daily_data, vec![0.0; 31]);
        assert_eq!(summary.insight, "You are doing great!");
        assert!(!summary.alert);
    }

    #[test]
    fn test_summarize_alert_at_exactly_eighty_percent() {
        let expenses = vec![expense(
            80.0,
            Category::Shopping,
            ExpenseKind::Necessary,
            "2024-06-10",
        )];

        let summary = summarize(100.0, &expenses, 30);

        // alert uses >=, the insight threshold uses strict >, so at exactly
        // 80% the flag is set while the message stays on the default
        assert!(summary.alert);
        assert_eq!(
            summary.insight,
            "You are doing great! You spent the most on Shopping this month."
        );
    }

    #[test]
    fn test_summarize_eighty_percent_insight() {
        let expenses = vec![expense(
            85.0,
            Category::Food,
            ExpenseKind::Necessary,
            "2024-06-10",
        )];

        let summary = summarize(100.0, &expenses, 30);

        assert!(summary.alert);
        assert!(summary
            .insight
            .starts_with("Alert: You have reached 80% of your budget."));
    }

    #[test]
    fn test_summarize_category_tie_keeps_declaration_order() {
        let expenses = vec![
            expense(40.0, Category::Study, ExpenseKind::Necessary, "2024-06-05"),
            expense(40.0, Category::Food, ExpenseKind::Necessary, "2024-06-06"),
        ];

        let summary = summarize(0.0, &expenses, 30);

        // Food and Study tie at 40; Food is declared first and wins
        assert!(summary
            .insight
            .contains("You spent the most on Food this month."));
    }

    #[test]
    fn test_summarize_waste_warning_threshold() {
        // Exactly 30% wasted: strict >, so no warning
        let expenses = vec![
            expense(70.0, Category::Food, ExpenseKind::Necessary, "2024-06-01"),
            expense(30.0, Category::Other, ExpenseKind::Waste, "2024-06-02"),
        ];
        let summary = summarize(0.0, &expenses, 30);
        assert!(!summary.insight.contains("wasted"));

        // Just over 30%
        let expenses = vec![
            expense(69.0, Category::Food, ExpenseKind::Necessary, "2024-06-01"),
            expense(31.0, Category::Other, ExpenseKind::Waste, "2024-06-02"),
        ];
        let summary = summarize(0.0, &expenses, 30);
        assert!(summary
            .insight
            .ends_with("Try to cut down on wasted expenses."));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let expenses = vec![
            expense(10.0, Category::Travel, ExpenseKind::Waste, "2024-06-15"),
            expense(25.0, Category::Food, ExpenseKind::Necessary, "2024-06-20"),
        ];

        let first = summarize(100.0, &expenses, 30);
        let second = summarize(100.0, &expenses, 30);
        assert_eq!(first, second);
    }

    #[test]
    fn test_monthly_summary_against_database() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("ana").unwrap();

        db.set_budget(user.id, 6, 2024, 120.0).unwrap();
        db.create_expense(
            user.id,
            &crate::models::NewExpense {
                amount: 100.0,
                category: Category::Food,
                kind: ExpenseKind::Necessary,
                date: Some(parse_date_input("2024-06-01").unwrap()),
                note: None,
            },
        )
        .unwrap();
        db.create_expense(
            user.id,
            &crate::models::NewExpense {
                amount: 50.0,
                category: Category::Food,
                kind: ExpenseKind::Waste,
                date: Some(parse_date_input("2024-06-02").unwrap()),
                note: None,
            },
        )
        .unwrap();

        // An expense outside the month must not count
        db.create_expense(
            user.id,
            &crate::models::NewExpense {
                amount: 999.0,
                category: Category::Travel,
                kind: ExpenseKind::Necessary,
                date: Some(parse_date_input("2024-07-01").unwrap()),
                note: None,
            },
        )
        .unwrap();

        let summary = monthly_summary(&db, user.id, 6, 2024).unwrap();
        assert_eq!(summary.budget, 120.0);
        assert_eq!(summary.total_spent, 150.0);
        assert_eq!(summary.total_wasted, 50.0);
        assert_eq!(summary.remaining, -30.0);
        assert!(summary.alert);
    }

    #[test]
    fn test_monthly_summary_unset_budget_defaults_to_zero() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("ben").unwrap();

        let summary = monthly_summary(&db, user.id, 7, 2024).unwrap();
        assert_eq!(summary.budget, 0.0);
        assert_eq!(summary.total_spent, 0.0);
        assert!(!summary.alert);
    }
}
