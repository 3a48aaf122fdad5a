//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned user. The user identity is the sole tenancy boundary:
/// every expense and budget read/write is filtered to the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Bearer credential presented in the Authorization header
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Expense categories (closed enumeration)
///
/// The derived `Ord` follows declaration order, which is also the tie-break
/// order for the "spent the most on" insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Study,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Food,
        Self::Travel,
        Self::Shopping,
        Self::Study,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Shopping => "Shopping",
            Self::Study => "Study",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "travel" => Ok(Self::Travel),
            "shopping" => Ok(Self::Shopping),
            "study" => Ok(Self::Study),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an expense was necessary or wasteful (closed enumeration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    Necessary,
    Waste,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "Necessary",
            Self::Waste => "Waste",
        }
    }
}

impl std::str::FromStr for ExpenseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "necessary" => Ok(Self::Necessary),
            "waste" => Ok(Self::Waste),
            _ => Err(format!("Unknown expense type: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: Category,
    /// Serialized as `type` on the wire
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
    pub date: NaiveDateTime,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new expense before insertion
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub kind: ExpenseKind,
    /// Defaults to the current time when not supplied
    pub date: Option<NaiveDateTime>,
    pub note: Option<String>,
}

/// A partial update to an expense
///
/// Presence is per-field: `Some(0.0)` overwrites the amount with zero,
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub kind: Option<ExpenseKind>,
    pub date: Option<NaiveDateTime>,
    pub note: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

/// A monthly budget, unique per (user, month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Derived monthly analytics, recomputed on every request.
///
/// Field names keep the camelCase wire format the web client consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub budget: f64,
    pub total_spent: f64,
    pub total_wasted: f64,
    /// budget - totalSpent, unclamped (negative when over budget)
    pub remaining: f64,
    /// Only categories with at least one expense appear
    pub category_data: BTreeMap<Category, f64>,
    /// One bucket per calendar day of the month
    pub daily_data: Vec<f64>,
    pub insight: String,
    /// True once spending reaches 80% of a nonzero budget
    pub alert: bool,
}

/// Parse a date from user input: either a full datetime or a plain
/// calendar date (taken as midnight).
pub fn parse_date_input(s: &str) -> std::result::Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        .map_err(|_| format!("Invalid date: {} (use YYYY-MM-DD)", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in Category::ALL {
            let parsed: Category = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("SHOPPING".parse::<Category>().unwrap(), Category::Shopping);
    }

    #[test]
    fn test_expense_kind_parse() {
        assert_eq!(
            "Necessary".parse::<ExpenseKind>().unwrap(),
            ExpenseKind::Necessary
        );
        assert_eq!("waste".parse::<ExpenseKind>().unwrap(), ExpenseKind::Waste);
        assert!("Useful".parse::<ExpenseKind>().is_err());
    }

    #[test]
    fn test_category_ord_is_declaration_order() {
        assert!(Category::Food < Category::Travel);
        assert!(Category::Travel < Category::Shopping);
        assert!(Category::Study < Category::Other);
    }

    #[test]
    fn test_parse_date_input() {
        let d = parse_date_input("2024-06-01").unwrap();
        assert_eq!(d.to_string(), "2024-06-01 00:00:00");

        let dt = parse_date_input("2024-06-01T13:45:00").unwrap();
        assert_eq!(dt.to_string(), "2024-06-01 13:45:00");

        assert!(parse_date_input("June 1st").is_err());
    }

    #[test]
    fn test_expense_serializes_kind_as_type() {
        let expense = Expense {
            id: 1,
            user_id: 1,
            amount: 12.5,
            category: Category::Food,
            kind: ExpenseKind::Waste,
            date: parse_date_input("2024-06-01").unwrap(),
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["type"], "Waste");
        assert_eq!(json["category"], "Food");
    }
}
