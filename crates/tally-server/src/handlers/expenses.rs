//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, MessageResponse, MAX_BODY_SIZE};
use tally_core::analytics::month_bounds;
use tally_core::models::{
    parse_date_input, Category, Expense, ExpenseKind, ExpensePatch, NewExpense,
};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub month: Option<String>,
    pub year: Option<String>,
    /// Case-insensitive substring match on the note text
    pub search: Option<String>,
}

/// GET /api/expenses - List the caller's expenses, newest first
///
/// When both month and year are given, restricts to that calendar month.
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ExpenseListQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let range = match super::optional_month_year(params.month.as_deref(), params.year.as_deref())? {
        Some((month, year)) => {
            let bounds = month_bounds(year, month)?;
            Some((bounds.start, bounds.end))
        }
        None => None,
    };

    let expenses = state
        .db
        .list_expenses(user.id, range, params.search.as_deref())?;

    state.db.log_audit(
        &user.name,
        "list",
        Some("expense"),
        None,
        Some(&format!(
            "month={:?}, year={:?}, count={}",
            params.month,
            params.year,
            expenses.len()
        )),
    )?;

    Ok(Json(expenses))
}

/// Request body for creating an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// POST /api/expenses - Record a new expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    request: Request,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    let req: CreateExpenseRequest =
        serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))?;

    let category: Category = req.category.parse().map_err(|_| {
        AppError::bad_request(&format!(
            "Invalid category: {}. Valid: Food, Travel, Shopping, Study, Other",
            req.category
        ))
    })?;
    let kind: ExpenseKind = req.kind.parse().map_err(|_| {
        AppError::bad_request(&format!(
            "Invalid type: {}. Valid: Necessary, Waste",
            req.kind
        ))
    })?;
    let date = req
        .date
        .as_deref()
        .map(parse_date_input)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let expense = state.db.create_expense(
        user.id,
        &NewExpense {
            amount: req.amount,
            category,
            kind,
            date,
            note: req.note,
        },
    )?;

    state.db.log_audit(
        &user.name,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("amount={}, category={}", expense.amount, category)),
    )?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Request body for updating an expense
///
/// Field presence decides what changes: an explicit zero amount or empty
/// note overwrites, an absent field keeps the stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// PUT /api/expenses/:id - Update an expense owned by the caller
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    let req: UpdateExpenseRequest =
        serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))?;

    let category = req
        .category
        .as_deref()
        .map(|s| {
            s.parse::<Category>().map_err(|_| {
                AppError::bad_request(&format!(
                    "Invalid category: {}. Valid: Food, Travel, Shopping, Study, Other",
                    s
                ))
            })
        })
        .transpose()?;
    let kind = req
        .kind
        .as_deref()
        .map(|s| {
            s.parse::<ExpenseKind>().map_err(|_| {
                AppError::bad_request(&format!("Invalid type: {}. Valid: Necessary, Waste", s))
            })
        })
        .transpose()?;
    let date = req
        .date
        .as_deref()
        .map(parse_date_input)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let patch = ExpensePatch {
        amount: req.amount,
        category,
        kind,
        date,
        note: req.note,
    };

    let expense = state.db.update_expense(user.id, id, &patch)?;

    state
        .db
        .log_audit(&user.name, "update", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense owned by the caller
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.delete_expense(user.id, id)?;

    state
        .db
        .log_audit(&user.name, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(MessageResponse {
        message: "Expense removed".to_string(),
    }))
}
