//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, MAX_BODY_SIZE};
use tally_core::models::Budget;

/// Query parameters for fetching a budget
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// GET /api/budget - Get the caller's budget for a month
///
/// A month with no budget set responds with `{"amount": 0}` rather than
/// an error.
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BudgetQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (month, year) =
        super::require_month_year(params.month.as_deref(), params.year.as_deref())?;

    let budget = state.db.get_budget(user.id, month, year)?;

    state.db.log_audit(
        &user.name,
        "view",
        Some("budget"),
        budget.as_ref().map(|b| b.id),
        Some(&format!("month={}, year={}", month, year)),
    )?;

    let body = match budget {
        Some(budget) => serde_json::to_value(budget)
            .map_err(|_| AppError::internal("An internal error occurred"))?,
        None => serde_json::json!({ "amount": 0 }),
    };

    Ok(Json(body))
}

/// Request body for setting a budget
#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

/// POST /api/budget - Set or update the caller's budget for a month
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    let req: SetBudgetRequest =
        serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))?;

    let budget = state.db.set_budget(user.id, req.month, req.year, req.amount)?;

    state.db.log_audit(
        &user.name,
        "set",
        Some("budget"),
        Some(budget.id),
        Some(&format!(
            "month={}, year={}, amount={}",
            budget.month, budget.year, budget.amount
        )),
    )?;

    Ok(Json(budget))
}
