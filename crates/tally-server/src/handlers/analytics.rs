//! Analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use tally_core::analytics::monthly_summary;
use tally_core::models::MonthlySummary;

/// Query parameters for the monthly summary
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// GET /api/analytics - Monthly dashboard summary
///
/// Recomputed from the stores on every request; totals, category and daily
/// breakdowns, remaining balance, insight text, and the 80%-of-budget
/// alert flag.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let (month, year) =
        super::require_month_year(params.month.as_deref(), params.year.as_deref())?;

    let summary = monthly_summary(&state.db, user.id, month, year)?;

    state.db.log_audit(
        &user.name,
        "view",
        Some("analytics"),
        None,
        Some(&format!(
            "month={}, year={}, total_spent={:.2}",
            month, year, summary.total_spent
        )),
    )?;

    Ok(Json(summary))
}
