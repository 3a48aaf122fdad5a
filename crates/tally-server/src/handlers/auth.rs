//! Identity and liveness handlers

use axum::{Extension, Json};
use serde::Serialize;

use crate::{AppError, AuthUser};

/// Resolved identity, as seen by the client
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
}

/// GET /api/me - Who am I (resolved from the bearer token)
pub async fn get_me(Extension(user): Extension<AuthUser>) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
    }))
}

/// Liveness body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health - Liveness probe (no auth)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
