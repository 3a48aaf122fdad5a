//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tally_core::db::Database;
use tower::ServiceExt;

fn setup() -> (Database, Router, String) {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("alice").unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (db, app, user.token)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_health_needs_no_auth() {
    let (_db, app, _token) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (_db, app, _token) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/expenses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Authentication required");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (_db, app, _token) = setup();

    let response = app
        .oneshot(get("/api/expenses", "not-a-real-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_resolved_identity() {
    let (_db, app, token) = setup();

    let response = app.oneshot(get("/api/me", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "alice");
}

#[tokio::test]
async fn test_no_auth_mode_uses_first_user() {
    let db = Database::in_memory().unwrap();
    db.create_user("solo").unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
    };
    let app = create_router(db, None, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "solo");
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_create_expense() {
    let (_db, app, token) = setup();

    let body = serde_json::json!({
        "amount": 42.5,
        "category": "Food",
        "type": "Necessary",
        "date": "2024-06-15",
        "note": "lunch"
    });

    let response = app
        .oneshot(send_json("POST", "/api/expenses", &token, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 42.5);
    assert_eq!(json["category"], "Food");
    assert_eq!(json["type"], "Necessary");
    assert_eq!(json["note"], "lunch");
    assert!(json["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_expense_rejects_unknown_category() {
    let (_db, app, token) = setup();

    let body = serde_json::json!({
        "amount": 10,
        "category": "Groceries",
        "type": "Necessary"
    });

    let response = app
        .oneshot(send_json("POST", "/api/expenses", &token, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("Invalid category"));
}

#[tokio::test]
async fn test_create_expense_rejects_negative_amount() {
    let (_db, app, token) = setup();

    let body = serde_json::json!({
        "amount": -5.0,
        "category": "Food",
        "type": "Necessary"
    });

    let response = app
        .oneshot(send_json("POST", "/api/expenses", &token, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_expenses_month_filter() {
    let (db, app, token) = setup();
    let user = db.get_user_by_name("alice").unwrap().unwrap();

    for (amount, date) in [(10.0, "2024-06-05"), (20.0, "2024-06-20"), (99.0, "2024-07-01")] {
        db.create_expense(
            user.id,
            &tally_core::models::NewExpense {
                amount,
                category: tally_core::models::Category::Food,
                kind: tally_core::models::ExpenseKind::Necessary,
                date: Some(tally_core::models::parse_date_input(date).unwrap()),
                note: None,
            },
        )
        .unwrap();
    }

    let response = app
        .oneshot(get("/api/expenses?month=6&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let expenses = json.as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    // Newest first
    assert_eq!(expenses[0]["amount"], 20.0);
    assert_eq!(expenses[1]["amount"], 10.0);
}

#[tokio::test]
async fn test_list_expenses_is_tenant_scoped() {
    let (db, app, _token) = setup();
    let alice = db.get_user_by_name("alice").unwrap().unwrap();
    let bob = db.create_user("bob").unwrap();

    db.create_expense(
        alice.id,
        &tally_core::models::NewExpense {
            amount: 10.0,
            category: tally_core::models::Category::Food,
            kind: tally_core::models::ExpenseKind::Necessary,
            date: None,
            note: None,
        },
    )
    .unwrap();

    let response = app
        .oneshot(get("/api/expenses", &bob.token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_expense_explicit_zero_amount() {
    let (db, app, token) = setup();
    let user = db.get_user_by_name("alice").unwrap().unwrap();

    let expense = db
        .create_expense(
            user.id,
            &tally_core::models::NewExpense {
                amount: 50.0,
                category: tally_core::models::Category::Food,
                kind: tally_core::models::ExpenseKind::Necessary,
                date: None,
                note: Some("dinner".to_string()),
            },
        )
        .unwrap();

    let body = serde_json::json!({ "amount": 0 });
    let response = app
        .oneshot(send_json(
            "PUT",
            &format!("/api/expenses/{}", expense.id),
            &token,
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    // An explicit zero overwrites; untouched fields survive
    assert_eq!(json["amount"], 0.0);
    assert_eq!(json["note"], "dinner");
}

#[tokio::test]
async fn test_update_expense_by_non_owner_is_unauthorized() {
    let (db, app, _token) = setup();
    let alice = db.get_user_by_name("alice").unwrap().unwrap();
    let bob = db.create_user("bob").unwrap();

    let expense = db
        .create_expense(
            alice.id,
            &tally_core::models::NewExpense {
                amount: 50.0,
                category: tally_core::models::Category::Food,
                kind: tally_core::models::ExpenseKind::Necessary,
                date: None,
                note: None,
            },
        )
        .unwrap();

    let body = serde_json::json!({ "amount": 1 });
    let response = app
        .oneshot(send_json(
            "PUT",
            &format!("/api/expenses/{}", expense.id),
            &bob.token,
            &body,
        ))
        .await
        .unwrap();

    // Unauthorized, not NotFound: the record exists but is not bob's
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_missing_expense_is_not_found() {
    let (_db, app, token) = setup();

    let body = serde_json::json!({ "amount": 1 });
    let response = app
        .oneshot(send_json("PUT", "/api/expenses/99999", &token, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Expense not found");
}

#[tokio::test]
async fn test_delete_expense() {
    let (db, app, token) = setup();
    let user = db.get_user_by_name("alice").unwrap().unwrap();

    let expense = db
        .create_expense(
            user.id,
            &tally_core::models::NewExpense {
                amount: 50.0,
                category: tally_core::models::Category::Food,
                kind: tally_core::models::ExpenseKind::Necessary,
                date: None,
                note: None,
            },
        )
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", expense.id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Expense removed");
    assert!(db.get_expense(expense.id).unwrap().is_none());
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_get_budget_defaults_to_zero() {
    let (_db, app, token) = setup();

    let response = app
        .oneshot(get("/api/budget?month=7&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 0);
}

#[tokio::test]
async fn test_get_budget_requires_month_and_year() {
    let (_db, app, token) = setup();

    let response = app.oneshot(get("/api/budget?month=7", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Please provide month and year");
}

#[tokio::test]
async fn test_set_budget_upserts() {
    let (_db, app, token) = setup();

    let body = serde_json::json!({ "month": 6, "year": 2024, "amount": 100.0 });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/budget", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 100.0);
    let first_id = json["id"].as_i64().unwrap();

    // Setting again updates in place
    let body = serde_json::json!({ "month": 6, "year": 2024, "amount": 250.0 });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/budget", &token, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 250.0);
    assert_eq!(json["id"].as_i64().unwrap(), first_id);

    let response = app
        .oneshot(get("/api/budget?month=6&year=2024", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 250.0);
}

// ========== Analytics API Tests ==========

#[tokio::test]
async fn test_analytics_requires_month_and_year() {
    let (_db, app, token) = setup();

    let response = app.oneshot(get("/api/analytics", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Please provide month and year");
}

#[tokio::test]
async fn test_analytics_monthly_summary() {
    let (db, app, token) = setup();
    let user = db.get_user_by_name("alice").unwrap().unwrap();

    db.set_budget(user.id, 6, 2024, 120.0).unwrap();
    for (amount, kind, date) in [
        (100.0, tally_core::models::ExpenseKind::Necessary, "2024-06-01"),
        (50.0, tally_core::models::ExpenseKind::Waste, "2024-06-02"),
    ] {
        db.create_expense(
            user.id,
            &tally_core::models::NewExpense {
                amount,
                category: tally_core::models::Category::Food,
                kind,
                date: Some(tally_core::models::parse_date_input(date).unwrap()),
                note: None,
            },
        )
        .unwrap();
    }

    let response = app
        .oneshot(get("/api/analytics?month=6&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["budget"], 120.0);
    assert_eq!(json["totalSpent"], 150.0);
    assert_eq!(json["totalWasted"], 50.0);
    assert_eq!(json["remaining"], -30.0);
    assert_eq!(json["categoryData"]["Food"], 150.0);
    assert_eq!(json["dailyData"].as_array().unwrap().len(), 30);
    assert_eq!(json["dailyData"][0], 100.0);
    assert_eq!(json["dailyData"][1], 50.0);
    assert_eq!(json["alert"], true);
    assert!(json["insight"]
        .as_str()
        .unwrap()
        .starts_with("You have exceeded your monthly budget!"));
}

#[tokio::test]
async fn test_analytics_leap_february_bucket_count() {
    let (_db, app, token) = setup();

    let response = app
        .oneshot(get("/api/analytics?month=2&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["dailyData"].as_array().unwrap().len(), 29);
    assert_eq!(json["insight"], "You are doing great!");
}

#[tokio::test]
async fn test_analytics_rejects_non_numeric_month() {
    let (_db, app, token) = setup();

    let response = app
        .oneshot(get("/api/analytics?month=abc&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Month and year must be numeric");
}

#[tokio::test]
async fn test_analytics_rejects_bad_month() {
    let (_db, app, token) = setup();

    let response = app
        .oneshot(get("/api/analytics?month=13&year=2024", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Audit API Tests ==========

#[tokio::test]
async fn test_audit_log_records_access() {
    let (_db, app, token) = setup();

    let response = app
        .clone()
        .oneshot(get("/api/expenses", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/audit", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert!(!entries.is_empty());
    assert_eq!(entries[0]["user_name"], "alice");
}
