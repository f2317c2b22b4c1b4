//! End-to-end tests driving the axum router against an in-memory database.

use axum::{
    body::{to_bytes, Body},
    http::{HeaderValue, Method, Request, StatusCode},
    Router,
};
use budget_ledger_backend::{create_router, storage::DbConnection, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const ALICE: &str = "alice@example.com";
const MALLORY: &str = "mallory@example.com";

async fn app() -> Router {
    let db = DbConnection::init_in_memory().await.unwrap();
    create_router(
        AppState::new(db),
        HeaderValue::from_static("http://localhost:5173"),
    )
}

async fn send(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = user {
        builder = builder.header("X-User-Email", email);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_period(app: &Router, user: &str, start: &str, income: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/budget/pay-periods",
        Some(user),
        Some(json!({ "start_date": start, "frequency": "bi_weekly", "total_income": income })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/budget/pay-periods", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/budget/pay-periods", Some("not-an-email"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bi_weekly_budget_walkthrough() {
    let app = app().await;

    let period = create_period(&app, ALICE, "2024-01-01", "2000.00").await;
    assert_eq!(period["end_date"], "2024-01-14");
    assert_eq!(period["status"], "active");
    let period_id = period["id"].as_i64().unwrap();

    let (status, categories) = send(
        &app,
        Method::POST,
        "/api/budget/allocate",
        Some(ALICE),
        Some(json!({
            "pay_period_id": period_id,
            "allocations": [
                { "name": "Groceries", "allocated_amount": "500.00" },
                { "name": "Rent", "allocated_amount": "1200.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", categories);
    let groceries_id = categories[0]["id"].as_i64().unwrap();

    let (status, transaction) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(json!({
            "budget_category_id": groceries_id,
            "amount": "75.50",
            "description": "Weekly shop"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", transaction);
    assert_eq!(transaction["amount"], "75.50");
    assert_eq!(transaction["source"], "manual");

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!("/api/budget/pay-periods/{}/categories", period_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["remaining_amount"], "424.50");

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(json!({
            "budget_category_id": groceries_id,
            "amount": "450.00",
            "description": "Too much"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "insufficient_funds");

    let (status, summary) = send(
        &app,
        Method::GET,
        &format!("/api/budget/pay-periods/{}/summary", period_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_allocated"], "1700.00");
    assert_eq!(summary["total_spent"], "75.50");
    assert_eq!(summary["total_remaining"], "1624.50");
    assert_eq!(summary["categories_summary"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn overlapping_period_conflicts() {
    let app = app().await;
    create_period(&app, ALICE, "2024-01-01", "2000.00").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/budget/pay-periods",
        Some(ALICE),
        Some(json!({ "start_date": "2024-01-08", "total_income": "2000.00" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn over_allocation_and_validation_statuses() {
    let app = app().await;
    let period = create_period(&app, ALICE, "2024-01-01", "1000.00").await;
    let period_id = period["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/budget/allocate",
        Some(ALICE),
        Some(json!({
            "pay_period_id": period_id,
            "allocations": [{ "name": "Rent", "allocated_amount": "1000.01" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "over_allocation");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/budget/allocate",
        Some(ALICE),
        Some(json!({
            "pay_period_id": period_id,
            "allocations": [{ "name": "", "allocated_amount": "10.00" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn bulk_failure_reports_item_and_rolls_back() {
    let app = app().await;
    let (_, period) = send(
        &app,
        Method::POST,
        "/api/budget/pay-periods",
        Some(ALICE),
        Some(json!({
            "start_date": "2024-01-01",
            "total_income": "500.00",
            "budget_categories": [{ "name": "Groceries", "allocated_amount": "100.00" }]
        })),
    )
    .await;
    let category_id = period["budget_categories"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions/bulk",
        Some(ALICE),
        Some(json!({
            "transactions": [
                { "budget_category_id": category_id, "amount": "60.00", "description": "one" },
                { "budget_category_id": category_id, "amount": "60.00", "description": "two" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_funds");
    assert!(body["message"].as_str().unwrap().starts_with("item 1:"));

    let (_, listed) = send(&app, Method::GET, "/api/transactions", Some(ALICE), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/transactions/bulk",
        Some(ALICE),
        Some(json!({
            "transactions": [
                { "budget_category_id": category_id, "amount": "60.00", "description": "one" },
                { "budget_category_id": category_id, "amount": "40.00", "description": "two", "source": "manual" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created[1]["source"], "api");
}

#[tokio::test]
async fn update_and_delete_move_the_balance() {
    let app = app().await;
    let (_, period) = send(
        &app,
        Method::POST,
        "/api/budget/pay-periods",
        Some(ALICE),
        Some(json!({
            "start_date": "2024-01-01",
            "total_income": "500.00",
            "budget_categories": [{ "name": "Groceries", "allocated_amount": "100.00" }]
        })),
    )
    .await;
    let period_id = period["id"].as_i64().unwrap();
    let category_id = period["budget_categories"][0]["id"].as_i64().unwrap();

    let (_, transaction) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(json!({ "budget_category_id": category_id, "amount": "30.00", "description": "shop" })),
    )
    .await;
    let transaction_id = transaction["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/transactions/{}", transaction_id),
        Some(ALICE),
        Some(json!({ "amount": "45.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], "45.00");

    let (_, lines) = send(
        &app,
        Method::GET,
        &format!("/api/transactions/summary/{}", period_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(lines[0]["remaining_amount"], "55.00");
    assert_eq!(lines[0]["total_spent"], "45.00");
    assert_eq!(lines[0]["transaction_count"], 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/transactions/{}", transaction_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, lines) = send(
        &app,
        Method::GET,
        &format!("/api/transactions/summary/{}", period_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(lines[0]["remaining_amount"], "100.00");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/transactions/{}", transaction_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_cannot_see_or_touch_resources() {
    let app = app().await;
    let period = create_period(&app, ALICE, "2024-01-01", "2000.00").await;
    let period_id = period["id"].as_i64().unwrap();

    for (method, uri) in [
        (Method::GET, format!("/api/budget/pay-periods/{}", period_id)),
        (Method::GET, format!("/api/budget/pay-periods/{}/summary", period_id)),
        (Method::GET, format!("/api/transactions/summary/{}", period_id)),
        (Method::DELETE, format!("/api/budget/pay-periods/{}", period_id)),
    ] {
        let (status, _) = send(&app, method, &uri, Some(MALLORY), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/budget/pay-periods/{}", period_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn period_lifecycle_and_analytics() {
    let app = app().await;
    let first = create_period(&app, ALICE, "2024-01-01", "1000.00").await;
    let first_id = first["id"].as_i64().unwrap();
    create_period(&app, ALICE, "2024-01-15", "1500.00").await;

    let (status, current) = send(&app, Method::GET, "/api/budget/pay-periods/active/current", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["start_date"], "2024-01-15");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/budget/pay-periods/{}", first_id),
        Some(ALICE),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (_, completed) = send(
        &app,
        Method::GET,
        "/api/budget/pay-periods?status_filter=completed",
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let (status, analytics) = send(&app, Method::GET, "/api/transactions/analytics/spending", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["total_periods"], 2);
    assert_eq!(analytics["total_income"], "2500.00");
    assert_eq!(analytics["average_spending_per_period"], "0.00");
    assert_eq!(analytics["spending_trend"][0]["start_date"], "2024-01-01");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/budget/pay-periods/{}", first_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, all) = send(&app, Method::GET, "/api/budget/pay-periods", Some(ALICE), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_input_gets_a_json_validation_error() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(json!({ "budget_category_id": 1, "amount": "abc", "description": "coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
    assert!(body["message"].as_str().unwrap().starts_with("invalid body:"));

    let (status, body) = send(&app, Method::GET, "/api/transactions/abc", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/budget/pay-periods?status_filter=paused",
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}
