//! # REST API Interface Layer
//!
//! HTTP endpoints for pay periods, allocations, transactions and analytics.
//! Every `/api` handler takes an [`AuthenticatedUser`](crate::domain::models::user::AuthenticatedUser)
//! extracted from the gateway headers, calls one service operation, and turns
//! the outcome into a JSON response. Errors render as
//! `{"error": "<kind>", "message": "..."}`.

pub mod allocation_apis;
pub mod analytics_apis;
pub mod error;
pub mod extract;
pub mod identity;
pub mod mappers;
pub mod period_apis;
pub mod transaction_apis;

pub use allocation_apis::*;
pub use analytics_apis::*;
pub use period_apis::*;
pub use transaction_apis::*;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
