//! # REST API for Spending Analytics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::domain::models::user::AuthenticatedUser;
use crate::io::rest::extract::ApiPath;
use crate::io::rest::mappers::AnalyticsMapper;
use crate::AppState;

/// Allocated, spent and remaining totals of one pay period
pub async fn get_period_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("GET /api/budget/pay-periods/{}/summary", pay_period_id);

    match state
        .analytics_service
        .period_summary(&user, pay_period_id)
        .await
    {
        Ok(summary) => {
            (StatusCode::OK, Json(AnalyticsMapper::to_period_summary(summary))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Per-category spending lines of one pay period
pub async fn get_spending_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("GET /api/transactions/summary/{}", pay_period_id);

    match state
        .analytics_service
        .spending_summary(&user, pay_period_id)
        .await
    {
        Ok(lines) => {
            let body: Vec<_> = lines
                .into_iter()
                .map(AnalyticsMapper::to_transaction_summary)
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Totals, averages, top categories and trend across all pay periods
pub async fn get_spending_analytics(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    info!("GET /api/transactions/analytics/spending - user {}", user.id);

    match state.analytics_service.spending_analytics(&user).await {
        Ok(analytics) => {
            (StatusCode::OK, Json(AnalyticsMapper::to_spending_analytics(analytics))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
