//! # REST API for Budget Allocation

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::AllocateBudgetRequest;
use tracing::info;

use crate::domain::models::user::AuthenticatedUser;
use crate::io::rest::extract::{ApiJson, ApiPath};
use crate::io::rest::mappers::CategoryMapper;
use crate::AppState;

/// Replace the categories of a pay period with a new allocation batch
pub async fn allocate_budget(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(request): ApiJson<AllocateBudgetRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/budget/allocate - pay period {} with {} allocations",
        request.pay_period_id,
        request.allocations.len()
    );

    let command = CategoryMapper::to_allocate_command(request);
    match state.allocation_service.allocate(&user, command).await {
        Ok(categories) => {
            let body: Vec<_> = categories.into_iter().map(CategoryMapper::to_dto).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn list_budget_categories(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("GET /api/budget/pay-periods/{}/categories", pay_period_id);

    match state
        .allocation_service
        .list_categories(&user, pay_period_id)
        .await
    {
        Ok(categories) => {
            let body: Vec<_> = categories.into_iter().map(CategoryMapper::to_dto).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
