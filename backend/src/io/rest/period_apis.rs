//! # REST API for Pay Periods
//!
//! Creating, listing, updating and deleting pay periods.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{CreatePayPeriodRequest, PayPeriodListQuery, UpdatePayPeriodRequest};
use tracing::info;

use crate::domain::models::user::AuthenticatedUser;
use crate::io::rest::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::LedgerError;
use crate::io::rest::mappers::PeriodMapper;
use crate::AppState;

/// Create a pay period, optionally with initial categories
pub async fn create_pay_period(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(request): ApiJson<CreatePayPeriodRequest>,
) -> impl IntoResponse {
    info!("POST /api/budget/pay-periods - user {}", user.id);

    let command = PeriodMapper::to_create_command(request);
    match state.period_service.create_period(&user, command).await {
        Ok(details) => (StatusCode::CREATED, Json(PeriodMapper::to_dto(details))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List pay periods, optionally filtered by status
pub async fn list_pay_periods(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<PayPeriodListQuery>,
) -> impl IntoResponse {
    info!("GET /api/budget/pay-periods - user {}", user.id);

    match state
        .period_service
        .list_periods(&user, PeriodMapper::to_list_query(query))
        .await
    {
        Ok(periods) => {
            let body: Vec<_> = periods.into_iter().map(PeriodMapper::to_dto).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn get_current_pay_period(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    info!("GET /api/budget/pay-periods/active/current - user {}", user.id);

    match state.period_service.current_period(&user).await {
        Ok(details) => (StatusCode::OK, Json(PeriodMapper::to_dto(details))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_pay_period(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("GET /api/budget/pay-periods/{}", pay_period_id);

    match state.period_service.get_period(&user, pay_period_id).await {
        Ok(details) => (StatusCode::OK, Json(PeriodMapper::to_dto(details))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update status and/or income of a pay period
pub async fn update_pay_period(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdatePayPeriodRequest>,
) -> impl IntoResponse {
    info!("PUT /api/budget/pay-periods/{} - request: {:?}", pay_period_id, request);

    let command = PeriodMapper::to_update_command(request);
    match state
        .period_service
        .update_period(&user, pay_period_id, command)
        .await
    {
        Ok(details) => (StatusCode::OK, Json(PeriodMapper::to_dto(details))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a pay period together with its categories and transactions
pub async fn delete_pay_period(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(pay_period_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/budget/pay-periods/{}", pay_period_id);

    match state.period_service.delete_period(&user, pay_period_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => LedgerError::not_found("pay period").into_response(),
        Err(e) => e.into_response(),
    }
}
