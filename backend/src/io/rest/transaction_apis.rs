//! # REST API for the Transaction Ledger
//!
//! Recording, listing, updating and deleting transactions. Every write moves
//! the balance of the affected budget category.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{
    BulkCreateTransactionsRequest, CreateTransactionRequest, TransactionListQuery,
    UpdateTransactionRequest,
};
use tracing::info;

use crate::domain::models::user::AuthenticatedUser;
use crate::io::rest::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::LedgerError;
use crate::io::rest::mappers::TransactionMapper;
use crate::AppState;

/// List transactions with optional period/category filters and paging
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<TransactionListQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    match state
        .transaction_service
        .list_transactions(&user, TransactionMapper::to_list_query(query))
        .await
    {
        Ok(transactions) => {
            let body: Vec<_> = transactions.into_iter().map(TransactionMapper::to_dto).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = TransactionMapper::to_create_command(request);
    match state.transaction_service.create_transaction(&user, command).await {
        Ok(transaction) => {
            (StatusCode::CREATED, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a batch of transactions; all or nothing
pub async fn bulk_create_transactions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(request): ApiJson<BulkCreateTransactionsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/transactions/bulk - {} transactions",
        request.transactions.len()
    );

    let commands = request
        .transactions
        .into_iter()
        .map(TransactionMapper::to_create_command)
        .collect();
    match state
        .transaction_service
        .bulk_create_transactions(&user, commands)
        .await
    {
        Ok(transactions) => {
            let body: Vec<_> = transactions.into_iter().map(TransactionMapper::to_dto).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(transaction_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", transaction_id);

    match state
        .transaction_service
        .get_transaction(&user, transaction_id)
        .await
    {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(transaction_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateTransactionRequest>,
) -> impl IntoResponse {
    info!("PUT /api/transactions/{} - request: {:?}", transaction_id, request);

    let command = TransactionMapper::to_update_command(request);
    match state
        .transaction_service
        .update_transaction(&user, transaction_id, command)
        .await
    {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(transaction_id): ApiPath<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}", transaction_id);

    match state
        .transaction_service
        .delete_transaction(&user, transaction_id)
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => LedgerError::not_found("transaction").into_response(),
        Err(e) => e.into_response(),
    }
}
