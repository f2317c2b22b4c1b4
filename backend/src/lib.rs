//! # Budget Ledger Backend
//!
//! Pay-period budgeting backend: pay periods, income allocation across budget
//! categories, and a transaction ledger that keeps every category balance equal
//! to its allocation minus the transactions charged against it.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, identity extraction)
//!     ↓
//! Domain Layer (period, allocation, ledger and analytics services)
//!     ↓
//! Storage Layer (SQLite via sqlx, repositories)
//! ```
//!
//! Services hold nothing but a pool handle; every operation receives the
//! authenticated user explicitly and runs as its own unit of work.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AllocationService, AnalyticsService, IdentityService, PeriodService, TransactionService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub period_service: PeriodService,
    pub allocation_service: AllocationService,
    pub transaction_service: TransactionService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    /// Wire every service onto the same connection pool
    pub fn new(db: DbConnection) -> Self {
        let allocation_service = AllocationService::new(db.clone());
        Self {
            identity_service: IdentityService::new(db.clone()),
            period_service: PeriodService::new(db.clone(), allocation_service.clone()),
            allocation_service,
            transaction_service: TransactionService::new(db.clone()),
            analytics_service: AnalyticsService::new(db),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain services");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/budget/pay-periods",
            get(io::list_pay_periods).post(io::create_pay_period),
        )
        .route(
            "/budget/pay-periods/active/current",
            get(io::get_current_pay_period),
        )
        .route(
            "/budget/pay-periods/:pay_period_id",
            get(io::get_pay_period)
                .put(io::update_pay_period)
                .delete(io::delete_pay_period),
        )
        .route(
            "/budget/pay-periods/:pay_period_id/summary",
            get(io::get_period_summary),
        )
        .route(
            "/budget/pay-periods/:pay_period_id/categories",
            get(io::list_budget_categories),
        )
        .route("/budget/allocate", post(io::allocate_budget))
        .route(
            "/transactions",
            get(io::list_transactions).post(io::create_transaction),
        )
        .route("/transactions/bulk", post(io::bulk_create_transactions))
        .route("/transactions/analytics/spending", get(io::get_spending_analytics))
        .route(
            "/transactions/summary/:pay_period_id",
            get(io::get_spending_summary),
        )
        .route(
            "/transactions/:transaction_id",
            get(io::get_transaction)
                .put(io::update_transaction)
                .delete(io::delete_transaction),
        );

    Router::new()
        .route("/health", get(io::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
