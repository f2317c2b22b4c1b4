//! Translation of ledger errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::{error, info};

use crate::domain::{ErrorKind, LedgerError};

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::OverAllocation | ErrorKind::InsufficientFunds => StatusCode::BAD_REQUEST,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Storage => {
                error!("Storage failure: {}", self);
                "Internal server error".to_string()
            }
            _ => {
                info!("Request rejected ({}): {}", kind.as_str(), self);
                self.to_string()
            }
        };

        let body = ErrorResponse {
            error: kind.as_str().to_string(),
            message,
        };
        (status_for(kind), Json(body)).into_response()
    }
}
