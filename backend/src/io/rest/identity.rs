//! Extracts the user asserted by the upstream authentication gateway.
//!
//! Credentials are verified before requests reach this service; the gateway
//! forwards the verified email in `X-User-Email` and optionally a display
//! name in `X-User-Name`.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::warn;

use crate::domain::models::user::AuthenticatedUser;
use crate::domain::{ErrorKind, LedgerError};
use crate::AppState;

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug)]
pub enum IdentityRejection {
    Missing,
    Invalid,
    Ledger(LedgerError),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let message = match self {
            IdentityRejection::Missing => "Missing X-User-Email header",
            IdentityRejection::Invalid => "Invalid X-User-Email header",
            IdentityRejection::Ledger(e) => return e.into_response(),
        };
        warn!("Unauthenticated request: {}", message);

        let body = ErrorResponse {
            error: "unauthorized".to_string(),
            message: message.to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .ok_or(IdentityRejection::Missing)?
            .to_str()
            .map_err(|_| IdentityRejection::Invalid)?;
        let display_name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|value| value.to_str().ok());

        state
            .identity_service
            .resolve(email, display_name)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::Validation => IdentityRejection::Invalid,
                _ => IdentityRejection::Ledger(e),
            })
    }
}
