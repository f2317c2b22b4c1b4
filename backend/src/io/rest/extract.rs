//! Request extractors whose rejections render as ledger validation errors.
//!
//! Axum's own `Json`, `Path` and `Query` reject with plain-text bodies; these
//! wrappers route every rejection through [`LedgerError`] so malformed input
//! gets the same `{"error": "validation", ...}` body as any other bad request.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::domain::LedgerError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(LedgerError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(LedgerError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(LedgerError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for LedgerError {
    fn from(rejection: PathRejection) -> Self {
        LedgerError::validation("path", rejection.body_text())
    }
}

impl From<QueryRejection> for LedgerError {
    fn from(rejection: QueryRejection) -> Self {
        LedgerError::validation("query", rejection.body_text())
    }
}
