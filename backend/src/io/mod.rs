//! # IO Module
//!
//! Adapter layer between HTTP clients and the ledger services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: REST endpoints under `/api`
//! - **Identity**: Resolving the gateway-asserted user for every request
//! - **Error Translation**: Mapping ledger error kinds to HTTP status codes
//! - **Mapping**: Converting between `shared` DTOs and domain types
//!
//! Handlers contain no business rules; they map, delegate and translate.

pub mod rest;

pub use rest::*;
