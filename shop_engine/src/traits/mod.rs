//! # Storefront backend contracts.
//!
//! This module defines the interface contracts that database backends must implement to drive the storefront
//! payment core.
//!
//! * [`ProductCatalog`] is the read-only seam to the catalog collaborator (price/name/stock lookups by id).
//! * [`CartManagement`] covers the per-buyer basket: upsert-style adds, ownership-checked mutations and the
//!   live-priced cart view.
//! * [`OrderManagement`] covers the order lifecycle: the atomic cart → order checkout, status transitions, and
//!   the idempotent paid transition used by webhook reconciliation.
//!
//! Every operation takes the owner id explicitly. There is no ambient "current user" anywhere in the engine.

mod cart_management;
mod catalog;
mod order_management;

pub use cart_management::CartManagement;
pub use catalog::ProductCatalog;
pub use order_management::{OrderManagement, ReconciliationOutcome};
use thiserror::Error;

/// The client-facing error taxonomy of the storefront core.
///
/// `NotFound`, `Forbidden` and `BadRequest` map onto their HTTP namesakes and are never retried. `DatabaseError`
/// is the backend catch-all and surfaces as an internal error.
#[derive(Debug, Clone, Error)]
pub enum StorefrontError {
    #[error("The requested data was not found. {0}")]
    NotFound(String),
    #[error("Access denied. {0}")]
    Forbidden(String),
    #[error("Invalid request. {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StorefrontError {
    fn from(e: sqlx::Error) -> Self {
        StorefrontError::DatabaseError(e.to_string())
    }
}

impl StorefrontError {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        StorefrontError::NotFound(what.into())
    }
}
