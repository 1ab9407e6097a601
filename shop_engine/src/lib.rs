//! Storefront Payment Engine
//!
//! This library contains the core logic for the cart → order → payment flow of the storefront. It is
//! provider-agnostic: nothing in here knows about any particular payment processor.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@sqlite`]). SQLite is the supported backend. You should never need to access the
//!    database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the [`mod@db_types`] module and are public.
//! 2. The engine public API ([`CartApi`] and [`OrderFlowApi`]). These provide the public-facing functionality:
//!    basket management, checkout, order lifecycle transitions and the idempotent paid transition driven by
//!    payment-provider webhooks. Specific backends need to implement the traits in [`mod@traits`] in order to act
//!    as a backend for the storefront server.
mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
#[cfg(feature = "sqlite")]
pub mod test_utils;
pub mod traits;

pub use api::{cart_api::CartApi, catalog_api::CatalogApi, order_flow_api::OrderFlowApi, shop_objects};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
