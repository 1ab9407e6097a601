//! # Storefront server
//!
//! This crate hosts the REST surface of the storefront payment core. It is responsible for:
//! * Serving the cart and order endpoints to authenticated buyers.
//! * Creating hosted checkout sessions with the payment provider.
//! * Listening for incoming webhook deliveries from the provider and reconciling paid orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod stripe_routes;

#[cfg(test)]
mod endpoint_tests;
