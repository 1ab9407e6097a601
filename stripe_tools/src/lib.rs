//! A minimal Stripe client for the storefront payment core.
//!
//! Talks to the Stripe REST API directly (no SDK dependency): hosted Checkout session creation on the way out,
//! and webhook signature verification plus event parsing on the way back in.
mod api;
mod config;
mod data_objects;
mod error;

pub mod webhook;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutSession, EventObject, StripeEvent, CHECKOUT_SESSION_COMPLETED};
pub use error::StripeApiError;
