//! Stripe Checkout sessions for subscription tiers.

mod client;
mod types;

pub use client::{StripeClient, StripeError};
pub use types::{CheckoutRequest, PriceTable, Tier};
