//! SerpApi client for Google organic and local-pack results.

mod client;
mod types;

pub use client::{SerpClient, SerpError, SerpSource};
pub use types::{SerpRequest, SerpResponse};
