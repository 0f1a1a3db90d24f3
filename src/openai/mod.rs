//! OpenAI chat completions, used to draft posts and review replies.

mod client;
pub(crate) mod drafts;
mod types;

pub use client::{OpenAiClient, OpenAiError};
