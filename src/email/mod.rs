//! Report email: rendering, Resend delivery, and scheduled batch sends.

pub(crate) mod batch;
mod client;
pub(crate) mod report;

pub use batch::{BatchClient, BatchClientsError, BatchOutcome, load_batch_clients};
pub use client::{EmailError, Mailer, OutgoingEmail, ResendClient};
pub use report::KeywordRank;
