use std::path::Path;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::client::{Mailer, OutgoingEmail};
use super::report::{KeywordRank, ReportData, render_monthly_report, subject};

/// Reports in flight at once during a batch run.
const BATCH_CONCURRENCY: usize = 4;

/// A business that receives the monthly report on scheduled runs.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<KeywordRank>,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchClientsError {
    #[error("cannot read batch clients file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid batch clients file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

pub fn load_batch_clients(path: &Path) -> Result<Vec<BatchClient>, BatchClientsError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| BatchClientsError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| BatchClientsError::Parse {
        path: display,
        source,
    })
}

/// Per-recipient result of a batch run; exactly one of `id` / `error` is set
/// unless the provider accepted the message without returning an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Sends every client its report. Failures are recorded per client and never
/// stop the run; outcomes keep the order of `clients`.
pub async fn run_batch(
    mailer: &impl Mailer,
    from: &str,
    clients: &[BatchClient],
    month_label: &str,
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = stream::iter(clients.iter().cloned())
        .map(|client| async move {
            let client = &client;
            let html = render_monthly_report(&ReportData {
                business_name: &client.name,
                month_label,
                highlights: &client.highlights,
                keywords: &client.keywords,
            });
            let email = OutgoingEmail {
                from: from.to_string(),
                to: client.email.clone(),
                subject: subject(&client.name, month_label),
                html: Some(html),
                text: None,
            };

            let (id, error) = match mailer.send(&email).await {
                Ok(id) => (id, None),
                Err(e) => {
                    warn!(client = %client.name, error = %e, "report send failed");
                    (None, Some(e.to_string()))
                }
            };
            BatchOutcome {
                name: client.name.clone(),
                email: client.email.clone(),
                id,
                error,
            }
        })
        .buffered(BATCH_CONCURRENCY)
        .collect()
        .await;

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(total = outcomes.len(), failed, month = %month_label, "report batch complete");
    outcomes
}
