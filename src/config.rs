//! Process settings read from the environment at startup.
//!
//! Provider credentials are read by each client's `from_env`; this covers
//! everything else.

use std::env;
use std::net::SocketAddr;
use std::path::Path;

use tracing::{info, warn};

use crate::email::{BatchClient, BatchClientsError, load_batch_clients};
use crate::stripe::PriceTable;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
/// Resend's shared sender, usable without a verified domain.
pub const FALLBACK_FROM_EMAIL: &str = "onboarding@resend.dev";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid LVB_BIND address '{value}': {source}")]
    InvalidBind {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    BatchClients(#[from] BatchClientsError),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    /// Sender address; `/api/report/send` refuses to run without it.
    pub from_email: Option<String>,
    pub cron_secret: Option<String>,
    pub prices: PriceTable,
    pub batch_clients: Vec<BatchClient>,
    /// Recipient for `/api/report/test` when the request names none.
    pub report_test_to: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("LVB_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_raw.clone(),
                source,
            })?;

        let batch_clients = match get("LVB_BATCH_CLIENTS") {
            Some(path) => {
                let clients = load_batch_clients(Path::new(&path))?;
                info!(count = clients.len(), path = %path, "loaded batch clients");
                clients
            }
            None => Vec::new(),
        };

        let from_email = get("FROM_EMAIL");
        if from_email.is_none() {
            warn!("FROM_EMAIL not set; /api/report/send is disabled");
        }

        Ok(Self {
            bind,
            from_email,
            cron_secret: get("CRON_SECRET"),
            prices: PriceTable {
                starter: get("STRIPE_PRICE_STARTER"),
                growth: get("STRIPE_PRICE_GROWTH"),
                pro: get("STRIPE_PRICE_PRO"),
            },
            batch_clients,
            report_test_to: get("REPORT_TEST_TO"),
        })
    }

    /// Sender for batch and test sends, which fall back to Resend's shared address.
    pub fn sender(&self) -> &str {
        self.from_email.as_deref().unwrap_or(FALLBACK_FROM_EMAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:3000".parse().unwrap());
        assert!(settings.from_email.is_none());
        assert_eq!(settings.sender(), FALLBACK_FROM_EMAIL);
        assert!(settings.batch_clients.is_empty());
        assert!(settings.prices.starter.is_none());
    }

    #[test]
    fn reads_values_and_ignores_blanks() {
        let settings = Settings::from_lookup(lookup(&[
            ("LVB_BIND", "127.0.0.1:8080"),
            ("FROM_EMAIL", " reports@lvb.dev "),
            ("CRON_SECRET", "   "),
            ("STRIPE_PRICE_PRO", "price_pro"),
        ]))
        .unwrap();
        assert_eq!(settings.bind.port(), 8080);
        assert_eq!(settings.sender(), "reports@lvb.dev");
        assert!(settings.cron_secret.is_none());
        assert_eq!(settings.prices.pro.as_deref(), Some("price_pro"));
    }

    #[test]
    fn invalid_bind_is_error() {
        let err = Settings::from_lookup(lookup(&[("LVB_BIND", "not-an-addr")])).unwrap_err();
        assert!(err.to_string().contains("not-an-addr"));
    }

    #[test]
    fn missing_batch_file_is_error() {
        let err = Settings::from_lookup(lookup(&[("LVB_BATCH_CLIENTS", "/nonexistent/clients.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BatchClients(_)));
    }
}
