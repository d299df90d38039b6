use crate::errors::{PricerError, PricerResult};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pricing_service_url: String,
    pub pricing_endpoint: String,
    /// `None` leaves timing entirely to the transport.
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> PricerResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PricerResult<Self> {
        let request_timeout = match lookup("PRICING_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| PricerError::Config(format!("PRICING_TIMEOUT_SECS: {e}")))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let pricing_endpoint = lookup("PRICING_ENDPOINT").unwrap_or_else(|| "/calculate".to_string());
        if !pricing_endpoint.starts_with('/') {
            return Err(PricerError::Config(format!(
                "PRICING_ENDPOINT must start with '/': {pricing_endpoint}"
            )));
        }

        Ok(Self {
            pricing_service_url: lookup("PRICING_SERVICE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:5005".to_string()),
            pricing_endpoint,
            request_timeout,
        })
    }
}
