use super::types::{PricingRequest, PricingResult, ServiceErrorBody};
use crate::config::AppConfig;
use crate::errors::{PricerError, PricerResult};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Shown when the service fails without a usable `error` message.
pub const FALLBACK_SERVICE_MESSAGE: &str = "An error occurred while calculating the option price.";

/// The remote pricing engine. One call per valid submit; no retries.
pub trait PricingService: Send + Sync {
    fn calculate(
        &self,
        request: &PricingRequest,
    ) -> impl Future<Output = PricerResult<PricingResult>> + Send;
}

/// JSON-over-HTTP client for the calculate endpoint. Never panics.
#[derive(Clone)]
pub struct HttpPricingClient {
    client: Client,
    url: String,
}

impl HttpPricingClient {
    pub fn new(base_url: &str, endpoint: &str, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder().pool_max_idle_per_host(2);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Self {
            client: builder.build().unwrap_or_default(),
            url: format!("{}{}", base_url.trim_end_matches('/'), endpoint),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(&cfg.pricing_service_url, &cfg.pricing_endpoint, cfg.request_timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PricingService for HttpPricingClient {
    async fn calculate(&self, request: &PricingRequest) -> PricerResult<PricingResult> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            calc_type = %request.calc_type,
            url = %self.url,
            "sending pricing request"
        );

        let resp = self
            .client
            .post(&self.url)
            .header("X-Request-Id", &request_id)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_SERVICE_MESSAGE.to_string());
            tracing::warn!(request_id = %request_id, status = status.as_u16(), %message, "pricing service rejected request");
            return Err(PricerError::Service {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<PricingResult>()
            .await
            .map_err(|e| PricerError::Parse(format!("POST {}: {e}", self.url)))
    }
}
