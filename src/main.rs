mod config;
mod console;
mod errors;
mod form;
mod orchestrator;
mod pricing;

use crate::pricing::HttpPricingClient;
use tokio::io::BufReader;

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the form on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let client = HttpPricingClient::from_config(&cfg);
    tracing::info!(
        url = client.url(),
        timeout_secs = cfg.request_timeout.map(|t| t.as_secs()),
        "option desk starting"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = console::run_session(stdin, tokio::io::stdout(), &client).await {
        tracing::error!("session error: {e}");
        std::process::exit(1);
    }
}
