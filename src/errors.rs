/// Failures that can end a pricing round trip or stop the binary from starting.
/// Field validation problems are not errors here: they are data, carried in
/// `form::ErrorSet`, and never reach the network.
#[derive(Debug, thiserror::Error)]
pub enum PricerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("pricing service error: {status} {message}")]
    Service { status: u16, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl PricerError {
    /// Message shown to the user in the form-level `apiError` slot.
    /// Service rejections surface their own text, everything else its description.
    pub fn user_message(&self) -> String {
        match self {
            PricerError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for PricerError {
    fn from(e: reqwest::Error) -> Self {
        PricerError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for PricerError {
    fn from(e: serde_json::Error) -> Self {
        PricerError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for PricerError {
    fn from(e: std::io::Error) -> Self {
        PricerError::Io(e.to_string())
    }
}

pub type PricerResult<T> = Result<T, PricerError>;
