use crate::form::{CalcType, OptionInput, OptionType};
use serde::{Deserialize, Serialize};

// ── Request ──

/// POST body for the calculate endpoint. Every field is sent, including the one
/// the current mode ignores, and numeric fields keep the text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub stock_price: String,
    pub strike_price: String,
    pub time_to_maturity: String,
    pub risk_free_rate: String,
    pub volatility: String,
    pub option_price: String,
    pub option_type: OptionType,
    pub calc_type: CalcType,
}

impl From<&OptionInput> for PricingRequest {
    fn from(input: &OptionInput) -> Self {
        Self {
            stock_price: input.stock_price.clone(),
            strike_price: input.strike_price.clone(),
            time_to_maturity: input.time_to_maturity.clone(),
            risk_free_rate: input.risk_free_rate.clone(),
            volatility: input.volatility.clone(),
            option_price: input.option_price.clone(),
            option_type: input.option_type,
            calc_type: input.calc_type,
        }
    }
}

// ── Responses ──

/// Price and Greeks as returned by the service. Vega and rho are per 1%
/// move, theta is per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub option_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
}

/// Body of a non-success response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    pub error: Option<String>,
}
