use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Selectors ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(format!("unknown option type '{other}' (expected call or put)")),
        }
    }
}

/// Forward pricing (volatility in, price out) or its inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalcType {
    #[default]
    OptionPrice,
    ImpliedVolatility,
}

impl std::fmt::Display for CalcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionPrice => write!(f, "optionPrice"),
            Self::ImpliedVolatility => write!(f, "impliedVolatility"),
        }
    }
}

impl FromStr for CalcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optionprice" | "price" => Ok(Self::OptionPrice),
            "impliedvolatility" | "iv" => Ok(Self::ImpliedVolatility),
            other => Err(format!(
                "unknown calculation mode '{other}' (expected optionPrice or impliedVolatility)"
            )),
        }
    }
}

// ── Text fields ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    StockPrice,
    StrikePrice,
    TimeToMaturity,
    RiskFreeRate,
    Volatility,
    OptionPrice,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::StockPrice,
        Field::StrikePrice,
        Field::TimeToMaturity,
        Field::RiskFreeRate,
        Field::Volatility,
        Field::OptionPrice,
    ];

    /// Wire / error-key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockPrice => "stockPrice",
            Self::StrikePrice => "strikePrice",
            Self::TimeToMaturity => "timeToMaturity",
            Self::RiskFreeRate => "riskFreeRate",
            Self::Volatility => "volatility",
            Self::OptionPrice => "optionPrice",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StockPrice => "Stock Price",
            Self::StrikePrice => "Strike Price",
            Self::TimeToMaturity => "Time to Maturity",
            Self::RiskFreeRate => "Risk-Free Rate",
            Self::Volatility => "Volatility",
            Self::OptionPrice => "Option Price",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown field '{wanted}'"))
    }
}

/// Raw form contents, exactly as typed. Numeric fields stay strings until
/// validation parses them; the request body carries them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionInput {
    pub stock_price: String,
    pub strike_price: String,
    pub time_to_maturity: String,
    pub risk_free_rate: String,
    pub volatility: String,
    pub option_price: String,
    pub option_type: OptionType,
    pub calc_type: CalcType,
}

impl OptionInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::StockPrice => &self.stock_price,
            Field::StrikePrice => &self.strike_price,
            Field::TimeToMaturity => &self.time_to_maturity,
            Field::RiskFreeRate => &self.risk_free_rate,
            Field::Volatility => &self.volatility,
            Field::OptionPrice => &self.option_price,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::StockPrice => &mut self.stock_price,
            Field::StrikePrice => &mut self.strike_price,
            Field::TimeToMaturity => &mut self.time_to_maturity,
            Field::RiskFreeRate => &mut self.risk_free_rate,
            Field::Volatility => &mut self.volatility,
            Field::OptionPrice => &mut self.option_price,
        };
        *slot = value.into();
    }

    /// The mode-dependent field that must be filled in.
    #[inline]
    pub fn active_field(&self) -> Field {
        match self.calc_type {
            CalcType::OptionPrice => Field::Volatility,
            CalcType::ImpliedVolatility => Field::OptionPrice,
        }
    }

    /// The mode-dependent field that is ignored (may be stale or empty).
    #[inline]
    pub fn inactive_field(&self) -> Field {
        match self.calc_type {
            CalcType::OptionPrice => Field::OptionPrice,
            CalcType::ImpliedVolatility => Field::Volatility,
        }
    }
}
