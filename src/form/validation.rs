use super::input::{CalcType, Field, OptionInput, OptionType};
use std::collections::BTreeMap;

// ── Error set ──

/// Key of an error entry: a form field, or the form-level `apiError` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Field(Field),
    Api,
}

impl ErrorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field(f) => f.as_str(),
            Self::Api => "apiError",
        }
    }
}

impl From<Field> for ErrorKey {
    fn from(f: Field) -> Self {
        Self::Field(f)
    }
}

/// Field name → message. Always replaced wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    entries: BTreeMap<ErrorKey, String>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the form-level service/transport message.
    pub fn api(message: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(ErrorKey::Api, message);
        set
    }

    pub fn insert(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&str> {
        self.entries.get(&key.into()).map(String::as_str)
    }

    pub fn contains(&self, key: impl Into<ErrorKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

// ── Typed calculation ──

/// Parameters shared by both calculation modes, parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contract {
    pub spot: f64,
    pub strike: f64,
    pub maturity_years: f64,
    pub rate: f64,
    pub option_type: OptionType,
}

/// A validated form. The variant fixes which of volatility / option price is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calculation {
    OptionPrice { contract: Contract, volatility: f64 },
    ImpliedVolatility { contract: Contract, option_price: f64 },
}

impl Calculation {
    pub fn contract(&self) -> &Contract {
        match self {
            Self::OptionPrice { contract, .. } | Self::ImpliedVolatility { contract, .. } => contract,
        }
    }

    pub fn calc_type(&self) -> CalcType {
        match self {
            Self::OptionPrice { .. } => CalcType::OptionPrice,
            Self::ImpliedVolatility { .. } => CalcType::ImpliedVolatility,
        }
    }
}

// ── Rules ──

#[derive(Debug, Clone, Copy, PartialEq)]
enum Parsed {
    Blank,
    Invalid,
    Number(f64),
}

/// Trimmed text → finite f64. NaN and infinities count as not a number.
fn parse_number(raw: &str) -> Parsed {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Parsed::Blank;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::Number(v),
        _ => Parsed::Invalid,
    }
}

fn positive(input: &OptionInput, field: Field, errors: &mut ErrorSet) -> Option<f64> {
    match parse_number(input.get(field)) {
        Parsed::Number(v) if v > 0.0 => Some(v),
        _ => {
            errors.insert(field, format!("{} must be a positive number.", field.label()));
            None
        }
    }
}

fn any_number(input: &OptionInput, field: Field, errors: &mut ErrorSet) -> Option<f64> {
    match parse_number(input.get(field)) {
        Parsed::Number(v) => Some(v),
        Parsed::Blank => {
            errors.insert(field, format!("{} is required.", field.label()));
            None
        }
        Parsed::Invalid => {
            errors.insert(field, format!("{} must be a number.", field.label()));
            None
        }
    }
}

/// Check every rule relevant to the current mode and return the typed
/// calculation, or every violation found. Never short-circuits.
pub fn validate_calculation(input: &OptionInput) -> Result<Calculation, ErrorSet> {
    let mut errors = ErrorSet::new();

    let spot = positive(input, Field::StockPrice, &mut errors);
    let strike = positive(input, Field::StrikePrice, &mut errors);
    let maturity = positive(input, Field::TimeToMaturity, &mut errors);
    let rate = any_number(input, Field::RiskFreeRate, &mut errors);
    let mode_value = positive(input, input.active_field(), &mut errors);

    match (spot, strike, maturity, rate, mode_value) {
        (Some(spot), Some(strike), Some(maturity_years), Some(rate), Some(value)) => {
            let contract = Contract {
                spot,
                strike,
                maturity_years,
                rate,
                option_type: input.option_type,
            };
            Ok(match input.calc_type {
                CalcType::OptionPrice => Calculation::OptionPrice { contract, volatility: value },
                CalcType::ImpliedVolatility => {
                    Calculation::ImpliedVolatility { contract, option_price: value }
                }
            })
        }
        _ => Err(errors),
    }
}

/// Pure validation pass. Empty result ⇔ the form may be submitted.
pub fn validate(input: &OptionInput) -> ErrorSet {
    validate_calculation(input).err().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_input() -> OptionInput {
        OptionInput {
            stock_price: "100".into(),
            strike_price: "100".into(),
            time_to_maturity: "1".into(),
            risk_free_rate: "0.05".into(),
            volatility: "0.2".into(),
            ..OptionInput::default()
        }
    }

    #[test]
    fn test_valid_price_mode_input_has_no_errors() {
        let errors = validate(&scenario_input());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_blank_volatility_in_price_mode() {
        let mut input = scenario_input();
        input.volatility = String::new();
        let errors = validate(&input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Volatility), Some("Volatility must be a positive number."));
    }

    #[test]
    fn test_price_mode_ignores_option_price() {
        for vol in ["", "0", "-0.3", "abc"] {
            let mut input = scenario_input();
            input.volatility = vol.into();
            input.option_price = "garbage".into();
            let errors = validate(&input);
            assert!(errors.contains(Field::Volatility), "vol={vol}");
            assert!(!errors.contains(Field::OptionPrice), "vol={vol}");
        }
    }

    #[test]
    fn test_iv_mode_ignores_volatility() {
        for price in ["", "0", "-1"] {
            let mut input = scenario_input();
            input.calc_type = CalcType::ImpliedVolatility;
            input.option_price = price.into();
            input.volatility = "-5".into();
            let errors = validate(&input);
            assert_eq!(
                errors.get(Field::OptionPrice),
                Some("Option Price must be a positive number."),
                "price={price}"
            );
            assert!(!errors.contains(Field::Volatility), "price={price}");
        }
    }

    #[test]
    fn test_risk_free_rate_accepts_zero_and_negative() {
        for rate in ["0", "-0.01"] {
            let mut input = scenario_input();
            input.risk_free_rate = rate.into();
            assert!(!validate(&input).contains(Field::RiskFreeRate), "rate={rate}");
        }
    }

    #[test]
    fn test_risk_free_rate_blank_and_garbage() {
        let mut input = scenario_input();
        input.risk_free_rate = String::new();
        assert_eq!(validate(&input).get(Field::RiskFreeRate), Some("Risk-Free Rate is required."));

        input.risk_free_rate = "five percent".into();
        assert_eq!(validate(&input).get(Field::RiskFreeRate), Some("Risk-Free Rate must be a number."));
    }

    #[test]
    fn test_all_rules_checked_without_short_circuit() {
        let input = OptionInput::default();
        let errors = validate(&input);
        let keys: Vec<&str> = errors.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["stockPrice", "strikePrice", "timeToMaturity", "riskFreeRate", "volatility"]
        );
    }

    #[test]
    fn test_non_positive_and_non_finite_rejected() {
        let mut input = scenario_input();
        input.stock_price = "0".into();
        input.strike_price = "-100".into();
        input.time_to_maturity = "NaN".into();
        let errors = validate(&input);
        assert_eq!(errors.get(Field::StockPrice), Some("Stock Price must be a positive number."));
        assert_eq!(errors.get(Field::StrikePrice), Some("Strike Price must be a positive number."));
        assert_eq!(
            errors.get(Field::TimeToMaturity),
            Some("Time to Maturity must be a positive number.")
        );

        input = scenario_input();
        input.risk_free_rate = "inf".into();
        assert!(validate(&input).contains(Field::RiskFreeRate));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut input = scenario_input();
        input.stock_price = "  101.5 ".into();
        assert!(validate(&input).is_empty());

        input.stock_price = "   ".into();
        assert!(validate(&input).contains(Field::StockPrice));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut input = scenario_input();
        input.strike_price = "x".into();
        input.volatility = String::new();
        assert_eq!(validate(&input), validate(&input));
        assert_eq!(validate(&scenario_input()), validate(&scenario_input()));
    }

    #[test]
    fn test_typed_calculation_variants() {
        let calc = validate_calculation(&scenario_input()).unwrap();
        assert_eq!(
            calc,
            Calculation::OptionPrice {
                contract: Contract {
                    spot: 100.0,
                    strike: 100.0,
                    maturity_years: 1.0,
                    rate: 0.05,
                    option_type: OptionType::Call,
                },
                volatility: 0.2,
            }
        );

        let mut input = scenario_input();
        input.calc_type = CalcType::ImpliedVolatility;
        input.option_type = OptionType::Put;
        input.option_price = "5.57".into();
        input.volatility = String::new();
        let calc = validate_calculation(&input).unwrap();
        assert_eq!(calc.calc_type(), CalcType::ImpliedVolatility);
        assert_eq!(calc.contract().option_type, OptionType::Put);
        assert!(matches!(calc, Calculation::ImpliedVolatility { option_price, .. } if option_price == 5.57));
    }

    #[test]
    fn test_api_error_set() {
        let set = ErrorSet::api("volatility too large");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(ErrorKey::Api), Some("volatility too large"));
        assert_eq!(ErrorKey::Api.as_str(), "apiError");
    }
}
