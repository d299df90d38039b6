use super::input::{CalcType, Field, OptionInput, OptionType};
use super::validation::ErrorSet;
use crate::pricing::PricingResult;
use chrono::{DateTime, Utc};

// ── Submit State Machine ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    AwaitingResponse,
    Resulted,
    Failed,
}

impl std::fmt::Display for SubmitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::AwaitingResponse => write!(f, "awaiting response"),
            Self::Resulted => write!(f, "resulted"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Everything one form session owns: the input, the last error set and the last
/// result. Owned by the top-level view and handed down by `&mut`.
///
/// `errors` and `result` are only ever replaced whole, and only by the
/// orchestrator; the view mutates `input` through the setters below.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub(crate) input: OptionInput,
    pub(crate) errors: ErrorSet,
    pub(crate) result: Option<PricingResult>,
    pub(crate) phase: SubmitPhase,
    /// Sequence number of the most recently started submission.
    pub(crate) latest_submission: u64,
    pub(crate) settled_at: Option<DateTime<Utc>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &OptionInput {
        &self.input
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn result(&self) -> Option<&PricingResult> {
        self.result.as_ref()
    }

    #[inline]
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value);
    }

    pub fn set_option_type(&mut self, option_type: OptionType) {
        self.input.option_type = option_type;
    }

    /// Switching mode keeps the now-inactive field's text; it is just no longer checked.
    pub fn set_calc_type(&mut self, calc_type: CalcType) {
        self.input.calc_type = calc_type;
    }

    /// Back to a fresh session. In-flight responses become stale.
    pub fn reset(&mut self) {
        let latest_submission = self.latest_submission.wrapping_add(1);
        *self = Self {
            latest_submission,
            ..Self::default()
        };
    }
}
