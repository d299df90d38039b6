use crate::errors::PricerResult;
use crate::form::{validate_calculation, CalcType, Calculation, ErrorSet, FormState, SubmitPhase};
use crate::pricing::{PricingRequest, PricingResult, PricingService};

/// How one submit attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed locally; nothing was sent.
    Invalid(ErrorSet),
    Priced(PricingResult),
    /// Service rejection or transport failure, with the message now in `apiError`.
    Failed(String),
    /// A newer submit started before this one settled; state left untouched.
    Stale,
}

/// A validated submit whose request is ready to go out.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    sequence: u64,
    request: PricingRequest,
    calculation: Calculation,
}

impl PendingSubmission {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &PricingRequest {
        &self.request
    }

    pub fn calculation(&self) -> &Calculation {
        &self.calculation
    }
}

/// Start a submit: clear the previous errors, validate, and either record the
/// new error set (no request) or hand back the request to send.
///
/// Every call takes a fresh sequence number, so anything still in flight
/// from an earlier call will settle as stale.
pub fn begin(state: &mut FormState) -> Result<PendingSubmission, ErrorSet> {
    state.latest_submission = state.latest_submission.wrapping_add(1);
    let sequence = state.latest_submission;

    state.phase = SubmitPhase::Validating;
    state.errors = ErrorSet::new();

    match validate_calculation(&state.input) {
        Err(errors) => {
            tracing::debug!(sequence, invalid_fields = errors.len(), "submit rejected by validation");
            state.errors = errors.clone();
            state.phase = SubmitPhase::Failed;
            Err(errors)
        }
        Ok(calculation) => {
            state.phase = SubmitPhase::AwaitingResponse;
            Ok(PendingSubmission {
                sequence,
                request: PricingRequest::from(&state.input),
                calculation,
            })
        }
    }
}

/// Apply a settled response. Result and error set are replaced together:
/// success clears errors, any failure clears the result.
pub fn settle(
    state: &mut FormState,
    pending: PendingSubmission,
    response: PricerResult<PricingResult>,
) -> SubmitOutcome {
    if pending.sequence != state.latest_submission {
        tracing::debug!(
            sequence = pending.sequence,
            latest = state.latest_submission,
            "discarding stale pricing response"
        );
        return SubmitOutcome::Stale;
    }

    state.settled_at = Some(chrono::Utc::now());

    match response {
        Ok(mut result) => {
            if pending.calculation.calc_type() == CalcType::OptionPrice {
                result.implied_volatility = None;
            }
            tracing::info!(
                sequence = pending.sequence,
                calc_type = %pending.calculation.calc_type(),
                spot = pending.calculation.contract().spot,
                option_price = result.option_price,
                "pricing result received"
            );
            state.result = Some(result);
            state.errors = ErrorSet::new();
            state.phase = SubmitPhase::Resulted;
            SubmitOutcome::Priced(result)
        }
        Err(e) => {
            tracing::warn!(sequence = pending.sequence, error = %e, "pricing request failed");
            let message = e.user_message();
            state.errors = ErrorSet::api(message.clone());
            state.result = None;
            state.phase = SubmitPhase::Failed;
            SubmitOutcome::Failed(message)
        }
    }
}

/// One full submit: validate, call the service at most once, apply the outcome.
pub async fn submit<S: PricingService>(state: &mut FormState, service: &S) -> SubmitOutcome {
    let pending = match begin(state) {
        Ok(p) => p,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    let response = service.calculate(pending.request()).await;
    settle(state, pending, response)
}
