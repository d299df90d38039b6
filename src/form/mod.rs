pub mod input;
pub mod state;
pub mod validation;

pub use input::{CalcType, Field, OptionInput, OptionType};
pub use state::{FormState, SubmitPhase};
pub use validation::{validate, validate_calculation, Calculation, ErrorKey, ErrorSet};
