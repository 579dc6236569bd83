//! Batch Validator (C7): checklist-driven, concurrent LLM validation plus
//! the optional tariff line-item extension (§4.7).

mod error;
mod prompt;
mod tariff;
mod types;
mod validator;

pub use error::{CheckInvocationError, ValidatorError};
pub use tariff::{TariffAgent, TariffLineContext, TariffSuggestion, compute_tariff_line_checks, derive_primary_status};
pub use types::{BatchValidationResult, LineVerdict, Summary, Verdict, VerdictStatus, worst_status};
pub use validator::validate_batch;
