//! Batch validator error taxonomy (§7: `ProviderFault`, `SchemaFault`).

use clearance_llm::LlmError;
use clearance_retry::{RetryKind, Retryable};
use clearance_utils::DocumentType;
use thiserror::Error;

/// Error from a single category invocation (header or valuation),
/// wrapped by the retry envelope.
#[derive(Debug, Error)]
pub enum CheckInvocationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("expected {expected} verdicts, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

impl Retryable for CheckInvocationError {
    fn retry_kind(&self) -> RetryKind {
        match self {
            Self::Llm(inner) => inner.retry_kind(),
            // A returned array of the wrong length is a schema fault,
            // "treated like ProviderFault for propagation" (§7).
            Self::LengthMismatch { .. } => RetryKind::ProviderFault,
        }
    }
}

/// Top-level batch validation error (§4.7, §7).
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("missing required document: {0}")]
    MissingDocument(DocumentType),

    #[error("header validation failed: {0}")]
    Header(#[source] CheckInvocationError),

    #[error("valuation validation failed: {0}")]
    Valuation(#[source] CheckInvocationError),
}
