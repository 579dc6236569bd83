//! Engine-level error taxonomy (§7: run-granularity failures abort the
//! run with a typed error; job-granularity failures are isolated).

use clearance_checklist::ChecklistError;
use clearance_runalloc::AllocationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("run allocation failed: {0}")]
    AllocationExhausted(#[from] AllocationError),

    #[error("checklist unavailable: {0}")]
    Checklist(#[from] ChecklistError),
}
