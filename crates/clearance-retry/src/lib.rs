//! Bounded concurrency and retry primitives (C9).
//!
//! Two independent building blocks: a counting [`BoundedSemaphore`] for
//! capping in-flight work, and a [`retry`] envelope keyed on an explicit
//! error-kind taxonomy rather than broad exception classes (§9 design note:
//! "Express as a higher-order wrapper keyed on an explicit error-kind enum;
//! do not catch broad exception classes").

mod backoff;
mod semaphore;

pub use backoff::{RetryKind, RetryPolicy, Retryable, retry};
pub use semaphore::BoundedSemaphore;
