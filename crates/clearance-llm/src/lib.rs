//! Multimodal LLM backend abstraction.
//!
//! All providers implement the [`LlmBackend`] trait, so the classifier (C3),
//! extractor (C4), and batch validator (C7) can invoke a model without
//! knowing which provider backs it. The only concrete backend shipped here
//! talks to Anthropic's Messages API; other providers plug in behind the
//! same trait.

mod anthropic_backend;
pub(crate) mod http_client;
mod redaction;
mod types;

pub use anthropic_backend::AnthropicBackend;
pub use redaction::redact_error_message;
pub use types::{LlmBackend, LlmError, LlmInvocation, LlmResult, PdfAttachment};
