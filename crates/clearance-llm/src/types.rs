//! Core types for LLM backend abstraction.

use async_trait::async_trait;
use clearance_retry::{RetryKind, Retryable};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// A PDF attached to an invocation as a labeled multimodal input (§4.7
/// step 4: "Labels MUST identify the document type unambiguously").
#[derive(Debug, Clone)]
pub struct PdfAttachment {
    pub label: String,
    pub bytes: Vec<u8>,
}

impl PdfAttachment {
    #[must_use]
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

/// Input to an LLM backend invocation.
///
/// The classifier sends a short text prompt with one attachment; the
/// extractor sends a text prompt plus one attachment; the batch validator
/// sends a single prompt enumerating all checks in a category plus every
/// document relevant to that job.
#[derive(Debug, Clone)]
pub struct LlmInvocation {
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub attachments: Vec<PdfAttachment>,
    pub model: String,
    pub timeout: Duration,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl LlmInvocation {
    #[must_use]
    pub fn new(model: impl Into<String>, timeout: Duration, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            attachments: Vec::new(),
            model: model.into(),
            timeout,
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: PdfAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<PdfAttachment>) -> Self {
        self.attachments.extend(attachments);
        self
    }
}

/// Result from an LLM backend invocation.
#[derive(Debug, Clone)]
pub struct LlmResult {
    pub raw_response: String,
    pub provider: String,
    pub model_used: String,
    pub tokens_input: Option<u64>,
    pub tokens_output: Option<u64>,
}

impl LlmResult {
    #[must_use]
    pub fn new(raw_response: impl Into<String>, provider: impl Into<String>, model_used: impl Into<String>) -> Self {
        Self {
            raw_response: raw_response.into(),
            provider: provider.into(),
            model_used: model_used.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }

    #[must_use]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.tokens_input = Some(input);
        self.tokens_output = Some(output);
        self
    }
}

/// Error taxonomy for LLM invocations (§4.9, §7).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider authentication error: {0}")]
    ProviderAuth(String),

    #[error("provider quota exceeded: {0}")]
    ProviderQuota(String),

    #[error("provider outage: {0}")]
    ProviderOutage(String),

    #[error("timeout after {duration:?}")]
    Timeout { duration: Duration },

    #[error("misconfiguration: {0}")]
    Misconfiguration(String),

    /// The model's structured response failed schema validation — wrong
    /// number of verdicts, missing required field, etc. (§7 `SchemaFault`).
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl Retryable for LlmError {
    fn retry_kind(&self) -> RetryKind {
        match self {
            Self::Transport(_) => RetryKind::Transient,
            Self::ProviderQuota(_) | Self::ProviderOutage(_) | Self::SchemaMismatch(_) => {
                RetryKind::ProviderFault
            }
            Self::Timeout { .. } => RetryKind::Timeout,
            Self::ProviderAuth(_) | Self::Misconfiguration(_) => RetryKind::InvalidInput,
        }
    }
}

/// Trait for LLM backend implementations.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Invoke the LLM with the given invocation parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] for any failure during invocation: transport
    /// failures, provider errors, timeouts, or schema mismatches.
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError>;
}
