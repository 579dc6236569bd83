//! Anthropic Messages API backend with PDF document attachments.
//!
//! This is the one concrete, multimodal backend shipped with the engine;
//! something must sit behind [`crate::LlmBackend`] for the classifier,
//! extractor, and validator to call.

use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmError, LlmInvocation, LlmResult, PdfAttachment};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Anthropic HTTP backend configuration.
pub struct AnthropicBackend {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicBackend {
    /// Construct a backend from an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] if the HTTP client cannot be
    /// built.
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Construct a backend reading the API key from `LLM_API_KEY` (§6).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Misconfiguration`] if the environment variable is
    /// unset or the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("LLM_API_KEY").map_err(|_| {
            LlmError::Misconfiguration(
                "LLM_API_KEY is not set; required to call the multimodal provider".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_content_blocks(prompt: &str, attachments: &[PdfAttachment]) -> Vec<ContentBlock> {
        let mut blocks = Vec::with_capacity(attachments.len() * 2 + 1);
        for attachment in attachments {
            blocks.push(ContentBlock::Text {
                text: format!("{}:", attachment.label),
            });
            blocks.push(ContentBlock::Document {
                source: DocumentSource {
                    source_type: "base64",
                    media_type: "application/pdf",
                    data: BASE64.encode(&attachment.bytes),
                },
            });
        }
        blocks.push(ContentBlock::Text {
            text: prompt.to_string(),
        });
        blocks
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        debug!(
            provider = "anthropic",
            model = %inv.model,
            attachments = inv.attachments.len(),
            timeout_secs = inv.timeout.as_secs(),
            "invoking anthropic backend"
        );

        let content = Self::build_content_blocks(&inv.prompt, &inv.attachments);
        let request_body = AnthropicRequest {
            model: inv.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: inv.system_prompt.clone(),
            messages: vec![AnthropicMessage {
                role: "user",
                content,
            }],
        };

        let request = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body);

        let response = self
            .client
            .execute_with_retry(request, inv.timeout, "anthropic")
            .await?;

        let response_body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse anthropic response: {e}")))?;

        let text: String = response_body
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(LlmError::Transport(
                "anthropic response contained no text content".to_string(),
            ));
        }

        let mut result = LlmResult::new(text, "anthropic", inv.model);
        if let Some(usage) = response_body.usage {
            result = result.with_tokens(usage.input_tokens, usage.output_tokens);
        }
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Document { source: DocumentSource },
}

#[derive(Debug, Clone, Serialize)]
struct DocumentSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'static str,
    data: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    content: Vec<ResponseContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseContentBlock {
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
