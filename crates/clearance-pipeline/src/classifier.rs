//! Classifier (C3): a single multimodal LLM call that labels a PDF with
//! one of the five document types (§4.3).

use clearance_llm::{LlmBackend, LlmError, LlmInvocation, LlmResult, PdfAttachment};
use clearance_retry::{BoundedSemaphore, RetryPolicy, retry};
use clearance_utils::DocumentType;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a customs document classifier. Given a single PDF, respond with a \
JSON object containing exactly one field, \"document_type\", whose value is one of: \
\"entry_print\", \"air_waybill\", \"commercial_invoice\", \"packing_list\", \"other\". \
Respond with JSON only.";

#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    document_type: String,
}

fn parse_document_type(raw_response: &str) -> Result<DocumentType, LlmError> {
    let parsed: ClassificationResponse =
        serde_json::from_str(raw_response).map_err(|source| LlmError::SchemaMismatch(source.to_string()))?;

    match parsed.document_type.as_str() {
        "entry_print" => Ok(DocumentType::EntryPrint),
        "air_waybill" => Ok(DocumentType::AirWaybill),
        "commercial_invoice" => Ok(DocumentType::CommercialInvoice),
        "packing_list" => Ok(DocumentType::PackingList),
        "other" => Ok(DocumentType::Other),
        other => Err(LlmError::SchemaMismatch(format!("unrecognized document_type '{other}'"))),
    }
}

async fn invoke_classifier(
    backend: &dyn LlmBackend,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    pdf_bytes: &[u8],
    filename: &str,
) -> Result<LlmResult, LlmError> {
    let _permit = limiter.acquire().await;
    let invocation = LlmInvocation::new(model, timeout, "Classify the attached PDF.".to_string())
        .with_system(SYSTEM_PROMPT)
        .with_attachment(PdfAttachment::new(filename, pdf_bytes.to_vec()));
    backend.invoke(invocation).await
}

/// Classify a single PDF. Never fails: after the retry policy is
/// exhausted, classification resolves to [`DocumentType::Other`] and the
/// caller's run continues (§4.3: "classification failure is recoverable
/// at the cost of skipping extraction for that file; it must not abort
/// the job").
pub async fn classify(
    backend: &dyn LlmBackend,
    policy: &RetryPolicy,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    pdf_bytes: &[u8],
    filename: &str,
) -> DocumentType {
    let outcome = retry(policy, || async {
        let result = invoke_classifier(backend, model, timeout, limiter, pdf_bytes, filename).await?;
        parse_document_type(&result.raw_response)
    })
    .await;

    match outcome {
        Ok(document_type) => document_type,
        Err(error) => {
            warn!(filename, %error, "classification exhausted retries, defaulting to other");
            DocumentType::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedBackend {
        responses: Vec<Result<String, LlmError>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn invoke(&self, _inv: LlmInvocation) -> Result<LlmResult, LlmError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.responses[idx] {
                Ok(raw) => Ok(LlmResult::new(raw.clone(), "test", "test-model")),
                Err(err) => Err(clone_llm_error(err)),
            }
        }
    }

    fn clone_llm_error(err: &LlmError) -> LlmError {
        match err {
            LlmError::Transport(msg) => LlmError::Transport(msg.clone()),
            LlmError::ProviderOutage(msg) => LlmError::ProviderOutage(msg.clone()),
            other => LlmError::SchemaMismatch(other.to_string()),
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1), false)
    }

    #[tokio::test]
    async fn classifies_on_first_successful_response() {
        let backend = ScriptedBackend {
            responses: vec![Ok(r#"{"document_type": "entry_print"}"#.to_string())],
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);

        let result = classify(
            &backend,
            &policy(),
            "test-model",
            Duration::from_secs(1),
            &limiter,
            b"%PDF-fake",
            "123_entry.pdf",
        )
        .await;

        assert_eq!(result, DocumentType::EntryPrint);
    }

    #[tokio::test]
    async fn falls_back_to_other_after_exhausting_retries() {
        let backend = ScriptedBackend {
            responses: vec![
                Err(LlmError::ProviderOutage("down".to_string())),
                Err(LlmError::ProviderOutage("still down".to_string())),
            ],
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);

        let result = classify(
            &backend,
            &policy(),
            "test-model",
            Duration::from_secs(1),
            &limiter,
            b"%PDF-fake",
            "unknown.pdf",
        )
        .await;

        assert_eq!(result, DocumentType::Other);
    }

    #[tokio::test]
    async fn falls_back_to_other_on_unrecognized_label() {
        let backend = ScriptedBackend {
            responses: vec![
                Ok(r#"{"document_type": "spreadsheet"}"#.to_string()),
                Ok(r#"{"document_type": "spreadsheet"}"#.to_string()),
            ],
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);

        let result = classify(
            &backend,
            &policy(),
            "test-model",
            Duration::from_secs(1),
            &limiter,
            b"%PDF-fake",
            "weird.pdf",
        )
        .await;

        assert_eq!(result, DocumentType::Other);
    }
}
