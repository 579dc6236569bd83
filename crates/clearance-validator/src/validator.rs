//! Batch Validator (C7): two concurrent, checklist-driven LLM invocations
//! producing header and valuation verdicts (§4.7).

use crate::error::{CheckInvocationError, ValidatorError};
use crate::prompt::{attachment_label, build_system_prompt};
use crate::types::{BatchValidationResult, Verdict};
use clearance_checklist::{Check, Checklist};
use clearance_llm::{LlmBackend, LlmInvocation, PdfAttachment};
use clearance_retry::{BoundedSemaphore, RetryPolicy, retry};
use clearance_utils::DocumentType;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ValidationsResponse {
    validations: Vec<Verdict>,
}

async fn invoke_category(
    backend: &dyn LlmBackend,
    policy: &RetryPolicy,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    category_label: &str,
    checks: &[Check],
    pdf_documents: &HashMap<DocumentType, Vec<u8>>,
) -> Result<Vec<Verdict>, CheckInvocationError> {
    if checks.is_empty() {
        return Ok(Vec::new());
    }

    let system_prompt = build_system_prompt(category_label, checks);
    let mut attachments = pdf_documents
        .iter()
        .map(|(document_type, bytes)| PdfAttachment::new(attachment_label(document_type.as_str()), bytes.clone()))
        .collect::<Vec<_>>();
    attachments.sort_by(|a, b| a.label.cmp(&b.label));

    retry(policy, || async {
        let _permit = limiter.acquire().await;
        let invocation = LlmInvocation::new(model, timeout, format!("Perform the {category_label} checks."))
            .with_system(system_prompt.clone())
            .with_attachments(attachments.clone());
        let result = backend.invoke(invocation).await?;

        let parsed: ValidationsResponse = serde_json::from_str(&result.raw_response)
            .map_err(|source| CheckInvocationError::Llm(clearance_llm::LlmError::SchemaMismatch(source.to_string())))?;

        if parsed.validations.len() != checks.len() {
            return Err(CheckInvocationError::LengthMismatch {
                expected: checks.len(),
                got: parsed.validations.len(),
            });
        }

        Ok(parsed.validations)
    })
    .await
}

/// Validate one job's documents against `checklist`, dispatching the
/// header and valuation invocations concurrently (§4.7: "Total wall-clock
/// time is the maximum of the two, not the sum").
///
/// `pdf_documents` must contain `entry_print` and `commercial_invoice`;
/// other types are included when present and attached alongside.
///
/// # Errors
///
/// Returns [`ValidatorError::MissingDocument`] if a required document is
/// absent, or [`ValidatorError::Header`]/[`ValidatorError::Valuation`] if
/// the corresponding invocation fails after exhausting retries.
pub async fn validate_batch(
    backend: &dyn LlmBackend,
    policy: &RetryPolicy,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    checklist: &Checklist,
    pdf_documents: &HashMap<DocumentType, Vec<u8>>,
) -> Result<BatchValidationResult, ValidatorError> {
    for required in [DocumentType::EntryPrint, DocumentType::CommercialInvoice] {
        if !pdf_documents.contains_key(&required) {
            return Err(ValidatorError::MissingDocument(required));
        }
    }

    let (header_result, valuation_result) = tokio::join!(
        invoke_category(
            backend,
            policy,
            model,
            timeout,
            limiter,
            "header",
            &checklist.categories.header,
            pdf_documents,
        ),
        invoke_category(
            backend,
            policy,
            model,
            timeout,
            limiter,
            "valuation",
            &checklist.categories.valuation,
            pdf_documents,
        ),
    );

    let header = header_result.map_err(ValidatorError::Header)?;
    let valuation = valuation_result.map_err(ValidatorError::Valuation)?;

    Ok(BatchValidationResult::new(header, valuation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clearance_checklist::{Categories, CompareFields, FieldRef, Region};
    use clearance_llm::{LlmError, LlmResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn check(id: &str) -> Check {
        Check {
            id: id.to_string(),
            auditing_criteria: "criteria".to_string(),
            description: "description".to_string(),
            checking_logic: "logic".to_string(),
            pass_conditions: "conditions".to_string(),
            compare_fields: CompareFields {
                source_doc: "entry_print".to_string(),
                source_field: FieldRef::Single("a".to_string()),
                target_doc: "commercial_invoice".to_string(),
                target_field: FieldRef::Single("b".to_string()),
            },
        }
    }

    fn checklist(header: Vec<Check>, valuation: Vec<Check>) -> Checklist {
        Checklist {
            version: "1".to_string(),
            region: Region::AU,
            categories: Categories { header, valuation },
            numeric_tolerance_pct: None,
        }
    }

    fn verdict_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "check_id": id,
            "auditing_criteria": "criteria",
            "status": "PASS",
            "assessment": "matches",
            "source_document": "entry_print",
            "target_document": "commercial_invoice",
            "source_value": "X",
            "target_value": "X",
        })
    }

    struct FixedResponseBackend {
        header_response: String,
        valuation_response: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmBackend for FixedResponseBackend {
        async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = if inv.prompt.contains("header") {
                &self.header_response
            } else {
                &self.valuation_response
            };
            Ok(LlmResult::new(body.clone(), "test", "test-model"))
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1), false)
    }

    #[tokio::test]
    async fn validates_both_categories_and_computes_summary() {
        let checklist = checklist(vec![check("H1")], vec![check("V1"), check("V2")]);
        let backend = FixedResponseBackend {
            header_response: serde_json::json!({"validations": [verdict_json("H1")]}).to_string(),
            valuation_response: serde_json::json!({"validations": [verdict_json("V1"), verdict_json("V2")]}).to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);
        let mut documents = HashMap::new();
        documents.insert(DocumentType::EntryPrint, vec![0u8]);
        documents.insert(DocumentType::CommercialInvoice, vec![0u8]);

        let result = validate_batch(&backend, &policy(), "model", Duration::from_secs(1), &limiter, &checklist, &documents)
            .await
            .unwrap();

        assert_eq!(result.header.len(), 1);
        assert_eq!(result.valuation.len(), 2);
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.passed, 3);
    }

    #[tokio::test]
    async fn empty_valuation_category_short_circuits_without_calling_model() {
        let checklist = checklist(vec![check("H1")], vec![]);
        let backend = FixedResponseBackend {
            header_response: serde_json::json!({"validations": [verdict_json("H1")]}).to_string(),
            valuation_response: "unused".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);
        let mut documents = HashMap::new();
        documents.insert(DocumentType::EntryPrint, vec![0u8]);
        documents.insert(DocumentType::CommercialInvoice, vec![0u8]);

        let result = validate_batch(&backend, &policy(), "model", Duration::from_secs(1), &limiter, &checklist, &documents)
            .await
            .unwrap();

        assert!(result.valuation.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_required_document_is_rejected_before_any_call() {
        let checklist = checklist(vec![check("H1")], vec![]);
        let backend = FixedResponseBackend {
            header_response: "unused".to_string(),
            valuation_response: "unused".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);
        let documents = HashMap::new();

        let err = validate_batch(&backend, &policy(), "model", Duration::from_secs(1), &limiter, &checklist, &documents)
            .await
            .unwrap_err();

        assert!(matches!(err, ValidatorError::MissingDocument(DocumentType::EntryPrint)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn length_mismatch_surfaces_as_header_error() {
        let checklist = checklist(vec![check("H1"), check("H2")], vec![]);
        let backend = FixedResponseBackend {
            header_response: serde_json::json!({"validations": [verdict_json("H1")]}).to_string(),
            valuation_response: "unused".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let limiter = BoundedSemaphore::new(4);
        let mut documents = HashMap::new();
        documents.insert(DocumentType::EntryPrint, vec![0u8]);
        documents.insert(DocumentType::CommercialInvoice, vec![0u8]);

        let err = validate_batch(&backend, &policy(), "model", Duration::from_secs(1), &limiter, &checklist, &documents)
            .await
            .unwrap_err();

        assert!(matches!(err, ValidatorError::Header(CheckInvocationError::LengthMismatch { expected: 2, got: 1 })));
    }
}
