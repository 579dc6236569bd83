//! Extractor (C4): produces a typed, schema-validated record for the two
//! extractable document types, or `null` for everything else (§4.4).

use crate::schemas::{CommercialInvoiceRecord, EntryPrintRecord};
use clearance_llm::{LlmBackend, LlmError, LlmInvocation, PdfAttachment};
use clearance_retry::{BoundedSemaphore, RetryPolicy, retry};
use clearance_utils::DocumentType;
use std::time::Duration;
use tracing::warn;

const ENTRY_PRINT_SYSTEM_PROMPT: &str = "You are a customs Entry Print data extractor. Given the attached PDF, \
return a single JSON object matching the Entry Print schema: header-level fields (entry number, parties, \
valuation totals, weights, duty and GST totals) plus a `line_items` array, each with a tariff classification \
code, statistical code, description, quantity, and value. Respond with JSON only, no commentary.";

const COMMERCIAL_INVOICE_SYSTEM_PROMPT: &str = "You are a commercial invoice data extractor. Given the attached \
PDF, return a single JSON object matching the Commercial Invoice schema: header-level fields (invoice number, \
seller, buyer, incoterm, currency, totals) plus a `line_items` array, each with a description, quantity, unit \
price, line total, and country of origin. Respond with JSON only, no commentary.";

async fn invoke_extractor(
    backend: &dyn LlmBackend,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    system_prompt: &str,
    pdf_bytes: &[u8],
    label: &str,
) -> Result<String, LlmError> {
    let _permit = limiter.acquire().await;
    let invocation = LlmInvocation::new(model, timeout, "Extract the structured record for the attached PDF.".to_string())
        .with_system(system_prompt)
        .with_attachment(PdfAttachment::new(label, pdf_bytes.to_vec()));
    let result = backend.invoke(invocation).await?;
    Ok(result.raw_response)
}

/// Extract a typed record from `pdf_bytes` if `document_type` is
/// extractable, returning its JSON representation. Non-extractable types
/// return `None` without calling the model (§4.4: "Extraction is performed
/// only for `entry_print` and `commercial_invoice`"). Exhausted retries
/// also resolve to `None` — the file remains persisted, just unextracted
/// (§7: "`ProviderFault`... For C4 this resolves to a null record").
pub async fn extract(
    backend: &dyn LlmBackend,
    policy: &RetryPolicy,
    model: &str,
    timeout: Duration,
    limiter: &BoundedSemaphore,
    pdf_bytes: &[u8],
    document_type: DocumentType,
    label: &str,
) -> Option<serde_json::Value> {
    let system_prompt = match document_type {
        DocumentType::EntryPrint => ENTRY_PRINT_SYSTEM_PROMPT,
        DocumentType::CommercialInvoice => COMMERCIAL_INVOICE_SYSTEM_PROMPT,
        DocumentType::AirWaybill | DocumentType::PackingList | DocumentType::Other => return None,
    };

    let outcome = retry(policy, || async {
        let raw = invoke_extractor(backend, model, timeout, limiter, system_prompt, pdf_bytes, label).await?;
        validate_schema(document_type, &raw)
    })
    .await;

    match outcome {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(%document_type, %error, "extraction exhausted retries, record is null");
            None
        }
    }
}

fn validate_schema(document_type: DocumentType, raw: &str) -> Result<serde_json::Value, LlmError> {
    match document_type {
        DocumentType::EntryPrint => {
            let record: EntryPrintRecord =
                serde_json::from_str(raw).map_err(|source| LlmError::SchemaMismatch(source.to_string()))?;
            Ok(serde_json::to_value(record).expect("EntryPrintRecord always serializes"))
        }
        DocumentType::CommercialInvoice => {
            let record: CommercialInvoiceRecord =
                serde_json::from_str(raw).map_err(|source| LlmError::SchemaMismatch(source.to_string()))?;
            Ok(serde_json::to_value(record).expect("CommercialInvoiceRecord always serializes"))
        }
        DocumentType::AirWaybill | DocumentType::PackingList | DocumentType::Other => {
            unreachable!("extract() returns early for non-extractable types")
        }
    }
}
