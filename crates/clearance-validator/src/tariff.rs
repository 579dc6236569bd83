//! Tariff line-item check (§4.7 "optional extension"): matches Entry
//! Print and Commercial Invoice line items by line number and consults an
//! external tariff-classification agent for a suggested HS/statistical
//! code pair.

use crate::types::{LineVerdict, VerdictStatus, worst_status};
use async_trait::async_trait;
use clearance_pipeline::schemas::{CommercialInvoiceLineItem, EntryPrintLineItem};
use clearance_llm::LlmError;

/// The matched pair of line items and the extracted codes a suggestion is
/// judged against.
#[derive(Debug, Clone)]
pub struct TariffLineContext {
    pub line_number: u32,
    pub description: String,
    pub country_of_origin: String,
    pub extracted_tariff_code: String,
    pub extracted_stat_code: String,
}

/// A suggested classification plus the independent sub-checks that feed
/// into `overall_status` (§4.7: "Concession, quantity, and GST sub-checks
/// are independent").
#[derive(Debug, Clone)]
pub struct TariffSuggestion {
    pub suggested_tariff_code: String,
    pub suggested_stat_code: String,
    pub other_suggested_codes: Vec<String>,
    pub concession_status: VerdictStatus,
    pub quantity_status: VerdictStatus,
    pub gst_exemption_status: VerdictStatus,
}

/// An external tariff-classification agent. Implementations may call an
/// LLM, a rules engine, or a lookup service; the validator only depends on
/// this contract (§4.7: "calls an external tariff-classification agent to
/// obtain a suggested HS code and statistical code").
#[async_trait]
pub trait TariffAgent: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LlmError`] if the agent cannot produce a suggestion.
    async fn suggest(&self, context: &TariffLineContext) -> Result<TariffSuggestion, LlmError>;
}

/// Status derivation for the primary HS/statistical code comparison
/// (§4.7: "exact match of HS+stat → PASS; first-six-digit match of HS →
/// QUESTIONABLE; otherwise FAIL").
#[must_use]
pub fn derive_primary_status(context: &TariffLineContext, suggestion: &TariffSuggestion) -> VerdictStatus {
    if context.extracted_tariff_code == suggestion.suggested_tariff_code
        && context.extracted_stat_code == suggestion.suggested_stat_code
    {
        return VerdictStatus::Pass;
    }

    let extracted_prefix = first_six_digits(&context.extracted_tariff_code);
    let suggested_prefix = first_six_digits(&suggestion.suggested_tariff_code);
    if !extracted_prefix.is_empty() && extracted_prefix == suggested_prefix {
        return VerdictStatus::Questionable;
    }

    VerdictStatus::Fail
}

fn first_six_digits(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).take(6).collect()
}

fn pair_line_items<'a>(
    entry_items: &'a [EntryPrintLineItem],
    invoice_items: &'a [CommercialInvoiceLineItem],
) -> Vec<(&'a EntryPrintLineItem, &'a CommercialInvoiceLineItem)> {
    let mut pairs = Vec::new();
    for entry_item in entry_items {
        if let Some(invoice_item) = invoice_items.iter().find(|item| item.line_number == entry_item.line_number) {
            pairs.push((entry_item, invoice_item));
        }
    }
    pairs
}

/// Compute a [`LineVerdict`] for every matched line-number pair across the
/// Entry Print and Commercial Invoice extraction records.
///
/// # Errors
///
/// Returns the first [`LlmError`] raised by `agent`; the caller decides
/// whether to retry (§4.7: "Retries follow C9").
pub async fn compute_tariff_line_checks(
    entry_items: &[EntryPrintLineItem],
    invoice_items: &[CommercialInvoiceLineItem],
    agent: &dyn TariffAgent,
) -> Result<Vec<LineVerdict>, LlmError> {
    let mut verdicts = Vec::new();

    for (entry_item, invoice_item) in pair_line_items(entry_items, invoice_items) {
        let context = TariffLineContext {
            line_number: entry_item.line_number,
            description: invoice_item.description.clone(),
            country_of_origin: invoice_item.country_of_origin.clone(),
            extracted_tariff_code: entry_item.tariff_classification_code.clone(),
            extracted_stat_code: entry_item.statistical_code.clone(),
        };

        let suggestion = agent.suggest(&context).await?;
        let primary_status = derive_primary_status(&context, &suggestion);
        let overall_status = worst_status(&[
            primary_status,
            suggestion.concession_status,
            suggestion.quantity_status,
            suggestion.gst_exemption_status,
        ]);

        verdicts.push(LineVerdict {
            line_number: context.line_number,
            description: context.description,
            extracted_tariff_code: context.extracted_tariff_code,
            extracted_stat_code: context.extracted_stat_code,
            suggested_tariff_code: suggestion.suggested_tariff_code,
            suggested_stat_code: suggestion.suggested_stat_code,
            status: primary_status,
            assessment: format!("{primary_status:?} on HS/statistical code comparison"),
            other_suggested_codes: suggestion.other_suggested_codes,
            concession_status: suggestion.concession_status,
            quantity_status: suggestion.quantity_status,
            gst_exemption_status: suggestion.gst_exemption_status,
            overall_status,
        });
    }

    Ok(verdicts)
}
