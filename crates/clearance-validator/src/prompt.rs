//! Prompt construction for the batch validator's two per-category LLM
//! invocations (§4.7 steps 2-6).

use clearance_checklist::Check;

const COMMON_INSTRUCTIONS: &str = "Null-versus-null comparisons are PASS. Company-name matches tolerate fuzzy \
variation (abbreviations, case, punctuation). Numeric comparisons tolerate standard rounding. QUESTIONABLE is \
reserved for genuine ambiguity. N/A is permitted only when the relevant field is absent from both documents. \
For every verdict with status other than N/A, source_value and target_value must cite the concrete text you \
read from the documents and must not be empty.";

/// Build the system prompt enumerating every check in a category, in
/// configured order (§4.7 steps 2-3).
#[must_use]
pub fn build_system_prompt(category_label: &str, checks: &[Check]) -> String {
    let mut prompt = format!(
        "You are a customs clearance auditor performing {category_label} checks. \
        You are given one or more customs documents as attachments and a list of checks below. \
        For each check, compare the named fields across the named source and target documents and decide a \
        status. {COMMON_INSTRUCTIONS}\n\n\
        Respond with a single JSON object: {{\"validations\": [...]}} containing exactly {count} entries, one \
        per check below, in the same order, each shaped as {{\"check_id\", \"auditing_criteria\", \"status\", \
        \"assessment\", \"source_document\", \"target_document\", \"source_value\", \"target_value\"}}.\n\nChecks:\n",
        count = checks.len()
    );

    for check in checks {
        prompt.push_str(&format!(
            "- id: {id}\n  auditing_criteria: {criteria}\n  description: {description}\n  \
            checking_logic: {logic}\n  pass_conditions: {pass_conditions}\n  \
            compare: {source_doc}.{source_field} vs {target_doc}.{target_field}\n",
            id = check.id,
            criteria = check.auditing_criteria,
            description = check.description,
            logic = check.checking_logic,
            pass_conditions = check.pass_conditions,
            source_doc = check.compare_fields.source_doc,
            source_field = check.compare_fields.source_field.display_list(),
            target_doc = check.compare_fields.target_doc,
            target_field = check.compare_fields.target_field.display_list(),
        ));
    }

    prompt
}

/// Label a document attachment unambiguously (§4.7 step 4: "Labels MUST
/// identify the document type unambiguously").
#[must_use]
pub fn attachment_label(document_type_str: &str) -> String {
    format!("{} DOCUMENT:", document_type_str.to_uppercase())
}
