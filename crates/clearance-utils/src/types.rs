//! Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// An in-memory upload: the original filename paired with its PDF bytes.
///
/// Validating that `bytes` is actually a PDF is the caller's responsibility
/// (§3: "Payload must be a PDF; this is a precondition enforced by the
/// orchestrator's caller").
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub original_filename: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    #[must_use]
    pub fn new(original_filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_filename: original_filename.into(),
            bytes,
        }
    }
}

/// The closed set of document types a file may classify to (§3).
///
/// Classification is total: every file receives exactly one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    EntryPrint,
    AirWaybill,
    CommercialInvoice,
    PackingList,
    Other,
}

impl DocumentType {
    /// Stable lowercase identifier, used in saved filenames and labeled
    /// prompt attachments (§4.5, §4.7 step 4).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EntryPrint => "entry_print",
            Self::AirWaybill => "air_waybill",
            Self::CommercialInvoice => "commercial_invoice",
            Self::PackingList => "packing_list",
            Self::Other => "other",
        }
    }

    /// The two document types the extractor (C4) produces structured
    /// records for (§4.4: "Extraction is performed only for `entry_print`
    /// and `commercial_invoice`").
    #[must_use]
    pub fn is_extractable(self) -> bool {
        matches!(self, Self::EntryPrint | Self::CommercialInvoice)
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single persisted file within a job directory (§3: "Saved file record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFileRecord {
    pub original_filename: String,
    pub saved_filename: String,
    pub saved_path: String,
    pub document_type: DocumentType,
    /// Non-null only for `entry_print` and `commercial_invoice` (§3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<serde_json::Value>,
}

/// Split a filename into `(stem, extension)` at the final `.`, preserving
/// special characters verbatim (§4.5: "no normalization of filenames beyond
/// stem/extension splitting at the final `.`").
#[must_use]
pub fn split_stem_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx + 1..]),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_round_trips_through_str() {
        for dt in [
            DocumentType::EntryPrint,
            DocumentType::AirWaybill,
            DocumentType::CommercialInvoice,
            DocumentType::PackingList,
            DocumentType::Other,
        ] {
            assert_eq!(dt.to_string(), dt.as_str());
        }
    }

    #[test]
    fn only_entry_print_and_invoice_are_extractable() {
        assert!(DocumentType::EntryPrint.is_extractable());
        assert!(DocumentType::CommercialInvoice.is_extractable());
        assert!(!DocumentType::AirWaybill.is_extractable());
        assert!(!DocumentType::PackingList.is_extractable());
        assert!(!DocumentType::Other.is_extractable());
    }

    #[test]
    fn split_stem_extension_splits_at_final_dot() {
        assert_eq!(
            split_stem_extension("2219477116_INV.pdf"),
            ("2219477116_INV", "pdf")
        );
        assert_eq!(split_stem_extension("weird name^2.PDF"), ("weird name^2", "PDF"));
    }

    #[test]
    fn split_stem_extension_handles_no_extension() {
        assert_eq!(split_stem_extension("noext"), ("noext", ""));
    }

    #[test]
    fn split_stem_extension_handles_leading_dot() {
        // A leading dot is not treated as an extension separator.
        assert_eq!(split_stem_extension(".hidden"), (".hidden", ""));
    }
}
