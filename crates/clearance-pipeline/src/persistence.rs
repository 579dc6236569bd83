//! Persistence Layer (C5): a pure function of (bytes, name, path); it
//! never retains state (§4.5, §3 "Ownership").

use camino::{Utf8Path, Utf8PathBuf};
use clearance_utils::atomic_write::{write_bytes_atomic, write_json_atomic};
use clearance_utils::{DocumentType, split_stem_extension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write PDF to {path}: {source}")]
    WritePdf { path: String, source: anyhow::Error },

    #[error("failed to write extraction record to {path}: {source}")]
    WriteExtraction { path: String, source: anyhow::Error },
}

/// Write `bytes` to `{stem}_{document_type}.pdf` under `job_path`,
/// creating `job_path` if absent. Overwrite-on-collision is permitted; no
/// filename normalization beyond stem/extension splitting is performed
/// (§4.5).
pub fn save_pdf(
    bytes: &[u8],
    original_filename: &str,
    document_type: DocumentType,
    job_path: &Utf8Path,
) -> Result<Utf8PathBuf, PersistenceError> {
    let (stem, _extension) = split_stem_extension(original_filename);
    let saved_filename = format!("{stem}_{document_type}.pdf");
    let path = job_path.join(&saved_filename);

    write_bytes_atomic(&path, bytes).map_err(|source| PersistenceError::WritePdf {
        path: path.to_string(),
        source,
    })?;

    Ok(path)
}

/// Write `record` as pretty-printed JSON alongside the PDF at
/// `path_of_pdf`, using the same basename with a `.json` extension
/// (§4.5).
pub fn save_extraction(record: &serde_json::Value, path_of_pdf: &Utf8Path) -> Result<Utf8PathBuf, PersistenceError> {
    let json_path = path_of_pdf.with_extension("json");

    write_json_atomic(&json_path, record).map_err(|source| PersistenceError::WriteExtraction {
        path: json_path.to_string(),
        source,
    })?;

    Ok(json_path)
}

/// The saved filename for `original_filename` classified as
/// `document_type`, without performing any I/O. Exposed so the
/// tie-break in §4.4 ("the one whose saved filename sorts
/// lexicographically first") can be computed before files are written.
#[must_use]
pub fn saved_filename(original_filename: &str, document_type: DocumentType) -> String {
    let (stem, _extension) = split_stem_extension(original_filename);
    format!("{stem}_{document_type}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_pdf_names_file_by_stem_and_document_type() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let path = save_pdf(b"%PDF-1.4", "123_invoice.pdf", DocumentType::CommercialInvoice, &job_path).unwrap();

        assert_eq!(path.file_name().unwrap(), "123_invoice_commercial_invoice.pdf");
        assert_eq!(std::fs::read(path.as_std_path()).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn save_pdf_creates_missing_job_directory() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = Utf8PathBuf::from_path_buf(dir.path().join("job_123")).unwrap();

        let path = save_pdf(b"%PDF-1.4", "scan.pdf", DocumentType::Other, &job_path).unwrap();

        assert!(path.as_std_path().exists());
    }

    #[test]
    fn save_extraction_writes_sibling_json() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let pdf_path = save_pdf(b"%PDF-1.4", "123_entry.pdf", DocumentType::EntryPrint, &job_path).unwrap();

        let record = serde_json::json!({"entry_number": "E1"});
        let json_path = save_extraction(&record, &pdf_path).unwrap();

        assert_eq!(json_path.file_name().unwrap(), "123_entry_entry_print.json");
        let content = std::fs::read_to_string(json_path.as_std_path()).unwrap();
        assert!(content.contains("E1"));
    }

    #[test]
    fn saved_filename_matches_what_save_pdf_produces() {
        assert_eq!(
            saved_filename("weird name^2.pdf", DocumentType::PackingList),
            "weird name^2_packing_list.pdf"
        );
    }
}
