//! Run manifest (§3: "Run manifest").

use clearance_checklist::Region;
use clearance_utils::SavedFileRecord;
use clearance_validator::BatchValidationResult;
use serde::{Deserialize, Serialize};

/// A single job's entry in the run manifest. `validation_results` and
/// `validation_file` are both absent when the job produced no validation
/// (e.g. it lacked a designated Entry Print or Commercial Invoice, or C7
/// failed after exhausting retries) (§4.8 step "e", §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobManifestEntry {
    pub job_id: String,
    pub job_folder: String,
    pub classified_files: Vec<SavedFileRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_results: Option<BatchValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_file: Option<String>,
}

/// The top-level JSON returned from the orchestrator and persisted
/// nowhere itself — it is the caller's responsibility to record it
/// (§3: "Run manifest").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub run_path: String,
    pub region: Region,
    pub total_files: usize,
    pub total_jobs: usize,
    pub jobs: Vec<JobManifestEntry>,
}
