//! Filename Partitioner (C1): extracts job IDs from filenames and groups
//! uploads into jobs (§4.1).

use clearance_utils::FileUpload;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A job ID is the leading run of digits in a filename, delimited from the
/// rest of the name by an underscore or caret (§4.1: `^(\d+)[_^]`).
static JOB_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[_^]").unwrap());

const UNKNOWN_JOB_ID: &str = "unknown";

/// Extract the job ID from a single filename. Filenames without a leading
/// digit run fall into `"unknown"` rather than being rejected (§4.1, §4.9
/// edge case: "Filenames without a leading digit run partition into the
/// `unknown` job").
#[must_use]
pub fn job_id_for_filename(filename: &str) -> String {
    JOB_ID_PATTERN
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN_JOB_ID.to_string(), |m| m.as_str().to_string())
}

/// Partition a flat list of uploads into jobs keyed by job ID. Input order
/// is preserved within each group; no other semantics are attached to the
/// job ID (§4.1: "it may coincide with a business identifier but the
/// engine does not verify this").
///
/// The returned vector's order is the job ID's first-encounter order in
/// `files`, not sorted or otherwise rearranged: the run manifest's `jobs`
/// array must match this "group-iteration order", not completion order
/// (§4.9) nor alphabetical order, so this is the order callers should
/// build the manifest from directly.
#[must_use]
pub fn partition(files: Vec<FileUpload>) -> Vec<(String, Vec<FileUpload>)> {
    let mut order: Vec<String> = Vec::new();
    let mut jobs: HashMap<String, Vec<FileUpload>> = HashMap::new();
    for file in files {
        let job_id = job_id_for_filename(&file.original_filename);
        if !jobs.contains_key(&job_id) {
            order.push(job_id.clone());
        }
        jobs.entry(job_id).or_default().push(file);
    }
    order.into_iter().map(|id| { let files = jobs.remove(&id).unwrap_or_default(); (id, files) }).collect()
}
