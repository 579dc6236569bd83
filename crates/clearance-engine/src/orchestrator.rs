//! Pipeline Orchestrator (C8): composes C1-C7 with bounded concurrency,
//! retry, and per-job failure isolation (§4.8).

use crate::config::RunConfig;
use crate::error::EngineError;
use crate::manifest::{JobManifestEntry, RunManifest};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clearance_checklist::{ChecklistStore, Region};
use clearance_llm::LlmBackend;
use clearance_retry::BoundedSemaphore;
use clearance_utils::atomic_write::write_json_atomic;
use clearance_utils::{DocumentType, FileUpload, SavedFileRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reject the batch up front if `region` is invalid or `files` is empty
/// (§4.8 step 1). `region` is already a typed [`Region`] by the time it
/// reaches this function; the caller (HTTP layer, CLI) is responsible for
/// rejecting a malformed region string before constructing one.
fn validate_request(files: &[FileUpload]) -> Result<(), EngineError> {
    if files.is_empty() {
        return Err(EngineError::InvalidInput("batch must contain at least one file".to_string()));
    }
    Ok(())
}

/// Select, for every non-`other` document type present, the file whose
/// saved filename sorts lexicographically first (§4.4: "the tie-break for
/// duplicate document types within a job").
fn designate_files(classified: &[SavedFileRecord]) -> HashMap<DocumentType, &SavedFileRecord> {
    let mut designated: HashMap<DocumentType, &SavedFileRecord> = HashMap::new();
    for record in classified {
        if record.document_type == DocumentType::Other {
            continue;
        }
        designated
            .entry(record.document_type)
            .and_modify(|current| {
                if record.saved_filename < current.saved_filename {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    designated
}

async fn process_one_file(
    backend: &dyn LlmBackend,
    config: &RunConfig,
    llm_semaphore: &BoundedSemaphore,
    job_path: &Utf8Path,
    file: FileUpload,
) -> Option<SavedFileRecord> {
    let document_type = clearance_pipeline::classify(
        backend,
        &config.retry_policy,
        &config.llm_model,
        config.llm_timeout,
        llm_semaphore,
        &file.bytes,
        &file.original_filename,
    )
    .await;

    let saved_path = match clearance_pipeline::save_pdf(&file.bytes, &file.original_filename, document_type, job_path) {
        Ok(path) => path,
        Err(error) => {
            warn!(filename = %file.original_filename, %error, "failed to persist PDF, skipping file");
            return None;
        }
    };

    let extracted_data = if document_type.is_extractable() {
        let label = document_type.to_string().to_uppercase();
        let record = clearance_pipeline::extract(
            backend,
            &config.retry_policy,
            &config.llm_model,
            config.llm_timeout,
            llm_semaphore,
            &file.bytes,
            document_type,
            &label,
        )
        .await;

        if let Some(record) = &record {
            if let Err(error) = clearance_pipeline::save_extraction(record, &saved_path) {
                warn!(path = %saved_path, %error, "failed to persist extraction record");
            }
        }
        record
    } else {
        None
    };

    Some(SavedFileRecord {
        original_filename: file.original_filename,
        saved_filename: saved_path.file_name().unwrap_or_default().to_string(),
        saved_path: saved_path.to_string(),
        document_type,
        extracted_data,
    })
}

async fn process_job(
    job_id: String,
    files: Vec<FileUpload>,
    region: Region,
    run_path: Utf8PathBuf,
    config: RunConfig,
    backend: Arc<dyn LlmBackend>,
    checklist_store: Arc<ChecklistStore>,
    file_semaphore: BoundedSemaphore,
    llm_semaphore: BoundedSemaphore,
) -> JobManifestEntry {
    let job_folder = format!("job_{job_id}");
    let job_path = run_path.join(&job_folder);

    let mut join_set = tokio::task::JoinSet::new();
    for (index, file) in files.into_iter().enumerate() {
        let backend = backend.clone();
        let config = config.clone();
        let file_semaphore = file_semaphore.clone();
        let llm_semaphore = llm_semaphore.clone();
        let job_path = job_path.clone();
        join_set.spawn(async move {
            let _permit = file_semaphore.acquire().await;
            let record = process_one_file(backend.as_ref(), &config, &llm_semaphore, &job_path, file).await;
            (index, record)
        });
    }

    let mut by_index: HashMap<usize, SavedFileRecord> = HashMap::new();
    while let Some(result) = join_set.join_next().await {
        if let (index, Some(record)) = result.expect("file task panicked") {
            by_index.insert(index, record);
        }
    }
    let mut classified_files: Vec<(usize, SavedFileRecord)> = by_index.into_iter().collect();
    classified_files.sort_by_key(|(index, _)| *index);
    let classified_files: Vec<SavedFileRecord> = classified_files.into_iter().map(|(_, record)| record).collect();

    let designated = designate_files(&classified_files);
    let (mut validation_results, mut validation_file) = (None, None);

    let has_entry_print = designated.contains_key(&DocumentType::EntryPrint);
    let has_invoice = designated.contains_key(&DocumentType::CommercialInvoice);

    if has_entry_print && has_invoice {
        match assemble_pdf_documents(&designated) {
            Ok(pdf_documents) => match checklist_store.load(region).await {
                Ok(checklist) => {
                    match clearance_validator::validate_batch(
                        backend.as_ref(),
                        &config.retry_policy,
                        &config.llm_model,
                        config.llm_timeout,
                        &llm_semaphore,
                        &checklist,
                        &pdf_documents,
                    )
                    .await
                    {
                        Ok(result) => {
                            let filename = format!("job_{job_id}_validation_{region}.json");
                            let path = run_path.join(&filename);
                            match write_validation_json(&path, &result, &job_id, region) {
                                Ok(()) => {
                                    validation_file = Some(filename);
                                    validation_results = Some(result);
                                }
                                Err(error) => {
                                    warn!(job_id, path = %path, %error, "failed to write validation JSON");
                                }
                            }
                        }
                        Err(error) => {
                            warn!(job_id, %error, "batch validation failed after retries, job has no validation results");
                        }
                    }
                }
                Err(error) => {
                    warn!(job_id, %error, "checklist unavailable, job has no validation results");
                }
            },
            Err(error) => {
                warn!(job_id, %error, "failed to re-read designated PDFs from disk, job has no validation results");
            }
        }
    } else {
        debug!(job_id, "job lacks a designated entry_print and/or commercial_invoice, skipping validation");
    }

    JobManifestEntry {
        job_id,
        job_folder,
        classified_files,
        validation_results,
        validation_file,
    }
}

fn assemble_pdf_documents(
    designated: &HashMap<DocumentType, &SavedFileRecord>,
) -> std::io::Result<HashMap<DocumentType, Vec<u8>>> {
    let mut documents = HashMap::new();
    for (document_type, record) in designated {
        let bytes = std::fs::read(&record.saved_path)?;
        documents.insert(*document_type, bytes);
    }
    Ok(documents)
}

fn write_validation_json(
    path: &Utf8Path,
    result: &clearance_validator::BatchValidationResult,
    job_id: &str,
    region: Region,
) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(result)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("job_id".to_string(), serde_json::Value::String(job_id.to_string()));
        object.insert("region".to_string(), serde_json::Value::String(region.as_str().to_string()));
    }
    write_json_atomic(path, &value)
}

/// Drive the full batch pipeline: allocate a run, partition into jobs,
/// process each job with bounded concurrency, and return the run
/// manifest (§4.8).
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `files` is empty, or
/// [`EngineError::AllocationExhausted`] if the run allocator cannot
/// acquire a unique run ID. Job-level failures never propagate here —
/// they are recorded in the corresponding manifest entry (§7).
pub async fn process_batch(
    files: Vec<FileUpload>,
    region: Region,
    output_base: &Utf8Path,
    config: &RunConfig,
    backend: Arc<dyn LlmBackend>,
    checklist_store: Arc<ChecklistStore>,
) -> Result<RunManifest, EngineError> {
    validate_request(&files)?;

    let total_files = files.len();
    let (run_id, run_path) = clearance_runalloc::allocate(output_base, Local::now())?;

    let jobs_in_order = clearance_partition::partition(files);
    let job_ids: Vec<String> = jobs_in_order.iter().map(|(id, _)| id.clone()).collect();
    let total_jobs = job_ids.len();

    let job_semaphore = BoundedSemaphore::new(config.j_max.max(1));
    let file_semaphore = BoundedSemaphore::new(config.f_max.max(1));
    let llm_semaphore = BoundedSemaphore::new(config.llm_global_max.max(1));

    let mut join_set = tokio::task::JoinSet::new();
    for (job_id, job_files) in jobs_in_order {
        let run_path = run_path.clone();
        let config = config.clone();
        let backend = backend.clone();
        let checklist_store = checklist_store.clone();
        let job_semaphore = job_semaphore.clone();
        let file_semaphore = file_semaphore.clone();
        let llm_semaphore = llm_semaphore.clone();

        join_set.spawn(async move {
            let _permit = job_semaphore.acquire().await;
            let entry = process_job(
                job_id.clone(),
                job_files,
                region,
                run_path,
                config,
                backend,
                checklist_store,
                file_semaphore,
                llm_semaphore,
            )
            .await;
            (job_id, entry)
        });
    }

    let mut entries_by_id: HashMap<String, JobManifestEntry> = HashMap::new();
    while let Some(result) = join_set.join_next().await {
        let (job_id, entry) = result.expect("job task panicked");
        entries_by_id.insert(job_id, entry);
    }

    let jobs = job_ids
        .into_iter()
        .map(|id| entries_by_id.remove(&id).expect("every partitioned job id produces an entry"))
        .collect();

    Ok(RunManifest {
        run_id,
        run_path: run_path.to_string(),
        region,
        total_files,
        total_jobs,
        jobs,
    })
}
