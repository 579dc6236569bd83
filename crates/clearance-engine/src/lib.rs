//! Pipeline Orchestrator (C8): the top-level entry point that composes
//! the Filename Partitioner, Run Allocator, Classifier, Extractor,
//! Persistence Layer, Checklist Store, and Batch Validator into
//! `process_batch` (§4.8).

mod config;
mod error;
mod manifest;
mod orchestrator;

pub use config::RunConfig;
pub use error::EngineError;
pub use manifest::{JobManifestEntry, RunManifest};
pub use orchestrator::process_batch;
