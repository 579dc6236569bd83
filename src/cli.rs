//! Command-line entrypoint: reads a directory of PDFs, runs the batch
//! pipeline, and prints the resulting run manifest as JSON. Stands in for
//! the HTTP transport layer described in §6, which is out of scope here.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use clearance_checklist::{ChecklistStore, Region};
use clearance_engine::RunConfig;
use clearance_llm::{AnthropicBackend, LlmBackend};
use clearance_utils::FileUpload;
use std::sync::Arc;

/// Batch processing engine for customs-clearance document bundles.
#[derive(Parser, Debug)]
#[command(name = "clearance-engine")]
#[command(about = "Runs the classification/extraction/validation pipeline over a directory of PDFs")]
pub struct Cli {
    /// Directory containing the PDFs to process.
    pub input_dir: Utf8PathBuf,

    /// Customs region the batch is cleared under (AU or NZ).
    #[arg(long)]
    pub region: String,

    /// Base directory for run output (defaults to $OUTPUT_DIRECTORY, then "./output").
    #[arg(long)]
    pub output_dir: Option<Utf8PathBuf>,

    /// Override for checklist directory resolution (defaults to $CHECKLISTS_DIR).
    #[arg(long)]
    pub checklists_dir: Option<Utf8PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse CLI arguments, run the batch, and print the manifest. Returns an
/// exit code on failure; all error detail is logged before returning.
pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();
    clearance_utils::logging::init_tracing(cli.verbose).map_err(|_| 1)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|error| {
        eprintln!("failed to start async runtime: {error}");
        1
    })?;

    runtime.block_on(run_async(cli)).map_err(|error| {
        tracing::error!(%error, "run failed");
        1
    })
}

async fn run_async(cli: Cli) -> Result<()> {
    let region = Region::parse(&cli.region).with_context(|| format!("invalid region '{}', expected AU or NZ", cli.region))?;
    let files = load_pdf_files(&cli.input_dir)?;

    let output_base = cli
        .output_dir
        .unwrap_or_else(|| Utf8PathBuf::from(std::env::var("OUTPUT_DIRECTORY").unwrap_or_else(|_| "./output".to_string())));

    let checklists_dir = cli.checklists_dir.or_else(|| std::env::var("CHECKLISTS_DIR").ok().map(Utf8PathBuf::from));
    let checklist_store = Arc::new(ChecklistStore::new(checklists_dir));

    let backend: Arc<dyn LlmBackend> = Arc::new(AnthropicBackend::from_env().context("configuring LLM backend")?);

    let config = RunConfig::from_env();
    let manifest = clearance_engine::process_batch(files, region, &output_base, &config, backend, checklist_store)
        .await
        .context("processing batch")?;

    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

/// Load every `.pdf` file directly under `input_dir` as a [`FileUpload`],
/// in filename order (§3: "File upload. An in-memory pair...").
fn load_pdf_files(input_dir: &Utf8PathBuf) -> Result<Vec<FileUpload>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir.as_std_path()).with_context(|| format!("reading input directory {input_dir}"))? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }

        let filename = path.file_name().and_then(|name| name.to_str()).unwrap_or_default().to_string();
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        files.push(FileUpload::new(filename, bytes));
    }
    files.sort_by(|a, b| a.original_filename.cmp(&b.original_filename));
    Ok(files)
}
