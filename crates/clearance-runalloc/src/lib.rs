//! Run Allocator (C2): assigns a race-safe, date-scoped, auto-incrementing
//! run identifier and creates the run directory (§4.2).

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use thiserror::Error;
use tracing::{debug, warn};

/// Bound on collision retries before giving up (§4.2: "retry with `N+1` up
/// to a bounded number of attempts").
const MAX_ALLOCATION_ATTEMPTS: u32 = 50;

static RUN_DIR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})_run_(\d+)$").unwrap());

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("failed to list output directory {path}: {source}")]
    ListDir { path: String, source: io::Error },

    #[error("could not acquire a unique run id under {output_base} after {attempts} attempts")]
    Exhausted { output_base: String, attempts: u32 },

    #[error("failed to create run directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },
}

/// Scan `output_base` for existing run directories stamped with `date` and
/// return the highest sequence number found, or `0` if none exist (§4.2:
/// "computes `N = 1 + max(captured)` (0 if none)").
fn highest_existing_sequence(output_base: &Utf8Path, date: &str) -> Result<u32, AllocationError> {
    let entries = match std::fs::read_dir(output_base.as_std_path()) {
        Ok(entries) => entries,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(AllocationError::ListDir {
                path: output_base.to_string(),
                source,
            });
        }
    };

    let mut highest = 0u32;
    for entry in entries.flatten() {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Some(caps) = RUN_DIR_PATTERN.captures(&name) else {
            continue;
        };
        if &caps[1] != date {
            continue;
        }
        if let Ok(seq) = caps[2].parse::<u32>() {
            highest = highest.max(seq);
        }
    }
    Ok(highest)
}

/// Allocate a new run directory under `output_base`, timestamped by `now`.
///
/// Directory creation uses `std::fs::create_dir`, which is exclusive on
/// every supported platform (it fails with `AlreadyExists` if the path is
/// already taken); on collision this retries with the next sequence number
/// up to [`MAX_ALLOCATION_ATTEMPTS`] (§4.2: "two concurrent allocations on
/// the same host may observe the same `N`... MUST serialize directory
/// creation such that only one process can win").
///
/// # Errors
///
/// Returns [`AllocationError::Exhausted`] if a unique run ID cannot be
/// acquired within the retry bound, or an I/O error if the output
/// directory cannot be listed or a run directory cannot be created for a
/// reason other than a naming collision.
pub fn allocate(output_base: &Utf8Path, now: DateTime<Local>) -> Result<(String, Utf8PathBuf), AllocationError> {
    let date = now.format("%Y-%m-%d").to_string();
    let mut sequence = highest_existing_sequence(output_base, &date)? + 1;

    for attempt in 0..MAX_ALLOCATION_ATTEMPTS {
        let run_id = format!("{date}_run_{sequence:03}");
        let run_path = output_base.join(&run_id);

        match std::fs::create_dir_all(output_base.as_std_path()).and_then(|()| std::fs::create_dir(run_path.as_std_path())) {
            Ok(()) => {
                debug!(run_id = %run_id, attempt, "allocated run directory");
                return Ok((run_id, run_path));
            }
            Err(source) if source.kind() == io::ErrorKind::AlreadyExists => {
                warn!(run_id = %run_id, attempt, "run directory collision, retrying");
                sequence += 1;
                continue;
            }
            Err(source) => {
                return Err(AllocationError::CreateDir {
                    path: run_path.to_string(),
                    source,
                });
            }
        }
    }

    Err(AllocationError::Exhausted {
        output_base: output_base.to_string(),
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 7, 27, 12, 0, 0).unwrap()
    }

    #[test]
    fn allocates_run_001_when_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let (run_id, run_path) = allocate(&base, fixed_now()).unwrap();

        assert_eq!(run_id, "2026-07-27_run_001");
        assert!(run_path.as_std_path().is_dir());
    }

    #[test]
    fn increments_past_existing_runs_for_the_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(base.join("2026-07-27_run_001").as_std_path()).unwrap();
        std::fs::create_dir_all(base.join("2026-07-27_run_007").as_std_path()).unwrap();

        let (run_id, _) = allocate(&base, fixed_now()).unwrap();

        assert_eq!(run_id, "2026-07-27_run_008");
    }

    #[test]
    fn ignores_run_directories_from_other_days() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(base.join("2026-07-26_run_009").as_std_path()).unwrap();

        let (run_id, _) = allocate(&base, fixed_now()).unwrap();

        assert_eq!(run_id, "2026-07-27_run_001");
    }

    #[test]
    fn retries_past_a_pre_created_collision() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        // Simulate a concurrent winner taking the first candidate slot.
        std::fs::create_dir_all(base.join("2026-07-27_run_001").as_std_path()).unwrap();

        let (run_id, run_path) = allocate(&base, fixed_now()).unwrap();

        assert_eq!(run_id, "2026-07-27_run_002");
        assert!(run_path.as_std_path().is_dir());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn repeated_allocation_is_strictly_increasing(n in 1usize..12) {
            let dir = tempfile::tempdir().unwrap();
            let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

            let mut sequences = Vec::with_capacity(n);
            for _ in 0..n {
                let (run_id, run_path) = allocate(&base, fixed_now()).unwrap();
                prop_assert!(run_path.as_std_path().is_dir());
                let caps = RUN_DIR_PATTERN.captures(&run_id).unwrap();
                sequences.push(caps[2].parse::<u32>().unwrap());
            }

            for window in sequences.windows(2) {
                prop_assert!(window[1] > window[0]);
            }
        }
    }
}
