//! Filesystem path helpers shared by the run allocator and checklist store.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Create `path` and all missing parent directories, tolerating a
/// already-existing directory.
pub fn ensure_dir_all(path: &Utf8Path) -> io::Result<()> {
    if path.as_std_path().is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path.as_std_path())
}

/// Resolve `OUTPUT_DIRECTORY` to an absolute path at startup (§6: "Resolved
/// to absolute form at startup and used verbatim in path-validation
/// checks").
pub fn resolve_absolute(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    let joined = cwd.join(path.as_std_path());
    Utf8PathBuf::from_path_buf(joined)
        .map_err(|p| io::Error::new(io::ErrorKind::InvalidData, format!("non-UTF-8 path: {p:?}")))
}

/// Directory conventionally used to locate bundled checklists inside a
/// container image (§4.6 step 2).
pub const CONVENTIONAL_CHECKLISTS_DIR: &str = "/app/checklists";

/// Directory computed relative to the running executable (§4.6 step 3):
/// `<exe_dir>/checklists`.
pub fn checklists_dir_relative_to_executable() -> io::Result<Utf8PathBuf> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Utf8PathBuf::from_path_buf(exe_dir.join("checklists"))
        .map_err(|p| io::Error::new(io::ErrorKind::InvalidData, format!("non-UTF-8 path: {p:?}")))
}
