//! clearance-engine CLI binary.
//!
//! All logic lives in the library; `main` only invokes `cli::run()` and
//! maps its result to a process exit code.

fn main() {
    if let Err(code) = clearance_engine_cli::cli::run() {
        std::process::exit(code);
    }
}
