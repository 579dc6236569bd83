//! Library crate backing the `clearance-engine` CLI binary. The pipeline
//! itself lives in `clearance-engine` and its sibling crates; this crate
//! is only the thin CLI wiring (§6 stand-in for the HTTP transport layer).

pub mod cli;
