//! Classifier (C3), Extractor (C4), and Persistence Layer (C5).

mod classifier;
mod extractor;
mod persistence;
pub mod schemas;

pub use classifier::classify;
pub use extractor::extract;
pub use persistence::{PersistenceError, save_extraction, save_pdf, saved_filename};
