//! Checklist Store (C6): loads, caches, and serves region-specific
//! checklist configurations, and supports atomic hot updates (§4.6).

mod error;
mod model;
mod store;
mod validate;

pub use error::ChecklistError;
pub use model::{Categories, Check, Checklist, CompareFields, FieldRef, Region};
pub use store::ChecklistStore;
pub use validate::validate;
