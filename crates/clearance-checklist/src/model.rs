//! Checklist data model (§3).

use serde::{Deserialize, Serialize};

/// Supported customs regions (§3: `region ∈ {AU, NZ}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    AU,
    NZ,
}

impl Region {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AU => "AU",
            Self::NZ => "NZ",
        }
    }

    #[must_use]
    pub fn lowercase(self) -> &'static str {
        match self {
            Self::AU => "au",
            Self::NZ => "nz",
        }
    }

    /// Parse a region from a case-insensitive string, as used on the
    /// `region` query parameter and in checklist filenames.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "AU" => Some(Self::AU),
            "NZ" => Some(Self::NZ),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field reference on one side of a comparison: either a single field
/// name, or an ordered list of field names (§3: "`source_field` /
/// `target_field` is either a field name or an ordered list of field
/// names").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldRef {
    /// Render as a comma-joined list for embedding in a prompt.
    #[must_use]
    pub fn display_list(&self) -> String {
        match self {
            Self::Single(name) => name.clone(),
            Self::Multiple(names) => names.join(", "),
        }
    }
}

/// The document/field pair being compared on each side of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareFields {
    pub source_doc: String,
    pub source_field: FieldRef,
    pub target_doc: String,
    pub target_field: FieldRef,
}

/// A single checklist item (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub id: String,
    pub auditing_criteria: String,
    pub description: String,
    pub checking_logic: String,
    pub pass_conditions: String,
    pub compare_fields: CompareFields,
}

/// The two checklist categories (§3, glossary: "Header check / valuation
/// check").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub header: Vec<Check>,
    #[serde(default)]
    pub valuation: Vec<Check>,
}

/// A region's checklist configuration (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub version: String,
    pub region: Region,
    pub categories: Categories,
    /// Tolerance for numeric field comparisons, as checklist-level data
    /// rather than a hard-coded constant. Percentage (e.g. `0.5` = 0.5%).
    #[serde(default)]
    pub numeric_tolerance_pct: Option<f64>,
}

impl Checklist {
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.categories.header.len()
    }

    #[must_use]
    pub fn valuation_count(&self) -> usize {
        self.categories.valuation.len()
    }
}
