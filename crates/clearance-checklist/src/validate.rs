//! Checklist schema validation (§4.6: "parses and validates it").

use crate::error::ChecklistError;
use crate::model::{Checklist, Region};
use std::collections::HashSet;

/// Validate a parsed checklist's internal consistency: every check `id` is
/// unique within the checklist, and its declared `region` matches the
/// region it was requested for.
pub fn validate(checklist: &Checklist, requested_region: Region, path: &str) -> Result<(), ChecklistError> {
    if checklist.region != requested_region {
        return Err(ChecklistError::RegionMismatch {
            declared: checklist.region.as_str().to_string(),
            requested: requested_region.as_str().to_string(),
        });
    }

    let mut seen = HashSet::new();
    for check in checklist
        .categories
        .header
        .iter()
        .chain(checklist.categories.valuation.iter())
    {
        if !seen.insert(&check.id) {
            return Err(ChecklistError::DuplicateCheckId {
                path: path.to_string(),
                id: check.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Categories, Check, CompareFields, FieldRef};

    fn check(id: &str) -> Check {
        Check {
            id: id.to_string(),
            auditing_criteria: "criteria".to_string(),
            description: "description".to_string(),
            checking_logic: "logic".to_string(),
            pass_conditions: "conditions".to_string(),
            compare_fields: CompareFields {
                source_doc: "entry_print".to_string(),
                source_field: FieldRef::Single("field_a".to_string()),
                target_doc: "commercial_invoice".to_string(),
                target_field: FieldRef::Single("field_b".to_string()),
            },
        }
    }

    fn checklist(region: Region, header: Vec<Check>) -> Checklist {
        Checklist {
            version: "1".to_string(),
            region,
            categories: Categories {
                header,
                valuation: vec![],
            },
            numeric_tolerance_pct: None,
        }
    }

    #[test]
    fn rejects_region_mismatch() {
        let cl = checklist(Region::AU, vec![check("H1")]);
        let err = validate(&cl, Region::NZ, "au_checklist.json").unwrap_err();
        assert!(matches!(err, ChecklistError::RegionMismatch { .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let cl = checklist(Region::AU, vec![check("H1"), check("H1")]);
        let err = validate(&cl, Region::AU, "au_checklist.json").unwrap_err();
        assert!(matches!(err, ChecklistError::DuplicateCheckId { .. }));
    }

    #[test]
    fn accepts_well_formed_checklist() {
        let cl = checklist(Region::AU, vec![check("H1"), check("H2")]);
        assert!(validate(&cl, Region::AU, "au_checklist.json").is_ok());
    }
}
