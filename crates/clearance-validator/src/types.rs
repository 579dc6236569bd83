//! Batch validation data model (§3: "Validation verdict", "Batch
//! validation result").

use serde::{Deserialize, Serialize};

/// Verdict status for a single checklist comparison (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "QUESTIONABLE")]
    Questionable,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl VerdictStatus {
    /// Ranking used to fold several statuses into one worst-of verdict
    /// (§4.7: "Status derivation... `overall_status` is the worst of the
    /// four"). Higher is worse.
    fn severity(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Questionable => 1,
            Self::Fail => 2,
            Self::NotApplicable => unreachable!("excluded from the ranking by worst_status before severity is compared"),
        }
    }
}

/// Fold any non-empty slice of statuses down to the worst one.
///
/// `NotApplicable` is excluded from the ranking unless every status is
/// `NotApplicable` (§9 Open Question resolution, DESIGN.md): a single N/A
/// sub-check must not mask a genuine `FAIL`/`QUESTIONABLE` elsewhere in the
/// slice.
#[must_use]
pub fn worst_status(statuses: &[VerdictStatus]) -> VerdictStatus {
    statuses
        .iter()
        .copied()
        .filter(|status| *status != VerdictStatus::NotApplicable)
        .max_by_key(|status| status.severity())
        .unwrap_or(VerdictStatus::NotApplicable)
}

/// A single checklist comparison result (§3: "Validation verdict").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub check_id: String,
    pub auditing_criteria: String,
    pub status: VerdictStatus,
    pub assessment: String,
    pub source_document: String,
    pub target_document: String,
    pub source_value: String,
    pub target_value: String,
}

/// Tallies over a set of verdicts (§3: "summary: {total, passed, failed,
/// questionable, not_applicable}").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub questionable: usize,
    pub not_applicable: usize,
}

impl Summary {
    #[must_use]
    pub fn tally(verdicts: &[Verdict]) -> Self {
        let mut summary = Self {
            total: verdicts.len(),
            ..Self::default()
        };
        for verdict in verdicts {
            match verdict.status {
                VerdictStatus::Pass => summary.passed += 1,
                VerdictStatus::Fail => summary.failed += 1,
                VerdictStatus::Questionable => summary.questionable += 1,
                VerdictStatus::NotApplicable => summary.not_applicable += 1,
            }
        }
        summary
    }

    fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            questionable: self.questionable + other.questionable,
            not_applicable: self.not_applicable + other.not_applicable,
        }
    }
}

/// A single tariff line comparison (§4.7 "Tariff line-item check").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineVerdict {
    pub line_number: u32,
    pub description: String,
    pub extracted_tariff_code: String,
    pub extracted_stat_code: String,
    pub suggested_tariff_code: String,
    pub suggested_stat_code: String,
    pub status: VerdictStatus,
    pub assessment: String,
    pub other_suggested_codes: Vec<String>,
    pub concession_status: VerdictStatus,
    pub quantity_status: VerdictStatus,
    pub gst_exemption_status: VerdictStatus,
    pub overall_status: VerdictStatus,
}

/// The complete result of validating one job (§3: "Batch validation
/// result").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchValidationResult {
    pub header: Vec<Verdict>,
    pub valuation: Vec<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariff_line_checks: Option<Vec<LineVerdict>>,
    pub summary: Summary,
}

impl BatchValidationResult {
    #[must_use]
    pub fn new(header: Vec<Verdict>, valuation: Vec<Verdict>) -> Self {
        let summary = Summary::tally(&header).merge(Summary::tally(&valuation));
        Self {
            header,
            valuation,
            tariff_line_checks: None,
            summary,
        }
    }

    #[must_use]
    pub fn with_tariff_line_checks(mut self, line_checks: Vec<LineVerdict>) -> Self {
        self.tariff_line_checks = Some(line_checks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(status: VerdictStatus) -> Verdict {
        Verdict {
            check_id: "H1".to_string(),
            auditing_criteria: "criteria".to_string(),
            status,
            assessment: "assessment".to_string(),
            source_document: "entry_print".to_string(),
            target_document: "commercial_invoice".to_string(),
            source_value: "a".to_string(),
            target_value: "a".to_string(),
        }
    }

    #[test]
    fn worst_status_prefers_fail_over_questionable_over_pass() {
        assert_eq!(
            worst_status(&[VerdictStatus::Pass, VerdictStatus::Questionable]),
            VerdictStatus::Questionable
        );
        assert_eq!(
            worst_status(&[VerdictStatus::Fail, VerdictStatus::Questionable]),
            VerdictStatus::Fail
        );
        assert_eq!(worst_status(&[VerdictStatus::NotApplicable]), VerdictStatus::NotApplicable);
    }

    #[test]
    fn worst_status_ignores_a_lone_not_applicable_sub_check() {
        assert_eq!(
            worst_status(&[VerdictStatus::Pass, VerdictStatus::Pass, VerdictStatus::Pass, VerdictStatus::NotApplicable]),
            VerdictStatus::Pass
        );
    }

    #[test]
    fn worst_status_is_not_applicable_only_when_every_status_is() {
        assert_eq!(
            worst_status(&[VerdictStatus::NotApplicable, VerdictStatus::NotApplicable]),
            VerdictStatus::NotApplicable
        );
    }

    #[test]
    fn summary_tallies_each_status() {
        let verdicts = vec![
            verdict(VerdictStatus::Pass),
            verdict(VerdictStatus::Fail),
            verdict(VerdictStatus::Questionable),
            verdict(VerdictStatus::NotApplicable),
            verdict(VerdictStatus::Pass),
        ];
        let summary = Summary::tally(&verdicts);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.questionable, 1);
        assert_eq!(summary.not_applicable, 1);
    }

    #[test]
    fn batch_result_summary_merges_header_and_valuation() {
        let result = BatchValidationResult::new(
            vec![verdict(VerdictStatus::Pass), verdict(VerdictStatus::Fail)],
            vec![verdict(VerdictStatus::Questionable)],
        );
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.passed, 1);
        assert_eq!(result.summary.failed, 1);
        assert_eq!(result.summary.questionable, 1);
    }
}
