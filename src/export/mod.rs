//! Validation report export

use serde::Serialize;

use crate::error::Result;
use crate::validator::{FailureReason, Outcome, ValidationResult};

/// Pass/fail counts over a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failures without any identity-number-shaped text
    pub no_candidate: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: ValidationSummary,
    results: &'a [ValidationResult],
}

/// Count outcomes of a validated batch
pub fn summarize(results: &[ValidationResult]) -> ValidationSummary {
    let mut summary = ValidationSummary {
        total: results.len(),
        ..Default::default()
    };
    for result in results {
        match result.outcome {
            Outcome::Pass => summary.passed += 1,
            Outcome::Fail(reason) => {
                summary.failed += 1;
                if reason == FailureReason::NoCandidateFound {
                    summary.no_candidate += 1;
                }
            }
        }
    }
    summary
}

/// Render a batch and its summary as pretty-printed JSON
pub fn to_json(results: &[ValidationResult]) -> Result<String> {
    let report = Report {
        summary: summarize(results),
        results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionRegistry;
    use crate::validator::validate_batch_on;
    use chrono::NaiveDate;

    fn sample() -> Vec<ValidationResult> {
        let registry = RegionRegistry::default_table();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        validate_batch_on(
            "11010519491231002X\nnothing\n110105194912310021",
            &registry,
            &today,
        )
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(
            summary,
            ValidationSummary {
                total: 3,
                passed: 1,
                failed: 2,
                no_candidate: 1,
            }
        );
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), ValidationSummary::default());
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["summary"]["passed"], 1);

        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["outcome"]["status"], "pass");
        assert_eq!(results[0]["info"]["province"], "北京市");
        assert_eq!(results[0]["info"]["birth_date"], "1949-12-31");
        assert_eq!(results[1]["outcome"]["reason"], "no_candidate_found");
        assert!(results[1]["extracted_candidate"].is_null());
        assert!(results[2].get("info").is_none());
    }
}
