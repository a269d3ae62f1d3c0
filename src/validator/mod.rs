//! Candidate extraction and batch validation of free-form text

use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec::{IdInfo, IdNumber};
use crate::region::RegionRegistry;
use crate::utils::common::{strip_whitespace, today};

pub use crate::codec::FailureReason;

lazy_static! {
    /// A whole line that is exactly one identity number
    static ref EXACT_RE: Regex = Regex::new(r"^[0-9]{17}[0-9Xx]$").unwrap();

    /// An identity-number-shaped run anywhere in a line
    static ref SCAN_RE: Regex = Regex::new(r"[0-9]{17}[0-9Xx]").unwrap();
}

/// Result of validating one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail(FailureReason),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

/// Per-line validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The input line as given
    pub input: String,
    /// Identity-number-shaped substring found in the line, upper-cased
    pub extracted_candidate: Option<String>,
    pub outcome: Outcome,
    /// Decoded fields, present only when the outcome is a pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<IdInfo>,
}

/// Pull an identity-number-shaped substring out of a line.
///
/// A line that is a single number once whitespace is removed is taken whole;
/// otherwise the first run of 17 digits followed by a digit or X is used.
/// The result is upper-cased.
pub fn extract_candidate(line: &str) -> Option<String> {
    let compact = strip_whitespace(line);
    if EXACT_RE.is_match(&compact) {
        return Some(compact.to_ascii_uppercase());
    }

    SCAN_RE
        .find(line)
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Validate a candidate against today's date
pub fn validate(candidate: &str) -> Outcome {
    validate_on(candidate, &today())
}

/// Validate a candidate against an explicit "today"
pub fn validate_on(candidate: &str, today: &NaiveDate) -> Outcome {
    match IdNumber::parse_on(candidate, today) {
        Ok(_) => Outcome::Pass,
        Err(reason) => Outcome::Fail(reason),
    }
}

/// Validate every non-empty line of `text`, in input order
pub fn validate_batch(text: &str, registry: &RegionRegistry) -> Vec<ValidationResult> {
    validate_batch_on(text, registry, &today())
}

/// [`validate_batch`] against an explicit "today".
///
/// Never fails: a line without a candidate yields
/// [`FailureReason::NoCandidateFound`] instead of being dropped.
pub fn validate_batch_on(
    text: &str,
    registry: &RegionRegistry,
    today: &NaiveDate,
) -> Vec<ValidationResult> {
    let results: Vec<ValidationResult> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| validate_line(line, registry, today))
        .collect();

    debug!(
        "Validated {} lines, {} passed",
        results.len(),
        results.iter().filter(|r| r.outcome.is_pass()).count()
    );
    results
}

fn validate_line(line: &str, registry: &RegionRegistry, today: &NaiveDate) -> ValidationResult {
    let Some(candidate) = extract_candidate(line) else {
        return ValidationResult {
            input: line.to_string(),
            extracted_candidate: None,
            outcome: Outcome::Fail(FailureReason::NoCandidateFound),
            info: None,
        };
    };

    let (outcome, info) = match IdNumber::parse_on(&candidate, today) {
        Ok(id) => (Outcome::Pass, Some(id.info(registry, today))),
        Err(reason) => (Outcome::Fail(reason), None),
    };

    ValidationResult {
        input: line.to_string(),
        extracted_candidate: Some(candidate),
        outcome,
        info,
    }
}
