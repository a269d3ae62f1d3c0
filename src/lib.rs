//! # idcore
//!
//! Generation and validation of 18-character resident identity numbers.
//!
//! ## Features
//!
//! - MOD 11-2 check character computation and verification
//! - Province/city registry built once from an embedded dataset
//! - Generation from partial constraints (region, birth date or age, gender)
//! - Extraction and validation of numbers embedded in free-form text
//! - Decoding of region names, birth date, age and gender
//! - JSON validation reports
//!
//! ## Example
//!
//! ```
//! use idcore::{generate, validate_batch, GenerationConstraints, Gender, Outcome};
//!
//! let constraints = GenerationConstraints::default()
//!     .with_province("440000")
//!     .with_age(30)
//!     .with_gender(Gender::Female)
//!     .with_count(3);
//! let ids = generate(&constraints).unwrap();
//! assert_eq!(ids.len(), 3);
//!
//! let results = validate_batch(&ids.join("\n"));
//! assert!(results.iter().all(|r| r.outcome == Outcome::Pass));
//! ```

pub mod checksum;
pub mod codec;
pub mod error;
pub mod export;
pub mod generator;
pub mod region;
pub mod utils;
pub mod validator;

// Re-export main types
pub use error::{IdError, Result};
pub use codec::{FailureReason, Gender, IdInfo, IdNumber};
pub use generator::{GenerationConstraints, Generator};
pub use region::{Region, RegionRegistry};
pub use validator::{extract_candidate, validate, Outcome, ValidationResult};
pub use export::ValidationSummary;

/// Identity number length
pub const ID_LENGTH: usize = 18;

/// Length of the part covered by the check character
pub const BODY_LENGTH: usize = 17;

/// First-generation identity number length
pub const LEGACY_ID_LENGTH: usize = 15;

/// Region code length
pub const REGION_CODE_LENGTH: usize = 6;

/// Sequence code length
pub const SEQUENCE_LENGTH: usize = 3;

/// Earliest accepted birth year
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Largest age accepted by generation
pub const MAX_AGE: i32 = 150;

/// Lower bound of the random age drawn when neither date nor age is given
pub const DEFAULT_MIN_AGE: u32 = 18;

/// Upper bound (inclusive) of the random age drawn when neither date nor age is given
pub const DEFAULT_MAX_AGE: u32 = 70;

/// Lower bound of the random region code when no region is given
pub const FALLBACK_REGION_MIN: u32 = 110000;

/// Upper bound (exclusive) of the random region code when no region is given
pub const FALLBACK_REGION_MAX: u32 = 540000;

/// Generate identity numbers against the process-wide registry
pub fn generate(constraints: &GenerationConstraints) -> Result<Vec<String>> {
    Generator::new(RegionRegistry::global()).generate(constraints)
}

/// Validate each non-empty line of `text` against the process-wide registry
pub fn validate_batch(text: &str) -> Vec<ValidationResult> {
    validator::validate_batch(text, RegionRegistry::global())
}

/// Province names of the process-wide registry, in dataset order
pub fn province_names() -> Vec<String> {
    RegionRegistry::global().province_names()
}

/// City names of a province in the process-wide registry
pub fn city_names(province_code: &str) -> Vec<String> {
    RegionRegistry::global().city_names(province_code)
}
