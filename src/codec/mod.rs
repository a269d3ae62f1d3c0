//! Identity number layout
//!
//! ```text
//! 110105 19491231 002 X
//! |      |        |   +-- check character (0-9 or X)
//! |      |        +------ sequence, last digit odd = male, even = female
//! |      +--------------- birth date YYYYMMDD
//! +---------------------- region code
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::checksum;
use crate::error::{IdError, Result};
use crate::region::{is_region_code, RegionRegistry};
use crate::utils::common::{age_on, format_short_date, parse_short_date, today};
use crate::{BODY_LENGTH, ID_LENGTH, LEGACY_ID_LENGTH, MIN_BIRTH_YEAR, SEQUENCE_LENGTH};

/// Gender encoded by the parity of the last sequence digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    /// Gender read from a sequence digit: odd is male, even is female
    pub fn from_digit(digit: u32) -> Self {
        if digit % 2 == 1 {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// Why a candidate is not a valid identity number
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    #[error("length is not 18 characters")]
    InvalidLength,

    #[error("first 17 characters must be digits")]
    InvalidCharacter,

    #[error("check character must be a digit or X")]
    InvalidCheckChar,

    #[error("check character does not match")]
    ChecksumMismatch,

    #[error("birth date is not a calendar date")]
    InvalidBirthDate,

    #[error("birth date is in the future")]
    FutureBirthDate,

    #[error("birth date is before 1900")]
    BirthDateTooOld,

    #[error("no identity number found")]
    NoCandidateFound,
}

/// A validated 18-character identity number (check character upper-cased)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IdNumber(String);

impl IdNumber {
    /// Validate a candidate against today's date.
    ///
    /// Checks run in order and the first failure wins: length, body digits,
    /// check character shape, checksum, date shape, future date, year < 1900.
    pub fn parse(candidate: &str) -> std::result::Result<Self, FailureReason> {
        Self::parse_on(candidate, &today())
    }

    /// Validate a candidate against an explicit "today"
    pub fn parse_on(candidate: &str, today: &NaiveDate) -> std::result::Result<Self, FailureReason> {
        let chars: Vec<char> = candidate.chars().collect();
        if chars.len() != ID_LENGTH {
            return Err(FailureReason::InvalidLength);
        }
        if !chars[..BODY_LENGTH].iter().all(|c| c.is_ascii_digit()) {
            return Err(FailureReason::InvalidCharacter);
        }
        let check = chars[BODY_LENGTH].to_ascii_uppercase();
        if !(check.is_ascii_digit() || check == 'X') {
            return Err(FailureReason::InvalidCheckChar);
        }
        if !checksum::verify(candidate) {
            return Err(FailureReason::ChecksumMismatch);
        }

        // All 18 characters are ASCII from here on, byte slicing is safe
        let birth = parse_short_date(&candidate[6..14]).ok_or(FailureReason::InvalidBirthDate)?;
        if birth > *today {
            return Err(FailureReason::FutureBirthDate);
        }
        if birth.year() < MIN_BIRTH_YEAR {
            return Err(FailureReason::BirthDateTooOld);
        }

        Ok(Self(candidate.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn region_code(&self) -> &str {
        &self.0[0..6]
    }

    pub fn birth_date(&self) -> NaiveDate {
        // Checked during parsing
        parse_short_date(&self.0[6..14]).unwrap_or(NaiveDate::MIN)
    }

    pub fn sequence(&self) -> &str {
        &self.0[14..17]
    }

    pub fn check_char(&self) -> char {
        self.0.as_bytes()[BODY_LENGTH] as char
    }

    pub fn gender(&self) -> Gender {
        let digit = self.0.as_bytes()[BODY_LENGTH - 1] - b'0';
        Gender::from_digit(digit as u32)
    }

    /// Full years of age on the given date
    pub fn age_on(&self, on: &NaiveDate) -> u32 {
        age_on(&self.birth_date(), on)
    }

    /// Decode region names, birth date, age and gender
    pub fn info(&self, registry: &RegionRegistry, today: &NaiveDate) -> IdInfo {
        let (province, city) = registry.describe(self.region_code());
        IdInfo {
            region_code: self.region_code().to_string(),
            province: province.map(str::to_string),
            city: city.map(str::to_string),
            birth_date: self.birth_date(),
            age: self.age_on(today),
            gender: self.gender(),
        }
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fields decoded from a valid identity number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdInfo {
    pub region_code: String,
    /// Province name, if the region is registered
    pub province: Option<String>,
    /// City name, if the region is registered
    pub city: Option<String>,
    pub birth_date: NaiveDate,
    pub age: u32,
    pub gender: Gender,
}

/// Build an 18-character number from its parts and append the check character.
///
/// # Errors
/// [`IdError::ConstraintViolation`] if the region is not six digits or the
/// sequence is not three digits.
pub fn assemble(region: &str, birth_date: &NaiveDate, sequence: &str) -> Result<String> {
    if !is_region_code(region) {
        return Err(IdError::ConstraintViolation(format!(
            "region code must be 6 digits: {:?}",
            region
        )));
    }
    if sequence.len() != SEQUENCE_LENGTH || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdError::ConstraintViolation(format!(
            "sequence must be 3 digits: {:?}",
            sequence
        )));
    }

    let date = format_short_date(birth_date);
    if date.len() != 8 {
        return Err(IdError::ConstraintViolation(format!(
            "birth year out of range: {}",
            birth_date.year()
        )));
    }

    let mut id = String::with_capacity(ID_LENGTH);
    id.push_str(region);
    id.push_str(&date);
    id.push_str(sequence);
    let check = checksum::compute(&id)?;
    id.push(check);
    Ok(id)
}

/// Convert a 15-digit first-generation number to 18 characters.
///
/// The two-digit birth year is widened with the `19` century prefix and the
/// check character is appended.
///
/// # Example
/// ```
/// use idcore::codec::upgrade_legacy;
///
/// assert_eq!(upgrade_legacy("110105491231002").unwrap(), "11010519491231002X");
/// ```
pub fn upgrade_legacy(id15: &str) -> Result<String> {
    let len = id15.chars().count();
    if len != LEGACY_ID_LENGTH {
        return Err(IdError::InvalidLength(len));
    }
    if let Some(bad) = id15.chars().find(|c| !c.is_ascii_digit()) {
        return Err(IdError::InvalidCharacter(bad));
    }

    let mut id = String::with_capacity(ID_LENGTH);
    id.push_str(&id15[..6]);
    id.push_str("19");
    id.push_str(&id15[6..]);
    let check = checksum::compute(&id)?;
    id.push(check);
    Ok(id)
}
