//! Check character computation
//!
//! ISO 7064 MOD 11-2 style: each of the first 17 digits is multiplied by a
//! fixed weight, the sum is reduced mod 11 and mapped through a lookup table
//! to a single check character (`0`-`9` or `X`).

use crate::error::{IdError, Result};
use crate::BODY_LENGTH;

/// Weight applied to digit `i` of the 17-digit body
pub const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Check character indexed by `weighted_sum % 11`
pub const CHECK_CODES: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// Compute the check character for a 17-digit body.
///
/// # Errors
/// * [`IdError::InvalidLength`] if `first17` is not 17 characters long
/// * [`IdError::InvalidCharacter`] if any character is not `0`-`9`
///
/// # Example
/// ```
/// use idcore::checksum::compute;
///
/// assert_eq!(compute("11010519491231002").unwrap(), 'X');
/// ```
pub fn compute(first17: &str) -> Result<char> {
    let len = first17.chars().count();
    if len != BODY_LENGTH {
        return Err(IdError::InvalidLength(len));
    }

    let mut sum = 0u32;
    for (ch, weight) in first17.chars().zip(WEIGHTS) {
        let digit = ch.to_digit(10).ok_or(IdError::InvalidCharacter(ch))?;
        sum += digit * weight;
    }

    Ok(CHECK_CODES[(sum % 11) as usize])
}

/// Verify the check character of an 18-character number.
///
/// Returns false for anything malformed; a lowercase `x` is accepted.
pub fn verify(id18: &str) -> bool {
    let chars: Vec<char> = id18.chars().collect();
    if chars.len() != BODY_LENGTH + 1 {
        return false;
    }

    let body: String = chars[..BODY_LENGTH].iter().collect();
    match compute(&body) {
        Ok(expected) => expected == chars[BODY_LENGTH].to_ascii_uppercase(),
        Err(_) => false,
    }
}
