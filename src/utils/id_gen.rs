//! Random digit string generation

use rand::Rng;

/// Generate a random string of ASCII digits of the specified length
pub fn random_digits<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .filter_map(|_| char::from_digit(rng.random_range(0..10), 10))
        .collect()
}

/// Draw a number uniformly from `[min, max)` and zero-pad it to `width` digits
pub fn random_padded<R: Rng>(rng: &mut R, min: u32, max: u32, width: usize) -> String {
    let value = rng.random_range(min..max);
    format!("{:0width$}", value, width = width)
}
