//! Identity number generation from partial constraints
//!
//! Each number is built independently: region, birth date and sequence are
//! resolved per number, so a batch of `count` numbers may span regions and
//! dates when those are left open.

use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};

use crate::codec::{assemble, Gender};
use crate::error::{IdError, Result};
use crate::region::{is_region_code, RegionRegistry};
use crate::utils::common::{today, years_before};
use crate::utils::id_gen::{random_digits, random_padded};
use crate::{
    DEFAULT_MAX_AGE, DEFAULT_MIN_AGE, FALLBACK_REGION_MAX, FALLBACK_REGION_MIN, MAX_AGE,
    REGION_CODE_LENGTH,
};

/// What the caller pins down; everything left `None` is drawn at random
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConstraints {
    /// 6-digit province code; a city is picked from it at random
    pub province_code: Option<String>,
    /// 6-digit city code, used as-is; wins over `province_code`
    pub city_code: Option<String>,
    /// Birth date; wins over `age`
    pub birth_date: Option<NaiveDate>,
    /// Age in years, 0..=150
    pub age: Option<i32>,
    /// Gender encoded in the sequence parity
    pub gender: Gender,
    /// Number of identity numbers to produce, at least 1
    pub count: usize,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            province_code: None,
            city_code: None,
            birth_date: None,
            age: None,
            gender: Gender::Unspecified,
            count: 1,
        }
    }
}

impl GenerationConstraints {
    pub fn with_province(mut self, code: impl Into<String>) -> Self {
        self.province_code = Some(code.into());
        self
    }

    pub fn with_city(mut self, code: impl Into<String>) -> Self {
        self.city_code = Some(code.into());
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Check ranges and code shapes before anything is drawn
    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(IdError::ConstraintViolation(
                "count must be at least 1".to_string(),
            ));
        }
        if let Some(age) = self.age {
            if !(0..=MAX_AGE).contains(&age) {
                return Err(IdError::ConstraintViolation(format!(
                    "age {} outside 0..={}",
                    age, MAX_AGE
                )));
            }
        }
        if let Some(code) = non_empty(&self.city_code) {
            if !is_region_code(code) {
                return Err(IdError::ConstraintViolation(format!(
                    "city code must be {} digits: {:?}",
                    REGION_CODE_LENGTH, code
                )));
            }
        }
        if let Some(code) = non_empty(&self.province_code) {
            if !is_region_code(code) {
                return Err(IdError::ConstraintViolation(format!(
                    "province code must be {} digits: {:?}",
                    REGION_CODE_LENGTH, code
                )));
            }
        }
        Ok(())
    }
}

/// Empty or blank codes from a form count as not supplied
fn non_empty(code: &Option<String>) -> Option<&str> {
    code.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

/// Force the parity of a sequence digit with at most one unit of change.
///
/// Male needs odd: even digits step down, `0` becomes `1`.
/// Female needs even: odd digits step up, `9` becomes `8`.
/// Unspecified leaves the digit alone.
pub fn adjust_gender_digit(digit: u32, gender: Gender) -> u32 {
    match gender {
        Gender::Male if digit % 2 == 0 => {
            if digit == 0 { 1 } else { digit - 1 }
        }
        Gender::Female if digit % 2 == 1 => {
            if digit == 9 { 8 } else { digit + 1 }
        }
        _ => digit,
    }
}

/// Produces identity numbers against a region registry with an injectable
/// random source and reference date
pub struct Generator<'a, R: Rng> {
    registry: &'a RegionRegistry,
    rng: R,
    today: NaiveDate,
}

impl<'a> Generator<'a, ThreadRng> {
    /// Generator over the thread-local random source and the local date
    pub fn new(registry: &'a RegionRegistry) -> Self {
        Self::with_rng(registry, rand::rng())
    }
}

impl<'a, R: Rng> Generator<'a, R> {
    pub fn with_rng(registry: &'a RegionRegistry, rng: R) -> Self {
        Self {
            registry,
            rng,
            today: today(),
        }
    }

    /// Override the date ages are counted back from
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Generate `constraints.count` numbers in generation order.
    ///
    /// # Errors
    /// [`IdError::ConstraintViolation`] for an age outside 0..=150, a count
    /// of zero or a region code that is not six digits.
    pub fn generate(&mut self, constraints: &GenerationConstraints) -> Result<Vec<String>> {
        constraints.validate()?;

        let mut ids = Vec::with_capacity(constraints.count);
        for _ in 0..constraints.count {
            ids.push(self.generate_one(constraints)?);
        }

        debug!("Generated {} identity numbers", ids.len());
        Ok(ids)
    }

    fn generate_one(&mut self, constraints: &GenerationConstraints) -> Result<String> {
        let region = self.resolve_region(constraints);
        let birth_date = self.resolve_birth_date(constraints)?;
        let sequence = self.draw_sequence(constraints.gender);
        assemble(&region, &birth_date, &sequence)
    }

    /// City code, else a random city of the province, else a random code
    fn resolve_region(&mut self, constraints: &GenerationConstraints) -> String {
        if let Some(city) = non_empty(&constraints.city_code) {
            return city.to_string();
        }

        if let Some(province) = non_empty(&constraints.province_code) {
            let cities = self.registry.cities(province);
            if !cities.is_empty() {
                let idx = self.rng.random_range(0..cities.len());
                return cities[idx].code.clone();
            }
            return format!("{}{}00", &province[..2], random_digits(&mut self.rng, 2));
        }

        random_padded(
            &mut self.rng,
            FALLBACK_REGION_MIN,
            FALLBACK_REGION_MAX,
            REGION_CODE_LENGTH,
        )
    }

    /// Birth date, else today minus age, else today minus a random adult age
    fn resolve_birth_date(&mut self, constraints: &GenerationConstraints) -> Result<NaiveDate> {
        if let Some(date) = constraints.birth_date {
            return Ok(date);
        }

        let age = match constraints.age {
            Some(age) => age as u32,
            None => self.rng.random_range(DEFAULT_MIN_AGE..=DEFAULT_MAX_AGE),
        };
        years_before(&self.today, age).ok_or_else(|| {
            IdError::ConstraintViolation(format!("age {} is out of calendar range", age))
        })
    }

    fn draw_sequence(&mut self, gender: Gender) -> String {
        let drawn: u32 = self.rng.random_range(0..1000);
        let last = adjust_gender_digit(drawn % 10, gender);
        format!("{:03}", drawn - drawn % 10 + last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;
    use crate::utils::common::parse_short_date;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded(registry: &RegionRegistry, seed: u64) -> Generator<'_, StdRng> {
        Generator::with_rng(registry, StdRng::seed_from_u64(seed)).with_today(date(2024, 6, 1))
    }

    #[test]
    fn test_adjust_gender_digit_male() {
        let expected = [1, 1, 1, 3, 3, 5, 5, 7, 7, 9];
        for digit in 0..10 {
            assert_eq!(adjust_gender_digit(digit, Gender::Male), expected[digit as usize]);
        }
    }

    #[test]
    fn test_adjust_gender_digit_female() {
        let expected = [0, 2, 2, 4, 4, 6, 6, 8, 8, 8];
        for digit in 0..10 {
            assert_eq!(adjust_gender_digit(digit, Gender::Female), expected[digit as usize]);
        }
    }

    #[test]
    fn test_adjust_gender_digit_unspecified() {
        for digit in 0..10 {
            assert_eq!(adjust_gender_digit(digit, Gender::Unspecified), digit);
        }
    }

    #[test]
    fn test_generate_all_checksum_valid() {
        let registry = RegionRegistry::embedded();
        for seed in 0..20 {
            let mut generator = seeded(&registry, seed);
            let ids = generator
                .generate(&GenerationConstraints::default().with_count(25))
                .unwrap();
            assert_eq!(ids.len(), 25);
            for id in ids {
                assert_eq!(id.len(), 18);
                assert!(checksum::verify(&id), "bad checksum: {}", id);
            }
        }
    }

    #[test]
    fn test_generate_gender_parity() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 3);

        let male = GenerationConstraints::default().with_gender(Gender::Male).with_count(200);
        for id in generator.generate(&male).unwrap() {
            let digit = id.as_bytes()[16] - b'0';
            assert_eq!(digit % 2, 1, "male id with even digit: {}", id);
        }

        let female = GenerationConstraints::default().with_gender(Gender::Female).with_count(200);
        for id in generator.generate(&female).unwrap() {
            let digit = id.as_bytes()[16] - b'0';
            assert_eq!(digit % 2, 0, "female id with odd digit: {}", id);
        }
    }

    #[test]
    fn test_generate_city_code_used_as_is() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 11);
        let constraints = GenerationConstraints::default()
            .with_province("110000")
            .with_city("440305")
            .with_count(10);
        for id in generator.generate(&constraints).unwrap() {
            assert!(id.starts_with("440305"));
        }
    }

    #[test]
    fn test_generate_province_picks_registered_city() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 5);
        let constraints = GenerationConstraints::default().with_province("440000").with_count(50);
        let city_codes: Vec<&str> = registry.cities("440000").iter().map(|c| c.code.as_str()).collect();
        for id in generator.generate(&constraints).unwrap() {
            assert!(city_codes.contains(&&id[..6]), "unexpected region {}", &id[..6]);
        }
    }

    #[test]
    fn test_generate_childless_province_synthesizes() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 8);
        let constraints = GenerationConstraints::default().with_province("810000").with_count(50);
        for id in generator.generate(&constraints).unwrap() {
            assert!(id.starts_with("81"));
            assert_eq!(&id[4..6], "00");
            assert!(id[2..4].bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_fallback_region_range() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 21);
        let ids = generator
            .generate(&GenerationConstraints::default().with_count(300))
            .unwrap();
        for id in ids {
            let region: u32 = id[..6].parse().unwrap();
            assert!((110000..540000).contains(&region), "region {} out of range", region);
        }
    }

    #[test]
    fn test_generate_blank_codes_ignored() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 2);
        let constraints = GenerationConstraints::default().with_province("  ").with_city("");
        let ids = generator.generate(&constraints).unwrap();
        let region: u32 = ids[0][..6].parse().unwrap();
        assert!((110000..540000).contains(&region));
    }

    #[test]
    fn test_generate_birth_date_wins_over_age() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 4);
        let constraints = GenerationConstraints::default()
            .with_birth_date(date(1985, 10, 1))
            .with_age(20)
            .with_count(5);
        for id in generator.generate(&constraints).unwrap() {
            assert_eq!(&id[6..14], "19851001");
        }
    }

    #[test]
    fn test_generate_from_age() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 6);
        let ids = generator.generate(&GenerationConstraints::default().with_age(30)).unwrap();
        assert_eq!(&ids[0][6..14], "19940601");

        let ids = generator.generate(&GenerationConstraints::default().with_age(0)).unwrap();
        assert_eq!(&ids[0][6..14], "20240601");

        let ids = generator.generate(&GenerationConstraints::default().with_age(150)).unwrap();
        assert_eq!(&ids[0][6..14], "18740601");
    }

    #[test]
    fn test_generate_default_age_range() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 9);
        let ids = generator
            .generate(&GenerationConstraints::default().with_count(200))
            .unwrap();
        let earliest = date(1954, 6, 1);
        let latest = date(2006, 6, 1);
        for id in ids {
            let birth = parse_short_date(&id[6..14]).unwrap();
            assert!(birth >= earliest && birth <= latest, "birth {} out of range", birth);
        }
    }

    #[test]
    fn test_generate_rejects_bad_age() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 1);
        for age in [-1, 151, 1000] {
            let result = generator.generate(&GenerationConstraints::default().with_age(age));
            assert!(matches!(result, Err(IdError::ConstraintViolation(_))), "age {}", age);
        }
    }

    #[test]
    fn test_generate_rejects_zero_count() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 1);
        let result = generator.generate(&GenerationConstraints::default().with_count(0));
        assert!(matches!(result, Err(IdError::ConstraintViolation(_))));
    }

    #[test]
    fn test_generate_rejects_malformed_codes() {
        let registry = RegionRegistry::embedded();
        let mut generator = seeded(&registry, 1);
        let result = generator.generate(&GenerationConstraints::default().with_city("4403"));
        assert!(matches!(result, Err(IdError::ConstraintViolation(_))));
        let result = generator.generate(&GenerationConstraints::default().with_province("gd"));
        assert!(matches!(result, Err(IdError::ConstraintViolation(_))));
    }

    #[test]
    fn test_generate_deterministic_with_seed() {
        let registry = RegionRegistry::embedded();
        let constraints = GenerationConstraints::default().with_count(10);
        let a = seeded(&registry, 99).generate(&constraints).unwrap();
        let b = seeded(&registry, 99).generate(&constraints).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constraints_serde() {
        let json = r#"{"province_code":"440000","birth_date":"1990-01-01","gender":"female","count":3}"#;
        let constraints: GenerationConstraints = serde_json::from_str(json).unwrap();
        assert_eq!(constraints.province_code.as_deref(), Some("440000"));
        assert_eq!(constraints.birth_date, Some(date(1990, 1, 1)));
        assert_eq!(constraints.gender, Gender::Female);
        assert_eq!(constraints.count, 3);
        assert_eq!(constraints.age, None);

        let empty: GenerationConstraints = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, GenerationConstraints::default());
    }
}
