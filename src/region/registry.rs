//! Province/city registry

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, warn};

use super::dataset::{DatasetRecord, RegionLevel, DEFAULT_TABLE, EMBEDDED_DATASET};
use super::{prefecture_code_of, province_code_of, Region};
use crate::error::{IdError, Result};

lazy_static! {
    static ref GLOBAL_REGISTRY: RegionRegistry = RegionRegistry::embedded();
}

/// Immutable lookup of province and city codes and display names
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    /// Provinces in dataset order
    provinces: Vec<Region>,
    /// Province code -> cities in dataset order
    cities: HashMap<String, Vec<Region>>,
}

impl RegionRegistry {
    /// Process-wide registry built from the embedded dataset on first access
    pub fn global() -> &'static RegionRegistry {
        &GLOBAL_REGISTRY
    }

    /// Build from the embedded dataset, substituting the default table if it
    /// yields no provinces
    pub fn embedded() -> Self {
        Self::from_reader(EMBEDDED_DATASET.as_bytes()).unwrap_or_else(|e| {
            warn!("Embedded region dataset unusable ({}), using default table", e);
            Self::default_table()
        })
    }

    /// Hard-coded minimal province/city table
    pub fn default_table() -> Self {
        let mut registry = Self::default();
        let mut orphans = Vec::new();
        for (code, name, level) in DEFAULT_TABLE {
            let record = DatasetRecord {
                code: code.to_string(),
                name: name.to_string(),
                level: *level,
            };
            registry.insert(record, &mut orphans);
        }
        registry.attach_orphans(orphans);
        registry
    }

    /// Load a dataset file.
    ///
    /// # Errors
    /// [`IdError::DatasetLoad`] if the file cannot be opened or read, or
    /// contains no province records.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| IdError::DatasetLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset file, falling back to the default table on any failure
    pub fn from_path_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Region dataset not loaded ({}), using default table", e);
                Self::default_table()
            }
        }
    }

    /// Read `code|name|level` records from any buffered source.
    ///
    /// Malformed lines are skipped. Cities may appear before their province;
    /// they are attached once the whole source has been read. A read error
    /// discards everything read so far: the caller gets either a complete
    /// registry or an error.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut registry = Self::default();
        let mut orphans = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                IdError::DatasetLoad(format!("read failed at line {}: {}", index + 1, e))
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match DatasetRecord::parse(trimmed) {
                Some(record) => {
                    if !registry.insert(record, &mut orphans) {
                        skipped += 1;
                    }
                }
                None => {
                    debug!("Skipping malformed region line {}: {:?}", index + 1, trimmed);
                    skipped += 1;
                }
            }
        }
        skipped += registry.attach_orphans(orphans);

        if registry.provinces.is_empty() {
            return Err(IdError::DatasetLoad("no province records".to_string()));
        }

        debug!(
            "Loaded {} provinces, {} cities ({} lines skipped)",
            registry.provinces.len(),
            registry.cities.values().map(Vec::len).sum::<usize>(),
            skipped
        );
        Ok(registry)
    }

    /// Register one record; returns false if it was ignored.
    ///
    /// A city whose province is not registered yet is parked in `orphans`.
    fn insert(&mut self, record: DatasetRecord, orphans: &mut Vec<Region>) -> bool {
        match record.level {
            RegionLevel::Province => {
                if self.cities.contains_key(&record.code) {
                    debug!("Duplicate province {} ignored", record.code);
                    return false;
                }
                self.cities.insert(record.code.clone(), Vec::new());
                self.provinces.push(Region::new(record.code, record.name));
                true
            }
            RegionLevel::City => {
                let city = Region::new(record.code, record.name);
                match self.cities.get_mut(&city.province_code()) {
                    Some(list) => list.push(city),
                    None => orphans.push(city),
                }
                true
            }
        }
    }

    /// Attach parked cities to provinces registered later in the source;
    /// returns how many still had no province and were dropped
    fn attach_orphans(&mut self, orphans: Vec<Region>) -> usize {
        let mut dropped = 0;
        for city in orphans {
            let owner = city.province_code();
            match self.cities.get_mut(&owner) {
                Some(list) => list.push(city),
                None => {
                    debug!("City {} has no registered province {}", city.code, owner);
                    dropped += 1;
                }
            }
        }
        dropped
    }

    /// Province display names in dataset order
    pub fn province_names(&self) -> Vec<String> {
        self.provinces.iter().map(|p| p.name.clone()).collect()
    }

    /// Code of the province with this display name
    pub fn province_code(&self, name: &str) -> Option<&str> {
        self.provinces
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.code.as_str())
    }

    /// Display name of a province code
    pub fn province_name(&self, code: &str) -> Option<&str> {
        self.provinces
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.name.as_str())
    }

    /// Cities of a province; empty if the province is unknown or childless
    pub fn cities(&self, province_code: &str) -> &[Region] {
        self.cities
            .get(province_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// City display names of a province; empty if unknown or childless
    pub fn city_names(&self, province_code: &str) -> Vec<String> {
        self.cities(province_code)
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Code of a city by display name within a province
    pub fn city_code(&self, province_code: &str, city_name: &str) -> Option<&str> {
        self.cities(province_code)
            .iter()
            .find(|c| c.name == city_name)
            .map(|c| c.code.as_str())
    }

    /// Resolve a 6-digit region code to (province name, city name).
    ///
    /// The city is matched exactly first, then by its prefecture prefix
    /// (`XXXX00`), so district-level codes still name their city.
    pub fn describe(&self, region_code: &str) -> (Option<&str>, Option<&str>) {
        let province_code = province_code_of(region_code);
        let province = self.province_name(&province_code);

        let cities = self.cities(&province_code);
        let prefecture = prefecture_code_of(region_code);
        let city = cities
            .iter()
            .find(|c| c.code == region_code)
            .or_else(|| cities.iter().find(|c| c.code == prefecture))
            .map(|c| c.name.as_str());

        (province, city)
    }

    /// Number of registered provinces
    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }
}
