//! Province and city reference data
//!
//! The registry is built once from a line-oriented dataset
//! (`code|name|level`) and is read-only afterwards, so a single instance can
//! be shared by reference across threads.

mod dataset;
mod registry;

use serde::{Deserialize, Serialize};

pub use dataset::{DatasetRecord, RegionLevel, EMBEDDED_DATASET};
pub use registry::RegionRegistry;

/// A province or city: 6-digit division code plus display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// 6-digit administrative division code
    pub code: String,
    /// Display name
    pub name: String,
}

impl Region {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Code of the owning province (`XX0000`)
    pub fn province_code(&self) -> String {
        province_code_of(&self.code)
    }
}

/// Province code (`XX0000`) for any code of at least two characters
pub(crate) fn province_code_of(code: &str) -> String {
    let prefix: String = code.chars().take(2).collect();
    format!("{}0000", prefix)
}

/// Prefecture-level code (`XXXX00`) for a 6-digit code
pub(crate) fn prefecture_code_of(code: &str) -> String {
    let prefix: String = code.chars().take(4).collect();
    format!("{}00", prefix)
}

/// True if `code` is exactly six ASCII digits
pub fn is_region_code(code: &str) -> bool {
    code.len() == crate::REGION_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
