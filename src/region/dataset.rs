//! Dataset line format and the embedded default sources

use super::is_region_code;

/// Region dataset compiled into the crate
pub const EMBEDDED_DATASET: &str = include_str!("regions.txt");

/// Minimal table substituted when a dataset source cannot be loaded
pub(crate) const DEFAULT_TABLE: &[(&str, &str, RegionLevel)] = &[
    ("110000", "北京市", RegionLevel::Province),
    ("110101", "东城区", RegionLevel::City),
    ("110105", "朝阳区", RegionLevel::City),
    ("110108", "海淀区", RegionLevel::City),
    ("310000", "上海市", RegionLevel::Province),
    ("310101", "黄浦区", RegionLevel::City),
    ("310115", "浦东新区", RegionLevel::City),
    ("440000", "广东省", RegionLevel::Province),
    ("440100", "广州市", RegionLevel::City),
    ("440300", "深圳市", RegionLevel::City),
    ("330000", "浙江省", RegionLevel::Province),
    ("330100", "杭州市", RegionLevel::City),
    ("330200", "宁波市", RegionLevel::City),
];

/// Level column of a dataset record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLevel {
    Province,
    City,
}

impl RegionLevel {
    fn from_field(field: &str) -> Option<Self> {
        match field.trim() {
            "1" => Some(RegionLevel::Province),
            "2" => Some(RegionLevel::City),
            _ => None,
        }
    }
}

/// One parsed `code|name|level` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRecord {
    pub code: String,
    pub name: String,
    pub level: RegionLevel,
}

impl DatasetRecord {
    /// Parse a dataset line.
    ///
    /// Returns None for blank lines, `#` comments and lines with fewer than
    /// three `|`-separated fields. Lines that do have three fields are also
    /// rejected when the code is not six ASCII digits, the name is empty or
    /// the level is neither `1` nor `2`: such a record could never be looked
    /// up or placed under a province, so it is dropped like a short line.
    /// Extra trailing fields are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut fields = line.split('|');
        let code = fields.next()?.trim();
        let name = fields.next()?.trim();
        let level = RegionLevel::from_field(fields.next()?)?;

        if !is_region_code(code) || name.is_empty() {
            return None;
        }

        Some(Self {
            code: code.to_string(),
            name: name.to_string(),
            level,
        })
    }
}
