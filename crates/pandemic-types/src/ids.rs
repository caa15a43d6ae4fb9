//! Region identifier.
//!
//! Region ids arrive from three sources (CSV tables, the GeoPackage feature
//! table, and JSON templates) with different native types. They are all
//! coerced to a [`RegionId`] string so that `35060001`, `"35060001"` and
//! `35060001.0` name the same region.

use std::borrow::Borrow;

use serde::{Deserialize, Deserializer, Serialize};

/// String identifier of a region (dissemination area, health unit, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Create an identifier from any string-like value, trimming whitespace.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_owned())
    }

    /// Create an identifier from an integer column value.
    pub fn from_integer(id: i64) -> Self {
        Self(id.to_string())
    }

    /// Create an identifier from a floating point column value.
    ///
    /// Whole numbers are printed without a fractional part, which is how
    /// integer ids look after passing through a float-typed column.
    pub fn from_float(id: f64) -> Self {
        if id.is_finite() && id.fract().abs() < f64::EPSILON && id.abs() < 9.0e15 {
            #[allow(clippy::cast_possible_truncation)]
            let whole = id as i64;
            Self::from_integer(whole)
        } else {
            Self(id.to_string())
        }
    }

    /// Id from a table cell. Whole numbers written with a trailing `.0`
    /// (float-typed id columns) lose the fraction, so `"123.0"` and `123`
    /// name the same region.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.split_once('.') {
            Some((whole, fraction))
                if !whole.is_empty()
                    && whole.bytes().all(|b| b.is_ascii_digit())
                    && !fraction.is_empty()
                    && fraction.bytes().all(|b| b == b'0') =>
            {
                Self::new(whole)
            }
            _ => Self::new(trimmed),
        }
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self::new(text),
            RawId::Integer(value) => Self::from_integer(value),
            RawId::Float(value) => Self::from_float(value),
        })
    }
}
