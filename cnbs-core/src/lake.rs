//! The Great Lakes basins and their surface areas.
//!
//! Michigan and Huron are hydraulically one lake and are always treated as a
//! single basin. Its area is the Michigan constant plus a Huron sub-basin
//! constant, and the reference tables disagree on the latter:
//! [`HURON_SUB_BASIN_KM2_REFERENCE`] (5,956 km²) is what the historical
//! conversions used, while [`HURON_SUB_BASIN_KM2_ALTERNATE`] (59,560 km²) is
//! the likely intended figure. The default table keeps the reference value so
//! that converted values match previously cached data; use
//! [`SurfaceAreaTable::with_huron_sub_basin`] to switch.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Square meters per square kilometer.
pub const M2_PER_KM2: f64 = 1_000_000.0;

pub const SUPERIOR_KM2: f64 = 82_097.0;
pub const MICHIGAN_KM2: f64 = 57_753.0;
pub const HURON_SUB_BASIN_KM2_REFERENCE: f64 = 5_956.0;
pub const HURON_SUB_BASIN_KM2_ALTERNATE: f64 = 59_560.0;
pub const ERIE_KM2: f64 = 25_655.0;
pub const ONTARIO_KM2: f64 = 19_009.0;

/// One of the four Great Lakes basins used for net basin supply accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lake {
    Superior,
    MichiganHuron,
    Erie,
    Ontario,
}

impl Lake {
    pub const ALL: [Lake; 4] = [Lake::Superior, Lake::MichiganHuron, Lake::Erie, Lake::Ontario];

    /// Canonical label, also the text stored in the forecast cache.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lake::Superior => "superior",
            Lake::MichiganHuron => "michigan-huron",
            Lake::Erie => "erie",
            Lake::Ontario => "ontario",
        }
    }

    /// Three-letter abbreviation used in older column labels.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Lake::Superior => "sup",
            Lake::MichiganHuron => "mih",
            Lake::Erie => "eri",
            Lake::Ontario => "ont",
        }
    }

    /// Resolve a raw column label such as `erie_lake_precip` or `mih` to a lake.
    ///
    /// This is the one place where labels are matched by prefix. Callers do it
    /// once when a table is ingested and carry the [`Lake`] from then on.
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        Lake::ALL
            .iter()
            .find(|lake| normalized.starts_with(lake.as_str()))
            .or_else(|| {
                Lake::ALL
                    .iter()
                    .find(|lake| normalized.starts_with(lake.abbreviation()))
            })
            .copied()
            .ok_or_else(|| Error::UnknownLake(label.to_string()))
    }

    fn index(&self) -> usize {
        match self {
            Lake::Superior => 0,
            Lake::MichiganHuron => 1,
            Lake::Erie => 2,
            Lake::Ontario => 3,
        }
    }
}

impl fmt::Display for Lake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lake {
    type Err = Error;

    /// Exact match on the canonical label or abbreviation, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Lake::ALL
            .iter()
            .find(|lake| lake.as_str() == normalized || lake.abbreviation() == normalized)
            .copied()
            .ok_or_else(|| Error::UnknownLake(s.to_string()))
    }
}

/// Per-lake surface areas in m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceAreaTable {
    areas_m2: [f64; 4],
}

impl Default for SurfaceAreaTable {
    fn default() -> Self {
        Self {
            areas_m2: [
                SUPERIOR_KM2 * M2_PER_KM2,
                (MICHIGAN_KM2 + HURON_SUB_BASIN_KM2_REFERENCE) * M2_PER_KM2,
                ERIE_KM2 * M2_PER_KM2,
                ONTARIO_KM2 * M2_PER_KM2,
            ],
        }
    }
}

impl SurfaceAreaTable {
    /// Surface area of `lake` in m².
    pub fn area(&self, lake: Lake) -> f64 {
        self.areas_m2[lake.index()]
    }

    /// Replace the area of one lake.
    pub fn with_area(mut self, lake: Lake, area_m2: f64) -> Result<Self> {
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return Err(Error::InvalidArea {
                lake: lake.to_string(),
                area: area_m2,
            });
        }
        log::debug!("surface area for {} set to {} m²", lake, area_m2);
        self.areas_m2[lake.index()] = area_m2;
        Ok(self)
    }

    /// Recompute Michigan-Huron as Michigan plus the given Huron sub-basin area (km²).
    pub fn with_huron_sub_basin(self, huron_km2: f64) -> Result<Self> {
        self.with_area(Lake::MichiganHuron, (MICHIGAN_KM2 + huron_km2) * M2_PER_KM2)
    }
}
