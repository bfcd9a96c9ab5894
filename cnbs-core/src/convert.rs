//! Conversion between basin-average depth (mm over a month) and volumetric
//! flow rate (m³/s averaged over the same month).
//!
//! ```text
//! cms = (mm / 1000) × area / seconds_in_month
//! mm  = cms / area × seconds_in_month × 1000
//! ```

use crate::error::{Error, Result};
use crate::lake::{Lake, SurfaceAreaTable};
use crate::period::Period;
use serde::Serialize;
use std::fmt;

const MM_PER_M: f64 = 1000.0;

/// The unit a flux value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FluxUnit {
    /// Millimeters of water over the lake surface, accumulated over the period
    Depth,
    /// Cubic meters per second, averaged over the period
    FlowRate,
}

impl FluxUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluxUnit::Depth => "mm",
            FluxUnit::FlowRate => "cms",
        }
    }
}

impl fmt::Display for FluxUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value for one lake over one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FluxSample {
    pub period: Period,
    pub lake: Lake,
    pub value: f64,
}

/// Depth ↔ flow-rate converter over a surface-area table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FluxConverter {
    areas: SurfaceAreaTable,
}

impl FluxConverter {
    pub fn new(areas: SurfaceAreaTable) -> Self {
        Self { areas }
    }

    pub fn areas(&self) -> &SurfaceAreaTable {
        &self.areas
    }

    /// Millimeters over `period` to m³/s for `lake`.
    pub fn depth_to_flow_rate(&self, value_mm: f64, period: Period, lake: Lake) -> f64 {
        (value_mm / MM_PER_M) * self.areas.area(lake) / period.seconds() as f64
    }

    /// m³/s averaged over `period` to millimeters for `lake`.
    pub fn flow_rate_to_depth(&self, value_cms: f64, period: Period, lake: Lake) -> f64 {
        value_cms / self.areas.area(lake) * period.seconds() as f64 * MM_PER_M
    }

    /// Convert a raw (year, month, lake label) reading, validating each part.
    pub fn convert_raw(
        &self,
        value: f64,
        year: i32,
        month: u32,
        lake_label: &str,
        to: FluxUnit,
    ) -> Result<f64> {
        let period = Period::new(year, month)?;
        let lake: Lake = lake_label.parse()?;
        Ok(self.convert(value, period, lake, to))
    }

    /// Convert `value` into `to`, assuming it is currently in the other unit.
    pub fn convert(&self, value: f64, period: Period, lake: Lake, to: FluxUnit) -> f64 {
        match to {
            FluxUnit::FlowRate => self.depth_to_flow_rate(value, period, lake),
            FluxUnit::Depth => self.flow_rate_to_depth(value, period, lake),
        }
    }

    /// Convert a batch of depth samples to flow rates.
    pub fn depths_to_flow_rates(&self, samples: &[FluxSample]) -> Vec<FluxSample> {
        self.convert_samples(samples, FluxUnit::FlowRate)
    }

    /// Convert a batch of flow-rate samples to depths.
    pub fn flow_rates_to_depths(&self, samples: &[FluxSample]) -> Vec<FluxSample> {
        self.convert_samples(samples, FluxUnit::Depth)
    }

    fn convert_samples(&self, samples: &[FluxSample], to: FluxUnit) -> Vec<FluxSample> {
        samples
            .iter()
            .map(|s| FluxSample {
                value: self.convert(s.value, s.period, s.lake, to),
                ..*s
            })
            .collect()
    }
}

/// A column of a [`FluxTable`]: the raw label and the lake it was resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxColumn {
    pub label: String,
    pub lake: Lake,
}

/// A monthly table with one row per period and one column per lake series.
///
/// Column labels are resolved to a [`Lake`] when the table is built, so
/// conversion never inspects label text.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxTable {
    unit: FluxUnit,
    columns: Vec<FluxColumn>,
    rows: Vec<(Period, Vec<f64>)>,
}

impl FluxTable {
    /// Build an empty table, resolving every label with [`Lake::from_label`].
    pub fn new<S: AsRef<str>>(unit: FluxUnit, labels: &[S]) -> Result<Self> {
        let columns = labels
            .iter()
            .map(|label| {
                Ok(FluxColumn {
                    label: label.as_ref().trim().to_string(),
                    lake: Lake::from_label(label.as_ref())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            unit,
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row. `values` must have one entry per column.
    pub fn push_row(&mut self, period: Period, values: Vec<f64>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::ShapeMismatch {
                left: vec![self.columns.len()],
                right: vec![values.len()],
            });
        }
        self.rows.push((period, values));
        Ok(())
    }

    pub fn unit(&self) -> FluxUnit {
        self.unit
    }

    pub fn columns(&self) -> &[FluxColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[(Period, Vec<f64>)] {
        &self.rows
    }

    /// Iterate every cell as a [`FluxSample`].
    pub fn samples(&self) -> impl Iterator<Item = FluxSample> + '_ {
        self.rows.iter().flat_map(move |(period, values)| {
            self.columns
                .iter()
                .zip(values)
                .map(move |(column, value)| FluxSample {
                    period: *period,
                    lake: column.lake,
                    value: *value,
                })
        })
    }

    /// A copy of this table expressed in `to`. Converting to the current unit
    /// returns an unchanged copy.
    pub fn convert(&self, converter: &FluxConverter, to: FluxUnit) -> FluxTable {
        if to == self.unit {
            return self.clone();
        }
        let rows = self
            .rows
            .iter()
            .map(|(period, values)| {
                let converted = self
                    .columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| converter.convert(*value, *period, column.lake, to))
                    .collect();
                (*period, converted)
            })
            .collect::<Vec<_>>();
        log::debug!(
            "converted {} rows x {} columns from {} to {}",
            rows.len(),
            self.columns.len(),
            self.unit,
            to
        );
        FluxTable {
            unit: to,
            columns: self.columns.clone(),
            rows,
        }
    }
}
