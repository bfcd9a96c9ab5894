//! Unit conversion and derived quantities for Great Lakes net basin supply.
//!
//! Everything in this crate is a pure function or an immutable value type,
//! safe to share between threads:
//!
//! - [`period`] - calendar months and the seconds they span
//! - [`lake`] - the four basins and their surface areas
//! - [`convert`] - depth (mm) ↔ flow rate (m³/s) conversion
//! - [`grid`] - cell areas on a regular lon/lat grid
//! - [`evaporation`] - evaporation rate from latent heat flux
//! - [`run`] - forecast-run identifiers and the six-hourly cycle
//! - [`forecast`] - surface type and component labels
//!
//! # Usage
//!
//! ```rust
//! use cnbs_core::{FluxConverter, Lake, Period};
//!
//! let converter = FluxConverter::default();
//! let january = Period::new(2024, 1).unwrap();
//! let cms = converter.depth_to_flow_rate(42.0, january, Lake::Erie);
//! let mm = converter.flow_rate_to_depth(cms, january, Lake::Erie);
//! assert!((mm - 42.0).abs() < 1e-9);
//! ```

pub mod convert;
pub mod error;
pub mod evaporation;
pub mod forecast;
pub mod grid;
pub mod lake;
pub mod period;
pub mod run;

pub use convert::{FluxColumn, FluxConverter, FluxSample, FluxTable, FluxUnit};
pub use error::{Error, Result};
pub use forecast::{Component, SurfaceType};
pub use lake::{Lake, SurfaceAreaTable};
pub use period::{seconds_in_month, Period};
pub use run::{next_run, RunId};
