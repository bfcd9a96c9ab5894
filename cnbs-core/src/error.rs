/// Error types for the conversion engine and forecast-run types
use thiserror::Error;

/// Main error type for CNBS core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Month outside 1..=12 or a non-positive year
    #[error("Invalid calendar period: year {year}, month {month}")]
    InvalidPeriod { year: i32, month: u32 },

    /// A grid axis has too few coordinates to derive a spacing
    #[error("Invalid grid: {axis} axis has {points} point(s), need at least 2")]
    InvalidGrid { axis: &'static str, points: usize },

    /// A lake label that does not name any Great Lakes basin
    #[error("Unknown lake: {0}")]
    UnknownLake(String),

    /// Surface area override that is not a positive, finite number
    #[error("Invalid surface area for {lake}: {area} m²")]
    InvalidArea { lake: String, area: f64 },

    /// A forecast-run identifier that is not a YYYYMMDDHH cycle time
    #[error("Invalid forecast run identifier: {0}")]
    InvalidRun(i64),

    /// Text that is not an integer run identifier
    #[error("Failed to parse forecast run identifier: {0}")]
    UnparsableRun(String),

    /// Surface type label other than land or lake
    #[error("Unknown surface type: {0}")]
    UnknownSurfaceType(String),

    /// Component label that names no known flux component
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Element-wise inputs with different shapes
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// The scheduler has no prior run to advance from
    #[error("No forecast run stored; an initial run must be supplied")]
    EmptyStore,
}

/// Type alias for Results using the core Error
pub type Result<T> = std::result::Result<T, Error>;
