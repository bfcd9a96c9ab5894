//! Labels that qualify a forecast value: where the flux originates and which
//! water-balance component it is.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Origin of a flux within a lake basin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Land,
    Lake,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 2] = [SurfaceType::Land, SurfaceType::Lake];

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceType::Land => "land",
            SurfaceType::Lake => "lake",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(SurfaceType::Land),
            "lake" | "water" => Ok(SurfaceType::Lake),
            _ => Err(Error::UnknownSurfaceType(s.to_string())),
        }
    }
}

/// Water-balance component of net basin supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Precipitation,
    Evaporation,
    Runoff,
}

impl Component {
    pub const ALL: [Component; 3] = [
        Component::Precipitation,
        Component::Evaporation,
        Component::Runoff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Precipitation => "precipitation",
            Component::Evaporation => "evaporation",
            Component::Runoff => "runoff",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precipitation" | "precip" => Ok(Component::Precipitation),
            "evaporation" | "evap" => Ok(Component::Evaporation),
            "runoff" => Ok(Component::Runoff),
            _ => Err(Error::UnknownComponent(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_type_labels() {
        for surface in SurfaceType::ALL {
            assert_eq!(surface.as_str().parse::<SurfaceType>().unwrap(), surface);
        }
        assert_eq!("Water".parse::<SurfaceType>().unwrap(), SurfaceType::Lake);
        assert!(matches!(
            "ice".parse::<SurfaceType>(),
            Err(Error::UnknownSurfaceType(_))
        ));
    }

    #[test]
    fn test_component_labels() {
        for component in Component::ALL {
            assert_eq!(component.to_string().parse::<Component>().unwrap(), component);
        }
        assert_eq!("EVAP".parse::<Component>().unwrap(), Component::Evaporation);
        assert!(matches!(
            "snowmelt".parse::<Component>(),
            Err(Error::UnknownComponent(_))
        ));
    }
}
