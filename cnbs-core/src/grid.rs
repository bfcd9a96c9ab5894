//! Surface area of cells on a regular longitude/latitude grid.
//!
//! The spacing is taken from the first two coordinates of each axis and
//! applied to every row and column, so the result is only meaningful for
//! regularly spaced grids. Irregular grids are not detected.

use crate::error::{Error, Result};
use ndarray::Array2;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Cell areas in m², shaped `[latitudes.len(), longitudes.len()]`.
///
/// `area[i][j] = R² · |Δφ| · |Δλ| · cos(φᵢ)` with `Δφ`, `Δλ` in radians.
/// Unlike the plain formula, which keeps the sign of `lat[1] - lat[0]` and so
/// yields negative areas for grids stored north-to-south (as most forecast
/// products are), the spacings here are taken as magnitudes.
pub fn cell_areas(longitudes: &[f64], latitudes: &[f64]) -> Result<Array2<f64>> {
    let dlon = first_spacing("longitude", longitudes)?;
    let dlat = first_spacing("latitude", latitudes)?;
    let scale = EARTH_RADIUS_M * EARTH_RADIUS_M * dlat * dlon;

    let row_factor: Vec<f64> = latitudes.iter().map(|lat| lat.to_radians().cos()).collect();
    Ok(Array2::from_shape_fn(
        (latitudes.len(), longitudes.len()),
        |(i, _)| scale * row_factor[i],
    ))
}

/// Area of a cell at the equator for the given spacings in degrees.
pub fn equatorial_cell_area(dlon_deg: f64, dlat_deg: f64) -> f64 {
    EARTH_RADIUS_M * EARTH_RADIUS_M * dlat_deg.to_radians().abs() * dlon_deg.to_radians().abs()
}

fn first_spacing(axis: &'static str, coords: &[f64]) -> Result<f64> {
    match coords {
        [first, second, ..] => Ok((second - first).to_radians().abs()),
        _ => Err(Error::InvalidGrid {
            axis,
            points: coords.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_shape() {
        let lons = axis(-92.0, 2.0, 7);
        let lats = axis(40.0, 2.0, 4);
        let areas = cell_areas(&lons, &lats).unwrap();
        assert_eq!(areas.dim(), (4, 7));
    }

    #[test]
    fn test_equator_cell() {
        let lons = axis(0.0, 2.0, 3);
        let lats = axis(-4.0, 2.0, 5);
        let areas = cell_areas(&lons, &lats).unwrap();
        let expected = EARTH_RADIUS_M.powi(2) * 2f64.to_radians() * 2f64.to_radians();
        // Row 2 is latitude 0
        for j in 0..3 {
            assert_relative_eq!(areas[[2, j]], expected, max_relative = 1e-12);
        }
        assert_relative_eq!(equatorial_cell_area(2.0, 2.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_decreases_poleward() {
        let lons = axis(0.0, 2.0, 2);
        let lats = axis(-88.0, 2.0, 89);
        let areas = cell_areas(&lons, &lats).unwrap();
        let equator = 44;
        assert_eq!(lats[equator], 0.0);
        for i in equator..lats.len() - 1 {
            assert!(areas[[i + 1, 0]] < areas[[i, 0]], "north of row {}", i);
        }
        for i in 1..=equator {
            assert!(areas[[i - 1, 0]] < areas[[i, 0]], "south of row {}", i);
        }
    }

    #[test]
    fn test_descending_latitudes_are_positive() {
        let lons = axis(270.0, 1.0, 3);
        let lats = axis(50.0, -1.0, 4);
        let areas = cell_areas(&lons, &lats).unwrap();
        assert!(areas.iter().all(|a| *a > 0.0));
        assert!(areas[[3, 0]] > areas[[0, 0]]);
    }

    #[test]
    fn test_uses_first_spacing_only() {
        let lons = [0.0, 1.0, 5.0];
        let lats = [10.0, 11.0, 30.0];
        let areas = cell_areas(&lons, &lats).unwrap();
        let one_deg = 1f64.to_radians();
        let expected = EARTH_RADIUS_M.powi(2) * one_deg * one_deg * 30f64.to_radians().cos();
        assert_relative_eq!(areas[[2, 2]], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(
            cell_areas(&[0.0], &[0.0, 1.0]),
            Err(Error::InvalidGrid { axis: "longitude", points: 1 })
        );
        assert_eq!(
            cell_areas(&[0.0, 1.0], &[]),
            Err(Error::InvalidGrid { axis: "latitude", points: 0 })
        );
    }
}
