//! Evaporation mass flux from latent heat flux.
//!
//! The latent heat of vaporization follows Allen et al. (1998):
//! `λ = 2.501 − 0.002361 · T` with `T` in °C and `λ` in MJ/kg. Dividing the
//! latent heat flux (converted to MJ/(m²·s)) by `λ` gives kg/(m²·s), which is
//! numerically mm of water per second.
//!
//! Temperatures are not range-checked.

use crate::error::{Error, Result};
use crate::period::Period;
use ndarray::{Array, ArrayView, Dimension, Zip};

pub const KELVIN_OFFSET: f64 = 273.15;
const LAMBDA_AT_ZERO_C: f64 = 2.501;
const LAMBDA_SLOPE: f64 = 0.002361;
const MJ_PER_J: f64 = 1e-6;

/// Latent heat of vaporization in MJ/kg at `temperature_k`.
pub fn latent_heat_of_vaporization(temperature_k: f64) -> f64 {
    LAMBDA_AT_ZERO_C - LAMBDA_SLOPE * (temperature_k - KELVIN_OFFSET)
}

/// Evaporation rate in kg/(m²·s) from temperature (K) and latent heat flux (W/m²).
pub fn evaporation_rate(temperature_k: f64, latent_heat_flux: f64) -> f64 {
    latent_heat_flux * MJ_PER_J / latent_heat_of_vaporization(temperature_k)
}

/// Element-wise [`evaporation_rate`] over arrays of any dimension.
///
/// Both inputs must have the same shape.
pub fn evaporation_rates<D: Dimension>(
    temperature_k: ArrayView<'_, f64, D>,
    latent_heat_flux: ArrayView<'_, f64, D>,
) -> Result<Array<f64, D>> {
    if temperature_k.shape() != latent_heat_flux.shape() {
        return Err(Error::ShapeMismatch {
            left: temperature_k.shape().to_vec(),
            right: latent_heat_flux.shape().to_vec(),
        });
    }
    Ok(Zip::from(temperature_k)
        .and(latent_heat_flux)
        .map_collect(|&t, &lhf| evaporation_rate(t, lhf)))
}

/// Depth of water (mm) evaporated over `period` at a constant rate in kg/(m²·s).
pub fn evaporation_depth_mm(rate: f64, period: Period) -> f64 {
    rate * period.seconds() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_zero_flux_is_zero() {
        assert_eq!(evaporation_rate(273.15, 0.0), 0.0);
        assert_eq!(evaporation_rate(300.0, 0.0), 0.0);
    }

    #[test]
    fn test_freezing_point_lambda() {
        assert_relative_eq!(latent_heat_of_vaporization(273.15), 2.501, max_relative = 1e-12);
        // 100 W/m² at 0 °C
        assert_relative_eq!(
            evaporation_rate(273.15, 100.0),
            100.0e-6 / 2.501,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_linear_in_flux() {
        let t = 288.0;
        let base = evaporation_rate(t, 50.0);
        for k in [2.0, 3.5, -1.0, 10.0] {
            assert_relative_eq!(evaporation_rate(t, 50.0 * k), base * k, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_warmer_air_evaporates_more_per_watt() {
        assert!(evaporation_rate(303.15, 100.0) > evaporation_rate(273.15, 100.0));
    }

    #[test]
    fn test_array_matches_scalar() {
        let t = arr2(&[[270.0, 280.0], [290.0, 300.0]]);
        let lhf = arr2(&[[10.0, 20.0], [30.0, 40.0]]);
        let rates = evaporation_rates(t.view(), lhf.view()).unwrap();
        assert_eq!(rates.dim(), (2, 2));
        for ((r, tk), l) in rates.iter().zip(t.iter()).zip(lhf.iter()) {
            assert_eq!(*r, evaporation_rate(*tk, *l));
        }
    }

    #[test]
    fn test_array_shape_mismatch() {
        let t = arr1(&[280.0, 281.0, 282.0]);
        let lhf = arr1(&[10.0, 20.0]);
        assert_eq!(
            evaporation_rates(t.view(), lhf.view()),
            Err(Error::ShapeMismatch { left: vec![3], right: vec![2] })
        );
    }

    #[test]
    fn test_monthly_depth() {
        let june = Period::new(2023, 6).unwrap();
        let rate = 1e-5;
        assert_relative_eq!(
            evaporation_depth_mm(rate, june),
            1e-5 * 30.0 * 86_400.0,
            max_relative = 1e-12
        );
    }
}
