//! Grid cell areas and evaporation from model fields.

use cnbs_core::{
    evaporation::{evaporation_depth_mm, evaporation_rate, latent_heat_of_vaporization},
    grid::cell_areas,
    Period,
};
use log::info;
use std::io::Write;

/// Write the cell area grid as CSV: one row per latitude, one column per longitude.
pub fn run_cell_areas(
    longitudes: &[f64],
    latitudes: &[f64],
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let areas = cell_areas(longitudes, latitudes)?;
    info!(
        "Computed {}x{} cell areas, total {:.3e} m²",
        areas.nrows(),
        areas.ncols(),
        areas.sum()
    );

    let mut wtr = csv::Writer::from_writer(out);
    let mut header = vec!["lat".to_string()];
    header.extend(longitudes.iter().map(|lon| lon.to_string()));
    wtr.write_record(&header)?;
    for (lat, row) in latitudes.iter().zip(areas.rows()) {
        let mut record = vec![lat.to_string()];
        record.extend(row.iter().map(|a| a.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Print the evaporation rate, and the monthly depth when a month is given.
pub fn run_evaporation(
    temperature_k: f64,
    latent_heat_flux: f64,
    period: Option<(i32, u32)>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let rate = evaporation_rate(temperature_k, latent_heat_flux);
    info!(
        "Latent heat of vaporization at {} K: {:.4} MJ/kg",
        temperature_k,
        latent_heat_of_vaporization(temperature_k)
    );
    writeln!(out, "rate_kg_m2_s\t{}", rate)?;
    if let Some((year, month)) = period {
        let period = Period::new(year, month)?;
        writeln!(out, "depth_mm\t{}", evaporation_depth_mm(rate, period))?;
    }
    Ok(())
}
