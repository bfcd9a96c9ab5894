//! Monthly lake tables in CSV and the `convert` command.
//!
//! Tables have a `year,month` prefix followed by one column per lake series:
//!
//! ```text
//! year,month,superior_precip,erie_evap
//! 2024,1,1520.4,310.2
//! ```
//!
//! Column labels are resolved to lakes once, when the header is read.

use anyhow::Context;
use cnbs_core::{FluxConverter, FluxTable, FluxUnit, Period, SurfaceAreaTable};
use log::info;
use std::io::Write;

/// Parse a monthly lake table whose values are in `unit`.
pub fn read_flux_table(csv_data: &str, unit: FluxUnit) -> anyhow::Result<FluxTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers = rdr.headers()?.clone();
    let prefix: Vec<String> = headers
        .iter()
        .take(2)
        .map(|h| h.to_ascii_lowercase())
        .collect();
    if prefix != ["year", "month"] {
        anyhow::bail!("table must start with year,month columns, found {:?}", prefix);
    }
    let labels: Vec<&str> = headers.iter().skip(2).collect();
    let mut table = FluxTable::new(unit, &labels)?;

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let row = line + 2;
        let year: i32 = record
            .get(0)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("row {}: invalid year", row))?;
        let month: u32 = record
            .get(1)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("row {}: invalid month", row))?;
        let period = Period::new(year, month).with_context(|| format!("row {}", row))?;
        let values = record
            .iter()
            .skip(2)
            .map(|v| {
                v.parse::<f64>()
                    .with_context(|| format!("row {}: invalid value {:?}", row, v))
            })
            .collect::<anyhow::Result<Vec<f64>>>()?;
        table
            .push_row(period, values)
            .with_context(|| format!("row {}", row))?;
    }
    Ok(table)
}

/// Write `table` in the same layout [`read_flux_table`] reads.
pub fn write_flux_table<W: Write>(table: &FluxTable, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["year".to_string(), "month".to_string()];
    header.extend(table.columns().iter().map(|c| c.label.clone()));
    wtr.write_record(&header)?;
    for (period, values) in table.rows() {
        let mut record = vec![period.year().to_string(), period.month().to_string()];
        record.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Build the surface-area table, applying a Huron sub-basin override if given.
pub fn surface_areas(huron_km2: Option<f64>) -> anyhow::Result<SurfaceAreaTable> {
    let table = SurfaceAreaTable::default();
    Ok(match huron_km2 {
        Some(km2) => {
            info!("Using Huron sub-basin area of {} km²", km2);
            table.with_huron_sub_basin(km2)?
        }
        None => table,
    })
}

fn opposite(unit: FluxUnit) -> FluxUnit {
    match unit {
        FluxUnit::Depth => FluxUnit::FlowRate,
        FluxUnit::FlowRate => FluxUnit::Depth,
    }
}

/// Convert the table in `input` to `to`, writing CSV to `output` or `out`.
pub fn run_convert(
    input: &str,
    output: Option<&str>,
    to: FluxUnit,
    huron_km2: Option<f64>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let csv_data =
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?;
    let table = read_flux_table(&csv_data, opposite(to))?;
    let converter = FluxConverter::new(surface_areas(huron_km2)?);
    let converted = table.convert(&converter, to);

    info!(
        "Converted {} rows x {} lakes from {} to {}",
        converted.rows().len(),
        converted.columns().len(),
        table.unit(),
        to
    );

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path))?;
            write_flux_table(&converted, file)?;
            info!("Conversion complete. Output: {}", path);
        }
        None => write_flux_table(&converted, out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cnbs_core::Lake;

    const CMS: &str = "\
year,month,superior_precip,michigan-huron_precip,erie_evap
2023,12,1500.0,2100.0,300.0
2024,2,1400.0,2000.0,250.0
";

    #[test]
    fn read_resolves_lakes() {
        let table = read_flux_table(CMS, FluxUnit::FlowRate).unwrap();
        let lakes: Vec<Lake> = table.columns().iter().map(|c| c.lake).collect();
        assert_eq!(lakes, vec![Lake::Superior, Lake::MichiganHuron, Lake::Erie]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1].0, Period::new(2024, 2).unwrap());
    }

    #[test]
    fn read_rejects_bad_tables() {
        assert!(read_flux_table("month,year,erie\n1,2024,3.0\n", FluxUnit::Depth).is_err());
        assert!(read_flux_table("year,month,huron\n2024,1,3.0\n", FluxUnit::Depth).is_err());
        assert!(read_flux_table("year,month,erie\n2024,13,3.0\n", FluxUnit::Depth).is_err());
        assert!(read_flux_table("year,month,erie\n2024,1,---\n", FluxUnit::Depth).is_err());
    }

    #[test]
    fn convert_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cms_path = dir.path().join("cms.csv");
        let mm_path = dir.path().join("mm.csv");
        let back_path = dir.path().join("back.csv");
        std::fs::write(&cms_path, CMS).unwrap();

        let mut sink = Vec::new();
        run_convert(
            cms_path.to_str().unwrap(),
            Some(mm_path.to_str().unwrap()),
            FluxUnit::Depth,
            None,
            &mut sink,
        )
        .unwrap();
        run_convert(
            mm_path.to_str().unwrap(),
            Some(back_path.to_str().unwrap()),
            FluxUnit::FlowRate,
            None,
            &mut sink,
        )
        .unwrap();
        assert!(sink.is_empty(), "Nothing is printed when an output file is given");

        let mm = read_flux_table(&std::fs::read_to_string(&mm_path).unwrap(), FluxUnit::Depth)
            .unwrap();
        let expected = FluxConverter::default().flow_rate_to_depth(
            300.0,
            Period::new(2023, 12).unwrap(),
            Lake::Erie,
        );
        assert_relative_eq!(mm.rows()[0].1[2], expected, max_relative = 1e-12);

        let original = read_flux_table(CMS, FluxUnit::FlowRate).unwrap();
        let back =
            read_flux_table(&std::fs::read_to_string(&back_path).unwrap(), FluxUnit::FlowRate)
                .unwrap();
        for (a, b) in original.samples().zip(back.samples()) {
            assert_relative_eq!(a.value, b.value, max_relative = 1e-9);
        }
    }

    #[test]
    fn convert_to_stdout_with_huron_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mm.csv");
        std::fs::write(&path, "year,month,mih\n2024,1,10.0\n").unwrap();

        let mut out = Vec::new();
        run_convert(path.to_str().unwrap(), None, FluxUnit::FlowRate, Some(59_560.0), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let table = read_flux_table(&text, FluxUnit::FlowRate).unwrap();
        let expected = 0.01 * 117_313e6 / (31.0 * 86_400.0);
        assert_relative_eq!(table.rows()[0].1[0], expected, max_relative = 1e-12);
    }
}
