//! Command implementations for the CNBS CLI.
//!
//! Subcommands convert monthly lake tables between depth and flow rate,
//! manage the forecast cache, and compute grid cell areas and evaporation.

use clap::{Subcommand, ValueEnum};
use cnbs_core::FluxUnit;
use std::io::Write;

pub mod cache;
pub mod convert;
pub mod derived;

use cache::{CacheArgs, KeyArgs};

/// Unit to convert a table into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Basin depth in millimeters
    Depth,
    /// Flow rate in cubic meters per second
    FlowRate,
}

impl From<Target> for FluxUnit {
    fn from(target: Target) -> Self {
        match target {
            Target::Depth => FluxUnit::Depth,
            Target::FlowRate => FluxUnit::FlowRate,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a monthly lake table between mm and m³/s
    Convert {
        /// Input CSV with year,month and one column per lake
        #[arg(short, long)]
        input: String,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Unit to convert into; the input holds the other unit
        #[arg(long, value_enum)]
        to: Target,

        /// Huron sub-basin area in km² used for Michigan-Huron
        #[arg(long)]
        huron_km2: Option<f64>,
    },

    /// Load forecast records from CSV into the cache
    Load {
        #[command(flatten)]
        cache: CacheArgs,

        /// CSV with cfs_run,year,month,lake,surface_type,component,value_mm
        #[arg(long)]
        csv: String,

        /// Skip records whose key is already cached instead of failing
        #[arg(long)]
        skip_existing: bool,
    },

    /// Look up one cached value
    Get {
        #[command(flatten)]
        cache: CacheArgs,

        #[command(flatten)]
        key: KeyArgs,
    },

    /// Print every cached record of a forecast run
    Run {
        #[command(flatten)]
        cache: CacheArgs,

        /// Forecast run, YYYYMMDDHH
        #[arg(long)]
        run: i64,

        /// Print JSON instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Print the most recent cached forecast run
    LatestRun {
        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Print the next forecast run to fetch
    NextRun {
        /// Path to the SQLite forecast cache
        #[arg(long, env = "CNBS_DB")]
        db: Option<std::path::PathBuf>,

        /// Table holding forecast values
        #[arg(long, default_value = cnbs_db::schema::DEFAULT_TABLE)]
        table: String,

        /// Compute the run following this one instead of reading the cache
        #[arg(long)]
        after: Option<i64>,
    },

    /// Print grid cell areas (m²) for a regular lat/lon grid
    CellAreas {
        /// Comma-separated longitudes in degrees
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        lons: Vec<f64>,

        /// Comma-separated latitudes in degrees
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        lats: Vec<f64>,
    },

    /// Compute evaporation from air temperature and latent heat flux
    Evaporation {
        /// Air temperature in kelvin
        #[arg(long)]
        temperature_k: f64,

        /// Latent heat flux in W/m²
        #[arg(long, allow_hyphen_values = true)]
        latent_heat: f64,

        /// Year of the month to accumulate a depth over
        #[arg(long, requires = "month")]
        year: Option<i32>,

        /// Month (1-12) to accumulate a depth over
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
}

pub fn run(command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Convert {
            input,
            output,
            to,
            huron_km2,
        } => convert::run_convert(&input, output.as_deref(), to.into(), huron_km2, out),
        Command::Load {
            cache,
            csv,
            skip_existing,
        } => cache::run_load(&cache, &csv, skip_existing, out),
        Command::Get { cache, key } => cache::run_get(&cache, &key, out),
        Command::Run { cache, run, json } => cache::run_dump(&cache, run, json, out),
        Command::LatestRun { cache } => cache::run_latest(&cache, out),
        Command::NextRun { db, table, after } => {
            let cache = db.map(|db| CacheArgs { db, table });
            cache::run_next(cache.as_ref(), after, out)
        }
        Command::CellAreas { lons, lats } => derived::run_cell_areas(&lons, &lats, out),
        Command::Evaporation {
            temperature_k,
            latent_heat,
            year,
            month,
        } => derived::run_evaporation(temperature_k, latent_heat, year.zip(month), out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn execute(args: &[&str]) -> anyhow::Result<String> {
        let cli = TestCli::try_parse_from(std::iter::once("cnbs").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(cli.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn next_run_after() {
        let text = execute(&["next-run", "--after", "2023123118"]).unwrap();
        assert_eq!(text, "2024010100\t01-01-2024 00\n");
    }

    #[test]
    fn next_run_after_off_cycle_hour() {
        let text = execute(&["next-run", "--after", "2024010103"]).unwrap();
        assert_eq!(text, "2024010106\t01-01-2024 06\n");
        assert!(execute(&["next-run", "--after", "2024010124"]).is_err());
    }

    #[test]
    fn cell_areas_accepts_negative_coordinates() {
        let text = execute(&["cell-areas", "--lons", "-90,-89", "--lats", "45,44"]).unwrap();
        assert_eq!(text.lines().next(), Some("lat,-90,-89"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn evaporation_month_needs_year() {
        assert!(execute(&["evaporation", "--temperature-k", "280", "--latent-heat", "50", "--month", "7"]).is_err());
    }

    #[test]
    fn load_then_latest_through_cli() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cfs.db");
        let csv_path = dir.path().join("records.csv");
        std::fs::write(
            &csv_path,
            "cfs_run,year,month,lake,surface_type,component,value_mm\n\
             2024010106,2024,2,ontario,land,precipitation,61.5\n",
        )
        .unwrap();
        let db = db.to_str().unwrap();
        let text = execute(&["load", "--db", db, "--csv", csv_path.to_str().unwrap()]).unwrap();
        assert_eq!(text, "inserted 1 record(s), skipped 0\n");
        let text = execute(&["latest-run", "--db", db]).unwrap();
        assert_eq!(text, "2024010106\t01-01-2024 06\n");
        let text = execute(&[
            "get", "--db", db, "--run", "2024010106", "--year", "2024", "--month", "2",
            "--lake", "ontario", "--surface", "land", "--component", "precip",
        ])
        .unwrap();
        assert_eq!(text, "61.5\n");
    }

    #[test]
    fn convert_requires_target() {
        assert!(execute(&["convert", "--input", "x.csv"]).is_err());
    }
}
