//! Commands that read and write the forecast cache.

use anyhow::Context;
use clap::Args;
use cnbs_core::{Component, Lake, Period, RunId, SurfaceType};
use cnbs_db::{schema::DEFAULT_TABLE, ForecastCache, ForecastKey};
use log::info;
use std::io::Write;
use std::path::PathBuf;

/// Location of the forecast cache.
#[derive(Args, Debug, Clone)]
pub struct CacheArgs {
    /// Path to the SQLite forecast cache (created if missing)
    #[arg(long, env = "CNBS_DB")]
    pub db: PathBuf,

    /// Table holding forecast values
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,
}

impl CacheArgs {
    pub fn open(&self) -> anyhow::Result<ForecastCache> {
        ForecastCache::open_with_table(&self.db, &self.table)
            .with_context(|| format!("failed to open forecast cache {}", self.db.display()))
    }
}

/// Load forecast records from a CSV file.
pub fn run_load(
    cache: &CacheArgs,
    csv_path: &str,
    skip_existing: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let csv_data = std::fs::read_to_string(csv_path)
        .with_context(|| format!("failed to read {}", csv_path))?;
    let summary = cache.open()?.load_csv(&csv_data, skip_existing)?;
    writeln!(
        out,
        "inserted {} record(s), skipped {}",
        summary.inserted, summary.skipped
    )?;
    Ok(())
}

/// Raw key fields as typed on the command line.
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Forecast run, YYYYMMDDHH
    #[arg(long)]
    pub run: i64,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub month: u32,
    /// superior, michigan-huron, erie or ontario
    #[arg(long)]
    pub lake: String,
    /// land or lake
    #[arg(long)]
    pub surface: String,
    /// precipitation, evaporation or runoff
    #[arg(long)]
    pub component: String,
}

impl KeyArgs {
    pub fn to_key(&self) -> anyhow::Result<ForecastKey> {
        Ok(ForecastKey::new(
            RunId::any_hour(self.run)?,
            Period::new(self.year, self.month)?,
            self.lake.parse::<Lake>()?,
            self.surface.parse::<SurfaceType>()?,
            self.component.parse::<Component>()?,
        ))
    }
}

/// Print the value stored under one key.
pub fn run_get(cache: &CacheArgs, key: &KeyArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let key = key.to_key()?;
    match cache.open()?.get(&key)? {
        Some(value) => writeln!(out, "{}", value)?,
        None => {
            info!("No cached value for {}", key);
            writeln!(out, "not found")?;
        }
    }
    Ok(())
}

/// Print every record of a run as CSV, or as JSON with `json`.
pub fn run_dump(
    cache: &CacheArgs,
    run: i64,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let run = RunId::any_hour(run)?;
    let records = cache.open()?.query_run(run)?;
    info!("Run {} has {} cached records", run, records.len());
    if json {
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        return Ok(());
    }
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(cnbs_db::schema::COLUMNS)?;
    for record in &records {
        let key = &record.key;
        wtr.write_record([
            key.run.to_string(),
            key.period.year().to_string(),
            key.period.month().to_string(),
            key.lake.to_string(),
            key.surface_type.to_string(),
            key.component.to_string(),
            record.value_mm.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Print the most recent cached run.
pub fn run_latest(cache: &CacheArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    match cache.open()?.latest_run()? {
        Some(run) => writeln!(out, "{}\t{}", run, run.label())?,
        None => writeln!(out, "no runs stored")?,
    }
    Ok(())
}

/// Print the next run to fetch, after `after` or after the latest cached run.
pub fn run_next(
    cache: Option<&CacheArgs>,
    after: Option<i64>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let next = match (after, cache) {
        (Some(raw), _) => RunId::any_hour(raw)?.next()?,
        (None, Some(cache)) => match cache.open()?.next_run() {
            Ok(next) => next,
            Err(cnbs_db::CacheError::EmptyStore) => {
                anyhow::bail!("forecast cache is empty; pass --after to seed the first run")
            }
            Err(err) => return Err(err.into()),
        },
        (None, None) => anyhow::bail!("either --db or --after is required"),
    };
    writeln!(out, "{}\t{}", next, next.label())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
cfs_run,year,month,lake,surface_type,component,value_mm
2023123118,2024,1,erie,lake,evaporation,35.2
2023123118,2024,1,superior,land,runoff,12.0
";

    fn setup() -> (tempfile::TempDir, CacheArgs) {
        let dir = tempfile::tempdir().unwrap();
        let args = CacheArgs {
            db: dir.path().join("cfs.db"),
            table: DEFAULT_TABLE.to_string(),
        };
        let csv_path = dir.path().join("records.csv");
        std::fs::write(&csv_path, CSV).unwrap();
        let mut out = Vec::new();
        run_load(&args, csv_path.to_str().unwrap(), false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "inserted 2 record(s), skipped 0\n");
        (dir, args)
    }

    fn output(f: impl FnOnce(&mut dyn Write) -> anyhow::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn key_args(component: &str) -> KeyArgs {
        KeyArgs {
            run: 2023123118,
            year: 2024,
            month: 1,
            lake: "erie".to_string(),
            surface: "lake".to_string(),
            component: component.to_string(),
        }
    }

    #[test]
    fn get_hit_and_miss() {
        let (_dir, args) = setup();
        assert_eq!(output(|out| run_get(&args, &key_args("evaporation"), out)), "35.2\n");
        assert_eq!(output(|out| run_get(&args, &key_args("precipitation"), out)), "not found\n");
    }

    #[test]
    fn get_rejects_bad_key() {
        let (_dir, args) = setup();
        let mut bad = key_args("evaporation");
        bad.lake = "champlain".to_string();
        let mut out = Vec::new();
        assert!(run_get(&args, &bad, &mut out).is_err());
    }

    #[test]
    fn latest_and_next() {
        let (_dir, args) = setup();
        assert_eq!(output(|out| run_latest(&args, out)), "2023123118\t12-31-2023 18\n");
        assert_eq!(
            output(|out| run_next(Some(&args), None, out)),
            "2024010100\t01-01-2024 00\n"
        );
        assert_eq!(
            output(|out| run_next(None, Some(2024010106), out)),
            "2024010112\t01-01-2024 12\n"
        );
    }

    #[test]
    fn next_on_empty_cache_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = CacheArgs {
            db: dir.path().join("empty.db"),
            table: DEFAULT_TABLE.to_string(),
        };
        assert_eq!(output(|out| run_latest(&args, out)), "no runs stored\n");
        let mut out = Vec::new();
        assert!(run_next(Some(&args), None, &mut out).is_err());
        assert!(run_next(None, None, &mut out).is_err());
    }

    #[test]
    fn dump_csv_and_json() {
        let (_dir, args) = setup();
        let csv = output(|out| run_dump(&args, 2023123118, false, out));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "cfs_run,year,month,lake,surface_type,component,value_mm");
        assert_eq!(lines[1], "2023123118,2024,1,erie,lake,evaporation,35.2");
        assert_eq!(lines.len(), 3);

        let json = output(|out| run_dump(&args, 2023123118, true, out));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["lake"], "superior");
    }

    #[test]
    fn load_skip_existing() {
        let (dir, args) = setup();
        let csv_path = dir.path().join("records.csv");
        let mut out = Vec::new();
        assert!(run_load(&args, csv_path.to_str().unwrap(), false, &mut out).is_err());
        assert_eq!(
            output(|out| run_load(&args, csv_path.to_str().unwrap(), true, out)),
            "inserted 0 record(s), skipped 2\n"
        );
    }
}
