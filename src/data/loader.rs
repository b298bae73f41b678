// ============================================================
// Layer 4 - Raw Sample Loader
// ============================================================
// Reads the WISDM raw accelerometer file with the csv crate.
//
// File format (no header, one reading per line):
//
//   user,activity,timestamp,x-axis,y-axis,z-axis
//   33,Jogging,49105962326000,-0.6946377,12.680544,0.50395286;
//
// The z-axis field often carries a trailing ';' left over from
// the WISDM export. Every ';' is stripped before parsing.
//
// Rows with a missing, empty or non-numeric field are dropped
// silently (counted and logged, never an error). Only failing to
// open or read the file itself is fatal.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::domain::{activity::Activity, sample::RawSample, traits::SampleSource};

/// Number of columns a well-formed row carries
const N_COLUMNS: usize = 6;

/// Loads raw samples from a headerless CSV file.
/// Implements the SampleSource trait from Layer 3.
pub struct CsvSampleLoader {
    path: PathBuf,
}

impl CsvSampleLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl SampleSource for CsvSampleLoader {
    fn load_all(&self) -> Result<Vec<RawSample>> {
        // A missing file is fatal. The io::Error stays in the chain
        // so callers can still inspect its kind.
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let mut samples = Vec::new();
        let mut dropped = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) if e.is_io_error() => {
                    return Err(e).with_context(|| {
                        format!("Cannot read dataset '{}'", self.path.display())
                    });
                }
                Err(e) => {
                    dropped += 1;
                    tracing::debug!("Dropping row {}: {}", row + 1, e);
                    continue;
                }
            };

            match parse_record(&record) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    dropped += 1;
                    tracing::debug!("Dropping row {}: {}", row + 1, e);
                }
            }
        }

        if dropped > 0 {
            tracing::info!("Dropped {} malformed rows", dropped);
        }
        tracing::info!(
            "Loaded {} samples from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }
}

/// Parse one CSV record into a RawSample.
/// Any field beyond the sixth is ignored.
fn parse_record(record: &StringRecord) -> Result<RawSample> {
    if record.len() < N_COLUMNS {
        bail!("expected {} fields, found {}", N_COLUMNS, record.len());
    }

    let user      = record[0].parse::<u32>().context("user")?;
    let activity  = record[1].parse::<Activity>()?;
    let timestamp = record[2].parse::<i64>().context("timestamp")?;
    let x         = parse_axis(&record[3]).context("x-axis")?;
    let y         = parse_axis(&record[4]).context("y-axis")?;
    let z         = parse_axis(&record[5].replace(';', "")).context("z-axis")?;

    Ok(RawSample::new(user, activity, timestamp, x, y, z))
}

/// Parse an acceleration value. NaN and infinities count as missing.
fn parse_axis(field: &str) -> Result<f32> {
    let v = field.trim().parse::<f32>()?;
    if !v.is_finite() {
        bail!("non-finite value '{field}'");
    }
    Ok(v)
}
