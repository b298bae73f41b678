// ============================================================
// Layer 6 - Training History
// ============================================================
// Keeps the loss/accuracy curves of one training run and mirrors
// them to a CSV file.
//
// One HistoryPoint is recorded per evaluation. How often that
// happens depends on the evaluation policy: once per mini-batch
// in dense mode, once per epoch otherwise.
//
// Output file: <checkpoint_dir>/history.csv
//
//   epoch,step,train_loss,train_acc,test_loss,test_acc
//   1,4,1.873012,0.412000,1.901233,0.398000
//   ...
//
// Rows go to history.csv.partial while the run is in progress.
// The file is renamed to history.csv only after training succeeded,
// so a failed run leaves the previous history untouched.

use anyhow::{Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HISTORY_FILE: &str = "history.csv";

/// Full-set metrics after a given optimizer step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// 1-based epoch the evaluation happened in
    pub epoch: usize,

    /// Optimizer steps taken so far in the run
    pub step: usize,

    /// Cross-entropy + L2 over the whole training split
    pub train_loss: f64,
    pub train_acc:  f64,

    /// Cross-entropy + L2 over the whole test split
    pub test_loss: f64,
    pub test_acc:  f64,
}

/// Every point of one run, in recording order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    points: Vec<HistoryPoint>,
}

impl TrainingHistory {
    pub fn push(&mut self, point: HistoryPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Point with the highest test accuracy (first one on ties)
    pub fn best_test_acc(&self) -> Option<&HistoryPoint> {
        self.points()
            .iter()
            .fold(None, |best: Option<&HistoryPoint>, p| match best {
                Some(b) if b.test_acc >= p.test_acc => Some(b),
                _ => Some(p),
            })
    }
}

/// Appends history points to a staging CSV file that replaces
/// `history.csv` only once the run has finished.
pub struct MetricsLogger {
    staging_path: PathBuf,
    csv_path:     PathBuf,
}

impl MetricsLogger {
    /// Create (or truncate) `<dir>/history.csv.partial` and write the header row.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path     = dir.join(HISTORY_FILE);
        let staging_path = dir.join(format!("{HISTORY_FILE}.partial"));
        let mut f = File::create(&staging_path)
            .with_context(|| format!("Cannot create '{}'", staging_path.display()))?;
        writeln!(f, "epoch,step,train_loss,train_acc,test_loss,test_acc")?;
        tracing::debug!("Created metrics CSV: '{}'", staging_path.display());

        Ok(Self { staging_path, csv_path })
    }

    /// Append one point as a new CSV row.
    pub fn log(&self, p: &HistoryPoint) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.staging_path)
            .with_context(|| format!("Cannot open '{}'", self.staging_path.display()))?;

        writeln!(
            f,
            "{},{},{:.6},{:.6},{:.6},{:.6}",
            p.epoch,
            p.step,
            p.train_loss,
            p.train_acc,
            p.test_loss,
            p.test_acc,
        )?;

        Ok(())
    }

    /// Move the staged history over `history.csv`.
    pub fn finish(self) -> Result<PathBuf> {
        fs::rename(&self.staging_path, &self.csv_path).with_context(|| {
            format!(
                "Cannot move '{}' to '{}'",
                self.staging_path.display(),
                self.csv_path.display()
            )
        })?;
        tracing::info!("Training history written to '{}'", self.csv_path.display());
        Ok(self.csv_path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn point(epoch: usize, test_acc: f64) -> HistoryPoint {
        HistoryPoint { epoch, step: epoch * 2, train_loss: 1.0, train_acc: 0.5, test_loss: 1.2, test_acc }
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("activity-lstm-metrics-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_best_test_acc() {
        let mut h = TrainingHistory::default();
        assert!(h.best_test_acc().is_none());
        h.push(point(1, 0.4));
        h.push(point(2, 0.7));
        h.push(point(3, 0.7));
        h.push(point(4, 0.6));
        assert_eq!(h.len(), 4);
        assert_eq!(h.best_test_acc().unwrap().epoch, 2);
    }

    #[test]
    fn test_csv_rows_are_appended() {
        let dir = temp_dir("rows");
        let logger = MetricsLogger::new(&dir).unwrap();
        logger.log(&point(1, 0.25)).unwrap();
        logger.log(&point(2, 0.5)).unwrap();
        let path = logger.finish().unwrap();
        assert_eq!(path, dir.join("history.csv"));

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,step,train_loss,train_acc,test_loss,test_acc");
        assert_eq!(lines[2], "2,4,1.000000,0.500000,1.200000,0.500000");
        assert!(!dir.join("history.csv.partial").exists());
    }

    #[test]
    fn test_unfinished_run_keeps_previous_history() {
        let dir = temp_dir("unfinished");
        let first = MetricsLogger::new(&dir).unwrap();
        first.log(&point(1, 0.25)).unwrap();
        let path = first.finish().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A second run starts, logs, and is dropped without finishing
        let second = MetricsLogger::new(&dir).unwrap();
        second.log(&point(1, 0.9)).unwrap();
        drop(second);

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
