// ============================================================
// Layer 2 - RestoreUseCase
// ============================================================
// Loads a trained checkpoint and, optionally, scores it on a
// raw accelerometer file:
//
//   Step 1: Restore config, labels and weights  (Layer 5 - ml)
//   Step 2: Load raw samples                    (Layer 4 - data)
//   Step 3: Window with the stored geometry     (Layer 4 - data)
//   Step 4: Classify and compare labels         (Layer 3 - traits)

use anyhow::{bail, Result};
use std::fmt;

use crate::data::loader::CsvSampleLoader;
use crate::domain::{activity::Activity, traits::{ActivityClassifier, SampleSource}, window::Window};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::restorer::Restorer;

/// What a checkpoint contains, for display after restoring
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreSummary {
    pub checkpoint_dir: String,
    pub num_params:     usize,
    pub num_layers:     usize,
    pub hidden_units:   usize,
    pub window_size:    usize,
    pub stride:         usize,
    pub classes:        Vec<Activity>,
}

impl fmt::Display for RestoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes: Vec<&str> = self.classes.iter().map(|a| a.as_str()).collect();
        writeln!(f, "Checkpoint:  {}", self.checkpoint_dir)?;
        writeln!(
            f,
            "Model:       {} bidirectional LSTM layers x {} hidden units ({} parameters)",
            self.num_layers, self.hidden_units, self.num_params
        )?;
        writeln!(f, "Windows:     {} samples, stride {}", self.window_size, self.stride)?;
        write!(f, "Classes:     {}", classes.join(", "))
    }
}

/// Accuracy of the restored model on one data file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreEvaluation {
    pub windows:  usize,
    pub correct:  usize,
    pub accuracy: f64,
}

pub struct RestoreUseCase {
    checkpoint_dir: String,
    restorer:       Restorer,
}

impl RestoreUseCase {
    pub fn new(checkpoint_dir: impl Into<String>) -> Result<Self> {
        let checkpoint_dir = checkpoint_dir.into();
        let ckpt     = CheckpointManager::new(&checkpoint_dir);
        let restorer = Restorer::from_checkpoint(&ckpt)?;
        Ok(Self { checkpoint_dir, restorer })
    }

    pub fn summary(&self) -> RestoreSummary {
        let cfg = self.restorer.config();
        RestoreSummary {
            checkpoint_dir: self.checkpoint_dir.clone(),
            num_params:     self.restorer.num_params(),
            num_layers:     cfg.num_layers,
            hidden_units:   cfg.hidden_units,
            window_size:    cfg.window_size,
            stride:         cfg.stride,
            classes:        self.restorer.encoder().classes().to_vec(),
        }
    }

    /// Window `data_path` the way training did and score every window.
    pub fn evaluate(&self, data_path: &str) -> Result<RestoreEvaluation> {
        let samples = CsvSampleLoader::new(data_path).load_all()?;

        let windower = self.restorer.config().windower();
        if windower.num_windows(samples.len()) == 0 {
            bail!(
                "No windows: {} samples is not more than the window size {}",
                samples.len(),
                windower.window_size()
            );
        }
        let windows: Vec<Window> = windower.windows(&samples).collect();

        let evaluation = score(&self.restorer, &windows)?;
        tracing::info!(
            "Classified {} windows from '{}': {} correct",
            evaluation.windows,
            data_path,
            evaluation.correct
        );
        Ok(evaluation)
    }
}

/// Fraction of windows whose predicted activity equals their label
fn score(classifier: &dyn ActivityClassifier, windows: &[Window]) -> Result<RestoreEvaluation> {
    let predicted = classifier.classify(windows)?;
    let correct = predicted
        .iter()
        .zip(windows)
        .filter(|(p, w)| **p == w.label)
        .count();

    let accuracy = if windows.is_empty() { 0.0 } else { correct as f64 / windows.len() as f64 };
    Ok(RestoreEvaluation { windows: windows.len(), correct, accuracy })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use std::{fmt::Write as _, fs, path::PathBuf};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("activity-lstm-restore-uc-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_csv(dir: &PathBuf, rows: usize) -> PathBuf {
        let mut csv = String::new();
        for i in 0..rows {
            let v = i as f32 * 0.01;
            writeln!(csv, "3,Jogging,{},{:.4},{:.4},{:.4};", i, v, -v, v * 0.5).unwrap();
        }
        let path = dir.join(format!("rows-{rows}.txt"));
        fs::write(&path, csv).unwrap();
        path
    }

    fn trained(name: &str) -> (PathBuf, TrainConfig) {
        let dir = temp_dir(name);
        let cfg = TrainConfig {
            data_path:      write_csv(&dir, 400).display().to_string(),
            checkpoint_dir: dir.join("model").display().to_string(),
            window_size:    20,
            stride:         10,
            hidden_units:   4,
            batch_size:     5,
            epochs:         1,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg.clone()).execute().unwrap();
        (dir, cfg)
    }

    struct Constant(Activity);

    impl ActivityClassifier for Constant {
        fn classify(&self, windows: &[Window]) -> Result<Vec<Activity>> {
            Ok(vec![self.0; windows.len()])
        }
    }

    #[test]
    fn test_score_counts_matching_labels() {
        let mk = |label| Window { start: 0, features: vec![0.0; 3], width: 1, label };
        let windows = vec![mk(Activity::Sitting), mk(Activity::Walking), mk(Activity::Sitting), mk(Activity::Upstairs)];

        let eval = score(&Constant(Activity::Sitting), &windows).unwrap();
        assert_eq!(eval.windows, 4);
        assert_eq!(eval.correct, 2);
        assert_eq!(eval.accuracy, 0.5);

        let empty = score(&Constant(Activity::Sitting), &[]).unwrap();
        assert_eq!(empty.accuracy, 0.0);
    }

    #[test]
    fn test_summary_reflects_stored_config() {
        let (_, cfg) = trained("summary");
        let use_case = RestoreUseCase::new(cfg.checkpoint_dir.clone()).unwrap();
        let summary = use_case.summary();

        assert_eq!(summary.window_size, 20);
        assert_eq!(summary.stride, 10);
        assert_eq!(summary.hidden_units, 4);
        assert_eq!(summary.num_layers, 2);
        assert_eq!(summary.classes, Activity::ALL.to_vec());
        assert!(summary.num_params > 0);
        assert!(summary.to_string().contains("Jogging"));
    }

    #[test]
    fn test_evaluate_uses_stored_window_geometry() {
        let (dir, cfg) = trained("evaluate");
        let use_case = RestoreUseCase::new(cfg.checkpoint_dir).unwrap();

        // 100 rows with window 20, stride 10 → starts 0..80 step 10 = 8 windows
        let eval = use_case.evaluate(&write_csv(&dir, 100).display().to_string()).unwrap();
        assert_eq!(eval.windows, 8);
        assert!(eval.correct <= eval.windows);
        assert!((0.0..=1.0).contains(&eval.accuracy));

        let too_short = write_csv(&dir, 20).display().to_string();
        assert!(use_case.evaluate(&too_short).is_err());
    }

    #[test]
    fn test_untrained_directory_is_an_error() {
        let dir = temp_dir("untrained");
        assert!(RestoreUseCase::new(dir.join("model").display().to_string()).is_err());
    }
}
