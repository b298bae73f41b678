// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load raw samples            (Layer 4 - data)
//   Step 2: Cut into labelled windows   (Layer 4 - data)
//   Step 3: One-hot encode labels       (Layer 4 - data)
//   Step 4: Split train/test 70/30      (Layer 4 - data)
//   Step 5: Build Burn datasets         (Layer 4 - data)
//   Step 6: Train and checkpoint        (Layer 5 - ml, Layer 6 - infra)
//
// The checkpoint directory is only written once training succeeded.

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{EncodedWindow, WindowDataset},
    encoder::LabelEncoder,
    loader::CsvSampleLoader,
    splitter::split_train_test,
    windower::Windower,
};
use crate::domain::{traits::SampleSource, window::N_CHANNELS};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    model::ActivityLstmConfig,
    trainer::{run_training, TrainOutcome},
};

/// When the trainer measures loss and accuracy on the full splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalPolicy {
    /// After every mini-batch ("dense logging").
    /// Expensive: every step re-runs the model over both splits.
    EveryBatch,
    /// Once at the end of each epoch
    EveryEpoch,
}

/// How one-hot columns are assigned to activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelOrder {
    /// Fixed: one column per declared activity
    Declared,
    /// Sorted distinct labels present in the data
    Observed,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Built once, then only
// read. Saved next to the weights so the restorer can rebuild
// the same model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:       String,
    pub checkpoint_dir:  String,
    pub window_size:     usize,
    pub stride:          usize,
    pub hidden_units:    usize,
    pub num_layers:      usize,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub learning_rate:   f64,
    pub l2_weight:       f64,
    pub seed:            u64,
    pub test_fraction:   f64,
    pub log_every:       usize,
    pub eval_batch_size: usize,
    pub eval_policy:     EvalPolicy,
    pub label_order:     LabelOrder,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:       "data/WISDM_ar_v1.1_raw.txt".to_string(),
            checkpoint_dir:  "model".to_string(),
            window_size:     180,
            stride:          100,
            hidden_units:    30,
            num_layers:      2,
            batch_size:      10,
            epochs:          30,
            learning_rate:   0.0025,
            l2_weight:       0.0015,
            seed:            13,
            test_fraction:   0.3,
            log_every:       5,
            eval_batch_size: 256,
            eval_policy:     EvalPolicy::EveryEpoch,
            label_order:     LabelOrder::Declared,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.window_size > 0,     "window_size must be positive");
        ensure!(self.stride > 0,          "stride must be positive");
        ensure!(self.hidden_units > 0,    "hidden_units must be positive");
        ensure!(self.num_layers > 0,      "num_layers must be positive");
        ensure!(self.batch_size > 0,      "batch_size must be positive");
        ensure!(self.eval_batch_size > 0, "eval_batch_size must be positive");
        ensure!(self.log_every > 0,       "log_every must be positive");
        ensure!(
            self.learning_rate.is_finite() && self.learning_rate > 0.0,
            "learning_rate must be a positive number, got {}",
            self.learning_rate
        );
        ensure!(
            self.l2_weight.is_finite() && self.l2_weight >= 0.0,
            "l2_weight must be a non-negative number, got {}",
            self.l2_weight
        );
        ensure!(
            (0.0..=1.0).contains(&self.test_fraction),
            "test_fraction must lie in [0, 1], got {}",
            self.test_fraction
        );
        Ok(())
    }

    /// Model architecture for a given number of output classes
    pub fn model_config(&self, n_classes: usize) -> ActivityLstmConfig {
        ActivityLstmConfig::new(self.hidden_units)
            .with_n_features(N_CHANNELS)
            .with_n_classes(n_classes)
            .with_n_layers(self.num_layers)
    }

    pub fn windower(&self) -> Windower {
        Windower::new(self.window_size, self.stride)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    /// Returns the trainer's outcome, including the final test accuracy.
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load raw samples ──────────────────────────────────────────
        let loader  = CsvSampleLoader::new(&cfg.data_path);
        let samples = loader.load_all()?;

        // ── Step 2: Sliding windows with majority-vote labels ─────────────────
        let windower = cfg.windower();
        if windower.num_windows(samples.len()) == 0 {
            bail!(
                "No windows: {} samples is not more than the window size {}",
                samples.len(),
                cfg.window_size
            );
        }
        let windows: Vec<_> = windower.windows(&samples).collect();
        tracing::info!(
            "Created {} windows (size {}, stride {})",
            windows.len(),
            cfg.window_size,
            cfg.stride
        );

        // ── Step 3: One-hot encoding ──────────────────────────────────────────
        let encoder = match cfg.label_order {
            LabelOrder::Declared => LabelEncoder::declared(),
            LabelOrder::Observed => LabelEncoder::observed(windows.iter().map(|w| w.label)),
        };
        let encoded = windows
            .into_iter()
            .map(|w| EncodedWindow::encode(w, &encoder))
            .collect::<Result<Vec<_>>>()?;

        // ── Step 4: Seeded train/test split ───────────────────────────────────
        let (train_windows, test_windows) = split_train_test(encoded, cfg.test_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} test",
            train_windows.len(),
            test_windows.len()
        );

        // ── Step 5: Burn datasets ─────────────────────────────────────────────
        let train_dataset = WindowDataset::new(train_windows);
        let test_dataset  = WindowDataset::new(test_windows);

        // ── Step 6: Train, then save weights + config + labels together ───────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        run_training(cfg, &encoder, train_dataset, test_dataset, &ckpt_manager)
    }
}
