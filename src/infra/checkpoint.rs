// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// Checkpoint directory layout (default: model/):
//
//   model/
//     classificator.mpk     ← all learned parameters
//     train_config.json     ← hyperparameters, needed to rebuild
//                             the exact architecture
//     labels.json           ← one-hot column layout
//     history.csv           ← written by the metrics logger
//
// The three checkpoint files are written together, once, at the
// end of a successful run. Each is written under a "-staged" name
// first and renamed into place afterwards, so weights and config
// always come from the same run.
//
// Burn's CompactRecorder:
//   - Serialises parameters to named MessagePack, half precision
//   - Loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::encoder::LabelEncoder;
use crate::ml::{model::ActivityLstm, InnerBackend};

/// File stem of the weights file; the recorder appends its extension
const MODEL_STEM: &str = "classificator";
const CONFIG_FILE: &str = "train_config.json";
const LABELS_FILE: &str = "labels.json";
const STAGING_SUFFIX: &str = "-staged";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the weights file as written by CompactRecorder
    pub fn weights_path(&self) -> PathBuf {
        self.recorded_path(MODEL_STEM)
    }

    /// Creates the checkpoint directory, like `mkdir -p`
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))
    }

    /// Save weights, training config and label layout as one checkpoint.
    pub fn save_checkpoint<B: Backend>(
        &self,
        model:   &ActivityLstm<B>,
        cfg:     &TrainConfig,
        encoder: &LabelEncoder,
    ) -> Result<()> {
        self.ensure_dir()?;

        // ── Stage every file next to the live ones ────────────────────────────
        let model_stem = format!("{MODEL_STEM}{STAGING_SUFFIX}");
        let config     = format!("{CONFIG_FILE}{STAGING_SUFFIX}");
        let labels     = format!("{LABELS_FILE}{STAGING_SUFFIX}");

        // Without extension, the recorder adds it
        let stem_path = self.dir.join(&model_stem);
        CompactRecorder::new()
            .record(model.clone().into_record(), stem_path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", stem_path.display())
            })?;
        self.write_json(&config, cfg)?;
        self.write_json(&labels, encoder)?;

        // ── Promote ───────────────────────────────────────────────────────────
        promote(&self.recorded_path(&model_stem), &self.weights_path())?;
        promote(&self.dir.join(config), &self.dir.join(CONFIG_FILE))?;
        promote(&self.dir.join(labels), &self.dir.join(LABELS_FILE))?;

        tracing::info!("Saved checkpoint to '{}'", self.weights_path().display());
        Ok(())
    }

    /// Load saved parameters into a freshly initialised model.
    /// `model` must have been built from the saved config.
    pub fn load_model<B: Backend>(
        &self,
        model:  ActivityLstm<B>,
        device: &B::Device,
    ) -> Result<ActivityLstm<B>> {
        let path = self.dir.join(MODEL_STEM);

        let record = CompactRecorder::new()
            .load(path, device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    self.weights_path().display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn load_encoder(&self) -> Result<LabelEncoder> {
        self.read_json(LABELS_FILE)
    }

    /// `<dir>/<stem>.<ext>` with the extension CompactRecorder uses
    fn recorded_path(&self, stem: &str) -> PathBuf {
        let ext = <CompactRecorder as FileRecorder<InnerBackend>>::file_extension();
        self.dir.join(format!("{stem}.{ext}"))
    }

    fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' before 'restore'.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

fn promote(staged: &Path, live: &Path) -> Result<()> {
    fs::rename(staged, live)
        .with_context(|| format!("Cannot move '{}' to '{}'", staged.display(), live.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::Activity;
    use crate::ml::model::ActivityLstmConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("activity-lstm-ckpt-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let device = Default::default();
        let ckpt   = CheckpointManager::new(temp_dir("round-trip"));
        let cfg    = TrainConfig { epochs: 3, seed: 99, hidden_units: 4, ..TrainConfig::default() };
        let enc    = LabelEncoder::observed([Activity::Walking, Activity::Jogging]);
        let config = cfg.model_config(enc.num_classes());

        let trained: ActivityLstm<TestBackend> = config.init(&device);
        ckpt.save_checkpoint(&trained, &cfg, &enc).unwrap();

        assert_eq!(ckpt.weights_path(), ckpt.dir().join("classificator.mpk"));
        assert!(ckpt.weights_path().exists());
        assert_eq!(ckpt.load_config().unwrap(), cfg);
        assert_eq!(ckpt.load_encoder().unwrap(), enc);

        let fresh: ActivityLstm<TestBackend> = config.init(&device);
        let restored = ckpt.load_model(fresh, &device).unwrap();

        let input = Tensor::<TestBackend, 3>::ones([1, 5, 3], &device);
        let a = trained.forward(input.clone()).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        let b = restored.forward(input).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        // Stored at half precision
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-2, "{x} vs {y}");
        }
    }

    #[test]
    fn test_no_staged_files_remain() {
        let device = Default::default();
        let ckpt   = CheckpointManager::new(temp_dir("staged"));
        let cfg    = TrainConfig { hidden_units: 2, ..TrainConfig::default() };
        let model: ActivityLstm<TestBackend> = cfg.model_config(6).init(&device);
        ckpt.save_checkpoint(&model, &cfg, &LabelEncoder::declared()).unwrap();

        let mut names: Vec<String> = fs::read_dir(ckpt.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["classificator.mpk", "labels.json", "train_config.json"]);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let ckpt = CheckpointManager::new(temp_dir("missing").join("nothing"));
        assert!(ckpt.load_config().is_err());
        assert!(ckpt.load_encoder().is_err());
        let device = Default::default();
        let model: ActivityLstm<TestBackend> = ActivityLstmConfig::new(2).init(&device);
        assert!(ckpt.load_model(model, &device).is_err());
    }
}
