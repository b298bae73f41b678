// ============================================================
// Layer 5 - Restorer
// ============================================================
// Rebuilds the trained classifier from a checkpoint directory
// and assigns an activity to each window.
//
//   train_config.json    → architecture + window geometry
//   labels.json          → one-hot column layout
//   classificator.mpk    → learned parameters
//
// Runs on InnerBackend only; nothing here needs gradients.

use anyhow::{anyhow, bail, ensure, Context, Result};
use burn::prelude::*;

use crate::application::train_use_case::TrainConfig;
use crate::data::encoder::LabelEncoder;
use crate::domain::{
    activity::Activity,
    traits::ActivityClassifier,
    window::{Window, N_CHANNELS},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{model::ActivityLstm, Device, InnerBackend};

pub struct Restorer {
    model:   ActivityLstm<InnerBackend>,
    encoder: LabelEncoder,
    config:  TrainConfig,
    device:  Device,
}

impl Restorer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device  = Device::default();
        let config  = ckpt_manager.load_config()?;
        config.validate().with_context(|| {
            format!("Invalid training config in '{}'", ckpt_manager.dir().display())
        })?;
        let encoder = ckpt_manager.load_encoder()?;
        ensure!(encoder.num_classes() > 0, "The stored label layout has no classes");

        let model_cfg = config.model_config(encoder.num_classes());
        let model: ActivityLstm<InnerBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        tracing::info!(
            "Model restored from '{}' ({} parameters)",
            ckpt_manager.dir().display(),
            model.num_params()
        );
        Ok(Self { model, encoder, config, device })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn num_params(&self) -> usize {
        self.model.num_params()
    }

    /// Logits for a [batch, time, channels] tensor
    pub fn forward(&self, features: Tensor<InnerBackend, 3>) -> Tensor<InnerBackend, 2> {
        self.model.forward(features)
    }

    /// Most likely activity for every window, in input order.
    /// Windows are pushed through the model eval_batch_size at a time
    /// and each row of logits is decoded by the label encoder.
    pub fn predict(&self, windows: &[Window]) -> Result<Vec<Activity>> {
        let width = self.config.window_size;
        if let Some(w) = windows.iter().find(|w| w.width != width) {
            bail!(
                "Window starting at sample {} has {} steps, the model expects {}",
                w.start,
                w.width,
                width
            );
        }

        let mut predictions = Vec::with_capacity(windows.len());
        for chunk in windows.chunks(self.config.eval_batch_size.max(1)) {
            let flat: Vec<f32> = chunk
                .iter()
                .flat_map(|w| w.features.iter().copied())
                .collect();
            let features = Tensor::<InnerBackend, 1>::from_floats(flat.as_slice(), &self.device)
                .reshape([chunk.len(), N_CHANNELS, width])
                .swap_dims(1, 2);

            let logits = self
                .forward(features)
                .into_data()
                .convert::<f32>()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;

            for row in logits.chunks(self.encoder.num_classes()) {
                predictions.push(self.encoder.decode(row)?);
            }
        }

        Ok(predictions)
    }
}

impl ActivityClassifier for Restorer {
    fn classify(&self, windows: &[Window]) -> Result<Vec<Activity>> {
        self.predict(windows)
    }
}
