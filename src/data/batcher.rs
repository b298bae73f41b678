// ============================================================
// Layer 4 - Window Batcher
// ============================================================
// Implements Burn's Batcher trait to stack EncodedWindows into
// tensors.
//
//   Input:  Vec of N EncodedWindows, each 3 × W channel-major
//   Output: WindowBatch
//             features: [N, W, 3]  (time-major, as the LSTM expects)
//             targets:  [N, C]     (one-hot)
//
// The features are first laid out as [N, 3, W], exactly as they
// are stored, and then the last two dimensions are swapped.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::EncodedWindow;
use crate::domain::window::N_CHANNELS;

#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Accelerometer windows, shape [batch, time, channels]
    pub features: Tensor<B, 3>,

    /// One-hot activity targets, shape [batch, classes]
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> WindowBatch<B> {
    /// Number of windows in this batch
    pub fn len(&self) -> usize {
        self.features.dims()[0]
    }
}

#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<EncodedWindow, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<EncodedWindow>) -> WindowBatch<B> {
        let batch_size = items.len();
        let width      = items[0].width;
        let n_classes  = items[0].one_hot.len();

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|w| w.features.iter().copied())
            .collect();

        let targets_flat: Vec<f32> = items
            .iter()
            .flat_map(|w| w.one_hot.iter().copied())
            .collect();

        let features = Tensor::<B, 1>::from_floats(features_flat.as_slice(), &self.device)
            .reshape([batch_size, N_CHANNELS, width])
            .swap_dims(1, 2);

        let targets = Tensor::<B, 1>::from_floats(targets_flat.as_slice(), &self.device)
            .reshape([batch_size, n_classes]);

        WindowBatch { features, targets }
    }
}
