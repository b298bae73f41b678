use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::encoder::LabelEncoder;
use crate::domain::window::Window;

/// One window ready for batching: channel-major features plus
/// a one-hot target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedWindow {
    pub features: Vec<f32>,
    pub width:    usize,
    pub one_hot:  Vec<f32>,
}

impl EncodedWindow {
    pub fn encode(window: Window, encoder: &LabelEncoder) -> Result<Self> {
        let one_hot = encoder.encode(window.label)?;
        Ok(Self { features: window.features, width: window.width, one_hot })
    }
}

#[derive(Clone)]
pub struct WindowDataset {
    items: Vec<EncodedWindow>,
}

impl WindowDataset {
    pub fn new(items: Vec<EncodedWindow>) -> Self { Self { items } }

    pub fn window_count(&self) -> usize { self.items.len() }
}

impl Dataset<EncodedWindow> for WindowDataset {
    fn get(&self, index: usize) -> Option<EncodedWindow> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
