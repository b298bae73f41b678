// ============================================================
// Layer 3 - Window Domain Type
// ============================================================
// A fixed-length slice of the accelerometer stream together
// with its majority-vote activity label.
//
// Features are stored channel-major in a single flat Vec:
//
//   [x_0 .. x_{W-1}, y_0 .. y_{W-1}, z_0 .. z_{W-1}]
//
// i.e. a 3 × W matrix with one row per axis.

use serde::{Deserialize, Serialize};

use crate::domain::activity::Activity;

/// Number of accelerometer channels (x, y, z)
pub const N_CHANNELS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Index of the first raw sample covered by this window
    pub start: usize,

    /// Channel-major 3 × width feature matrix
    pub features: Vec<f32>,

    /// Number of time steps (W)
    pub width: usize,

    /// Most frequent activity among the covered samples
    pub label: Activity,
}
