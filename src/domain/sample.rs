// ============================================================
// Layer 3 - RawSample Domain Type
// ============================================================
// One accelerometer reading exactly as it appears in a row of
// the raw CSV, after parsing. Plain data, no behaviour.

use serde::{Deserialize, Serialize};

use crate::domain::activity::Activity;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Id of the person who carried the phone
    pub user: u32,

    /// Activity the person was performing at this instant
    pub activity: Activity,

    /// Device timestamp (nanoseconds in WISDM, sometimes 0)
    pub timestamp: i64,

    /// Acceleration along the phone's x axis (m/s²)
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RawSample {
    pub fn new(user: u32, activity: Activity, timestamp: i64, x: f32, y: f32, z: f32) -> Self {
        Self { user, activity, timestamp, x, y, z }
    }
}
