// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to data sources and classifiers
// through these traits, never through the concrete CSV loader
// or the burn-backed restorer.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::{activity::Activity, sample::RawSample, window::Window};

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the ordered raw accelerometer stream.
///
/// Implementations:
///   - CsvSampleLoader → reads the WISDM raw text file
pub trait SampleSource {
    /// Load every valid sample, preserving source order.
    fn load_all(&self) -> Result<Vec<RawSample>>;
}

// ─── ActivityClassifier ───────────────────────────────────────────────────────
/// Any component that can assign an activity to accelerometer windows.
///
/// Implementations:
///   - Restorer → runs the restored bidirectional LSTM
pub trait ActivityClassifier {
    /// Returns one predicted activity per input window, in order.
    fn classify(&self, windows: &[Window]) -> Result<Vec<Activity>>;
}
