// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Shuffles windows with a seeded RNG and splits them into:
//   - Training set: used to update model weights
//   - Test set:     used to report accuracy on unseen windows
//
// The split is reproducible: the same seed and the same input
// order always produce the same partition.
//
// Test size follows the usual rule n_test = ceil(fraction * n),
// so 30% of 9 windows gives 3 test and 6 training windows.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, test).
///
/// # Arguments
/// * `samples`       - All windows (consumed by this function)
/// * `test_fraction` - Proportion for the test set, clamped to [0, 1]
/// * `seed`          - RNG seed, e.g. 13
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total   = samples.len();
    // The epsilon keeps 0.3 * 100 = 30.000000000000004 at 30
    let exact   = (total as f64) * test_fraction.clamp(0.0, 1.0);
    let n_test  = ((exact - 1e-9).ceil().max(0.0) as usize).min(total);

    // samples = [0..n_train] (train), test = [n_train..total]
    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        samples.len(),
        test.len(),
        seed,
    );

    (samples, test)
}
