// ============================================================
// Layer 4 - Sliding Window Extractor
// ============================================================
// Cuts the ordered accelerometer stream into fixed-size windows
// and labels each one by majority vote.
//
// Example with window_size=4, stride=2 over 9 samples:
//
//   samples:  s0 s1 s2 s3 s4 s5 s6 s7 s8
//   window 0: s0 s1 s2 s3
//   window 1:       s2 s3 s4 s5
//   window 2:             s4 s5 s6 s7
//
// Window starts run over the half-open range [0, len - W) in
// steps of S. A window starting exactly at len - W is never
// emitted, and the trailing partial window is dropped rather
// than padded.
//
// Reference: Rust Book §13 (Iterators)

use crate::domain::{
    activity::Activity,
    sample::RawSample,
    window::{Window, N_CHANNELS},
};

pub struct Windower {
    /// Samples per window (W)
    window_size: usize,
    /// Samples advanced between window starts (S)
    stride: usize,
}

impl Windower {
    /// # Panics
    /// Panics if either argument is zero: a zero stride never
    /// advances and a zero-width window has no label.
    pub fn new(window_size: usize, stride: usize) -> Self {
        assert!(window_size > 0, "window_size must be positive");
        assert!(stride > 0, "stride must be positive");
        Self { window_size, stride }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Lazily iterate over the windows of `samples`.
    /// Each call starts again from the first window.
    pub fn windows<'a>(&self, samples: &'a [RawSample]) -> Windows<'a> {
        Windows {
            samples,
            window_size: self.window_size,
            stride:      self.stride,
            next_start:  0,
        }
    }

    /// Returns how many windows a stream of `n_samples` produces
    pub fn num_windows(&self, n_samples: usize) -> usize {
        if n_samples <= self.window_size {
            return 0;
        }
        (n_samples - self.window_size).div_ceil(self.stride)
    }
}

/// Iterator returned by `Windower::windows`
pub struct Windows<'a> {
    samples:     &'a [RawSample],
    window_size: usize,
    stride:      usize,
    next_start:  usize,
}

impl Windows<'_> {
    fn end(&self) -> usize {
        self.samples.len().saturating_sub(self.window_size)
    }
}

impl Iterator for Windows<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let start = self.next_start;
        if start >= self.end() {
            return None;
        }
        self.next_start += self.stride;

        let slice = &self.samples[start..start + self.window_size];
        Some(Window {
            start,
            features: channel_major(slice),
            width:    self.window_size,
            label:    majority_label(slice),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end().saturating_sub(self.next_start).div_ceil(self.stride);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

/// Flatten a slice of samples into [x.., y.., z..]
fn channel_major(slice: &[RawSample]) -> Vec<f32> {
    let mut features = Vec::with_capacity(N_CHANNELS * slice.len());
    features.extend(slice.iter().map(|s| s.x));
    features.extend(slice.iter().map(|s| s.y));
    features.extend(slice.iter().map(|s| s.z));
    features
}

/// The most frequent activity in `slice`.
///
/// Ties go to the lexicographically smallest label: counts are
/// scanned in `Activity::ALL` order and only a strictly larger
/// count replaces the current best.
///
/// # Panics
/// Panics on an empty slice.
pub fn majority_label(slice: &[RawSample]) -> Activity {
    assert!(!slice.is_empty(), "cannot label an empty window");

    let mut counts = [0usize; Activity::COUNT];
    for s in slice {
        counts[s.activity.index()] += 1;
    }

    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    Activity::ALL[best]
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn stream(labels: &[Activity]) -> Vec<RawSample> {
        labels
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let v = i as f32;
                RawSample::new(1, a, i as i64, v, v + 1000.0, v + 2000.0)
            })
            .collect()
    }

    fn walking(n: usize) -> Vec<RawSample> {
        stream(&vec![Activity::Walking; n])
    }

    #[test]
    fn test_window_count_matches_half_open_range() {
        let w = Windower::new(180, 100);
        // 1000 samples: starts 0,100,...,800 (820 is the exclusive end)
        assert_eq!(w.windows(&walking(1000)).count(), 9);
        assert_eq!(w.num_windows(1000), 9);
        // When (N - W) is a multiple of S the start at N - W is excluded
        assert_eq!(w.windows(&walking(380)).count(), 2);
        assert_eq!(w.num_windows(380), 2);
    }

    #[test]
    fn test_count_agrees_with_num_windows_for_many_lengths() {
        let w = Windower::new(7, 3);
        for n in 0..60 {
            let samples = walking(n);
            assert_eq!(w.windows(&samples).count(), w.num_windows(n), "n = {n}");
            assert_eq!(w.windows(&samples).len(), w.num_windows(n), "n = {n}");
        }
    }

    #[test]
    fn test_short_streams_give_no_windows() {
        let w = Windower::new(10, 5);
        assert_eq!(w.windows(&walking(9)).count(), 0);
        assert_eq!(w.windows(&walking(10)).count(), 0);
        assert_eq!(w.windows(&[]).count(), 0);
    }

    #[test]
    fn test_features_equal_raw_slice() {
        let samples = walking(50);
        let w = Windower::new(8, 5);
        for win in w.windows(&samples) {
            assert_eq!(win.width, 8);
            assert_eq!(win.features.len(), 24);
            let slice = &samples[win.start..win.start + 8];
            let xs: Vec<f32> = slice.iter().map(|s| s.x).collect();
            let ys: Vec<f32> = slice.iter().map(|s| s.y).collect();
            let zs: Vec<f32> = slice.iter().map(|s| s.z).collect();
            assert_eq!(&win.features[0..8], xs.as_slice());
            assert_eq!(&win.features[8..16], ys.as_slice());
            assert_eq!(&win.features[16..24], zs.as_slice());
        }
    }

    #[test]
    fn test_windows_overlap_when_stride_is_smaller() {
        let samples = walking(12);
        let starts: Vec<usize> = Windower::new(4, 2).windows(&samples).map(|w| w.start).collect();
        assert_eq!(starts, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let samples = walking(40);
        let w = Windower::new(10, 4);
        let first: Vec<Window>  = w.windows(&samples).collect();
        let second: Vec<Window> = w.windows(&samples).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_majority_label() {
        use Activity::*;
        let samples = stream(&[Jogging, Jogging, Sitting]);
        assert_eq!(majority_label(&samples), Jogging);

        let samples = stream(&[Walking, Sitting, Walking, Sitting, Walking]);
        assert_eq!(majority_label(&samples), Walking);
    }

    #[test]
    fn test_majority_tie_goes_to_smallest_label() {
        use Activity::*;
        let samples = stream(&[Walking, Upstairs, Walking, Upstairs]);
        assert_eq!(majority_label(&samples), Upstairs);

        let samples = stream(&[Standing, Jogging]);
        assert_eq!(majority_label(&samples), Jogging);
    }

    #[test]
    fn test_window_label_uses_its_own_range() {
        use Activity::*;
        let mut labels = vec![Sitting; 6];
        labels.extend(vec![Jogging; 6]);
        let samples = stream(&labels);
        let labels: Vec<Activity> = Windower::new(4, 4).windows(&samples).map(|w| w.label).collect();
        assert_eq!(labels, vec![Sitting, Jogging]);
    }

    #[test]
    #[should_panic]
    fn test_zero_stride_panics() {
        let _ = Windower::new(5, 0);
    }
}
