//! TempoEstimator - BPM from inter-onset intervals
//!
//! Consecutive onset gaps are bucketed into a 50ms histogram; the most
//! populated bucket inside the plausible beat-period range (0.2s, 1.5s)
//! becomes the beat period. Too few onsets, or no bucket in range, yields
//! the 120 BPM default.

/// Histogram-based tempo estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TempoEstimator;

impl TempoEstimator {
    /// Tempo reported when there is not enough data
    pub const DEFAULT_BPM: u32 = 120;
    /// Fewer onsets than this gives `DEFAULT_BPM`
    pub const MIN_ONSETS: usize = 4;
    /// Histogram bucket width in seconds
    const BUCKET_SECS: f64 = 0.05;
    /// Beat period used when no bucket is plausible (120 BPM)
    const DEFAULT_INTERVAL_SECS: f64 = 0.5;
    const MIN_INTERVAL_SECS: f64 = 0.2;
    const MAX_INTERVAL_SECS: f64 = 1.5;
    const MIN_BPM: u32 = 60;
    const MAX_BPM: u32 = 200;

    pub fn new() -> Self {
        Self
    }

    /// Estimate BPM from ascending onset times in seconds
    ///
    /// # Returns
    /// BPM clamped to [60, 200]
    pub fn estimate(&self, onset_times: &[f64]) -> u32 {
        if onset_times.len() < Self::MIN_ONSETS {
            log::debug!(
                "[TempoEstimator] {} onsets, defaulting to {} BPM",
                onset_times.len(),
                Self::DEFAULT_BPM
            );
            return Self::DEFAULT_BPM;
        }

        let histogram = Self::interval_histogram(onset_times);
        let best_interval = Self::best_interval(&histogram);

        let bpm = (60.0 / best_interval).round();
        (bpm as u32).clamp(Self::MIN_BPM, Self::MAX_BPM)
    }

    /// Bucket consecutive intervals; buckets keep first-appearance order
    ///
    /// Each entry is (bucket index, count); the bucket's interval is
    /// `index * 0.05` seconds.
    fn interval_histogram(onset_times: &[f64]) -> Vec<(i64, usize)> {
        let mut histogram: Vec<(i64, usize)> = Vec::new();

        for pair in onset_times.windows(2) {
            let interval = pair[1] - pair[0];
            let bucket = (interval / Self::BUCKET_SECS).round() as i64;

            match histogram.iter_mut().find(|(index, _)| *index == bucket) {
                Some((_, count)) => *count += 1,
                None => histogram.push((bucket, 1)),
            }
        }

        histogram
    }

    /// Most populated plausible bucket; ties keep the earlier bucket
    fn best_interval(histogram: &[(i64, usize)]) -> f64 {
        let mut max_count = 0;
        let mut best = Self::DEFAULT_INTERVAL_SECS;

        for &(bucket, count) in histogram {
            let interval = bucket as f64 * Self::BUCKET_SECS;
            if count > max_count
                && interval > Self::MIN_INTERVAL_SECS
                && interval < Self::MAX_INTERVAL_SECS
            {
                max_count = count;
                best = interval;
            }
        }

        best
    }
}
