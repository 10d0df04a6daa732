// FrequencyEstimator - zero-crossing frequency proxy
//
// Counts sign changes across a window and converts the count to Hz:
// f = crossings * sample_rate / (2 * window_length). Coarse, but enough to
// separate low (kick), mid (snare) and high (hi-hat) content.

/// Estimates a dominant frequency from zero crossings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEstimator {
    sample_rate: u32,
}

impl FrequencyEstimator {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Count sign changes between consecutive samples
    ///
    /// Zero counts as non-negative, so a crossing is `prev < 0 && cur >= 0`
    /// or `prev >= 0 && cur < 0`.
    pub fn count_crossings(window: &[f32]) -> usize {
        window
            .windows(2)
            .filter(|pair| {
                let (prev, cur) = (pair[0], pair[1]);
                (prev < 0.0 && cur >= 0.0) || (prev >= 0.0 && cur < 0.0)
            })
            .count()
    }

    /// Estimate the dominant frequency of a window in Hz
    ///
    /// # Returns
    /// 0.0 for an empty window, otherwise a non-negative estimate
    pub fn estimate(&self, window: &[f32]) -> f32 {
        if window.is_empty() {
            return 0.0;
        }

        let crossings = Self::count_crossings(window);
        (crossings as f64 * self.sample_rate as f64 / (2.0 * window.len() as f64)) as f32
    }
}
