// DrumClassifier - frequency-band drum labelling
//
// Maps an estimated dominant frequency to a drum id using an ordered table
// of half-open ranges [min_freq, max_freq). The first matching range wins;
// frequencies outside every range get the fallback drum.
//
// The default table is a three-band split:
//   low   [20, 150)   -> kick
//   mid   [150, 800)  -> snare
//   high  [800, 5000) -> hihat-closed

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

/// One band of the classification table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    /// Band name for display and logging
    pub name: String,
    /// Inclusive lower bound in Hz
    pub min_freq: f32,
    /// Exclusive upper bound in Hz
    pub max_freq: f32,
    /// Drum id assigned to frequencies in this band
    pub drum_type: String,
}

impl FrequencyRange {
    pub fn new(name: &str, min_freq: f32, max_freq: f32, drum_type: &str) -> Self {
        Self {
            name: name.to_string(),
            min_freq,
            max_freq,
            drum_type: drum_type.to_string(),
        }
    }

    #[inline]
    pub fn contains(&self, freq: f32) -> bool {
        freq >= self.min_freq && freq < self.max_freq
    }
}

static DEFAULT_FREQUENCY_RANGES: Lazy<Vec<FrequencyRange>> = Lazy::new(|| {
    vec![
        FrequencyRange::new("low", 20.0, 150.0, "kick"),
        FrequencyRange::new("mid", 150.0, 800.0, "snare"),
        FrequencyRange::new("high", 800.0, 5000.0, "hihat-closed"),
    ]
});

/// The shipped three-band table
pub fn default_frequency_ranges() -> Vec<FrequencyRange> {
    DEFAULT_FREQUENCY_RANGES.clone()
}

/// Drum id used when no band matches
pub const DEFAULT_FALLBACK_DRUM: &str = "snare";

/// Table-driven drum classifier
#[derive(Debug, Clone, PartialEq)]
pub struct DrumClassifier {
    ranges: Vec<FrequencyRange>,
    fallback: String,
}

impl DrumClassifier {
    /// Create a classifier over an explicit table
    ///
    /// # Arguments
    /// * `ranges` - Ordered bands; earlier bands take priority on overlap
    /// * `fallback` - Drum id returned when nothing matches
    pub fn new(ranges: Vec<FrequencyRange>, fallback: impl Into<String>) -> Self {
        Self {
            ranges,
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.frequency_ranges.clone(), config.fallback_drum.clone())
    }

    pub fn ranges(&self) -> &[FrequencyRange] {
        &self.ranges
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Classify a frequency in Hz
    pub fn classify(&self, freq: f32) -> &str {
        self.ranges
            .iter()
            .find(|range| range.contains(freq))
            .map(|range| range.drum_type.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

impl Default for DrumClassifier {
    fn default() -> Self {
        Self::new(default_frequency_ranges(), DEFAULT_FALLBACK_DRUM)
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
