//! Configuration management for analysis and judging parameters
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Onset detection
//! thresholds, the drum frequency table, judgment windows and session
//! cadence can all be adjusted via the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::classifier::{default_frequency_ranges, FrequencyRange};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub judgment: JudgmentConfig,
    pub session: SessionConfig,
}

/// Onset analysis pipeline parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frame length in samples for energy computation
    pub frame_size: usize,
    /// Hop between consecutive frames in samples
    pub hop_size: usize,
    /// Peak threshold applied to the normalized flux curve (0.0-1.0)
    pub threshold: f32,
    /// Minimum spacing between accepted onsets in seconds
    pub min_interval_secs: f64,
    /// Ordered frequency table used by the drum classifier (first match wins)
    pub frequency_ranges: Vec<FrequencyRange>,
    /// Drum id returned when no range matches
    pub fallback_drum: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            // ~11.6ms at 44.1kHz
            hop_size: 512,
            threshold: 0.15,
            min_interval_secs: 0.1,
            frequency_ranges: default_frequency_ranges(),
            fallback_drum: "snare".to_string(),
        }
    }
}

/// Points awarded per judgment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            perfect: 100,
            good: 50,
            miss: 0,
        }
    }
}

/// Timing windows for the judgment engine
///
/// Windows are absolute distances in milliseconds and are expected to be
/// non-decreasing (`perfect <= good <= miss`). The engine does not check
/// this; a config that violates it simply never produces the shadowed
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentConfig {
    pub perfect_window_ms: f64,
    pub good_window_ms: f64,
    pub miss_window_ms: f64,
    pub scores: ScoreTable,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            perfect_window_ms: 50.0,
            good_window_ms: 100.0,
            miss_window_ms: 150.0,
            scores: ScoreTable::default(),
        }
    }
}

impl JudgmentConfig {
    /// Whether the windows are ordered `0 <= perfect <= good <= miss`
    pub fn is_ordered(&self) -> bool {
        0.0 <= self.perfect_window_ms
            && self.perfect_window_ms <= self.good_window_ms
            && self.good_window_ms <= self.miss_window_ms
    }
}

/// Practice session scheduling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cadence at which the host is expected to call `tick` (~60 Hz)
    pub tick_interval_ms: f64,
    /// Number of upcoming beats exposed for visual guides
    pub upcoming_beats: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16.0,
            upcoming_beats: 4,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Returns
    /// * Loaded configuration, or the default config if the file doesn't
    ///   exist or the JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("assets/drumkit_config.json")
    }
}
