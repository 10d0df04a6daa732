//! Rhythm maps - the reference timelines judged during practice
//!
//! A `RhythmMap` is an ordered list of `Beat`s plus metadata. Maps come from
//! authored lessons (deserialized from JSON) or from the onset analysis
//! pipeline via [`RhythmMap::from_analysis`]. They are read-only while a
//! session judges against them.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::error::SessionError;

/// A scheduled hit in a rhythm timeline
///
/// Several beats may share the same `time` (e.g. kick and hi-hat struck
/// together), so a beat is identified by its position in the map, never by
/// its time alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    /// Time in seconds from the start of the map
    pub time: f64,
    /// Drum id (e.g. "kick", "snare", "hihat-closed")
    pub drum: String,
    /// Display label such as the count within a bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Marks the final beat of a lesson
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_end: Option<bool>,
}

impl Beat {
    pub fn new(time: f64, drum: impl Into<String>) -> Self {
        Self {
            time,
            drum: drum.into(),
            label: None,
            is_end: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Beat time in milliseconds, the judgment engine's clock domain
    #[inline]
    pub fn time_ms(&self) -> f64 {
        self.time * 1000.0
    }
}

/// Musical style tag of a rhythm map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhythmStyle {
    Rock,
    #[default]
    Pop,
    Electronic,
}

/// Lesson difficulty tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Elementary,
    Intermediate,
    Advanced,
}

/// Ordered, timed sequence of beats plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhythmMap {
    pub id: String,
    pub title: String,
    pub bpm: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Beats sorted ascending by time
    pub beats: Vec<Beat>,
    #[serde(default)]
    pub style: RhythmStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl RhythmMap {
    /// Build a playable map from analysis output
    ///
    /// Every drum point becomes one beat carrying the point's (possibly
    /// user-edited) drum id. Imported maps are tagged pop / beginner.
    pub fn from_analysis(id: &str, title: &str, analysis: &AnalysisResult) -> Self {
        let beats = analysis
            .drum_points
            .iter()
            .map(|point| Beat::new(point.time, point.auto_drum.clone()).with_label(""))
            .collect();

        Self {
            id: format!("mp3-import-{}", id),
            title: title.to_string(),
            bpm: analysis.bpm,
            duration: analysis.duration,
            beats,
            style: RhythmStyle::Pop,
            difficulty: Some(Difficulty::Beginner),
        }
    }

    /// Check the ordering invariants the judgment engine relies on
    ///
    /// # Errors
    /// `SessionError::InvalidRhythmMap` if the duration or a beat time is
    /// negative or not finite, or if beats are out of order.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(SessionError::InvalidRhythmMap {
                reason: format!("invalid duration {}", self.duration),
            });
        }

        for (index, beat) in self.beats.iter().enumerate() {
            if !beat.time.is_finite() || beat.time < 0.0 {
                return Err(SessionError::InvalidRhythmMap {
                    reason: format!("beat {} has invalid time {}", index, beat.time),
                });
            }
        }

        if let Some(index) = self
            .beats
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(SessionError::InvalidRhythmMap {
                reason: format!("beat {} precedes beat {}", index + 1, index),
            });
        }

        Ok(())
    }

    /// Distinct drum ids used by the map, in order of first appearance
    pub fn drums(&self) -> Vec<&str> {
        let mut drums: Vec<&str> = Vec::new();
        for beat in &self.beats {
            if !drums.contains(&beat.drum.as_str()) {
                drums.push(&beat.drum);
            }
        }
        drums
    }
}
