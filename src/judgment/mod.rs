//! Judgment engine - timing windows, combo and score
//!
//! This module matches discrete hit events against a reference beat list.
//! Key features:
//! - Nearest-beat matching with perfect/good/miss windows (±50/100/150ms default)
//! - Beats are identified by their index in the beat slice, so co-timed beats
//!   on different drums are judged independently
//! - Each beat is judged at most once until `reset`
//! - Combo, max combo, per-category counts, total score, accuracy and grade
//!
//! The engine does no locking and assumes the caller passes non-decreasing
//! timestamps from a single thread of control. Every operation is total:
//! "nothing to match" is a `JudgmentType::None` result, never an error.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rhythm::Beat;

pub use crate::config::{JudgmentConfig, ScoreTable};

/// Outcome category of one judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgmentType {
    Perfect,
    Good,
    Miss,
    /// No beat was consumed
    None,
}

impl JudgmentType {
    /// Display text for feedback overlays
    pub fn label(self) -> &'static str {
        match self {
            JudgmentType::Perfect => "Perfect!",
            JudgmentType::Good => "Good",
            JudgmentType::Miss => "Miss",
            JudgmentType::None => "",
        }
    }

    /// Whether this judgment consumed a beat
    pub fn is_judged(self) -> bool {
        !matches!(self, JudgmentType::None)
    }
}

/// Result of a single `judge` call or missed-beat sweep entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgmentResult {
    #[serde(rename = "type")]
    pub kind: JudgmentType,
    /// Signed timing error in milliseconds; positive means the input was late
    pub delta_ms: f64,
    /// Matched beat, if one was consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat: Option<Beat>,
    /// Index of the matched beat in the slice that was judged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat_index: Option<usize>,
    /// Points awarded by this judgment
    pub score: u32,
    /// Combo after this judgment
    pub combo: u32,
}

impl JudgmentResult {
    fn none(delta_ms: f64, combo: u32) -> Self {
        Self {
            kind: JudgmentType::None,
            delta_ms,
            beat: None,
            beat_index: None,
            score: 0,
            combo,
        }
    }
}

/// Letter grade for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// S ≥ 0.95, A ≥ 0.90, B ≥ 0.80, C ≥ 0.70, otherwise D
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 0.95 {
            Grade::S
        } else if accuracy >= 0.9 {
            Grade::A
        } else if accuracy >= 0.8 {
            Grade::B
        } else if accuracy >= 0.7 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateful matcher of hits against a beat timeline
#[derive(Debug, Clone)]
pub struct JudgmentEngine {
    config: JudgmentConfig,
    combo: u32,
    max_combo: u32,
    perfect_count: u32,
    good_count: u32,
    miss_count: u32,
    total_score: u64,
    /// Indices of beats already judged
    judged: HashSet<usize>,
}

impl JudgmentEngine {
    /// Create an engine with explicit windows
    ///
    /// The windows are expected to satisfy `0 <= perfect <= good <= miss`;
    /// this is a caller precondition and is not validated.
    pub fn new(config: JudgmentConfig) -> Self {
        if !config.is_ordered() {
            log::warn!(
                "[JudgmentEngine] Windows not ordered (perfect={} good={} miss={})",
                config.perfect_window_ms,
                config.good_window_ms,
                config.miss_window_ms
            );
        }

        Self {
            config,
            combo: 0,
            max_combo: 0,
            perfect_count: 0,
            good_count: 0,
            miss_count: 0,
            total_score: 0,
            judged: HashSet::new(),
        }
    }

    pub fn config(&self) -> &JudgmentConfig {
        &self.config
    }

    /// Judge a hit at `input_time_ms` against `beats`
    ///
    /// # Algorithm
    /// 1. Consider beats matching `drum_filter` (all beats if `None`) that
    ///    have not been judged yet
    /// 2. Pick the one nearest to the input; on equal distance the first in
    ///    slice order wins
    /// 3. Classify |delta| against the perfect, good and miss windows
    /// 4. Beyond the miss window nothing is consumed and `None` is returned
    ///    with the signed delta, so a later, closer hit can still match
    ///
    /// # Returns
    /// `JudgmentType::None` with `delta_ms = 0` when no candidate exists
    pub fn judge(
        &mut self,
        input_time_ms: f64,
        beats: &[Beat],
        drum_filter: Option<&str>,
    ) -> JudgmentResult {
        let mut nearest: Option<(usize, &Beat)> = None;
        let mut min_distance = f64::INFINITY;
        for (index, beat) in self.eligible(beats, drum_filter) {
            let distance = (input_time_ms - beat.time_ms()).abs();
            if distance < min_distance {
                min_distance = distance;
                nearest = Some((index, beat));
            }
        }

        let (index, beat) = match nearest {
            Some(found) => found,
            None => return JudgmentResult::none(0.0, self.combo),
        };

        let delta_ms = input_time_ms - beat.time_ms();
        let kind = match self.classify(delta_ms.abs()) {
            Some(kind) => kind,
            None => return JudgmentResult::none(delta_ms, self.combo),
        };

        let score = self.record(kind);
        self.judged.insert(index);

        log::debug!(
            "[JudgmentEngine] {:?} on beat {} ({}) delta={:.1}ms combo={}",
            kind,
            index,
            beat.drum,
            delta_ms,
            self.combo
        );

        JudgmentResult {
            kind,
            delta_ms,
            beat: Some(beat.clone()),
            beat_index: Some(index),
            score,
            combo: self.combo,
        }
    }

    /// Sweep beats whose miss window has fully elapsed
    ///
    /// Every eligible, unjudged beat with `time + miss_window < current_time_ms`
    /// is marked judged and reported as a miss with
    /// `delta_ms = current_time_ms - beat_time`. Safe to call every tick:
    /// a beat is never reported twice, and beats already consumed by
    /// `judge` are skipped.
    pub fn check_missed_beats(
        &mut self,
        current_time_ms: f64,
        beats: &[Beat],
        drum_filter: Option<&str>,
    ) -> Vec<JudgmentResult> {
        let miss_window = self.config.miss_window_ms;
        let expired: Vec<(usize, &Beat)> = self
            .eligible(beats, drum_filter)
            .filter(|(_, beat)| beat.time_ms() + miss_window < current_time_ms)
            .collect();

        let mut missed = Vec::with_capacity(expired.len());
        for (index, beat) in expired {
            self.judged.insert(index);
            let score = self.record(JudgmentType::Miss);

            missed.push(JudgmentResult {
                kind: JudgmentType::Miss,
                delta_ms: current_time_ms - beat.time_ms(),
                beat: Some(beat.clone()),
                beat_index: Some(index),
                score,
                combo: 0,
            });
        }

        if !missed.is_empty() {
            log::debug!(
                "[JudgmentEngine] {} beats missed by {:.1}ms",
                missed.len(),
                current_time_ms
            );
        }

        missed
    }

    /// First unjudged eligible beat strictly after `current_time_ms`
    pub fn next_beat<'a>(
        &self,
        current_time_ms: f64,
        beats: &'a [Beat],
        drum_filter: Option<&str>,
    ) -> Option<&'a Beat> {
        self.eligible(beats, drum_filter)
            .find(|(_, beat)| beat.time_ms() > current_time_ms)
            .map(|(_, beat)| beat)
    }

    /// Whether the beat at `index` has been judged
    pub fn is_judged(&self, index: usize) -> bool {
        self.judged.contains(&index)
    }

    /// Clear combo, counters, score and the judged set
    pub fn reset(&mut self) {
        self.combo = 0;
        self.max_combo = 0;
        self.perfect_count = 0;
        self.good_count = 0;
        self.miss_count = 0;
        self.total_score = 0;
        self.judged.clear();
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn perfect_count(&self) -> u32 {
        self.perfect_count
    }

    pub fn good_count(&self) -> u32 {
        self.good_count
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Number of beats judged so far
    pub fn judged_count(&self) -> u32 {
        self.perfect_count + self.good_count + self.miss_count
    }

    /// (perfect + 0.5 × good) / (perfect + good + miss), or 0 with no judgments
    pub fn accuracy(&self) -> f64 {
        let total = self.judged_count();
        if total == 0 {
            return 0.0;
        }
        (self.perfect_count as f64 + self.good_count as f64 * 0.5) / total as f64
    }

    pub fn grade(&self) -> Grade {
        Grade::from_accuracy(self.accuracy())
    }

    /// Unjudged beats passing the drum filter, with their indices
    fn eligible<'s, 'a: 's>(
        &'s self,
        beats: &'a [Beat],
        drum_filter: Option<&'s str>,
    ) -> impl Iterator<Item = (usize, &'a Beat)> + 's {
        beats.iter().enumerate().filter(move |(index, beat)| {
            drum_filter.map_or(true, |drum| beat.drum == drum) && !self.judged.contains(index)
        })
    }

    /// Map an absolute timing error to a category, `None` past the miss window
    fn classify(&self, abs_delta_ms: f64) -> Option<JudgmentType> {
        if abs_delta_ms <= self.config.perfect_window_ms {
            Some(JudgmentType::Perfect)
        } else if abs_delta_ms <= self.config.good_window_ms {
            Some(JudgmentType::Good)
        } else if abs_delta_ms <= self.config.miss_window_ms {
            Some(JudgmentType::Miss)
        } else {
            None
        }
    }

    /// Apply a judgment to combo, counters and score; returns points awarded
    fn record(&mut self, kind: JudgmentType) -> u32 {
        let scores = self.config.scores;
        let score = match kind {
            JudgmentType::Perfect => {
                self.perfect_count += 1;
                self.combo += 1;
                scores.perfect
            }
            JudgmentType::Good => {
                self.good_count += 1;
                self.combo += 1;
                scores.good
            }
            JudgmentType::Miss => {
                self.miss_count += 1;
                self.combo = 0;
                scores.miss
            }
            JudgmentType::None => 0,
        };

        self.max_combo = self.max_combo.max(self.combo);
        self.total_score += score as u64;
        score
    }
}

impl Default for JudgmentEngine {
    fn default() -> Self {
        Self::new(JudgmentConfig::default())
    }
}
