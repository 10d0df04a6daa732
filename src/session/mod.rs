// Session module - practice session scheduling over a rhythm map
//
// A PracticeSession owns one RhythmMap and one JudgmentEngine and drives
// them from an explicit clock. The host calls `tick` at its frame cadence
// (~16ms) and `hit` whenever the player strikes a pad; the session sweeps
// missed beats, keeps the judgment history and finishes once the clock
// reaches the map duration.
//
// State machine:
//   Ready → Playing ⇄ Paused
//   Playing → Finished (clock reached the end of the map)
//   any → Ready via `stop`

use serde::{Deserialize, Serialize};

use crate::config::{JudgmentConfig, SessionConfig};
use crate::error::{log_session_error, SessionError};
use crate::judgment::{Grade, JudgmentEngine, JudgmentResult, JudgmentType};
use crate::rhythm::{Beat, RhythmMap};

/// Lifecycle state of a practice session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Ready,
    Playing,
    Paused,
    Finished,
}

/// Score record produced at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub map_id: String,
    pub title: String,
    pub total_score: u64,
    /// (perfect + 0.5 × good) / judged beats
    pub accuracy: f64,
    pub grade: Grade,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub max_combo: u32,
    /// Number of recorded judgments (hits and swept misses)
    pub total_hits: u32,
    /// Map duration in seconds
    pub duration: f64,
}

/// Tick-driven practice session
pub struct PracticeSession {
    map: RhythmMap,
    engine: JudgmentEngine,
    config: SessionConfig,
    state: SessionState,
    current_time_ms: f64,
    history: Vec<JudgmentResult>,
}

impl PracticeSession {
    /// Create a session for `map`
    ///
    /// # Errors
    /// `SessionError::InvalidRhythmMap` if the beats are unsorted or carry
    /// invalid times.
    pub fn new(
        map: RhythmMap,
        judgment: JudgmentConfig,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if let Err(err) = map.validate() {
            log_session_error(&err, "PracticeSession::new");
            return Err(err);
        }

        tracing::debug!(
            "[PracticeSession] Loaded map '{}' ({} beats, {:.1}s)",
            map.id,
            map.beats.len(),
            map.duration
        );

        Ok(Self {
            map,
            engine: JudgmentEngine::new(judgment),
            config,
            state: SessionState::Ready,
            current_time_ms: 0.0,
            history: Vec::new(),
        })
    }

    pub fn map(&self) -> &RhythmMap {
        &self.map
    }

    pub fn engine(&self) -> &JudgmentEngine {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session clock in milliseconds since start
    pub fn current_time_ms(&self) -> f64 {
        self.current_time_ms
    }

    /// Every recorded judgment in order (`None` results are never recorded)
    pub fn history(&self) -> &[JudgmentResult] {
        &self.history
    }

    pub fn last_judgment(&self) -> Option<&JudgmentResult> {
        self.history.last()
    }

    /// Begin playing from a ready (or paused) session
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Finished => Err(SessionError::AlreadyFinished),
            SessionState::Playing => Ok(()),
            SessionState::Ready | SessionState::Paused => {
                tracing::info!(
                    "[PracticeSession] Playing '{}' from {:.0}ms",
                    self.map.id,
                    self.current_time_ms
                );
                self.state = SessionState::Playing;
                Ok(())
            }
        }
    }

    /// Freeze the clock; ticks and hits are rejected until `resume`
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.ensure_playing()?;
        self.state = SessionState::Paused;
        tracing::debug!("[PracticeSession] Paused at {:.0}ms", self.current_time_ms);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Paused => self.start(),
            SessionState::Playing => Ok(()),
            SessionState::Finished => Err(SessionError::AlreadyFinished),
            SessionState::Ready => Err(SessionError::NotPlaying),
        }
    }

    /// Switch between playing and paused
    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Playing => self.pause(),
            _ => self.resume(),
        }
    }

    /// Abandon the run and return to `Ready` with a fresh engine
    pub fn stop(&mut self) {
        self.engine.reset();
        self.history.clear();
        self.current_time_ms = 0.0;
        self.state = SessionState::Ready;
    }

    /// Advance the clock by `elapsed_ms` and sweep missed beats
    ///
    /// Once the clock reaches the map duration the session finishes and no
    /// further sweep happens. Negative or NaN elapsed values do not move the
    /// clock.
    ///
    /// # Returns
    /// Misses recorded by this tick
    pub fn tick(&mut self, elapsed_ms: f64) -> Result<Vec<JudgmentResult>, SessionError> {
        self.ensure_playing()?;
        Ok(self.advance_clock(self.current_time_ms + elapsed_ms.max(0.0)))
    }

    /// Tick in `tick_interval_ms` steps until the clock reaches `target_ms`
    ///
    /// The last step is shortened so the clock lands exactly on the target.
    /// Stops early if the session finishes on the way.
    pub fn advance_to(&mut self, target_ms: f64) -> Result<Vec<JudgmentResult>, SessionError> {
        self.ensure_playing()?;

        let step = self.config.tick_interval_ms.max(1.0);
        let mut missed = Vec::new();
        while self.state == SessionState::Playing && self.current_time_ms < target_ms {
            let next = (self.current_time_ms + step).min(target_ms);
            missed.extend(self.advance_clock(next));
        }
        Ok(missed)
    }

    /// Judge a strike on `drum` at the current clock
    ///
    /// The result is always returned; only judged results enter the history.
    pub fn hit(&mut self, drum: &str) -> Result<JudgmentResult, SessionError> {
        self.ensure_playing()?;

        let result = self
            .engine
            .judge(self.current_time_ms, &self.map.beats, Some(drum));
        if result.kind != JudgmentType::None {
            self.history.push(result.clone());
        }
        Ok(result)
    }

    /// Up to `count` beats scheduled strictly after the current clock
    pub fn upcoming_beats(&self, count: usize) -> Vec<&Beat> {
        self.map
            .beats
            .iter()
            .filter(|beat| beat.time_ms() > self.current_time_ms)
            .take(count)
            .collect()
    }

    /// Upcoming beats for visual guides, sized by the session config
    pub fn visual_guides(&self) -> Vec<&Beat> {
        self.upcoming_beats(self.config.upcoming_beats)
    }

    /// Playback position as a percentage of the map duration (0-100)
    pub fn progress_percent(&self) -> f64 {
        if self.map.duration <= 0.0 {
            return 100.0;
        }
        (self.current_time_ms / 1000.0 / self.map.duration * 100.0).min(100.0)
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.map.duration * 1000.0 - self.current_time_ms).max(0.0)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            map_id: self.map.id.clone(),
            title: self.map.title.clone(),
            total_score: self.engine.total_score(),
            accuracy: self.engine.accuracy(),
            grade: self.engine.grade(),
            perfect_count: self.engine.perfect_count(),
            good_count: self.engine.good_count(),
            miss_count: self.engine.miss_count(),
            max_combo: self.engine.max_combo(),
            total_hits: self.history.len() as u32,
            duration: self.map.duration,
        }
    }

    /// Move the clock forward to `time_ms`, then finish or sweep misses
    fn advance_clock(&mut self, time_ms: f64) -> Vec<JudgmentResult> {
        self.current_time_ms = self.current_time_ms.max(time_ms);

        if self.current_time_ms >= self.map.duration * 1000.0 {
            self.finish();
            return Vec::new();
        }

        let missed = self
            .engine
            .check_missed_beats(self.current_time_ms, &self.map.beats, None);
        self.history.extend(missed.iter().cloned());
        missed
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        tracing::info!(
            "[PracticeSession] Finished '{}': score={} accuracy={:.2} grade={}",
            self.map.id,
            self.engine.total_score(),
            self.engine.accuracy(),
            self.engine.grade()
        );
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Playing => Ok(()),
            SessionState::Finished => Err(SessionError::AlreadyFinished),
            SessionState::Ready | SessionState::Paused => Err(SessionError::NotPlaying),
        }
    }
}
