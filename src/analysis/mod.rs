// Analysis module - batch onset/tempo analysis over a decoded buffer
//
// This module orchestrates the complete analysis pipeline, turning a
// decoded mono buffer into classified, timed drum events plus a tempo.
//
// Architecture:
// - OnsetAnalysisPipeline: one blocking pass over a borrowed buffer
// - Pipeline: FrameEnergyAnalyzer → FluxPeakDetector → FrequencyEstimator
//   → DrumClassifier, then TempoEstimator over the onset times
// - AnalysisJob: runs a pipeline on a worker thread with coarse cancellation
// - Output: AnalysisResult (drum points, BPM, duration)

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{log_analysis_error, AnalysisError};

pub mod classifier;
pub mod edit;
pub mod energy;
pub mod frequency;
pub mod onset;
pub mod tempo;

use classifier::DrumClassifier;
use energy::FrameEnergyAnalyzer;
use frequency::FrequencyEstimator;
use onset::FluxPeakDetector;
use tempo::TempoEstimator;

/// Decoded mono audio owned by the caller
///
/// The pipeline only borrows it, so one buffer can be analyzed, played back
/// and re-analyzed with different settings without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// First-channel samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Buffer length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// A classified onset, candidate for becoming a beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumPoint {
    /// Time in seconds
    pub time: f64,
    /// Normalized onset strength (0.0-1.0)
    pub strength: f32,
    /// Estimated dominant frequency in Hz
    pub frequency: f32,
    /// Drum id assigned by the classifier
    pub auto_drum: String,
    /// Set once a person has reviewed or edited the point
    pub confirmed: bool,
}

/// Output of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Drum points in ascending time order
    pub drum_points: Vec<DrumPoint>,
    /// Estimated tempo in [60, 200]
    pub bpm: u32,
    /// Length of the analyzed buffer in seconds
    pub duration: f64,
    /// Sample rate of the analyzed buffer
    pub sample_rate: u32,
}

/// Pipeline stage reported through progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStage {
    Idle,
    Analyzing,
    Detecting,
    Complete,
    Error,
}

/// Progress snapshot (percent in 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    pub percent: u32,
}

impl AnalysisProgress {
    fn new(stage: AnalysisStage, percent: u32) -> Self {
        Self { stage, percent }
    }
}

/// Batch onset analysis pipeline
///
/// Holds only configuration; every call works on its own locals, so one
/// pipeline can be cloned into as many concurrent jobs as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetAnalysisPipeline {
    config: AnalysisConfig,
    classifier: DrumClassifier,
    tempo: TempoEstimator,
}

impl OnsetAnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        let classifier = DrumClassifier::from_config(&config);
        Self {
            config,
            classifier,
            tempo: TempoEstimator::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn classifier(&self) -> &DrumClassifier {
        &self.classifier
    }

    /// Analyze a complete decoded buffer
    ///
    /// # Errors
    /// * `AnalysisError::InvalidSampleRate` - sample rate is 0
    /// * `AnalysisError::EmptyBuffer` - no samples
    ///
    /// A buffer shorter than one frame, or one without any energy rise, is
    /// not an error: it yields no drum points and the default tempo.
    pub fn analyze(&self, audio: &DecodedAudio) -> Result<AnalysisResult, AnalysisError> {
        self.run(audio, None, &mut |_| {})
    }

    /// Analyze while reporting stage transitions
    pub fn analyze_with_progress(
        &self,
        audio: &DecodedAudio,
        on_progress: &mut dyn FnMut(AnalysisProgress),
    ) -> Result<AnalysisResult, AnalysisError> {
        self.run(audio, None, on_progress)
    }

    fn run(
        &self,
        audio: &DecodedAudio,
        cancel: Option<&AtomicBool>,
        on_progress: &mut dyn FnMut(AnalysisProgress),
    ) -> Result<AnalysisResult, AnalysisError> {
        if let Err(err) = Self::validate(audio) {
            log_analysis_error(&err, "OnsetAnalysisPipeline::analyze");
            on_progress(AnalysisProgress::new(AnalysisStage::Error, 0));
            return Err(err);
        }

        let sample_rate = audio.sample_rate;
        tracing::info!(
            "[OnsetAnalysisPipeline] Analyzing {} samples at {} Hz ({:.2}s)",
            audio.samples.len(),
            sample_rate,
            audio.duration()
        );

        Self::checkpoint(
            cancel,
            on_progress,
            AnalysisProgress::new(AnalysisStage::Analyzing, 30),
        )?;
        let energy = FrameEnergyAnalyzer::new(self.config.frame_size, self.config.hop_size);
        let energies = energy.analyze(&audio.samples);

        Self::checkpoint(
            cancel,
            on_progress,
            AnalysisProgress::new(AnalysisStage::Detecting, 60),
        )?;
        let detector = FluxPeakDetector::with_config(sample_rate, &self.config);
        let onsets = detector.detect(&energies);

        Self::checkpoint(
            cancel,
            on_progress,
            AnalysisProgress::new(AnalysisStage::Detecting, 90),
        )?;
        let estimator = FrequencyEstimator::new(sample_rate);
        let drum_points: Vec<DrumPoint> = onsets
            .iter()
            .map(|onset| {
                let start = onset.frame * energy.hop_size();
                let end = (start + energy.frame_size()).min(audio.samples.len());
                let frequency = estimator.estimate(&audio.samples[start.min(end)..end]);

                DrumPoint {
                    time: onset.time,
                    strength: onset.strength,
                    frequency,
                    auto_drum: self.classifier.classify(frequency).to_string(),
                    confirmed: false,
                }
            })
            .collect();

        let onset_times: Vec<f64> = drum_points.iter().map(|point| point.time).collect();
        let bpm = self.tempo.estimate(&onset_times);

        Self::checkpoint(
            cancel,
            on_progress,
            AnalysisProgress::new(AnalysisStage::Complete, 100),
        )?;
        tracing::info!(
            "[OnsetAnalysisPipeline] Detected {} drum points, BPM: {}",
            drum_points.len(),
            bpm
        );

        Ok(AnalysisResult {
            drum_points,
            bpm,
            duration: audio.duration(),
            sample_rate,
        })
    }

    /// Honour cancellation, then report progress
    fn checkpoint(
        cancel: Option<&AtomicBool>,
        on_progress: &mut dyn FnMut(AnalysisProgress),
        progress: AnalysisProgress,
    ) -> Result<(), AnalysisError> {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(AnalysisError::Cancelled);
        }
        on_progress(progress);
        Ok(())
    }

    fn validate(audio: &DecodedAudio) -> Result<(), AnalysisError> {
        if audio.sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate {
                sample_rate: audio.sample_rate,
            });
        }
        if audio.samples.is_empty() {
            return Err(AnalysisError::EmptyBuffer);
        }
        Ok(())
    }
}

impl Default for OnsetAnalysisPipeline {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Background analysis on a dedicated thread
///
/// Cancellation is coarse: the flag is checked between pipeline stages and
/// a cancelled job yields `AnalysisError::Cancelled` with no partial output.
pub struct AnalysisJob {
    handle: JoinHandle<Result<AnalysisResult, AnalysisError>>,
    cancel_flag: Arc<AtomicBool>,
    progress: Arc<AtomicU32>,
}

impl AnalysisJob {
    /// Start analyzing `audio` on a new thread
    ///
    /// The buffer is shared read-only; the caller keeps its own handle.
    pub fn spawn(pipeline: OnsetAnalysisPipeline, audio: Arc<DecodedAudio>) -> Self {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(AtomicU32::new(0));

        let worker_cancel = Arc::clone(&cancel_flag);
        let worker_progress = Arc::clone(&progress);

        let handle = thread::spawn(move || {
            tracing::debug!("[AnalysisJob] Worker started");
            let result = pipeline.run(&audio, Some(&worker_cancel), &mut |update| {
                worker_progress.store(update.percent, Ordering::Relaxed);
            });
            if let Err(AnalysisError::Cancelled) = result {
                tracing::info!("[AnalysisJob] Cancelled, discarding partial output");
            }
            result
        });

        Self {
            handle,
            cancel_flag,
            progress,
        }
    }

    /// Request cancellation; takes effect at the next stage boundary
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Last reported progress percentage
    pub fn progress(&self) -> u32 {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and take its result
    ///
    /// A panic on the worker thread is resumed on the caller.
    pub fn join(self) -> Result<AnalysisResult, AnalysisError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

#[cfg(test)]
mod tests;
