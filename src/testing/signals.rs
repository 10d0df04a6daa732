//! Synthetic drum hits
//!
//! Each voice is a decaying sine burst whose pitch lands in one band of the
//! default classifier table once seen through the zero-crossing estimator.
//! The estimator's window starts up to one hop before a hit, so it measures
//! roughly half the burst's true pitch; voice frequencies are picked with
//! that in mind.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

use crate::analysis::DecodedAudio;

/// Length of a synthetic hit in milliseconds
const HIT_DURATION_MS: f32 = 150.0;
/// Amplitude envelope time constant in milliseconds
const DECAY_MS: f32 = 40.0;
const HIT_AMPLITUDE: f32 = 0.8;

/// Synthetic drum voices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumVoice {
    Kick,
    Snare,
    HiHat,
}

impl DrumVoice {
    /// Burst pitch in Hz
    pub fn frequency(self) -> f32 {
        match self {
            DrumVoice::Kick => 120.0,
            DrumVoice::Snare => 800.0,
            DrumVoice::HiHat => 6000.0,
        }
    }

    /// Drum id the default classifier assigns to this voice
    pub fn drum_id(self) -> &'static str {
        match self {
            DrumVoice::Kick => "kick",
            DrumVoice::Snare => "snare",
            DrumVoice::HiHat => "hihat-closed",
        }
    }

    /// Render one hit
    pub fn render(self, sample_rate: u32) -> Vec<f32> {
        let len = (sample_rate as f32 * HIT_DURATION_MS / 1000.0) as usize;
        let freq = self.frequency();
        let sr = sample_rate as f32;

        (0..len)
            .map(|i| {
                let t = i as f32 / sr;
                let envelope = (-t * 1000.0 / DECAY_MS).exp();
                HIT_AMPLITUDE * envelope * (2.0 * PI * freq * t).sin()
            })
            .collect()
    }
}

/// Seeded white noise in [-amplitude, amplitude]
pub fn white_noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(-1.0..1.0) * amplitude)
        .collect()
}

/// Mono buffer with hits mixed in at chosen sample offsets
#[derive(Debug, Clone)]
pub struct HitTrack {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl HitTrack {
    /// Silent track of `len` samples
    pub fn new(sample_rate: u32, len: usize) -> Self {
        Self {
            sample_rate,
            samples: vec![0.0; len],
        }
    }

    /// Evenly spaced hits cycling through `voices`
    ///
    /// The track is long enough to hold every hit plus a one-second tail.
    pub fn grid(sample_rate: u32, voices: &[DrumVoice], first: usize, spacing: usize) -> Self {
        let len = first + spacing * voices.len() + sample_rate as usize;
        let mut track = Self::new(sample_rate, len);
        for (i, &voice) in voices.iter().enumerate() {
            track.place(voice, first + i * spacing);
        }
        track
    }

    /// Metronome-style click track: `count` hits of one voice at `bpm`
    ///
    /// The first click falls one beat into the track.
    pub fn click_track(sample_rate: u32, bpm: u32, count: usize, voice: DrumVoice) -> Self {
        let spacing = (60.0 / bpm.max(1) as f64 * sample_rate as f64).round() as usize;
        let voices = vec![voice; count];
        Self::grid(sample_rate, &voices, spacing, spacing)
    }

    /// Mix a hit starting at `start`; the part past the end is dropped
    pub fn place(&mut self, voice: DrumVoice, start: usize) -> &mut Self {
        let hit = voice.render(self.sample_rate);
        for (offset, value) in hit.into_iter().enumerate() {
            match self.samples.get_mut(start + offset) {
                Some(sample) => *sample = (*sample + value).clamp(-1.0, 1.0),
                None => break,
            }
        }
        self
    }

    /// Add seeded noise over the whole track
    pub fn add_noise(&mut self, amplitude: f32, seed: u64) -> &mut Self {
        let noise = white_noise(self.samples.len(), amplitude, seed);
        for (sample, n) in self.samples.iter_mut().zip(noise) {
            *sample = (*sample + n).clamp(-1.0, 1.0);
        }
        self
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_audio(self) -> DecodedAudio {
        DecodedAudio::new(self.samples, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_length_and_range() {
        let hit = DrumVoice::Kick.render(48000);
        assert_eq!(hit.len(), 7200);
        assert!(hit.iter().all(|s| s.abs() <= HIT_AMPLITUDE));
        assert_eq!(hit[0], 0.0);
    }

    #[test]
    fn test_white_noise_is_deterministic() {
        let a = white_noise(256, 0.5, 7);
        let b = white_noise(256, 0.5, 7);
        let c = white_noise(256, 0.5, 8);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|s| s.abs() <= 0.5));
    }

    #[test]
    fn test_place_truncates_at_end() {
        let mut track = HitTrack::new(44100, 100);
        track.place(DrumVoice::Snare, 90);

        assert_eq!(track.samples().len(), 100);
        assert!(track.samples()[..90].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_grid_length() {
        let track = HitTrack::grid(44100, &[DrumVoice::Kick, DrumVoice::Snare], 2048, 22016);
        let audio = track.into_audio();
        assert_eq!(audio.samples.len(), 2048 + 2 * 22016 + 44100);
        assert_eq!(audio.sample_rate, 44100);
    }

    #[test]
    fn test_click_track_spacing() {
        let track = HitTrack::click_track(44100, 120, 4, DrumVoice::Kick);
        assert_eq!(track.samples().len(), 22050 + 4 * 22050 + 44100);
        assert!(track.samples()[..22050].iter().all(|&s| s == 0.0));
        // sin(0) at the click onset, non-zero right after
        assert_ne!(track.samples()[22051], 0.0);
    }
}
