// FluxPeakDetector - energy-flux onset detection
//
// Detects percussive onsets from a per-frame energy curve produced by
// FrameEnergyAnalyzer.
//
// Algorithm:
// 1. Flux: half-wave rectified first difference, flux[0] = 0,
//    flux[i] = max(0, E[i] - E[i-1])
// 2. Normalize by the global maximum flux (no peaks if the maximum is 0)
// 3. Peak pick over indices 2..len-2: strictly greater than the two
//    neighbours on each side and above the threshold
// 4. Reject peaks closer than the minimum interval to the last accepted onset

use crate::config::AnalysisConfig;

/// A detected onset on the frame grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onset {
    /// Frame index in the energy curve
    pub frame: usize,
    /// Onset time in seconds (frame * hop / sample_rate)
    pub time: f64,
    /// Normalized flux at the peak (0.0-1.0)
    pub strength: f32,
}

/// Picks onsets from a frame energy curve
#[derive(Debug, Clone, PartialEq)]
pub struct FluxPeakDetector {
    threshold: f32,
    min_interval_secs: f64,
    sample_rate: u32,
    hop_size: usize,
}

impl FluxPeakDetector {
    /// Create a detector with default threshold (0.15) and spacing (100ms)
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz (e.g., 44100)
    /// * `hop_size` - Hop between energy frames in samples
    pub fn new(sample_rate: u32, hop_size: usize) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            threshold: defaults.threshold,
            min_interval_secs: defaults.min_interval_secs,
            sample_rate,
            hop_size: hop_size.max(1),
        }
    }

    /// Create a detector with explicit configuration parameters
    pub fn with_config(sample_rate: u32, config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.threshold,
            min_interval_secs: config.min_interval_secs.max(0.0),
            sample_rate,
            hop_size: config.hop_size.max(1),
        }
    }

    /// Minimum number of frames between two accepted onsets
    pub fn min_frame_interval(&self) -> usize {
        (self.min_interval_secs * self.sample_rate as f64 / self.hop_size as f64).floor() as usize
    }

    /// Convert a frame index to seconds
    #[inline]
    pub fn frame_to_secs(&self, frame: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (frame * self.hop_size) as f64 / self.sample_rate as f64
    }

    /// Detect onsets in an energy curve
    ///
    /// Returns an empty list when the curve is too short to hold a peak or
    /// when the energy never rises (maximum flux of zero).
    pub fn detect(&self, energies: &[f32]) -> Vec<Onset> {
        let flux = compute_flux(energies);
        let normalized = match normalize(&flux) {
            Some(normalized) => normalized,
            None => {
                log::debug!("[FluxPeakDetector] Flat energy curve, no onsets");
                return Vec::new();
            }
        };

        let mut onsets = Vec::new();
        if normalized.len() < 5 {
            return onsets;
        }

        let min_gap = self.min_frame_interval();
        let mut last_accepted: Option<usize> = None;

        for i in 2..normalized.len() - 2 {
            let current = normalized[i];
            if !self.is_peak(&normalized, i) {
                continue;
            }

            if let Some(last) = last_accepted {
                if i - last < min_gap {
                    continue;
                }
            }

            last_accepted = Some(i);
            onsets.push(Onset {
                frame: i,
                time: self.frame_to_secs(i),
                strength: current,
            });
        }

        log::debug!(
            "[FluxPeakDetector] {} onsets from {} frames (min gap {} frames)",
            onsets.len(),
            energies.len(),
            min_gap
        );

        onsets
    }

    /// Local maximum over a five-frame neighbourhood that clears the threshold
    fn is_peak(&self, normalized: &[f32], i: usize) -> bool {
        let current = normalized[i];
        current > self.threshold
            && current > normalized[i - 1]
            && current > normalized[i - 2]
            && current > normalized[i + 1]
            && current > normalized[i + 2]
    }
}

/// Half-wave rectified first difference of the energy curve
pub fn compute_flux(energies: &[f32]) -> Vec<f32> {
    if energies.is_empty() {
        return Vec::new();
    }

    let mut flux = Vec::with_capacity(energies.len());
    flux.push(0.0);
    flux.extend(
        energies
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).max(0.0)),
    );
    flux
}

/// Scale flux into 0.0-1.0 by its maximum
///
/// Returns `None` when the maximum is zero (or not finite): a curve that
/// never rises carries no onsets.
pub fn normalize(flux: &[f32]) -> Option<Vec<f32>> {
    let max = flux.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 || !max.is_finite() {
        return None;
    }
    Some(flux.iter().map(|f| f / max).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Energy curve that jumps at each of `rises` and decays back to zero
    fn stepped_energy(len: usize, rises: &[usize]) -> Vec<f32> {
        let mut energy = vec![0.0; len];
        for &frame in rises {
            if frame < len {
                energy[frame] = 1.0;
            }
            if frame + 1 < len {
                energy[frame + 1] = 0.5;
            }
        }
        energy
    }

    #[test]
    fn test_flux_is_half_wave_rectified() {
        let flux = compute_flux(&[0.0, 1.0, 0.5, 0.7, 0.7]);
        assert_eq!(flux.len(), 5);
        assert_eq!(flux[0], 0.0);
        assert_eq!(flux[1], 1.0);
        assert_eq!(flux[2], 0.0);
        assert!((flux[3] - 0.2).abs() < 1e-6);
        assert_eq!(flux[4], 0.0);
    }

    #[test]
    fn test_flux_of_empty_curve() {
        assert!(compute_flux(&[]).is_empty());
    }

    #[test]
    fn test_normalize_zero_max_yields_none() {
        assert!(normalize(&[0.0, 0.0, 0.0]).is_none());
        let normalized = normalize(&[0.0, 2.0, 1.0]).unwrap();
        assert_eq!(normalized, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_detects_isolated_rises() {
        let detector = FluxPeakDetector::new(44100, 512);
        let energies = stepped_energy(200, &[20, 80, 140]);

        let onsets = detector.detect(&energies);

        let frames: Vec<usize> = onsets.iter().map(|o| o.frame).collect();
        assert_eq!(frames, vec![20, 80, 140]);
        for onset in &onsets {
            assert!((onset.strength - 1.0).abs() < 1e-6);
        }
        assert!((onsets[0].time - 20.0 * 512.0 / 44100.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_curve_yields_no_onsets() {
        let detector = FluxPeakDetector::new(44100, 512);
        assert!(detector.detect(&[0.3; 100]).is_empty());
        assert!(detector.detect(&[]).is_empty());
    }

    #[test]
    fn test_peaks_below_threshold_rejected() {
        let detector = FluxPeakDetector::new(44100, 512);
        let mut energies = stepped_energy(120, &[30]);
        // A second rise at 10% of the first stays under the 0.15 threshold
        energies[90] = 0.1;

        let onsets = detector.detect(&energies);
        assert_eq!(onsets.len(), 1);
        assert_eq!(onsets[0].frame, 30);
    }

    #[test]
    fn test_edge_frames_never_peak() {
        let detector = FluxPeakDetector::new(44100, 512);
        // Rises at frame 1 and in the last two frames cannot be checked
        // against two neighbours on each side
        let energies = stepped_energy(50, &[1, 48]);
        assert!(detector.detect(&energies).is_empty());
    }

    #[test]
    fn test_min_interval_measured_from_last_accepted_onset() {
        // 100ms at 44.1kHz / 512 hop = 8 frames
        let detector = FluxPeakDetector::new(44100, 512);
        assert_eq!(detector.min_frame_interval(), 8);

        // 20 accepted; 25 rejected (5 frames after 20); 30 accepted
        // (10 frames after 20, even though only 5 after the rejected 25)
        let energies = stepped_energy(60, &[20, 25, 30]);
        let frames: Vec<usize> = detector.detect(&energies).iter().map(|o| o.frame).collect();

        assert_eq!(frames, vec![20, 30]);
    }

    #[test]
    fn test_configured_threshold() {
        let config = AnalysisConfig {
            threshold: 0.6,
            ..AnalysisConfig::default()
        };
        let detector = FluxPeakDetector::with_config(44100, &config);
        let mut energies = stepped_energy(120, &[30]);
        energies[90] = 0.5;

        let onsets = detector.detect(&energies);
        assert_eq!(onsets.len(), 1);
    }
}
