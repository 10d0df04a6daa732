// FrameEnergyAnalyzer - short-time energy over overlapping frames
//
// Energy of a frame is its mean squared amplitude. Frames start every
// `hop_size` samples and span `frame_size` samples; the frame count is
// floor((len - frame_size) / hop_size), so a trailing partial frame and the
// last complete frame past that boundary are never measured.

/// Slices a mono buffer into overlapping frames and measures their energy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEnergyAnalyzer {
    frame_size: usize,
    hop_size: usize,
}

impl FrameEnergyAnalyzer {
    /// Create an analyzer; sizes are clamped to at least one sample
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size: frame_size.max(1),
            hop_size: hop_size.max(1),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of frames measured for a buffer of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.frame_size {
            return 0;
        }
        (len - self.frame_size) / self.hop_size
    }

    /// Compute per-frame energy
    ///
    /// # Returns
    /// One mean-squared-amplitude value per frame, in frame order
    pub fn analyze(&self, samples: &[f32]) -> Vec<f32> {
        let frames = self.frame_count(samples.len());

        (0..frames)
            .map(|i| {
                let start = i * self.hop_size;
                let frame = &samples[start..start + self.frame_size];
                let sum: f32 = frame.iter().map(|s| s * s).sum();
                sum / self.frame_size as f32
            })
            .collect()
    }
}

impl Default for FrameEnergyAnalyzer {
    fn default() -> Self {
        Self::new(1024, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_formula() {
        let analyzer = FrameEnergyAnalyzer::default();
        assert_eq!(analyzer.frame_count(0), 0);
        assert_eq!(analyzer.frame_count(1023), 0);
        assert_eq!(analyzer.frame_count(1024), 0);
        assert_eq!(analyzer.frame_count(1536), 1);
        assert_eq!(analyzer.frame_count(44100), (44100 - 1024) / 512);
    }

    #[test]
    fn test_constant_signal_energy() {
        let analyzer = FrameEnergyAnalyzer::new(4, 2);
        let energies = analyzer.analyze(&[0.5; 12]);

        assert_eq!(energies.len(), 4);
        for energy in energies {
            assert!((energy - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_energy_tracks_burst_position() {
        let analyzer = FrameEnergyAnalyzer::new(4, 4);
        let mut samples = vec![0.0; 20];
        samples[8..12].copy_from_slice(&[1.0, -1.0, 1.0, -1.0]);

        let energies = analyzer.analyze(&samples);

        assert_eq!(energies, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_silence_has_zero_energy() {
        let analyzer = FrameEnergyAnalyzer::default();
        let energies = analyzer.analyze(&vec![0.0; 8192]);
        assert!(energies.iter().all(|&e| e == 0.0));
    }
}
