//! WAV decoding via hound
//!
//! Integer PCM is normalized to [-1.0, 1.0] by the format's full-scale
//! value; float PCM is passed through. Multi-channel files are reduced to
//! their first channel.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::analysis::DecodedAudio;
use crate::error::AnalysisError;

/// Decode a WAV file from disk
pub fn decode_wav_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, AnalysisError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| AnalysisError::DecodeFailed {
        reason: format!("opening {}: {}", path.display(), err),
    })?;

    let audio = decode_wav(BufReader::new(file))?;
    log::info!(
        "[Decoder] Decoded {} ({} samples, {} Hz, {:.2}s)",
        path.display(),
        audio.samples.len(),
        audio.sample_rate,
        audio.duration()
    );
    Ok(audio)
}

/// Decode WAV data from any reader
///
/// # Errors
/// * `AnalysisError::UnsupportedFormat` - bad header or unsupported bit depth
/// * `AnalysisError::DecodeFailed` - I/O failure or truncated sample data
pub fn decode_wav<R: Read>(reader: R) -> Result<DecodedAudio, AnalysisError> {
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    if spec.channels > 1 {
        log::debug!(
            "[Decoder] {} channels, analyzing the first one only",
            spec.channels
        );
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, hound::Error>>()?,
        SampleFormat::Int => {
            let max = ((1i64 << spec.bits_per_sample.saturating_sub(1)) - 1).max(1) as f32;
            match spec.bits_per_sample {
                8 => reader
                    .samples::<i8>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                16 => reader
                    .samples::<i16>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                24 | 32 => reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                other => {
                    return Err(AnalysisError::UnsupportedFormat {
                        details: format!("{} bits per sample", other),
                    })
                }
            }
        }
    };

    let samples = interleaved
        .into_iter()
        .step_by(channels)
        .map(|sample| sample.clamp(-1.0, 1.0))
        .collect();

    Ok(DecodedAudio::new(samples, spec.sample_rate))
}
