// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// Error code range: 1001-1005
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Audio bytes could not be decoded into samples
    pub const DECODE_FAILED: i32 = 1001;

    /// Container or sample format is not supported by the decoder
    pub const UNSUPPORTED_FORMAT: i32 = 1002;

    /// Decoded buffer holds no samples
    pub const EMPTY_BUFFER: i32 = 1003;

    /// Sample rate is zero
    pub const INVALID_SAMPLE_RATE: i32 = 1004;

    /// Background analysis was cancelled before it produced a result
    pub const CANCELLED: i32 = 1005;
}

/// Log an analysis error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=OnsetAnalysisPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised around the onset analysis pipeline
///
/// Error code range: 1001-1005
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The decoder could not read the input
    DecodeFailed { reason: String },

    /// The input uses a format the decoder does not handle
    UnsupportedFormat { details: String },

    /// Nothing to analyze
    EmptyBuffer,

    /// Sample rate must be positive
    InvalidSampleRate { sample_rate: u32 },

    /// Job was cancelled; partial output is discarded
    Cancelled,
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::DecodeFailed { .. } => AnalysisErrorCodes::DECODE_FAILED,
            AnalysisError::UnsupportedFormat { .. } => AnalysisErrorCodes::UNSUPPORTED_FORMAT,
            AnalysisError::EmptyBuffer => AnalysisErrorCodes::EMPTY_BUFFER,
            AnalysisError::InvalidSampleRate { .. } => AnalysisErrorCodes::INVALID_SAMPLE_RATE,
            AnalysisError::Cancelled => AnalysisErrorCodes::CANCELLED,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::DecodeFailed { reason } => {
                format!("Audio decoding failed: {}", reason)
            }
            AnalysisError::UnsupportedFormat { details } => {
                format!("Unsupported audio format: {}", details)
            }
            AnalysisError::EmptyBuffer => "Decoded audio buffer is empty".to_string(),
            AnalysisError::InvalidSampleRate { sample_rate } => {
                format!("Sample rate must be greater than 0 (got {})", sample_rate)
            }
            AnalysisError::Cancelled => "Analysis cancelled".to_string(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

impl From<hound::Error> for AnalysisError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::FormatError(details) => AnalysisError::UnsupportedFormat {
                details: details.to_string(),
            },
            hound::Error::Unsupported => AnalysisError::UnsupportedFormat {
                details: "unsupported WAV feature".to_string(),
            },
            other => AnalysisError::DecodeFailed {
                reason: other.to_string(),
            },
        }
    }
}
