// Practice session error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 2001-2003
pub struct SessionErrorCodes {}

impl SessionErrorCodes {
    /// Operation requires a running session
    pub const NOT_PLAYING: i32 = 2001;

    /// Session already reached the end of its rhythm map
    pub const ALREADY_FINISHED: i32 = 2002;

    /// Rhythm map cannot be judged (unsorted or negative beat times)
    pub const INVALID_RHYTHM_MAP: i32 = 2003;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=PracticeSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Practice session errors
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Session is not in the playing state
    NotPlaying,

    /// Session has already finished
    AlreadyFinished,

    /// Rhythm map failed validation
    InvalidRhythmMap { reason: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::NotPlaying => SessionErrorCodes::NOT_PLAYING,
            SessionError::AlreadyFinished => SessionErrorCodes::ALREADY_FINISHED,
            SessionError::InvalidRhythmMap { .. } => SessionErrorCodes::INVALID_RHYTHM_MAP,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::NotPlaying => {
                "Practice session is not playing. Call start() first.".to_string()
            }
            SessionError::AlreadyFinished => "Practice session already finished".to_string(),
            SessionError::InvalidRhythmMap { reason } => {
                format!("Invalid rhythm map: {}", reason)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}
