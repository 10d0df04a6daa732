// Error types for the drum trainer core
//
// The analysis and judging algorithms are total functions; these errors only
// surface at the edges: decoding audio, validating pipeline input, cancelling
// a background analysis job, and driving a practice session out of order.

mod analysis;
mod session;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers embedding the core (UI shells,
/// the CLI) can map failures without matching on every variant.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
