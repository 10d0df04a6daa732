// Drumkit Trainer Core - onset analysis and rhythm judging
// Batch drum-hit detection for imported audio, plus the timing judge used
// while practising against a rhythm map.
//
// Logging goes through the `log`/`tracing` facades; installing a subscriber
// is left to the host application (the CLI uses tracing_subscriber).

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod judgment;
pub mod rhythm;
pub mod session;
pub mod testing;

// Re-exports for convenience
pub use analysis::{
    AnalysisJob, AnalysisProgress, AnalysisResult, AnalysisStage, DecodedAudio, DrumPoint,
    OnsetAnalysisPipeline,
};
pub use config::{AnalysisConfig, AppConfig, JudgmentConfig, SessionConfig};
pub use error::{AnalysisError, ErrorCode, SessionError};
pub use judgment::{Grade, JudgmentEngine, JudgmentResult, JudgmentType};
pub use rhythm::{Beat, RhythmMap};
pub use session::{PracticeSession, SessionState, SessionSummary};
