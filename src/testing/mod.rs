//! Testability harness utilities.
//!
//! Deterministic synthetic drum tracks for unit and integration tests.
//! Everything here is pure and seeded, so identical arguments always produce
//! identical buffers.

pub mod signals;

pub use signals::{white_noise, DrumVoice, HitTrack};
