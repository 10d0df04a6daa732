// Audio module - decoding collaborator for the analysis pipeline
//
// The analysis core never decodes files itself. This module turns WAV data
// into the `DecodedAudio` buffer the pipeline borrows, keeping only the first
// channel.

pub mod wav;

pub use wav::{decode_wav, decode_wav_file};
