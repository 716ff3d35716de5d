//! Speech-to-text: the transcription seam and its Whisper backend.

pub mod transcriber;
pub mod whisper;
