//! clipscribe - Batch voice-clip transcription for speech-synthesis datasets
//!
//! Walks per-speaker directories of WAV clips, transcribes them with
//! Whisper, and appends language-tagged manifest lines, resuming across
//! interrupted runs.

// Error handling discipline: propagate, don't panic
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod driver;
pub mod error;
pub mod lang;
pub mod manifest;
#[cfg(feature = "model-download")]
pub mod models;
pub mod stt;

// Composition root - needs the model downloader
#[cfg(feature = "model-download")]
pub mod app;

// The annotation driver and its vocabulary
pub use driver::{BatchOptions, BatchSummary, Candidate, ClipOutcome, run_batch};
pub use lang::LanguageSet;
pub use manifest::{Manifest, ManifestEntry};

// Transcription seam
pub use stt::transcriber::{MockTranscriber, Transcriber, TranscriptionResult};

// Error handling
pub use error::{ClipscribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
