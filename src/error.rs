//! Error types for clipscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipscribeError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Startup preconditions
    #[error("Input directory does not exist: {path}")]
    InputDirNotFound { path: String },

    #[error("Invalid language set '{value}' (expected CJE, CJ or C)")]
    InvalidLanguageSet { value: String },

    #[error("No compute accelerator available: {message}")]
    AcceleratorUnavailable { message: String },

    // Audio collaborator errors
    #[error("Failed to decode audio: {message}")]
    AudioDecode { message: String },

    #[error("Failed to write audio: {message}")]
    AudioEncode { message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription inference failed: {message}")]
    TranscriptionInferenceFailed { message: String },

    #[error("Transcription error: {message}")]
    Transcription { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ClipscribeError>;
