//! Default configuration constants for clipscribe.
//!
//! Shared constants used across configuration, the driver and the
//! speech-to-text backend, kept in one place to avoid drift.

/// Default target sample rate in Hz for processed clips.
///
/// 16kHz is what Whisper expects and is the usual rate for
/// speech-synthesis training corpora.
pub const SAMPLE_RATE: u32 = 16000;

/// Maximum accepted clip duration in seconds.
///
/// Clips longer than this are skipped, not errors. The ceiling is a fixed
/// policy of the annotation pipeline and deliberately not configurable.
pub const MAX_CLIP_SECS: f32 = 20.0;

/// Beam width used for Whisper decoding.
pub const BEAM_SIZE: i32 = 5;

/// Default Whisper model size tag.
pub const DEFAULT_MODEL: &str = "medium";

/// Default active language set (Chinese + Japanese + English).
pub const DEFAULT_LANGUAGE_SET: &str = "CJE";

/// File-name prefix marking processed output clips.
///
/// Files carrying this prefix are never rediscovered as candidates.
pub const PROCESSED_PREFIX: &str = "processed_";

/// Extension of candidate audio files.
pub const WAV_EXTENSION: &str = "wav";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}

/// Whether this build carries a compute accelerator backend.
pub fn accelerator_available() -> bool {
    gpu_backend() != "CPU"
}
