use crate::error::{ClipscribeError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of transcribing one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    /// Decoded text, trimmed.
    pub text: String,
    /// Detected language code (e.g. "en", "ja", "zh").
    pub language: String,
}

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (real Whisper vs mock) and is
/// the boundary across which transcription failures are reported as errors,
/// never panics.
pub trait Transcriber: Send + Sync {
    /// Transcribe audio samples to text with language detection.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as 16-bit PCM mono at the model's expected rate
    fn transcribe(&self, audio: &[i16]) -> Result<TranscriptionResult>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;
}

/// Implement Transcriber for Arc<T> so a loaded model can be shared.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &[i16]) -> Result<TranscriptionResult> {
        (**self).transcribe(audio)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock transcriber for testing.
///
/// Returns a fixed text/language pair and counts how often it is invoked,
/// which the driver tests use to prove resumed clips never reach the model.
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    text: String,
    language: String,
    should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            text: "mock transcription".to_string(),
            language: "en".to_string(),
            should_fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to return a specific transcript
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Configure the detected language
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcribe calls made so far (shared across clones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &[i16]) -> Result<TranscriptionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(ClipscribeError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(TranscriptionResult {
                text: self.text.clone(),
                language: self.language.clone(),
            })
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
