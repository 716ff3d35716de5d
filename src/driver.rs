//! The resumable annotation driver.
//!
//! Walks every speaker subdirectory of the input root, processes each WAV
//! clip that is not yet in the manifest (resample, duration gate, transcribe,
//! language gate), and appends one manifest line per fully-succeeded clip.
//! Every per-clip failure is terminal for that clip and non-fatal for the
//! batch.

use crate::audio::clip::{self, Clip};
use crate::defaults;
use crate::error::{ClipscribeError, Result};
use crate::lang::LanguageSet;
use crate::manifest::{Manifest, ManifestEntry};
use crate::stt::transcriber::Transcriber;
use std::path::{Path, PathBuf};

/// One discovered clip awaiting processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Speaker id, taken from the subdirectory name.
    pub speaker: String,
    /// Source WAV file.
    pub source: PathBuf,
    /// Processed output path (`processed_<i>.wav` next to the source).
    pub target: PathBuf,
}

/// Terminal outcome for one candidate within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOutcome {
    /// Processed, transcribed and appended to the manifest.
    Recorded { text: String, language: String },
    /// Target already present in the manifest; nothing was done.
    AlreadyDone,
    /// Clip exceeds the duration ceiling; policy skip.
    TooLong { seconds: f32 },
    /// Detected language is not in the active set; policy skip.
    UnsupportedLanguage { language: String },
    /// Decode, resample, write or transcription failure.
    TranscriptionFailed { reason: String },
}

/// Options controlling a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Sample rate processed clips are resampled to.
    pub target_sample_rate: u32,
    /// Which language tokens are active.
    pub language_set: LanguageSet,
    /// Reprocess clips even when already recorded.
    pub force: bool,
    /// Suppress progress and skip notices.
    pub quiet: bool,
    /// Extra detail (transcripts as they are recorded).
    pub verbosity: u8,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            target_sample_rate: defaults::SAMPLE_RATE,
            language_set: LanguageSet::Cje,
            force: false,
            quiet: true,
            verbosity: 0,
        }
    }
}

/// Per-outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub recorded: usize,
    pub already_done: usize,
    pub too_long: usize,
    pub unsupported_language: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn tally(&mut self, outcome: &ClipOutcome) {
        match outcome {
            ClipOutcome::Recorded { .. } => self.recorded += 1,
            ClipOutcome::AlreadyDone => self.already_done += 1,
            ClipOutcome::TooLong { .. } => self.too_long += 1,
            ClipOutcome::UnsupportedLanguage { .. } => self.unsupported_language += 1,
            ClipOutcome::TranscriptionFailed { .. } => self.failed += 1,
        }
    }

    /// Total candidates seen.
    pub fn total(&self) -> usize {
        self.recorded + self.already_done + self.too_long + self.unsupported_language + self.failed
    }
}

/// Discover candidates under the input root.
///
/// Each immediate subdirectory is a speaker. Within one, every `.wav` file
/// that does not carry the `processed_` prefix becomes a candidate, with its
/// target named by the file's index in the name-sorted listing. Sorting
/// keeps index assignment stable across platforms, so resumption state
/// survives re-runs regardless of native directory order.
pub fn discover_candidates(input_root: &Path) -> Result<Vec<Candidate>> {
    if !input_root.is_dir() {
        return Err(ClipscribeError::InputDirNotFound {
            path: input_root.display().to_string(),
        });
    }

    let mut speaker_dirs: Vec<PathBuf> = std::fs::read_dir(input_root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    speaker_dirs.sort();

    let mut candidates = Vec::new();
    for speaker_dir in speaker_dirs {
        let Some(speaker) = speaker_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let speaker = speaker.to_string();

        let wav_suffix = format!(".{}", defaults::WAV_EXTENSION);
        let mut wav_names: Vec<String> = std::fs::read_dir(&speaker_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .filter(|name| {
                name.ends_with(&wav_suffix) && !name.starts_with(defaults::PROCESSED_PREFIX)
            })
            .collect();
        wav_names.sort();

        for (i, name) in wav_names.iter().enumerate() {
            candidates.push(Candidate {
                speaker: speaker.clone(),
                source: speaker_dir.join(name),
                target: speaker_dir.join(format!(
                    "{}{}.{}",
                    defaults::PROCESSED_PREFIX,
                    i,
                    defaults::WAV_EXTENSION
                )),
            });
        }
    }

    Ok(candidates)
}

/// Run the full batch: discover, gate, process, append.
///
/// The transcriber is loaded once by the caller and passed in explicitly;
/// the driver holds no global state. Returns the per-outcome counts.
pub fn run_batch(
    input_root: &Path,
    manifest_path: &Path,
    transcriber: &dyn Transcriber,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let mut manifest = Manifest::open(manifest_path)?;
    let candidates = discover_candidates(input_root)?;
    let total = candidates.len();

    let mut summary = BatchSummary::default();
    for (i, candidate) in candidates.iter().enumerate() {
        if !options.quiet {
            eprintln!(
                "[{}/{}] {}",
                i + 1,
                total,
                candidate.source.display()
            );
        }

        let outcome = annotate_candidate(candidate, &mut manifest, transcriber, options)?;
        log_outcome(candidate, &outcome, options);
        summary.tally(&outcome);
    }

    Ok(summary)
}

/// Apply the resumption gate and, if it passes, process one candidate and
/// append its entry on success.
///
/// Only manifest append errors propagate: losing the ability to record
/// results invalidates the run, while everything per-clip is survivable.
fn annotate_candidate(
    candidate: &Candidate,
    manifest: &mut Manifest,
    transcriber: &dyn Transcriber,
    options: &BatchOptions,
) -> Result<ClipOutcome> {
    let target_key = candidate.target.display().to_string();

    if manifest.contains(&target_key) && !options.force {
        return Ok(ClipOutcome::AlreadyDone);
    }

    let outcome = process_clip(candidate, transcriber, options);

    if let ClipOutcome::Recorded { text, .. } = &outcome {
        manifest.append(&ManifestEntry {
            audio_path: target_key,
            speaker: candidate.speaker.clone(),
            text: text.clone(),
        })?;
    }

    Ok(outcome)
}

/// Process one clip through every stage. Never returns an error: all
/// failures map to a terminal outcome.
fn process_clip(
    candidate: &Candidate,
    transcriber: &dyn Transcriber,
    options: &BatchOptions,
) -> ClipOutcome {
    let prepared: Clip = match clip::prepare(&candidate.source, options.target_sample_rate) {
        Ok(prepared) => prepared,
        Err(e) => {
            return ClipOutcome::TranscriptionFailed {
                reason: e.to_string(),
            };
        }
    };

    let seconds = prepared.duration_secs();
    if seconds > defaults::MAX_CLIP_SECS {
        return ClipOutcome::TooLong { seconds };
    }

    // The processed copy is written before transcription so the on-disk
    // layout matches the manifest key even when later stages skip the clip.
    if let Err(e) = clip::save(&candidate.target, &prepared) {
        return ClipOutcome::TranscriptionFailed {
            reason: e.to_string(),
        };
    }

    let result = match transcriber.transcribe(&prepared.samples) {
        Ok(result) => result,
        Err(e) => {
            return ClipOutcome::TranscriptionFailed {
                reason: e.to_string(),
            };
        }
    };

    match options
        .language_set
        .annotate(&result.language, &result.text)
    {
        Some(text) => ClipOutcome::Recorded {
            text,
            language: result.language,
        },
        None => ClipOutcome::UnsupportedLanguage {
            language: result.language,
        },
    }
}

/// Print the outcome of one candidate, honoring quiet/verbosity.
fn log_outcome(candidate: &Candidate, outcome: &ClipOutcome, options: &BatchOptions) {
    match outcome {
        ClipOutcome::Recorded { text, language } => {
            if !options.quiet {
                eprintln!("  recorded: {}", candidate.target.display());
                if options.verbosity >= 1 {
                    eprintln!("  \"{}\" [{}]", text, language);
                }
            }
        }
        ClipOutcome::AlreadyDone => {
            if !options.quiet {
                eprintln!(
                    "  skipping already processed file: {}",
                    candidate.target.display()
                );
            }
        }
        ClipOutcome::TooLong { seconds } => {
            if !options.quiet {
                eprintln!(
                    "  {} too long ({:.2}s > {:.1}s), ignoring",
                    candidate.source.display(),
                    seconds,
                    defaults::MAX_CLIP_SECS
                );
            }
        }
        ClipOutcome::UnsupportedLanguage { language } => {
            if !options.quiet {
                eprintln!(
                    "  language '{}' not supported for {}, ignoring",
                    language,
                    candidate.source.display()
                );
            }
        }
        // Failures always reach stderr, even in quiet mode.
        ClipOutcome::TranscriptionFailed { reason } => {
            eprintln!(
                "Error processing {}: {}",
                candidate.source.display(),
                reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::transcriber::MockTranscriber;
    use tempfile::TempDir;

    fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn seconds_of_audio(secs: f32) -> Vec<i16> {
        vec![1000i16; (secs * 16000.0) as usize]
    }

    #[test]
    fn discover_empty_root_yields_nothing() {
        let root = TempDir::new().unwrap();
        assert!(discover_candidates(root.path()).unwrap().is_empty());
    }

    #[test]
    fn discover_missing_root_is_an_error() {
        let result = discover_candidates(Path::new("/nonexistent/root"));
        assert!(matches!(
            result,
            Err(ClipscribeError::InputDirNotFound { .. })
        ));
    }

    #[test]
    fn discover_assigns_targets_by_sorted_index() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        // Created out of order; indices must follow name order.
        write_wav(&spk.join("b.wav"), 16000, &[0; 10]);
        write_wav(&spk.join("a.wav"), 16000, &[0; 10]);

        let candidates = discover_candidates(root.path()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].source, spk.join("a.wav"));
        assert_eq!(candidates[0].target, spk.join("processed_0.wav"));
        assert_eq!(candidates[1].source, spk.join("b.wav"));
        assert_eq!(candidates[1].target, spk.join("processed_1.wav"));
    }

    #[test]
    fn discover_excludes_processed_outputs() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("a.wav"), 16000, &[0; 10]);
        write_wav(&spk.join("processed_0.wav"), 16000, &[0; 10]);

        let candidates = discover_candidates(root.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, spk.join("a.wav"));
    }

    #[test]
    fn discover_ignores_non_wav_files_and_root_files() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        std::fs::write(spk.join("notes.txt"), "x").unwrap();
        std::fs::write(root.path().join("stray.wav"), "x").unwrap();
        write_wav(&spk.join("a.wav"), 16000, &[0; 10]);

        let candidates = discover_candidates(root.path()).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn discover_uses_directory_name_as_speaker() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("alice");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("clip.wav"), 16000, &[0; 10]);

        let candidates = discover_candidates(root.path()).unwrap();
        assert_eq!(candidates[0].speaker, "alice");
    }

    #[test]
    fn run_batch_records_short_clip() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("a.wav"), 16000, &seconds_of_audio(2.0));
        let manifest_path = root.path().join("manifest.txt");

        let transcriber = MockTranscriber::new("mock").with_text("hello").with_language("en");
        let summary = run_batch(
            root.path(),
            &manifest_path,
            &transcriber,
            &BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.recorded, 1);
        assert_eq!(summary.total(), 1);
        let contents = std::fs::read_to_string(&manifest_path).unwrap();
        assert!(contents.contains("[EN]hello[EN]"));
        assert!(spk.join("processed_0.wav").exists());
    }

    #[test]
    fn run_batch_skips_overlong_clip_without_transcribing() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("long.wav"), 16000, &seconds_of_audio(25.0));
        let manifest_path = root.path().join("manifest.txt");

        let transcriber = MockTranscriber::new("mock");
        let summary = run_batch(
            root.path(),
            &manifest_path,
            &transcriber,
            &BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.too_long, 1);
        assert_eq!(summary.recorded, 0);
        assert_eq!(transcriber.call_count(), 0);
        assert!(!manifest_path.exists() || std::fs::read_to_string(&manifest_path).unwrap().is_empty());
    }

    #[test]
    fn run_batch_gates_unsupported_language() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("a.wav"), 16000, &seconds_of_audio(1.0));
        let manifest_path = root.path().join("manifest.txt");

        let transcriber = MockTranscriber::new("mock").with_language("ko");
        let summary = run_batch(
            root.path(),
            &manifest_path,
            &transcriber,
            &BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.unsupported_language, 1);
        assert_eq!(summary.recorded, 0);
    }

    #[test]
    fn run_batch_survives_transcription_failure() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        write_wav(&spk.join("a.wav"), 16000, &seconds_of_audio(1.0));
        write_wav(&spk.join("b.wav"), 16000, &seconds_of_audio(1.0));
        let manifest_path = root.path().join("manifest.txt");

        let transcriber = MockTranscriber::new("mock").with_failure();
        let summary = run_batch(
            root.path(),
            &manifest_path,
            &transcriber,
            &BatchOptions::default(),
        )
        .unwrap();

        // Both clips fail, neither aborts the batch.
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn run_batch_treats_undecodable_file_as_failure() {
        let root = TempDir::new().unwrap();
        let spk = root.path().join("spk1");
        std::fs::create_dir(&spk).unwrap();
        std::fs::write(spk.join("broken.wav"), b"not audio").unwrap();
        let manifest_path = root.path().join("manifest.txt");

        let transcriber = MockTranscriber::new("mock");
        let summary = run_batch(
            root.path(),
            &manifest_path,
            &transcriber,
            &BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(transcriber.call_count(), 0);
    }

    #[test]
    fn summary_total_sums_all_outcomes() {
        let mut summary = BatchSummary::default();
        summary.tally(&ClipOutcome::Recorded {
            text: "t".into(),
            language: "en".into(),
        });
        summary.tally(&ClipOutcome::AlreadyDone);
        summary.tally(&ClipOutcome::TooLong { seconds: 21.0 });
        summary.tally(&ClipOutcome::UnsupportedLanguage {
            language: "ko".into(),
        });
        summary.tally(&ClipOutcome::TranscriptionFailed {
            reason: "x".into(),
        });
        assert_eq!(summary.total(), 5);
    }
}
