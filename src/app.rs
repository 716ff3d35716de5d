//! Annotation run entry point.
//!
//! Wires the pieces together for one batch run:
//! check preconditions → load model → drive the batch → report.

use crate::config::Config;
use crate::defaults;
use crate::driver::{BatchOptions, BatchSummary, run_batch};
use crate::error::{ClipscribeError, Result};
use crate::lang::LanguageSet;
use crate::models::catalog::get_model;
use crate::models::download::{download_model, is_model_installed, model_path};
use crate::stt::whisper::{WhisperConfig, WhisperTranscriber};
use std::path::Path;

/// Run the annotation batch: discover clips → transcribe → append manifest.
///
/// CLI overrides take precedence over the config file. Fatal preconditions
/// (missing input directory, invalid language set, no compute accelerator)
/// are checked before any clip is touched; everything per-clip is handled
/// inside the driver and never aborts the run.
#[allow(clippy::too_many_arguments)]
pub async fn run_annotate_command(
    mut config: Config,
    input_dir: &Path,
    output: &Path,
    model: Option<String>,
    langs: Option<String>,
    force: bool,
    quiet: bool,
    verbosity: u8,
    no_download: bool,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(m) = model {
        config.stt.model = m;
    }
    if let Some(l) = langs {
        config.stt.languages = l;
    }

    // Fatal preconditions, checked before any heavy work
    if !input_dir.is_dir() {
        return Err(ClipscribeError::InputDirNotFound {
            path: input_dir.display().to_string(),
        });
    }
    let language_set: LanguageSet = config.stt.languages.parse()?;
    check_accelerator()?;

    // Load the model ONCE before the loop (this is the slow part)
    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model);
    }
    let transcriber = load_model(&config.stt.model, quiet, no_download).await?;
    if !quiet {
        eprintln!(
            "Ready ({} backend). Scanning {}...",
            defaults::gpu_backend(),
            input_dir.display()
        );
    }

    let options = BatchOptions {
        target_sample_rate: config.audio.sample_rate,
        language_set,
        force,
        quiet,
        verbosity,
    };

    let summary = run_batch(input_dir, output, &transcriber, &options)?;

    if !quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Refuse to start without a compute accelerator backend.
///
/// The backend is fixed at compile time; a CPU-only build cannot satisfy
/// the precondition at runtime.
fn check_accelerator() -> Result<()> {
    if defaults::accelerator_available() {
        return Ok(());
    }
    Err(ClipscribeError::AcceleratorUnavailable {
        message: "this build has no GPU backend; rebuild with --features \
                  cuda, vulkan, hipblas or openblas"
            .to_string(),
    })
}

/// Load the Whisper model for a size tag, downloading it if needed.
async fn load_model(
    model_tag: &str,
    quiet: bool,
    no_download: bool,
) -> Result<WhisperTranscriber> {
    if get_model(model_tag).is_none() {
        return Err(ClipscribeError::Transcription {
            message: format!(
                "Unknown model '{model_tag}'.\n\
                 Run 'clipscribe models list' to see available models."
            ),
        });
    }

    if !is_model_installed(model_tag) {
        if no_download {
            return Err(ClipscribeError::Transcription {
                message: format!(
                    "Model '{model_tag}' not installed and --no-download specified.\n\
                     Run: clipscribe models install {model_tag}"
                ),
            });
        }
        if !quiet {
            eprintln!("Downloading model '{model_tag}'...");
        }
        download_model(model_tag, !quiet).await?;
        if !quiet {
            eprintln!("Download complete.");
        }
    }

    WhisperTranscriber::new(WhisperConfig {
        model_path: model_path(model_tag),
        threads: None,
    })
}

/// Print the per-outcome counts for a finished run.
fn print_summary(summary: &BatchSummary) {
    eprintln!(
        "Done: {} recorded, {} already done, {} too long, {} unsupported language, {} failed ({} total)",
        summary.recorded,
        summary.already_done,
        summary.too_long,
        summary.unsupported_language,
        summary.failed,
        summary.total()
    );
}
