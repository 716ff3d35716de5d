//! Model download and installation management.
//!
//! Downloads Whisper GGML models from HuggingFace into the user's cache
//! directory, with a progress bar and SHA-1 verification.

use crate::error::{ClipscribeError, Result};
use crate::models::catalog::{ModelInfo, get_model, resolve_name};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Get the directory where models are stored.
///
/// Uses `~/.cache/clipscribe/models/` on Linux/Unix.
pub fn models_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("clipscribe")
        .join("models")
}

/// Get the full path for a model file.
///
/// Always returns a path regardless of whether the model is in the catalog.
/// The file may or may not exist on disk.
pub fn model_path(name: &str) -> PathBuf {
    let resolved = resolve_name(name);
    models_dir().join(format!("ggml-{resolved}.bin"))
}

/// Check if a model is installed.
pub fn is_model_installed(name: &str) -> bool {
    model_path(name).exists()
}

/// Download a Whisper model by size tag.
///
/// # Errors
///
/// Returns an error if:
/// - The model is not in the catalog
/// - The download fails
/// - The SHA-1 checksum doesn't match
/// - The file cannot be written
pub async fn download_model(name: &str, progress: bool) -> Result<PathBuf> {
    let path = model_path(name);

    if path.exists() {
        if progress {
            eprintln!("Model '{}' is already installed at {}", name, path.display());
        }
        return Ok(path);
    }

    let info = get_model(name).ok_or_else(|| {
        ClipscribeError::Other(format!(
            "Unknown model '{name}'.\nRun 'clipscribe models list' to see available models."
        ))
    })?;

    download_to_path(info, &path, progress).await?;
    Ok(path)
}

/// Core download: fetch the catalog URL, stream to disk, verify SHA-1.
async fn download_to_path(info: &ModelInfo, output_path: &PathBuf, progress: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ClipscribeError::Other(format!("Failed to create models directory: {e}"))
        })?;
    }

    if progress {
        eprintln!("Downloading {} ({} MB)...", info.name, info.size_mb);
    }

    let client = reqwest::Client::new();
    let response = client
        .get(info.url())
        .send()
        .await
        .map_err(|e| ClipscribeError::Other(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(ClipscribeError::Other(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string, always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(output_path)
        .map_err(|e| ClipscribeError::Other(format!("Failed to create output file: {e}")))?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| ClipscribeError::Other(format!("Failed to read download chunk: {e}")))?;

        file.write_all(&chunk)
            .map_err(|e| ClipscribeError::Other(format!("Failed to write to file: {e}")))?;

        hasher.update(&chunk);

        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    let calculated_hash = format!("{:x}", hasher.finalize());
    if calculated_hash != info.sha1 {
        if let Err(e) = fs::remove_file(output_path) {
            eprintln!("clipscribe: failed to remove corrupted download: {e}");
        }
        return Err(ClipscribeError::Other(format!(
            "SHA-1 checksum mismatch for '{}'. Expected: {}, got: {}",
            info.name, info.sha1, calculated_hash
        )));
    }

    if progress {
        eprintln!("Checksum verified");
        eprintln!("Model installed to: {}", output_path.display());
    }

    Ok(())
}

/// Format model information for `models list` display.
pub fn format_model_info(model: &ModelInfo) -> String {
    let status = if is_model_installed(model.name) {
        "[installed]"
    } else {
        "[not installed]"
    };
    format!("{:12} {:5} MB   {}", model.name, model.size_mb, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_dir_is_valid_path() {
        let dir = models_dir();
        assert!(dir.to_string_lossy().contains("clipscribe"));
        assert!(dir.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_model_path_filename_format() {
        let path = model_path("medium");
        assert!(path.to_string_lossy().ends_with("ggml-medium.bin"));
    }

    #[test]
    fn test_model_path_resolves_alias() {
        let path = model_path("large");
        assert!(
            path.to_string_lossy().contains("large-v3"),
            "model_path(\"large\") should resolve to large-v3, got: {}",
            path.display()
        );
    }

    #[test]
    fn test_is_model_installed_returns_false_for_unknown_model() {
        assert!(!is_model_installed("nonexistent_model_xyz"));
    }

    #[test]
    fn test_format_model_info_shows_name_size_and_status() {
        let model = get_model("tiny").unwrap();
        let formatted = format_model_info(model);
        assert!(formatted.contains("tiny"));
        assert!(formatted.contains("75"));
        assert!(formatted.contains("MB"));
        assert!(formatted.contains("installed"));
    }
}
