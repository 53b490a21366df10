//! Speech model management and automatic downloading.
//!
//! Whisper models are GGML files fetched from the whisper.cpp Hugging Face
//! repository into the user cache directory on first use. Vosk models ship
//! as archives and must be extracted by hand, so for those only presence is
//! checked.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Whisper model sizes usable for French (multilingual GGML builds).
pub const WHISPER_MODEL_SIZES: &[&str] = &["tiny", "base", "small", "medium", "large"];

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// GGML file name for a Whisper model size.
pub fn whisper_model_file(size: &str) -> Result<String> {
    if WHISPER_MODEL_SIZES.contains(&size) {
        Ok(format!("ggml-{}.bin", size))
    } else {
        Err(Error::Model(format!(
            "unknown Whisper model '{}' (available: {})",
            size,
            WHISPER_MODEL_SIZES.join(", ")
        )))
    }
}

/// Directory where downloaded Whisper models are cached.
pub fn whisper_model_dir() -> PathBuf {
    let cache_dir = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));
    cache_dir.join("transcrire").join("models")
}

/// Resolve a Whisper model by size, downloading it if necessary.
///
/// A `models/` directory next to the working directory takes precedence over
/// the cache, so locally provided files are never re-downloaded.
pub fn ensure_whisper_model(size: &str) -> Result<PathBuf> {
    let file = whisper_model_file(size)?;

    let local = Path::new("models").join(&file);
    if local.exists() {
        return Ok(local);
    }

    let dest = whisper_model_dir().join(&file);
    if dest.exists() {
        return Ok(dest);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Model(format!("failed to create model directory: {}", e)))?;
    }

    let url = format!("{}/{}", MODEL_BASE_URL, file);
    eprintln!("Downloading Whisper model (one-time setup)...");
    eprintln!("   Model: {}", file);
    eprintln!("   URL: {}", url);
    eprintln!("   Destination: {}", dest.display());

    download_file(&url, &dest)?;

    eprintln!("Model downloaded.");
    Ok(dest)
}

/// Check that a pre-extracted Vosk model directory exists.
///
/// No auto-download: Vosk models are distributed as archives that the user
/// extracts once.
pub fn ensure_vosk_model(dir: &Path) -> Result<PathBuf> {
    if dir.is_dir() {
        Ok(dir.to_path_buf())
    } else {
        Err(Error::Model(format!(
            "Vosk model directory '{}' not found; download a French model from \
             https://alphacephei.com/vosk/models and extract it there",
            dir.display()
        )))
    }
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(std::time::Duration::from_secs(30))
        .timeout_read(std::time::Duration::from_secs(300)) // large model files
        .build();

    let response = agent
        .get(url)
        .call()
        .map_err(|e| Error::Model(format!("failed to download model: {}", e)))?;

    let total_size = response
        .header("Content-Length")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let mut file = fs::File::create(dest)
        .map_err(|e| Error::Model(format!("failed to create model file: {}", e)))?;

    let mut reader = response.into_reader();
    let mut buffer = [0; 8192];
    let mut downloaded = 0u64;
    let mut last_progress = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::Model(format!("failed to read download: {}", e)))?;
        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::Model(format!("failed to write model file: {}", e)))?;
        downloaded += bytes_read as u64;

        // Print progress every 10MB
        if total_size > 0 && downloaded - last_progress > 10 * 1024 * 1024 {
            let percent = (downloaded * 100) / total_size;
            eprint!(
                "\r   Progress: {}% ({:.1} MB / {:.1} MB)",
                percent,
                downloaded as f64 / (1024.0 * 1024.0),
                total_size as f64 / (1024.0 * 1024.0)
            );
            last_progress = downloaded;
        }
    }

    if total_size > 0 && downloaded != total_size {
        return Err(Error::Model(format!(
            "incomplete download: expected {} bytes, got {}",
            total_size, downloaded
        )));
    }

    eprintln!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_sizes_map_to_multilingual_ggml_files() {
        assert_eq!(whisper_model_file("base").unwrap(), "ggml-base.bin");
        assert_eq!(whisper_model_file("large").unwrap(), "ggml-large.bin");
    }

    #[test]
    fn english_only_and_unknown_sizes_are_rejected() {
        assert!(matches!(whisper_model_file("base.en"), Err(Error::Model(_))));
        assert!(matches!(whisper_model_file("huge"), Err(Error::Model(_))));
    }

    #[test]
    fn vosk_model_must_already_be_extracted() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ensure_vosk_model(dir.path()).unwrap(),
            dir.path().to_path_buf()
        );

        let missing = dir.path().join("vosk-model-fr-0.22");
        let err = ensure_vosk_model(&missing).unwrap_err();
        assert!(err.to_string().contains("alphacephei.com"));
    }
}
