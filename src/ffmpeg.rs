//! External decoder (ffmpeg) integration.
//!
//! The speech engines only read 16-bit PCM WAV; anything else is converted by
//! shelling out to an `ffmpeg` binary on the PATH. Presence is verified
//! before transcription starts so a missing install fails with a clear
//! message instead of mid-run.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// True when the file extension says the input is already a WAV container.
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
}

/// Verify an `ffmpeg` binary is installed and runnable.
pub fn ensure_available() -> Result<()> {
    let status = Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => Err(Error::FfmpegMissing),
    }
}

/// Decode any audio container to a mono 16-bit PCM WAV at `sample_rate`.
pub fn decode_to_wav(input: &Path, output: &Path, sample_rate: u32) -> Result<()> {
    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-ac", "1", "-ar"])
        .arg(sample_rate.to_string())
        .args(["-sample_fmt", "s16"])
        .arg(output)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|_| Error::FfmpegMissing)?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Engine(format!(
            "ffmpeg failed to decode {}",
            input.display()
        )))
    }
}
