//! Speech engines: interchangeable local transcription backends.
//!
//! - Whisper: segment-level text via `whisper-rs`
//! - Vosk: word-level timings and confidences via `vosk`

pub mod vosk;
pub mod whisper;

use std::path::Path;

use crate::{Error, Result};

pub use vosk::VoskEngine;
pub use whisper::WhisperEngine;

/// One recognized word with its position in the audio.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    pub word: String,
    /// Start offset in seconds.
    pub start: f32,
    /// End offset in seconds.
    pub end: f32,
    /// Recognizer confidence in [0, 1].
    pub conf: f32,
}

/// Transcription result: full text, plus per-word detail when the backend
/// provides it (Vosk does, Whisper reports segments only).
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub text: String,
    pub words: Vec<WordTiming>,
}

/// Trait for transcription backends.
pub trait SpeechEngine {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Transcribe a mono 16-bit PCM WAV file with a French language hint.
    fn transcribe_file(&mut self, path: &Path) -> Result<Transcript>;
}

/// Create an engine by backend name.
pub fn create_engine(
    backend: &str,
    whisper_size: &str,
    vosk_model_dir: &Path,
) -> Result<Box<dyn SpeechEngine>> {
    match backend {
        "whisper" => Ok(Box::new(WhisperEngine::new(whisper_size)?)),
        "vosk" => Ok(Box::new(VoskEngine::new(vosk_model_dir)?)),
        other => Err(Error::Engine(format!(
            "unknown engine '{}' (available: whisper, vosk)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_is_rejected() {
        let err = create_engine("openai", "base", Path::new("model")).err().unwrap();
        assert!(err.to_string().contains("unknown engine"));
    }

    #[test]
    fn transcript_defaults_to_empty() {
        let t = Transcript::default();
        assert!(t.text.is_empty());
        assert!(t.words.is_empty());
    }
}
