//! # transcrire
//!
//! **Record microphone audio and transcribe French speech, locally.**
//!
//! Two small command-line utilities built on one library:
//!
//! - `record-audio` — capture from the default microphone for a fixed
//!   duration, amplify, and save a mono 16-bit PCM WAV file.
//! - `transcribe-fr` — run a WAV (or any ffmpeg-decodable file) through a
//!   local speech engine with a French language hint and print the text.
//!
//! ## Quick Example
//!
//! ```no_run
//! use transcrire::capture::{self, CaptureConfig};
//! use transcrire::wav;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CaptureConfig::default(); // mono, 16 kHz, 1024-sample chunks
//! let mut frames = capture::record(&config, 5.0)?;
//! capture::amplify(&mut frames, config.gain);
//! wav::write_frames("recorded_audio.wav", &config, &frames)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Engines
//!
//! Two interchangeable backends, both running locally:
//!
//! - **Whisper** (`whisper-rs`) — segment-level text, models auto-downloaded
//!   to the cache directory on first use.
//! - **Vosk** (`vosk`) — word-level timings and confidences, needs a
//!   pre-extracted model directory (e.g. `vosk-model-fr-0.22`).
//!
//! 16 kHz mono input gives the best results with both engines.

pub mod capture;
pub mod engine;
pub mod ffmpeg;
pub mod model;
pub mod wav;

pub use capture::CaptureConfig;
pub use engine::{SpeechEngine, Transcript, WordTiming};

/// Default Whisper model size (multilingual base).
pub const DEFAULT_WHISPER_MODEL: &str = "base";

/// Default Vosk model directory, relative to the working directory.
pub const DEFAULT_VOSK_MODEL_DIR: &str = "vosk-model-fr-0.22";

/// Errors surfaced by the recording and transcription pipelines.
///
/// Everything here is fatal to the operation that raised it; there is no
/// retry logic anywhere in the crate.
#[derive(Debug)]
pub enum Error {
    /// No microphone, or the device refused the requested configuration.
    NoInputDevice,
    /// The capture stream could not be built, started, or died mid-recording.
    Stream(String),
    /// WAV serialization or read-back failed.
    Wav(String),
    /// A speech model is missing or could not be downloaded.
    Model(String),
    /// The engine accepted the audio but inference failed.
    Engine(String),
    /// ffmpeg is required for non-WAV inputs and was not found on the PATH.
    FfmpegMissing,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoInputDevice => write!(f, "no audio input device found"),
            Error::Stream(e) => write!(f, "audio stream error: {}", e),
            Error::Wav(e) => write!(f, "WAV error: {}", e),
            Error::Model(e) => write!(f, "model error: {}", e),
            Error::Engine(e) => write!(f, "transcription error: {}", e),
            Error::FfmpegMissing => write!(
                f,
                "ffmpeg is not installed or not on the PATH (required for non-WAV inputs); \
                 see https://ffmpeg.org/download.html"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
