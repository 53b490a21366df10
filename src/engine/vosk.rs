//! Vosk backend: offline recognition with word-level timings.

use std::path::Path;

use vosk::{CompleteResult, DecodingState, Model, Recognizer};

use super::{SpeechEngine, Transcript, WordTiming};
use crate::{model, wav, Error, Result};

/// Samples fed to the recognizer per call.
const FEED_SIZE: usize = 4000;

/// Vosk speech engine.
///
/// Needs a pre-extracted model directory (e.g. `vosk-model-fr-0.22`); word
/// output is enabled so every result carries timings and confidences.
pub struct VoskEngine {
    model: Model,
}

impl VoskEngine {
    pub fn new(model_dir: &Path) -> Result<Self> {
        let dir = model::ensure_vosk_model(model_dir)?;
        let dir_str = dir
            .to_str()
            .ok_or_else(|| Error::Model("invalid model path".into()))?;
        let model = Model::new(dir_str).ok_or_else(|| {
            Error::Model(format!("failed to load Vosk model from {}", dir.display()))
        })?;
        Ok(Self { model })
    }
}

impl SpeechEngine for VoskEngine {
    fn name(&self) -> &str {
        "vosk"
    }

    fn transcribe_file(&mut self, path: &Path) -> Result<Transcript> {
        let (sample_rate, samples) = wav::read_mono_samples(path)?;

        // The recognizer is bound to the file's sample rate, so it is built
        // per file rather than stored on the engine.
        let mut recognizer =
            Recognizer::new(&self.model, sample_rate as f32).ok_or_else(|| {
                Error::Engine("failed to create Vosk recognizer".into())
            })?;
        recognizer.set_words(true);

        let mut transcript = Transcript::default();
        for block in samples.chunks(FEED_SIZE) {
            let state = recognizer
                .accept_waveform(block)
                .map_err(|e| Error::Engine(format!("Vosk rejected audio: {}", e)))?;
            if matches!(state, DecodingState::Finalized) {
                collect(recognizer.result(), &mut transcript);
            }
        }
        collect(recognizer.final_result(), &mut transcript);

        Ok(transcript)
    }
}

/// Fold one finalized recognizer result into the running transcript.
fn collect(result: CompleteResult, transcript: &mut Transcript) {
    if let Some(single) = result.single() {
        if !single.text.is_empty() {
            if !transcript.text.is_empty() {
                transcript.text.push(' ');
            }
            transcript.text.push_str(single.text);
        }
        for word in single.result {
            transcript.words.push(WordTiming {
                word: word.word.to_string(),
                start: word.start,
                end: word.end,
                conf: word.conf,
            });
        }
    }
}
