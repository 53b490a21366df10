//! Whisper backend, built on whisper-rs.

use std::path::Path;

use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use super::{SpeechEngine, Transcript};
use crate::{model, wav, Error, Result};

/// Whisper decodes 16 kHz audio; other rates are resampled on the way in.
const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Whisper speech engine with a French language hint.
///
/// The model is resolved by size name (`tiny` through `large`) and downloaded
/// to the cache directory on first use.
pub struct WhisperEngine {
    state: WhisperState,
    threads: i32,
    f32_buffer: Vec<f32>,
}

impl WhisperEngine {
    pub fn new(model_size: &str) -> Result<Self> {
        let path = model::ensure_whisper_model(model_size)?;
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::Model("invalid model path".into()))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| Error::Model(format!("failed to load model: {}", e)))?;
        let state = ctx
            .create_state()
            .map_err(|e| Error::Engine(format!("failed to create state: {}", e)))?;

        Ok(Self {
            state,
            threads: (num_cpus::get() as i32).clamp(1, 4),
            f32_buffer: Vec::with_capacity(WHISPER_SAMPLE_RATE as usize),
        })
    }

    /// Normalize i16 samples to f32 and resample to 16 kHz when needed.
    fn prepare_audio(&mut self, samples: &[i16], sample_rate: u32) {
        self.f32_buffer.clear();
        if sample_rate == WHISPER_SAMPLE_RATE {
            self.f32_buffer.reserve(samples.len());
            for &s in samples {
                self.f32_buffer.push(s as f32 / 32768.0);
            }
        } else {
            // Linear interpolation keeps this dependency-free; the input is
            // speech, not music.
            let ratio = sample_rate as f32 / WHISPER_SAMPLE_RATE as f32;
            let out_len = (samples.len() as f32 / ratio).max(1.0) as usize;
            self.f32_buffer.reserve(out_len);
            for i in 0..out_len {
                let pos = i as f32 * ratio;
                let i0 = pos.floor() as usize;
                let i1 = (i0 + 1).min(samples.len().saturating_sub(1));
                let t = pos - i0 as f32;
                let s0 = samples[i0] as f32 / 32768.0;
                let s1 = samples[i1] as f32 / 32768.0;
                self.f32_buffer.push(s0 * (1.0 - t) + s1 * t);
            }
        }
    }

    fn make_params(threads: i32) -> FullParams<'static, 'static> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(threads);
        params.set_translate(false);
        params.set_language(Some("fr"));
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_suppress_blank(true);
        params.set_suppress_non_speech_tokens(true);
        params.set_token_timestamps(false);
        params.set_temperature(0.0);
        params.set_temperature_inc(0.2);
        params.set_entropy_thold(2.4);
        params.set_logprob_thold(-1.0);
        params.set_no_speech_thold(0.6);
        params
    }
}

impl SpeechEngine for WhisperEngine {
    fn name(&self) -> &str {
        "whisper"
    }

    fn transcribe_file(&mut self, path: &Path) -> Result<Transcript> {
        let (sample_rate, samples) = wav::read_mono_samples(path)?;
        if samples.is_empty() {
            return Ok(Transcript::default());
        }

        self.prepare_audio(&samples, sample_rate);
        if self.f32_buffer.len() < WHISPER_SAMPLE_RATE as usize {
            return Err(Error::Engine(format!(
                "audio too short: {} samples (Whisper needs at least 1 second)",
                self.f32_buffer.len()
            )));
        }

        let params = Self::make_params(self.threads);
        self.state
            .full(params, &self.f32_buffer)
            .map_err(|e| Error::Engine(format!("inference failed: {}", e)))?;

        let n = self
            .state
            .full_n_segments()
            .map_err(|e| Error::Engine(format!("failed to get segments: {}", e)))?;

        let mut text = String::new();
        for i in 0..n {
            if let Ok(segment) = self.state.full_get_segment_text(i) {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(segment.trim());
            }
        }

        Ok(Transcript {
            text,
            words: Vec::new(),
        })
    }
}
