//! Microphone capture and amplification.
//!
//! The pipeline records fixed-size chunks from the default input device for a
//! bounded duration, then applies a linear gain with hard clipping as a
//! separate pass once capture has finished. Capture and amplification never
//! overlap: the whole recording is held in memory before any sample is
//! touched.

use std::io::Write;
use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Device and pipeline parameters for one recording.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Channel count; the pipeline records mono.
    pub channels: u16,
    /// Sample rate in Hz. 16000 is what the speech engines expect.
    pub sample_rate: u32,
    /// Samples per device read.
    pub chunk_size: usize,
    /// Linear gain applied after capture, clipped to the 16-bit range.
    pub gain: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 16000,
            chunk_size: 1024,
            gain: 4.0,
        }
    }
}

/// Number of whole chunks captured for a recording of `duration_secs`.
///
/// The duration is quantized down to whole chunks, so the recorded audio can
/// be slightly shorter than requested: at 16 kHz with 1024-sample chunks, one
/// second yields 15 chunks (15360 samples, ~0.96 s).
pub fn chunk_count(config: &CaptureConfig, duration_secs: f64) -> usize {
    (config.sample_rate as f64 / config.chunk_size as f64 * duration_secs) as usize
}

/// Record from the default input device for `duration_secs` seconds.
///
/// Returns the raw (un-amplified) frame buffer: one `Vec<i16>` of exactly
/// `config.chunk_size` samples per chunk, in capture order. Prints a
/// `Recording: X.Xs / Ys` progress line while capturing.
///
/// The capture stream is owned exclusively by this function and released when
/// it returns, on both success and error paths.
pub fn record(config: &CaptureConfig, duration_secs: f64) -> Result<Vec<Vec<i16>>> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(Error::NoInputDevice)?;
    log::info!(
        "using input device: {}",
        device.name().unwrap_or_else(|_| "unknown".into())
    );

    let device_config = device
        .default_input_config()
        .map_err(|e| Error::Stream(format!("no supported input configuration: {}", e)))?;

    let stream_config = StreamConfig {
        channels: config.channels,
        sample_rate: SampleRate(config.sample_rate),
        buffer_size: BufferSize::Default,
    };

    let (tx, rx) = mpsc::channel::<Vec<i16>>();
    let err_fn = |err| log::error!("audio stream error: {}", err);

    // The device may deliver any of the common sample formats; everything is
    // converted to i16 before it reaches the chunk assembler.
    let stream = match device_config.sample_format() {
        cpal::SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(data.to_vec());
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let block = data
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                    .collect();
                let _ = tx.send(block);
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::U16 => device.build_input_stream(
            &stream_config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                let block = data.iter().map(|&s| ((s as i32) - 32768) as i16).collect();
                let _ = tx.send(block);
            },
            err_fn,
            None,
        ),
        other => {
            return Err(Error::Stream(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| Error::Stream(format!("failed to open capture stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| Error::Stream(format!("failed to start capture stream: {}", e)))?;

    let n_chunks = chunk_count(config, duration_secs);
    let mut frames = Vec::with_capacity(n_chunks);
    let mut pending = Vec::new();

    for i in 0..n_chunks {
        frames.push(next_chunk(&rx, &mut pending, config.chunk_size)?);
        print!(
            "\rRecording: {:.1}s / {}s",
            (i * config.chunk_size) as f64 / config.sample_rate as f64,
            duration_secs
        );
        let _ = std::io::stdout().flush();
    }

    // Stop and tear down the device. Dropping the stream also covers the
    // early-return paths above.
    drop(stream);

    Ok(frames)
}

/// Block until a full chunk of `chunk_size` samples is available.
///
/// Device callbacks deliver blocks of arbitrary size; leftovers carry over in
/// `pending` so no sample is dropped and no chunk comes up short. A closed
/// channel means the stream died before the recording finished.
fn next_chunk(
    rx: &mpsc::Receiver<Vec<i16>>,
    pending: &mut Vec<i16>,
    chunk_size: usize,
) -> Result<Vec<i16>> {
    while pending.len() < chunk_size {
        let block = rx
            .recv()
            .map_err(|_| Error::Stream("input stream ended before the recording finished".into()))?;
        pending.extend_from_slice(&block);
    }
    let rest = pending.split_off(chunk_size);
    Ok(std::mem::replace(pending, rest))
}

/// Amplify every sample in place by `gain`, hard-clipping to the 16-bit range.
///
/// Out-of-range values saturate at -32768/32767 rather than wrapping or being
/// rescaled, and the fractional part is truncated toward zero. Chunk
/// boundaries and sample counts are unchanged.
pub fn amplify(frames: &mut [Vec<i16>], gain: f32) {
    for frame in frames.iter_mut() {
        for sample in frame.iter_mut() {
            let amplified = (*sample as f32 * gain).clamp(i16::MIN as f32, i16::MAX as f32);
            *sample = amplified as i16;
        }
    }
}
