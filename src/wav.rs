//! WAV serialization and probing, built on hound.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::{CaptureConfig, Error, Result};

/// Properties reported by a read-back of a written WAV file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    /// Inter-channel frame count (samples per channel).
    pub frames: u32,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Serialize a frame buffer as a 16-bit PCM WAV file.
///
/// Chunks are written back to back in capture order, so the payload is the
/// plain concatenation of the buffer. An empty buffer produces a valid
/// header-only file.
pub fn write_frames<P: AsRef<Path>>(
    path: P,
    config: &CaptureConfig,
    frames: &[Vec<i16>],
) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| Error::Wav(format!("failed to create {}: {}", path.display(), e)))?;
    for frame in frames {
        for &sample in frame {
            writer
                .write_sample(sample)
                .map_err(|e| Error::Wav(format!("failed to write {}: {}", path.display(), e)))?;
        }
    }
    writer
        .finalize()
        .map_err(|e| Error::Wav(format!("failed to finalize {}: {}", path.display(), e)))
}

/// Open a WAV file read-only and report its format.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let path = path.as_ref();
    let reader = WavReader::open(path)
        .map_err(|e| Error::Wav(format!("failed to open {}: {}", path.display(), e)))?;
    let spec = reader.spec();
    Ok(WavInfo {
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        sample_rate: spec.sample_rate,
        frames: reader.duration(),
    })
}

/// Read a 16-bit PCM WAV payload as mono samples.
///
/// Multi-channel files are downmixed by averaging each frame across channels.
/// Returns the file's sample rate alongside the samples.
pub fn read_mono_samples<P: AsRef<Path>>(path: P) -> Result<(u32, Vec<i16>)> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)
        .map_err(|e| Error::Wav(format!("failed to open {}: {}", path.display(), e)))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(Error::Wav(format!(
            "{}: expected 16-bit PCM, got {}-bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Wav(format!("failed to read {}: {}", path.display(), e)))?;

    if spec.channels <= 1 {
        return Ok((spec.sample_rate, samples));
    }

    let channels = spec.channels as usize;
    let mono = samples
        .chunks_exact(channels)
        .map(|frame| (frame.iter().map(|&s| s as i32).sum::<i32>() / channels as i32) as i16)
        .collect();
    Ok((spec.sample_rate, mono))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture;

    fn test_config() -> CaptureConfig {
        CaptureConfig::default()
    }

    #[test]
    fn written_file_reports_the_spec_it_was_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let frames = vec![vec![0i16; 1024]; 15];
        write_frames(&path, &test_config(), &frames).unwrap();

        let info = probe(&path).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.frames, 15 * 1024);
    }

    #[test]
    fn quantized_duration_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let config = test_config();

        // One requested second at 16 kHz floors to 15 chunks (~0.96 s).
        let n = capture::chunk_count(&config, 1.0);
        assert_eq!(n, 15);
        let frames = vec![vec![0i16; config.chunk_size]; n];
        write_frames(&path, &config, &frames).unwrap();

        let info = probe(&path).unwrap();
        assert_eq!(info.frames, (n * config.chunk_size) as u32);
        let duration = info.duration_secs();
        assert!(duration < 1.0);
        assert!((duration - 15360.0 / 16000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_chunks_make_a_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");

        write_frames(&path, &test_config(), &[]).unwrap();

        let info = probe(&path).unwrap();
        assert_eq!(info.frames, 0);
        assert_eq!(info.duration_secs(), 0.0);
    }

    #[test]
    fn payload_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.wav");

        let frames = vec![vec![1i16, -2, 3], vec![-32768i16, 32767, 0]];
        write_frames(&path, &test_config(), &frames).unwrap();

        let (rate, samples) = read_mono_samples(&path).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(samples, vec![1, -2, 3, -32768, 32767, 0]);
    }

    #[test]
    fn stereo_payload_downmixes_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for sample in [100i16, 300, -50, -150] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let (_, samples) = read_mono_samples(&path).unwrap();
        assert_eq!(samples, vec![200, -100]);
    }
}
