//! End-to-end capture-pipeline tests: amplify, serialize, read back.
//!
//! No audio device is involved; the frame buffers are synthesized the same
//! shape the recorder produces (whole 1024-sample chunks).

use transcrire::capture::{self, CaptureConfig};
use transcrire::wav;

fn synth_frames(chunks: usize, chunk_size: usize, value: i16) -> Vec<Vec<i16>> {
    vec![vec![value; chunk_size]; chunks]
}

#[test]
fn one_second_at_16khz_records_fifteen_chunks() {
    let config = CaptureConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one_second.wav");

    let n = capture::chunk_count(&config, 1.0);
    assert_eq!(n, 15);

    let mut frames = synth_frames(n, config.chunk_size, 10000);
    capture::amplify(&mut frames, config.gain);
    wav::write_frames(&path, &config, &frames).unwrap();

    let info = wav::probe(&path).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.sample_rate, 16000);
    assert_eq!(info.frames, 15 * 1024);
    // quantized below the requested second
    assert!(info.duration_secs() > 0.95 && info.duration_secs() < 1.0);
}

#[test]
fn amplified_payload_survives_serialization() {
    let config = CaptureConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload.wav");

    // One loud chunk (clips both ways) and one quiet chunk (exact scaling).
    let mut frames = vec![vec![10000i16; 1024], vec![100i16; 1024]];
    frames[0][0] = -10000;
    capture::amplify(&mut frames, 4.0);
    wav::write_frames(&path, &config, &frames).unwrap();

    let (rate, samples) = wav::read_mono_samples(&path).unwrap();
    assert_eq!(rate, config.sample_rate);
    assert_eq!(samples.len(), 2 * 1024);
    assert_eq!(samples[0], -32768);
    assert_eq!(samples[1], 32767);
    assert!(samples[1024..].iter().all(|&s| s == 400));
}

#[test]
fn sub_chunk_duration_writes_a_valid_empty_file() {
    let config = CaptureConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.wav");

    // 10 ms at 16 kHz is less than one 1024-sample chunk.
    let n = capture::chunk_count(&config, 0.01);
    assert_eq!(n, 0);

    wav::write_frames(&path, &config, &synth_frames(n, config.chunk_size, 0)).unwrap();

    let info = wav::probe(&path).unwrap();
    assert_eq!(info.frames, 0);
    assert_eq!(info.sample_rate, 16000);
}

#[test]
fn frame_count_matches_the_quantized_duration_for_various_rates() {
    for (rate, duration, expected_chunks) in [
        (16000u32, 1.0f64, 15usize),
        (16000, 5.0, 78),
        (44100, 1.0, 43),
        (8000, 2.0, 15),
    ] {
        let config = CaptureConfig {
            sample_rate: rate,
            ..CaptureConfig::default()
        };
        let n = capture::chunk_count(&config, duration);
        assert_eq!(n, expected_chunks, "rate={} duration={}", rate, duration);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quantized.wav");
        wav::write_frames(&path, &config, &synth_frames(n, config.chunk_size, 1)).unwrap();

        let info = wav::probe(&path).unwrap();
        assert_eq!(info.frames as usize, n * config.chunk_size);
        assert_eq!(info.sample_rate, rate);
    }
}
