//! record-audio - capture microphone audio and save an amplified WAV file.
//!
//! Records mono 16-bit PCM from the default input device for a fixed number
//! of seconds, boosts the volume with hard clipping, writes the result as a
//! WAV file, and reports the written file's properties.

use std::fs::OpenOptions;
use std::io::Write;

use clap::Parser;

use transcrire::capture::{self, CaptureConfig};
use transcrire::wav;

#[derive(Parser, Debug)]
#[command(
    name = "record-audio",
    version,
    about = "Record from the microphone and save an amplified mono WAV file"
)]
struct Args {
    /// Recording duration in seconds
    #[arg(default_value_t = 5)]
    duration: u32,

    /// Sample rate in Hz (16000 recommended for the speech engines)
    #[arg(long, default_value_t = 16000)]
    rate: u32,

    /// Volume multiplier applied after capture (1.0 = original volume),
    /// hard-clipped to the 16-bit range
    #[arg(long, default_value_t = 4.0)]
    gain: f32,

    /// Output WAV file
    #[arg(short, long, default_value = "recorded_audio.wav")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Best-effort note of the native capture backend in the local manifest;
    // its failure is deliberately swallowed.
    let _ = note_backend_dependency();

    let config = CaptureConfig {
        sample_rate: args.rate,
        gain: args.gain,
        ..CaptureConfig::default()
    };

    println!("Recording...");
    let mut frames = capture::record(&config, f64::from(args.duration))?;
    println!("\nFinished recording!");

    capture::amplify(&mut frames, config.gain);
    wav::write_frames(&args.output, &config, &frames)?;
    println!("Audio saved to: {}", args.output);

    // Verification read-back of the file just written.
    let info = wav::probe(&args.output)?;
    println!("\nAudio file properties:");
    println!("Channels: {}", info.channels);
    println!("Sample width: {} bits", info.bits_per_sample);
    println!("Sample rate: {} Hz", info.sample_rate);
    println!("Duration: {:.1} seconds", info.duration_secs());

    Ok(())
}

fn note_backend_dependency() -> std::io::Result<()> {
    let mut manifest = OpenOptions::new()
        .append(true)
        .create(true)
        .open("requirements.txt")?;
    writeln!(manifest, "cpal (system audio backend)")?;
    Ok(())
}
