//! transcribe-fr - transcribe an audio file to French text.
//!
//! Verifies the input file, picks a speech engine (Whisper by default, Vosk
//! for word-level timings), and prints the transcription. Non-WAV inputs are
//! decoded through ffmpeg first, which must be on the PATH.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde_json::json;

use transcrire::engine::{self, Transcript};
use transcrire::{ffmpeg, wav, DEFAULT_VOSK_MODEL_DIR, DEFAULT_WHISPER_MODEL};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Backend {
    Whisper,
    Vosk,
}

impl Backend {
    fn as_str(self) -> &'static str {
        match self {
            Backend::Whisper => "whisper",
            Backend::Vosk => "vosk",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "transcribe-fr",
    version,
    about = "Transcribe an audio file to French text with a local speech engine"
)]
struct Args {
    /// Audio file to transcribe (e.g. recorded_audio.wav)
    audio_file: PathBuf,

    /// Whisper model size; bigger is more accurate but slower
    #[arg(
        short,
        long,
        default_value = DEFAULT_WHISPER_MODEL,
        value_parser = ["tiny", "base", "small", "medium", "large"],
    )]
    model: String,

    /// Optional .txt file to save the transcription to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Speech engine backend
    #[arg(long, value_enum, default_value_t = Backend::Whisper)]
    engine: Backend,

    /// Pre-extracted Vosk model directory
    #[arg(long, default_value = DEFAULT_VOSK_MODEL_DIR)]
    model_dir: PathBuf,

    /// Print the transcript as JSON (text plus word timings)
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    verify_audio_file(&args.audio_file)?;

    // Non-WAV inputs go through ffmpeg; make sure it exists before loading
    // any model.
    let mut decoded: Option<PathBuf> = None;
    let wav_path = if ffmpeg::is_wav(&args.audio_file) {
        args.audio_file.clone()
    } else {
        ffmpeg::ensure_available()?;
        let tmp = std::env::temp_dir().join(format!("transcrire-{}.wav", std::process::id()));
        println!("Converting {} to WAV via ffmpeg...", args.audio_file.display());
        ffmpeg::decode_to_wav(&args.audio_file, &tmp, 16000)?;
        decoded = Some(tmp.clone());
        tmp
    };

    println!("Loading {} model...", args.engine.as_str());
    let mut engine = engine::create_engine(args.engine.as_str(), &args.model, &args.model_dir)?;

    println!(
        "\nStarting transcription of {} (this can take a while)...",
        wav_path.display()
    );
    let started = Instant::now();
    let result = engine.transcribe_file(&wav_path);

    if let Some(tmp) = decoded {
        let _ = fs::remove_file(tmp);
    }
    let transcript = result?;
    println!(
        "Transcription finished in {:.2} seconds.",
        started.elapsed().as_secs_f32()
    );

    report(&transcript, args.json);

    if let Some(output) = &args.output {
        fs::write(output, transcript.text.as_bytes())
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Transcription saved to {}", output.display());
    }

    Ok(())
}

/// Sanity-check the input before any model is loaded, mirroring what a user
/// needs to debug a bad recording: existence, size, and WAV properties when
/// the file parses as one.
fn verify_audio_file(path: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(path.exists(), "audio file not found: {}", path.display());

    let size = fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))?
        .len();

    println!("Checking audio file:");
    println!("- Path: {}", path.display());
    println!("- Size: {} bytes", size);

    match wav::probe(path) {
        Ok(info) => {
            println!("- Valid WAV container");
            println!("- Channels: {}", info.channels);
            println!("- Sample width: {} bits", info.bits_per_sample);
            println!("- Sample rate: {} Hz", info.sample_rate);
            if info.channels != 1 || info.bits_per_sample != 16 {
                println!("Warning: expected mono 16-bit PCM at 16000 Hz for best results");
            }
        }
        Err(e) if ffmpeg::is_wav(path) => {
            // A .wav that does not parse will fail later anyway; surface the
            // reason here where it is actionable.
            anyhow::bail!("{}", e);
        }
        Err(_) => {
            // Not a WAV; ffmpeg will handle it.
        }
    }

    Ok(())
}

fn report(transcript: &Transcript, as_json: bool) {
    if as_json {
        let words: Vec<_> = transcript
            .words
            .iter()
            .map(|w| {
                json!({
                    "word": w.word,
                    "start": w.start,
                    "end": w.end,
                    "conf": w.conf,
                })
            })
            .collect();
        println!(
            "{}",
            json!({ "text": transcript.text, "words": words })
        );
        return;
    }

    println!("\n--- Transcription ---");
    if transcript.text.is_empty() {
        println!("(no speech detected)");
    } else {
        println!("{}", transcript.text);
    }
    println!("---------------------");

    if !transcript.words.is_empty() {
        println!("\nWord timings:");
        for w in &transcript.words {
            println!(
                "{}: {:.2}s - {:.2}s (conf: {:.2})",
                w.word, w.start, w.end, w.conf
            );
        }
    }
}
