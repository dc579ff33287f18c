//! Speech synthesis using `piper-rs` with per-utterance WAV caching.
//!
//! One utterance is the remainder of one narration segment, sliced at the
//! resume offset. Audio is rendered to a WAV under `.cache/` keyed by model,
//! text and rate, then played through a rodio sink. Boundary progress is
//! derived by the caller from elapsed playback time against the utterance
//! duration reported here.

use anyhow::{Context, Result};
use piper_rs::from_config_path;
use piper_rs::synth::{AudioOutputConfig, PiperSpeechSynthesizer};
use rodio::{Decoder, OutputStream, Sink};
use sha2::{Digest, Sha256};
use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Synthesis rates the rate button cycles through, paired with the
/// multipliers shown to the user.
pub const SYNTH_RATES: [f32; 5] = [0.95, 1.05, 1.15, 1.25, 1.35];
pub const DISPLAY_RATES: [f32; 5] = [1.0, 1.25, 1.5, 1.75, 2.0];

#[derive(Clone)]
pub struct SpeechEngine {
    model_path: PathBuf,
}

impl SpeechEngine {
    pub fn new(model_path: PathBuf, espeak_path: PathBuf) -> Result<Self> {
        let espeak_path = sanitize_espeak_root(espeak_path);
        if env::var_os("PIPER_ESPEAKNG_DATA_DIRECTORY").is_none() {
            // Safe because we set a deterministic value early in process startup.
            unsafe {
                env::set_var("PIPER_ESPEAKNG_DATA_DIRECTORY", &espeak_path);
            }
        }
        info!(
            model = %model_path.display(),
            espeak_root = %espeak_path.display(),
            "Initializing speech engine"
        );
        Ok(Self { model_path })
    }

    /// Render one utterance to a cached WAV and return its path and spoken
    /// duration. Synthesis is blocking; callers run it inside a task.
    pub fn synthesize(&self, cache_root: PathBuf, text: &str, rate: f32) -> Result<(PathBuf, Duration)> {
        let config_path = resolve_piper_config(&self.model_path);
        if !config_path.exists() {
            anyhow::bail!(
                "Piper config not found at {} (expected from {})",
                config_path.display(),
                self.model_path.display()
            );
        }

        let path = cache_path(&cache_root, &self.model_path, text, rate);
        if !path.exists() {
            debug!(path = %path.display(), rate, chars = text.chars().count(), "Synthesizing utterance");
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Creating speech cache directory")?;
            }
            let model = from_config_path(&config_path).context("Loading Piper model")?;
            let piper =
                PiperSpeechSynthesizer::new(model).context("Preparing Piper synthesizer")?;
            let output_config = AudioOutputConfig {
                rate: Some(rate_to_percent(rate)),
                volume: None,
                pitch: None,
                appended_silence_ms: None,
            };
            piper
                .synthesize_to_file(&path, text.to_string(), Some(output_config))
                .context("Synthesizing audio")?;
        }

        let duration = utterance_duration(&path);
        Ok((path, duration))
    }

    /// Start playing a rendered utterance; returns a handle controlling the sink.
    pub fn play_file(&self, file: &Path, volume: f32) -> Result<SpeechPlayback> {
        let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = Sink::try_new(&handle).context("Creating sink")?;
        let reader = BufReader::new(File::open(file).context("Opening utterance WAV")?);
        let source = Decoder::new(reader).context("Decoding utterance WAV")?;
        sink.set_volume(volume);
        sink.append(source);
        sink.play();
        debug!(file = %file.display(), "Started utterance playback");
        Ok(SpeechPlayback { _stream, sink })
    }
}

pub struct SpeechPlayback {
    _stream: OutputStream,
    sink: Sink,
}

impl SpeechPlayback {
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn stop(self) {
        debug!("Stopping utterance playback");
        self.sink.stop();
        // stream dropped automatically
    }
}

fn cache_path(base: &Path, model_path: &Path, text: &str, rate: f32) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(model_path.as_os_str().to_string_lossy().as_bytes());
    hasher.update(text.as_bytes());
    hasher.update(rate.to_le_bytes());
    let hash = format!("{:x}", hasher.finalize());
    base.join(format!("utterance-{hash}.wav"))
}

/// Piper expects the parent directory that contains `espeak-ng-data/phonindex`.
/// Users often point directly at `.../espeak-ng-data`; trim that to avoid
/// duplicated segments like `/espeak-ng-data/espeak-ng-data/phonindex`.
fn sanitize_espeak_root(path: PathBuf) -> PathBuf {
    if path
        .file_name()
        .map(|n| n == "espeak-ng-data")
        .unwrap_or(false)
    {
        if let Some(parent) = path.parent() {
            debug!(
                original = %path.display(),
                sanitized = %parent.display(),
                "Trimming espeak-ng-data suffix"
            );
            return parent.to_path_buf();
        }
    }
    path
}

fn utterance_duration(path: &Path) -> Duration {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return Duration::from_secs(1),
    };
    let reader = BufReader::new(file);
    Decoder::new(reader)
        .ok()
        .and_then(|d| rodio::Source::total_duration(&d))
        .unwrap_or(Duration::from_secs(1))
}

fn resolve_piper_config(model_path: &Path) -> PathBuf {
    if model_path
        .extension()
        .map(|ext| ext == "onnx")
        .unwrap_or(false)
    {
        return model_path.with_extension("onnx.json");
    }
    model_path.to_path_buf()
}

/// Piper takes rate as a percent over its supported range; the docent rates
/// sit between 0.5x and 1.5x of the voice's native speed.
fn rate_to_percent(rate: f32) -> u8 {
    let clamped = rate.clamp(0.5, 1.5);
    let percent = (clamped - 0.5) * 100.0;
    percent.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_mapping_covers_the_cycle() {
        assert_eq!(rate_to_percent(0.95), 45);
        assert_eq!(rate_to_percent(1.35), 85);
        assert_eq!(rate_to_percent(0.0), 0);
        assert_eq!(rate_to_percent(9.0), 100);
    }

    #[test]
    fn cache_path_varies_with_text_and_rate() {
        let base = Path::new("/tmp/cache");
        let model = Path::new("/model/ko.onnx");
        let a = cache_path(base, model, "작품 설명", 0.95);
        let b = cache_path(base, model, "작품 설명", 1.05);
        let c = cache_path(base, model, "다른 설명", 0.95);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, cache_path(base, model, "작품 설명", 0.95));
    }

    #[test]
    fn espeak_root_is_trimmed_to_parent() {
        let sanitized = sanitize_espeak_root(PathBuf::from("/usr/share/espeak-ng-data"));
        assert_eq!(sanitized, PathBuf::from("/usr/share"));
        let untouched = sanitize_espeak_root(PathBuf::from("/usr/share"));
        assert_eq!(untouched, PathBuf::from("/usr/share"));
    }
}
