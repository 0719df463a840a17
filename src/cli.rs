//! Command-line argument parsing.

use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use crate::params::{CaptureConfig, HuePath, RecordingConfig, RenderConfig, SessionParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "glyphwave")]
#[command(about = "Audio-reactive visual synthesizer rendered as coloured ASCII", long_about = None)]
pub struct Args {
    /// Target frame rate
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// Pixel width of one glyph cell
    #[arg(long, value_name = "PIXELS", default_value = "5")]
    pub cell_width: u32,

    /// Pixel height of one glyph cell
    #[arg(long, value_name = "PIXELS", default_value = "10")]
    pub cell_height: u32,

    /// Input device name (default: host default input)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Skip audio capture and drive the visuals from the fallback oscillator
    #[arg(long)]
    pub no_audio: bool,

    /// Stay silent instead of running the fallback oscillator when no feed is available
    #[arg(long)]
    pub no_fallback: bool,

    /// Seed for particle and burst randomness
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Orb hue interpolation: linear (default), shortest
    #[arg(long, value_name = "PATH", default_value = "linear")]
    pub hue_path: String,

    /// Record frames and audio (duration in seconds), then exit
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Recording output directory
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse hue path from command-line arguments
    pub fn parse_hue_path(&self) -> HuePath {
        match self.hue_path.to_lowercase().as_str() {
            "linear" => HuePath::Linear,
            "shortest" => HuePath::Shortest,
            other => {
                warn!("Unknown hue path '{}', using linear", other);
                HuePath::Linear
            }
        }
    }

    /// Assemble session parameters from defaults plus flags
    pub fn session_params(&self) -> SessionParams {
        let mut params = SessionParams::default();
        params.orb.hue_path = self.parse_hue_path();
        params.features.fallback_enabled = !self.no_fallback;
        params.ascii.cell_width = self.cell_width;
        params.ascii.cell_height = self.cell_height;
        params
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            device: self.device.clone(),
            ..CaptureConfig::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig { fps: self.fps.max(1) }
    }

    /// Seeded when `--seed` is given, otherwise from entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record
            .map(|duration| RecordingConfig::new(duration, &self.output_dir, self.render_config().fps))
    }
}
