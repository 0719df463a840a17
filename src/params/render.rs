//! Compositing, ASCII, presentation and recording configuration.

use std::path::PathBuf;

/// Frame compositor parameters
#[derive(Debug, Clone)]
pub struct CompositorParams {
    /// Upper bound on the simulation step (seconds)
    /// Prevents jumps after a stall
    pub max_dt_s: f32,

    /// Trail fade opacity = max(floor, start - v * slope)
    pub trail_fade_start: f32,
    pub trail_fade_slope: f32,
    pub trail_fade_floor: f32,

    /// Number of frequency spokes around the orb
    pub spoke_count: usize,
    /// Gap between orb rim and spoke start (pixels)
    pub spoke_offset_px: f32,
    /// Spoke length at full amplitude (pixels)
    pub spoke_length_px: f32,
}

impl Default for CompositorParams {
    fn default() -> Self {
        Self {
            max_dt_s: 0.05,
            trail_fade_start: 0.55,
            trail_fade_slope: 0.35,
            trail_fade_floor: 0.18,
            spoke_count: 32,
            spoke_offset_px: 12.0,
            spoke_length_px: 70.0,
        }
    }
}

/// ASCII transcoder parameters
#[derive(Debug, Clone)]
pub struct AsciiParams {
    /// Cell width (pixels)
    pub cell_width: u32,

    /// Cell height (pixels)
    /// 2:1 matches a typical terminal glyph
    pub cell_height: u32,

    /// Glyph ramp, darkest (blank) to brightest
    pub ramp: String,
}

impl Default for AsciiParams {
    fn default() -> Self {
        Self {
            cell_width: 5,
            cell_height: 10,
            ramp: " .:-=+*#%@".to_string(),
        }
    }
}

impl AsciiParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(format!(
                "Cell size must be non-zero, got {}x{}",
                self.cell_width, self.cell_height
            ));
        }
        if self.ramp.chars().count() < 2 {
            return Err("Glyph ramp needs at least two characters".to_string());
        }
        Ok(())
    }
}

/// Presentation configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Target frame rate (frames per second)
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_dir: impl Into<PathBuf>, fps: u32) -> Self {
        Self {
            duration_secs,
            output_dir: output_dir.into(),
            fps,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs.max(0.0) * self.fps as f32).ceil() as usize
    }

    /// Scene frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// ASCII frame directory path
    pub fn ascii_dir(&self) -> PathBuf {
        self.output_dir.join("ascii")
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }
}
