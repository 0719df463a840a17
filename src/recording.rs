//! Frame dump for offline review: scene PNGs plus ASCII text frames.

use log::info;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::ascii::GlyphGrid;
use crate::params::RecordingConfig;
use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("recording I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Writes numbered frames until the configured duration is covered
pub struct FrameRecorder {
    config: RecordingConfig,
    total_frames: usize,
    frame_num: usize,
}

impl FrameRecorder {
    /// Create the output directories
    pub fn new(config: RecordingConfig) -> Result<Self, RecordError> {
        fs::create_dir_all(config.frames_dir())?;
        fs::create_dir_all(config.ascii_dir())?;
        let total_frames = config.total_frames();
        info!(
            "Recording {} frames ({:.1}s @ {} fps) to {}",
            total_frames,
            config.duration_secs,
            config.fps,
            config.output_dir.display()
        );
        Ok(Self {
            config,
            total_frames,
            frame_num: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frame_num
    }

    pub fn is_finished(&self) -> bool {
        self.frame_num >= self.total_frames
    }

    /// Save one scene frame and its glyph grid
    ///
    /// Does nothing once the recording is complete.
    pub fn record(&mut self, scene: &Surface, glyphs: &GlyphGrid) -> Result<(), RecordError> {
        if self.is_finished() {
            return Ok(());
        }
        if let Some(pixmap) = scene.pixmap() {
            let png = pixmap
                .encode_png()
                .map_err(|e| RecordError::Encode(e.to_string()))?;
            fs::write(self.frame_path(), png)?;
        }
        fs::write(self.ascii_path(), glyphs.to_text())?;

        self.frame_num += 1;
        if self.frame_num % self.config.fps.max(1) as usize == 0 {
            info!("Recorded {}/{} frames", self.frame_num, self.total_frames);
        }
        if self.is_finished() {
            info!("Recording complete: {}", self.config.output_dir.display());
        }
        Ok(())
    }

    fn frame_path(&self) -> PathBuf {
        self.config
            .frames_dir()
            .join(format!("frame_{:05}.png", self.frame_num))
    }

    fn ascii_path(&self) -> PathBuf {
        self.config
            .ascii_dir()
            .join(format!("frame_{:05}.txt", self.frame_num))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_records_numbered_frames_then_stops() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecordingConfig::new(0.5, dir.path(), 4);
        let mut recorder = FrameRecorder::new(config).unwrap();

        let mut scene = Surface::new(4, 4);
        scene.clear(Rgb::WHITE);
        let grid = GlyphGrid::new(2, 1);

        recorder.record(&scene, &grid).unwrap();
        assert!(!recorder.is_finished());
        recorder.record(&scene, &grid).unwrap();
        assert!(recorder.is_finished());
        recorder.record(&scene, &grid).unwrap();
        assert_eq!(recorder.frames_written(), 2);

        assert!(dir.path().join("frames/frame_00000.png").exists());
        assert!(dir.path().join("frames/frame_00001.png").exists());
        assert!(!dir.path().join("frames/frame_00002.png").exists());
        let text = fs::read_to_string(dir.path().join("ascii/frame_00001.txt")).unwrap();
        assert_eq!(text, "  \n");
    }

    #[test]
    fn test_png_matches_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = FrameRecorder::new(RecordingConfig::new(1.0, dir.path(), 1)).unwrap();
        let mut scene = Surface::new(3, 2);
        scene.clear(Rgb::new(10, 20, 30));
        recorder.record(&scene, &GlyphGrid::default()).unwrap();

        let saved = image::open(dir.path().join("frames/frame_00000.png"))
            .unwrap()
            .to_rgb8();
        assert_eq!(saved.dimensions(), (3, 2));
        assert_eq!(saved.get_pixel(2, 1).0, [10, 20, 30]);
    }
}
