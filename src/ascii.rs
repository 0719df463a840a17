//! Pixel → glyph transcoding.
//!
//! The scene surface is cut into fixed-size cells. Each cell samples the
//! pixel at its centre, picks a glyph by luminance and gets a colour pushed
//! toward its own dominant channel and brightened by the smoothed volume.
//! This runs over the whole grid every tick, so the inner loop stays in
//! integer arithmetic where it can.

use crate::color::Rgb;
use crate::params::AsciiParams;
use crate::surface::{Surface, SurfaceError};

/// Rec. 709 luma weights scaled by 10 000
const LUMA_R: u32 = 2126;
const LUMA_G: u32 = 7152;
const LUMA_B: u32 = 722;
const LUMA_SCALE: u32 = 10_000;

/// Ordered glyphs from blank (darkest) to densest (brightest)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Returns `None` for ramps shorter than two glyphs
    pub fn new(ramp: &str) -> Option<Self> {
        let glyphs: Vec<char> = ramp.chars().collect();
        (glyphs.len() >= 2).then_some(Self { glyphs })
    }

    /// Ramp index for a pixel: `floor(L / 255 * (len - 1))`
    pub fn index_for(&self, pixel: Rgb) -> usize {
        let luma = LUMA_R * pixel.r as u32 + LUMA_G * pixel.g as u32 + LUMA_B * pixel.b as u32;
        let steps = (self.glyphs.len() - 1) as u32;
        let index = luma * steps / (255 * LUMA_SCALE);
        (index as usize).min(self.glyphs.len() - 1)
    }

    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            glyphs: " .:-=+*#%@".chars().collect(),
        }
    }
}

/// A drawn glyph and its colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphCell {
    pub glyph: char,
    pub color: Rgb,
}

/// The ASCII output surface; `None` cells are left blank
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Option<GlyphCell>>,
}

impl GlyphGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<GlyphCell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Out-of-range writes are ignored
    pub fn set(&mut self, col: usize, row: usize, cell: Option<GlyphCell>) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = cell;
        }
    }

    pub fn row(&self, row: usize) -> &[Option<GlyphCell>] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Number of drawn (non-blank) cells
    pub fn drawn(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Plain-text rendering, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for cell in self.row(row) {
                out.push(cell.map_or(' ', |c| c.glyph));
            }
            out.push('\n');
        }
        out
    }

    fn reset(&mut self, cols: usize, rows: usize) {
        if self.cols != cols || self.rows != rows {
            *self = Self::new(cols, rows);
        } else {
            self.cells.fill(None);
        }
    }
}

/// Audio-reactive colour pop: saturate toward the dominant channel, then brighten
pub fn remap_color(pixel: Rgb, volume: f32) -> Rgb {
    let v = volume.clamp(0.0, 1.0);
    let saturation = 0.25 + 0.75 * v;
    let brightness = 0.7 + 1.6 * v;
    let max = pixel.max_channel() as f32;
    let channel = |c: u8| {
        let c = c as f32;
        ((c + (max - c) * saturation) * brightness).clamp(0.0, 255.0) as u8
    };
    Rgb::new(channel(pixel.r), channel(pixel.g), channel(pixel.b))
}

pub struct AsciiTranscoder {
    ramp: GlyphRamp,
    cell_width: u32,
    cell_height: u32,
}

impl AsciiTranscoder {
    pub fn new(params: &AsciiParams) -> Result<Self, String> {
        params.validate()?;
        let ramp = GlyphRamp::new(&params.ramp).ok_or("Glyph ramp needs at least two characters")?;
        Ok(Self {
            ramp,
            cell_width: params.cell_width,
            cell_height: params.cell_height,
        })
    }

    /// Grid size for a surface of the given pixel size
    pub fn grid_size(&self, width: u32, height: u32) -> (usize, usize) {
        (
            (width / self.cell_width) as usize,
            (height / self.cell_height) as usize,
        )
    }

    /// Transcode `surface` into `grid`
    ///
    /// On error the grid is left untouched so the previous frame stays visible.
    pub fn transcode(&self, surface: &Surface, volume: f32, grid: &mut GlyphGrid) -> Result<(), SurfaceError> {
        let (cols, rows) = self.grid_size(surface.width(), surface.height());
        if surface.pixmap().is_none() {
            return Err(SurfaceError::Unreadable {
                width: surface.width(),
                height: surface.height(),
                x: 0,
                y: 0,
            });
        }

        grid.reset(cols, rows);
        for row in 0..rows {
            let y = row as u32 * self.cell_height + self.cell_height / 2;
            for col in 0..cols {
                let x = col as u32 * self.cell_width + self.cell_width / 2;
                let pixel = surface.pixel(x, y)?;
                let index = self.ramp.index_for(pixel);
                // the blank glyph is never drawn
                if index == 0 {
                    continue;
                }
                let cell = GlyphCell {
                    glyph: self.ramp.glyph(index),
                    color: remap_color(pixel, volume),
                };
                grid.set(col, row, Some(cell));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcoder() -> AsciiTranscoder {
        AsciiTranscoder::new(&AsciiParams::default()).unwrap()
    }

    #[test]
    fn test_black_surface_is_blank() {
        let surface = Surface::new(100, 50);
        let mut grid = GlyphGrid::default();
        transcoder().transcode(&surface, 0.5, &mut grid).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (20, 5));
        assert_eq!(grid.drawn(), 0);
    }

    #[test]
    fn test_white_surface_is_brightest_everywhere() {
        let mut surface = Surface::new(100, 50);
        surface.clear(Rgb::WHITE);
        let mut grid = GlyphGrid::default();
        transcoder().transcode(&surface, 0.0, &mut grid).unwrap();
        assert_eq!(grid.drawn(), 100);
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                assert_eq!(grid.get(col, row).unwrap().glyph, '@');
            }
        }
    }

    #[test]
    fn test_luminance_to_ramp_index() {
        let ramp = GlyphRamp::default();
        assert_eq!(ramp.index_for(Rgb::BLACK), 0);
        assert_eq!(ramp.index_for(Rgb::WHITE), 9);
        // pure green: L = 0.7152 * 255 → floor(0.7152 * 9) = 6
        assert_eq!(ramp.index_for(Rgb::new(0, 255, 0)), 6);
        // pure blue: floor(0.0722 * 9) = 0, stays blank
        assert_eq!(ramp.index_for(Rgb::new(0, 0, 255)), 0);
    }

    #[test]
    fn test_partial_cells_are_dropped() {
        let surface = Surface::new(12, 25);
        let mut grid = GlyphGrid::default();
        transcoder().transcode(&surface, 0.0, &mut grid).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (2, 2));
    }

    #[test]
    fn test_empty_surface_errors_and_keeps_grid() {
        let mut surface = Surface::new(10, 10);
        surface.clear(Rgb::WHITE);
        let mut grid = GlyphGrid::default();
        let t = transcoder();
        t.transcode(&surface, 0.0, &mut grid).unwrap();
        let before = grid.clone();

        assert!(t.transcode(&Surface::new(0, 0), 0.0, &mut grid).is_err());
        assert_eq!(grid, before);
        let oversized = Surface::new(crate::surface::MAX_DIMENSION + 5, 10);
        assert!(t.transcode(&oversized, 0.0, &mut grid).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_remap_color() {
        // silent: saturation 0.25, brightness 0.7 → (140, 87.5, 35)
        let quiet = remap_color(Rgb::new(200, 100, 0), 0.0);
        assert!(quiet.r.abs_diff(140) <= 1);
        assert!(quiet.g.abs_diff(87) <= 1);
        assert!(quiet.b.abs_diff(35) <= 1);
        // loud: fully saturated toward max then clamped
        let loud = remap_color(Rgb::new(200, 100, 0), 1.0);
        assert_eq!(loud, Rgb::new(255, 255, 255));
        assert_eq!(remap_color(Rgb::BLACK, 1.0), Rgb::BLACK);
    }

    #[test]
    fn test_text_rendering() {
        let mut surface = Surface::new(10, 10);
        surface.clear(Rgb::WHITE);
        let mut grid = GlyphGrid::default();
        transcoder().transcode(&surface, 0.0, &mut grid).unwrap();
        assert_eq!(grid.to_text(), "@@\n");
    }
}
