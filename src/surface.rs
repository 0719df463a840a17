//! Pixel surface for the composited scene.
//!
//! Wraps a `tiny_skia::Pixmap` and exposes the handful of drawing
//! primitives the compositor needs: translucent full-surface fills, discs
//! shaded by a radial gradient, soft halos, circle strokes and polylines.
//! The pixmap is cleared to opaque black and every primitive keeps it
//! opaque, so stored pixels are straight RGB.

use glam::Vec2;
use log::warn;
use thiserror::Error;
use tiny_skia::{
    BlendMode, FillRule, GradientStop, Paint, Path, PathBuilder, Pixmap, Point, RadialGradient,
    Rect, Shader, SpreadMode, Stroke, Transform,
};

use crate::color::{clamp_unit, Rgb, Rgba};

/// Largest width or height a surface will allocate (pixels)
pub const MAX_DIMENSION: u32 = 16_384;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface {width}x{height} cannot be read at ({x}, {y})")]
    Unreadable {
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    },
}

/// Ordered colour stops with offsets in [0, 1]
#[derive(Clone, Debug, Default)]
pub struct Gradient {
    stops: Vec<(f32, Rgba)>,
}

impl Gradient {
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Add a stop; offsets must be supplied in ascending order
    pub fn stop(mut self, offset: f32, color: impl Into<Rgba>) -> Self {
        self.stops.push((clamp_unit(offset), color.into()));
        self
    }

    pub fn stops(&self) -> &[(f32, Rgba)] {
        &self.stops
    }

    /// Radial shader centred on `center`, padded with the end stops
    fn shader(&self, center: Vec2, radius: f32) -> Option<Shader<'static>> {
        match self.stops.as_slice() {
            [] => None,
            [(_, only)] => Some(Shader::SolidColor(only.to_skia())),
            stops => {
                let centre = Point::from_xy(center.x, center.y);
                let stops = stops
                    .iter()
                    .map(|&(offset, color)| GradientStop::new(offset, color.to_skia()))
                    .collect();
                RadialGradient::new(centre, centre, radius, stops, SpreadMode::Pad, Transform::identity())
            }
        }
    }
}

fn paint(shader: Shader<'static>, mode: BlendMode) -> Paint<'static> {
    Paint {
        shader,
        blend_mode: mode,
        anti_alias: true,
        ..Paint::default()
    }
}

fn circle(center: Vec2, radius: f32) -> Option<Path> {
    if !center.is_finite() || !(radius > 0.0) {
        return None;
    }
    PathBuilder::from_circle(center.x, center.y, radius)
}

/// Primary composited pixel buffer
pub struct Surface {
    width: u32,
    height: u32,
    /// `None` for zero-area or unallocatable sizes
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Create a black surface
    pub fn new(width: u32, height: u32) -> Self {
        let pixmap = if width > MAX_DIMENSION || height > MAX_DIMENSION {
            warn!(
                "Surface {}x{} exceeds the {}px limit, leaving it unallocated",
                width, height, MAX_DIMENSION
            );
            None
        } else {
            Pixmap::new(width, height)
        };
        let mut surface = Self {
            width,
            height,
            pixmap,
        };
        surface.clear(Rgb::BLACK);
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Backing pixmap, absent when nothing can be drawn or read
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Match the given size; contents are cleared only when the size changes
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Fill with a single opaque colour
    pub fn clear(&mut self, color: Rgb) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
        }
    }

    /// Read one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgb, SurfaceError> {
        let unreadable = SurfaceError::Unreadable {
            width: self.width,
            height: self.height,
            x,
            y,
        };
        let px = self
            .pixmap
            .as_ref()
            .and_then(|p| p.pixel(x, y))
            .ok_or(unreadable)?;
        // opaque, so premultiplied equals straight
        Ok(Rgb::new(px.red(), px.green(), px.blue()))
    }

    /// Cover the whole surface with a translucent colour
    pub fn fill(&mut self, color: Rgba, mode: BlendMode) {
        if color.a <= 0.0 {
            return;
        }
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32) {
            let paint = paint(Shader::SolidColor(color.to_skia()), mode);
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Fill a disc of `radius`, shaded by `gradient` laid out over
    /// `gradient_radius` from the centre
    pub fn fill_radial(
        &mut self,
        center: Vec2,
        radius: f32,
        gradient: &Gradient,
        gradient_radius: f32,
        mode: BlendMode,
    ) {
        let Some(path) = circle(center, radius) else {
            return;
        };
        let Some(shader) = gradient.shader(center, gradient_radius) else {
            return;
        };
        self.fill_path(&path, paint(shader, mode), FillRule::Winding);
    }

    /// Soft halo around a disc: `color` at the rim fading linearly to zero
    /// `width` pixels outside it
    pub fn fill_halo(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba, mode: BlendMode) {
        if !(width > 0.0) || !(radius >= 0.0) || !center.is_finite() || color.a <= 0.0 {
            return;
        }
        let outer = radius + width;
        let mut pb = PathBuilder::new();
        pb.push_circle(center.x, center.y, outer);
        if radius > 0.0 {
            pb.push_circle(center.x, center.y, radius);
        }
        let Some(ring) = pb.finish() else {
            return;
        };
        let fade = Gradient::new()
            .stop(radius / outer, color)
            .stop(1.0, color.transparent());
        if let Some(shader) = fade.shader(center, outer) {
            self.fill_path(&ring, paint(shader, mode), FillRule::EvenOdd);
        }
    }

    /// Stroke a circle outline centred on `radius`
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba, mode: BlendMode) {
        if let Some(path) = circle(center, radius) {
            self.stroke_path(&path, width, color, mode);
        }
    }

    /// Stroke a connected polyline as one path (joints are not double-blended)
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba, mode: BlendMode) {
        let mut finite = points.iter().filter(|p| p.is_finite());
        let Some(first) = finite.next() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in finite {
            pb.line_to(p.x, p.y);
        }
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, width, color, mode);
        }
    }

    /// Stroke a single straight line
    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba, mode: BlendMode) {
        self.stroke_polyline(&[from, to], width, color, mode);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Rgba, mode: BlendMode) {
        if !(width > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        let paint = paint(Shader::SolidColor(color.to_skia()), mode);
        pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_path(&mut self, path: &Path, paint: Paint<'_>, rule: FillRule) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_path(path, &paint, rule, Transform::identity(), None);
        }
    }
}
