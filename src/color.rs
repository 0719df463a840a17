//! Colour types and HSL conversion.
//!
//! `Hsla` takes CSS-style `hsla()` units so gradient stops read the way they
//! do in a style sheet; the conversion itself goes through `palette`. Every
//! constructor clamps its inputs, so no out-of-range value can reach the
//! surface.

use palette::{FromColor, Srgba};

/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Largest channel value
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }
}

/// Straight (non-premultiplied) colour with channels in [0, 255] and alpha in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_unit(a),
        }
    }

    /// Same colour, fully transparent
    pub fn transparent(self) -> Self {
        Self { a: 0.0, ..self }
    }

    /// Straight-alpha colour for the rasterizer
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba(self.r / 255.0, self.g / 255.0, self.b / 255.0, self.a)
            .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

/// Hue (degrees), saturation and lightness (percent), alpha in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
            a: clamp_unit(a),
        }
    }

    /// Convert to straight RGBA
    pub fn to_rgba(self) -> Rgba {
        let hsla: palette::Hsla = palette::Hsla::new(self.h, self.s / 100.0, self.l / 100.0, self.a);
        let rgba: Srgba = Srgba::from_color(hsla);
        Rgba::new(
            rgba.red * 255.0,
            rgba.green * 255.0,
            rgba.blue * 255.0,
            rgba.alpha,
        )
    }
}

impl From<Hsla> for Rgba {
    fn from(value: Hsla) -> Self {
        value.to_rgba()
    }
}

/// Map any hue onto [0, 360)
pub fn wrap_hue(h: f32) -> f32 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

pub fn clamp_channel(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 255.0)
    }
}
