//! Analytic wave field: expanding rings and sinusoidal aurora bands.
//!
//! Everything here is a pure function of (time, orb hue, smoothed volume,
//! viewport). There is no per-wave state; continuity comes from `t` alone.

use glam::Vec2;

use crate::color::Hsla;
use crate::params::WaveParams;
use crate::viewport::Viewport;

/// One stroked circle
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
    pub stroke_width: f32,
    pub color: Hsla,
}

/// One stroked polyline
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub points: Vec<Vec2>,
    pub stroke_width: f32,
    pub color: Hsla,
}

/// All three wave layers for one tick, in draw order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveLayers {
    pub rings: Vec<Ring>,
    pub horizontal: Vec<Band>,
    pub vertical: Vec<Band>,
}

/// Compute the wave field at time `t` (seconds)
pub fn wave_field(params: &WaveParams, t: f32, base_hue: f32, volume: f32, viewport: Viewport) -> WaveLayers {
    if viewport.is_empty() {
        return WaveLayers::default();
    }
    let v = volume.clamp(0.0, 1.0);
    WaveLayers {
        rings: radial_rings(params, t, base_hue, v, viewport),
        horizontal: horizontal_bands(params, t, base_hue, v, viewport),
        vertical: vertical_bands(params, t, base_hue, v, viewport),
    }
}

/// Concentric rings travelling outward from the centre
pub fn radial_rings(params: &WaveParams, t: f32, base_hue: f32, v: f32, viewport: Viewport) -> Vec<Ring> {
    let count = params.ring_base_count + (v * params.ring_extra_count).floor() as usize;
    let speed = 0.25 + 1.4 * v;
    let stroke_width = 6.0 + 26.0 * v;
    let alpha = 0.05 + 0.18 * v;
    let travel = viewport.diagonal() * params.ring_travel_frac;
    let center = viewport.center();

    (0..count)
        .map(|i| {
            let progress = (t * speed + i as f32 / count as f32).rem_euclid(1.0);
            Ring {
                center,
                radius: params.ring_min_radius + progress * travel,
                stroke_width,
                color: Hsla::new(
                    base_hue + i as f32 * params.ring_hue_step_deg,
                    100.0,
                    60.0 + progress * 25.0,
                    alpha,
                ),
            }
        })
        .collect()
}

/// Horizontal aurora bands stacked down the viewport
pub fn horizontal_bands(params: &WaveParams, t: f32, base_hue: f32, v: f32, viewport: Viewport) -> Vec<Band> {
    let count = params.horizontal_bands;
    let base_amplitude = 40.0 + 180.0 * v;
    let freq = 0.012 + 0.02 * v;
    let speed = 2.0 + 6.0 * v;
    let width = viewport.width as f32;
    let height = viewport.height as f32;

    (0..count)
        .map(|j| {
            let jf = j as f32;
            let phase = jf * 0.9;
            let baseline = height * (jf + 1.0) / (count as f32 + 1.0);
            let amplitude = base_amplitude * (0.6 + jf / 7.0);
            let points = sample_axis(params, width, |x| {
                Vec2::new(x, baseline + (x * freq + t * speed + phase).sin() * amplitude)
            });
            Band {
                points,
                stroke_width: 3.0 + 12.0 * v,
                color: Hsla::new(base_hue + 20.0 * jf + t * 15.0, 100.0, 60.0, 0.15 + 0.25 * v),
            }
        })
        .collect()
}

/// Vertical bands; hue drifts against time to decorrelate from the horizontal set
pub fn vertical_bands(params: &WaveParams, t: f32, base_hue: f32, v: f32, viewport: Viewport) -> Vec<Band> {
    let count = params.vertical_bands;
    let base_amplitude = 30.0 + 160.0 * v;
    let freq = 0.013 + 0.018 * v;
    let speed = (2.0 + 6.0 * v) * 0.85;
    let width = viewport.width as f32;
    let height = viewport.height as f32;

    (0..count)
        .map(|j| {
            let jf = j as f32;
            let phase = jf * 1.1;
            let baseline = width * (jf + 1.0) / (count as f32 + 1.0);
            let amplitude = base_amplitude * (0.65 + jf / 6.0);
            let points = sample_axis(params, height, |y| {
                Vec2::new(baseline + (y * freq + t * speed + phase).sin() * amplitude, y)
            });
            Band {
                points,
                stroke_width: 4.0 + 14.0 * v,
                color: Hsla::new(base_hue + 70.0 * jf - t * 12.0, 100.0, 62.0, 0.14 + 0.24 * v),
            }
        })
        .collect()
}

/// Sample `point(s)` from `-overscan` to `extent + overscan` every `band_step_px`
fn sample_axis<F>(params: &WaveParams, extent: f32, point: F) -> Vec<Vec2>
where
    F: Fn(f32) -> Vec2,
{
    let step = params.band_step_px.max(1.0);
    let start = -params.band_overscan_px;
    let end = extent + params.band_overscan_px;
    let samples = ((end - start) / step).floor() as usize + 1;
    (0..samples).map(|k| point(start + k as f32 * step)).collect()
}
