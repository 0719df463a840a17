//! Frame compositor: trail fade plus every visual layer, in order.
//!
//! Draw order is waves → orb (with glow) → inner core → particles →
//! frequency spokes → bursts. The trail fill is source-over; every layer
//! after it is additive (`BlendMode::Plus`, canvas "lighter"), so later
//! layers dominate at beat moments.

use std::f32::consts::TAU;

use glam::Vec2;
use tiny_skia::BlendMode;

use crate::audio::AudioFrame;
use crate::bursts::BurstField;
use crate::color::{Hsla, Rgba};
use crate::features::Features;
use crate::orb::Orb;
use crate::params::{audio_constants::MAX_MAGNITUDE, CompositorParams, WaveParams};
use crate::particles::ParticleSystem;
use crate::surface::{Gradient, Surface};
use crate::viewport::Viewport;
use crate::waves::wave_field;

const LAYER_BLEND: BlendMode = BlendMode::Plus;

/// Clamp a raw frame interval (seconds) to the simulation step actually used
pub fn clamp_dt(params: &CompositorParams, raw_dt: f64) -> f32 {
    if !raw_dt.is_finite() || raw_dt <= 0.0 {
        return 0.0;
    }
    (raw_dt as f32).min(params.max_dt_s)
}

/// Opacity of the black trail fill for smoothed volume `v`
///
/// Louder audio fades slower, so bright shapes persist longer.
pub fn trail_alpha(params: &CompositorParams, v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    (params.trail_fade_start - params.trail_fade_slope * v)
        .max(params.trail_fade_floor)
        .min(1.0)
}

/// One radial frequency bar
#[derive(Clone, Debug, PartialEq)]
pub struct Spoke {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: Hsla,
}

/// Frequency spokes around the orb, one per sampled bin
pub fn spokes(params: &CompositorParams, orb: &Orb, frame: &AudioFrame, v: f32) -> Vec<Spoke> {
    let bins = frame.bins();
    let count = params.spoke_count;
    if bins.is_empty() || count == 0 {
        return Vec::new();
    }
    let step = bins.len() / count;
    let angle_step = TAU / count as f32;
    let start = orb.current_radius + params.spoke_offset_px;

    (0..count)
        .map(|i| {
            let magnitude = bins.get(i * step).copied().unwrap_or(0) as f32;
            let amp = (magnitude / MAX_MAGNITUDE * 3.0).min(1.0);
            let length = amp * params.spoke_length_px * (0.8 + v * 0.5);
            let direction = Vec2::from_angle(i as f32 * angle_step);
            Spoke {
                from: orb.position + direction * start,
                to: orb.position + direction * (start + length),
                width: 3.0 + amp * 3.0,
                color: Hsla::new(orb.hue + i as f32 * 3.0, 100.0, 55.0 + amp * 35.0, 0.3 + amp * 0.6),
            }
        })
        .collect()
}

/// Read-only view of everything drawn this tick
pub struct SceneLayers<'a> {
    /// Seconds since session start
    pub t: f32,
    pub viewport: Viewport,
    pub features: &'a Features,
    pub orb: &'a Orb,
    pub particles: &'a ParticleSystem,
    pub bursts: &'a BurstField,
    /// Live audio frame; spokes are only drawn when present
    pub frame: Option<&'a AudioFrame>,
    pub waves: &'a WaveParams,
}

pub struct Compositor {
    params: CompositorParams,
}

impl Compositor {
    pub fn new(params: CompositorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompositorParams {
        &self.params
    }

    /// Composite one frame onto `surface`
    pub fn draw(&self, surface: &mut Surface, scene: &SceneLayers<'_>) {
        if surface.pixmap().is_none() {
            return;
        }
        let v = scene.features.smoothed_volume.clamp(0.0, 1.0);

        let fade = trail_alpha(&self.params, v);
        surface.fill(Rgba::new(0.0, 0.0, 0.0, fade), BlendMode::SourceOver);

        self.draw_waves(surface, scene, v);
        self.draw_orb(surface, scene.orb, v);
        self.draw_particles(surface, scene);

        if let Some(frame) = scene.frame.filter(|f| !f.is_empty()) {
            for spoke in spokes(&self.params, scene.orb, frame, v) {
                surface.stroke_line(spoke.from, spoke.to, spoke.width, spoke.color.into(), LAYER_BLEND);
            }
        }

        self.draw_bursts(surface, scene);
    }

    fn draw_waves(&self, surface: &mut Surface, scene: &SceneLayers<'_>, v: f32) {
        let layers = wave_field(scene.waves, scene.t, scene.orb.hue, v, scene.viewport);
        for ring in &layers.rings {
            surface.stroke_circle(ring.center, ring.radius, ring.stroke_width, ring.color.into(), LAYER_BLEND);
        }
        for band in layers.horizontal.iter().chain(&layers.vertical) {
            surface.stroke_polyline(&band.points, band.stroke_width, band.color.into(), LAYER_BLEND);
        }
    }

    fn draw_orb(&self, surface: &mut Surface, orb: &Orb, v: f32) {
        let h = orb.hue;
        let r = orb.current_radius;

        let glow = Hsla::new(h, 100.0, 75.0, 0.5 + v * 0.4);
        surface.fill_halo(orb.position, r, 30.0 + v * 40.0, glow.into(), LAYER_BLEND);

        let body = Gradient::new()
            .stop(0.0, Hsla::new(h, 100.0, 90.0, 1.0))
            .stop(0.5, Hsla::new(h, 95.0, 62.0, 0.95))
            .stop(1.0, Hsla::new(h, 90.0, 35.0, 0.2));
        surface.fill_radial(orb.position, r, &body, r, LAYER_BLEND);

        let core = Gradient::new()
            .stop(0.0, Hsla::new(h, 100.0, 96.0, 1.0))
            .stop(1.0, Hsla::new(h, 100.0, 80.0, 0.35));
        surface.fill_radial(orb.position, r * (0.28 + v * 0.07), &core, r * 0.33, LAYER_BLEND);
    }

    fn draw_particles(&self, surface: &mut Surface, scene: &SceneLayers<'_>) {
        let h = scene.orb.hue;
        let glow_px = scene.particles.glow_px();
        for particle in scene.particles.iter() {
            let a = particle.alpha();
            let radius = particle.radius();
            surface.fill_halo(particle.position, radius, glow_px, Hsla::new(h, 100.0, 80.0, a).into(), LAYER_BLEND);
            let fill = Gradient::new().stop(0.0, Hsla::new(h, 98.0, 85.0, a));
            surface.fill_radial(particle.position, radius, &fill, radius, LAYER_BLEND);
        }
    }

    fn draw_bursts(&self, surface: &mut Surface, scene: &SceneLayers<'_>) {
        let mix = scene.bursts.orb_hue_mix();
        for burst in scene.bursts.iter() {
            let radius = burst.radius();
            let gradient = burst.gradient(scene.orb.hue, mix);
            surface.fill_radial(burst.position, radius, &gradient, radius, LAYER_BLEND);
        }
    }
}
