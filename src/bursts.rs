//! Radial colour blooms spawned on detected beats.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::color::{wrap_hue, Hsla};
use crate::params::BurstParams;
use crate::surface::Gradient;
use crate::viewport::Viewport;

/// Fast start, decelerating finish; maps [0, 1] onto [0, 1]
pub fn ease_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub position: Vec2,
    /// Degrees in [0, 360)
    pub hue: f32,
    /// Seconds elapsed
    pub life: f32,
    /// Seconds until fully expanded
    pub max_life: f32,
    /// Pixels at full expansion
    pub max_radius: f32,
}

impl Burst {
    /// Expansion progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 1.0;
        }
        (self.life / self.max_life).min(1.0)
    }

    pub fn radius(&self) -> f32 {
        ease_out_cubic(self.progress()) * self.max_radius
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Four-stop bloom, brightest at the centre and clear at the rim
    pub fn gradient(&self, orb_hue: f32, orb_hue_mix: f32) -> Gradient {
        let p = self.progress();
        let h0 = wrap_hue(self.hue + orb_hue * orb_hue_mix);
        Gradient::new()
            .stop(0.0, Hsla::new(h0, 100.0, 92.0, 0.95 * (1.0 - p / 2.0)))
            .stop(0.25, Hsla::new(h0 + 20.0, 100.0, 70.0, 0.7 * (1.0 - p)))
            .stop(0.6, Hsla::new(h0 + 60.0, 100.0, 55.0, 0.28 * (1.0 - p)))
            .stop(1.0, Hsla::new(h0 + 90.0, 100.0, 50.0, 0.0))
    }
}

/// Bounded FIFO pool of bursts
pub struct BurstField {
    bursts: VecDeque<Burst>,
    params: BurstParams,
}

impl BurstField {
    pub fn new(params: BurstParams) -> Self {
        Self {
            bursts: VecDeque::with_capacity(params.capacity),
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Burst> {
        self.bursts.iter()
    }

    pub fn orb_hue_mix(&self) -> f32 {
        self.params.orb_hue_mix
    }

    /// Scatter `count` bursts around the viewport centre
    pub fn spawn<R: Rng>(&mut self, count: usize, viewport: Viewport, base_hue: f32, rng: &mut R) {
        let p = self.params.clone();
        let center = viewport.center();
        let shorter = viewport.shorter_side();
        let min_distance = shorter * p.min_distance_frac;
        let max_distance = shorter * p.max_distance_frac;
        let diagonal = viewport.diagonal();

        for i in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let distance = min_distance + rng.gen::<f32>() * (max_distance - min_distance);
            let jitter = (rng.gen::<f32>() * 2.0 - 1.0) * p.hue_jitter_deg;
            let hue = wrap_hue(base_hue + jitter + i as f32 * p.hue_stagger_deg);

            let burst = Burst {
                position: center + Vec2::from_angle(angle) * distance,
                hue,
                life: 0.0,
                max_life: p.life_min_s + rng.gen::<f32>() * p.life_spread_s,
                max_radius: diagonal * (p.radius_min_frac + rng.gen::<f32>() * p.radius_spread_frac),
            };
            self.push(burst);
        }
    }

    /// Add one burst, evicting the oldest when the pool is full
    pub fn push(&mut self, burst: Burst) {
        if self.params.capacity == 0 {
            return;
        }
        if self.bursts.len() >= self.params.capacity {
            self.bursts.pop_front();
        }
        self.bursts.push_back(burst);
    }

    /// Age every burst by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        for burst in &mut self.bursts {
            burst.life += dt.max(0.0);
        }
    }

    /// Drop fully expanded bursts (after they have been drawn at p = 1)
    pub fn retire_finished(&mut self) {
        self.bursts.retain(|b| !b.is_finished());
    }
}
