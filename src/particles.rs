//! Kinetic particles shed from the orb rim while audio is present.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::orb::Orb;
use crate::params::ParticleParams;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Pixels per tick
    pub velocity: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    /// Linear fade from 1 at birth to 0 at death
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    /// Drawn radius
    pub fn radius(&self) -> f32 {
        self.size * self.alpha()
    }
}

/// Bounded FIFO pool of particles
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    params: ParticleParams,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams) -> Self {
        Self {
            particles: VecDeque::with_capacity(params.capacity),
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Emit `floor(intensity * emit_scale)` particles from the orb rim when
    /// `intensity` exceeds the threshold. Returns how many were emitted.
    pub fn emit<R: Rng>(&mut self, orb: &Orb, intensity: f32, rng: &mut R) -> usize {
        if intensity <= self.params.emit_threshold {
            return 0;
        }
        let count = (intensity * self.params.emit_scale).floor().max(0.0) as usize;
        for _ in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let speed = self.params.speed_min + rng.gen::<f32>() * self.params.speed_spread;
            let direction = Vec2::from_angle(angle);
            self.particles.push_back(Particle {
                position: orb.position + direction * orb.current_radius,
                velocity: direction * speed,
                life: self.params.life_ticks,
                max_life: self.params.life_ticks,
                size: self.params.size_min + rng.gen::<f32>() * self.params.size_spread,
            });
        }
        self.enforce_capacity();
        count
    }

    /// Advance every particle one tick and drop the ones that expired
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn glow_px(&self) -> f32 {
        self.params.glow_px
    }

    fn enforce_capacity(&mut self) {
        let excess = self.particles.len().saturating_sub(self.params.capacity);
        self.particles.drain(..excess);
    }
}
