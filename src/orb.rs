//! Central orb: a first-order follower easing radius and hue toward
//! feature-driven targets.

use glam::Vec2;

use crate::color::wrap_hue;
use crate::features::Features;
use crate::params::{HuePath, OrbParams};
use crate::viewport::Viewport;

#[derive(Clone, Debug)]
pub struct Orb {
    pub position: Vec2,
    pub base_radius: f32,
    pub current_radius: f32,
    pub target_radius: f32,
    /// Degrees in [0, 360)
    pub hue: f32,
    pub target_hue: f32,
    params: OrbParams,
}

impl Orb {
    pub fn new(params: OrbParams) -> Self {
        let hue = wrap_hue(params.initial_hue);
        Self {
            position: Vec2::ZERO,
            base_radius: params.base_radius,
            current_radius: params.base_radius,
            target_radius: params.base_radius,
            hue,
            target_hue: hue,
            params,
        }
    }

    /// Retarget from features, step one tick toward the targets and
    /// recentre on the viewport
    pub fn update(&mut self, features: &Features, viewport: Viewport) {
        let easing = self.params.easing;

        self.target_radius = self.base_radius + features.smoothed_volume * self.params.volume_radius;
        self.target_hue = wrap_hue(features.dominant_frequency_ratio * 360.0);

        self.current_radius += (self.target_radius - self.current_radius) * easing;

        let delta = match self.params.hue_path {
            HuePath::Linear => self.target_hue - self.hue,
            HuePath::Shortest => shortest_arc(self.hue, self.target_hue),
        };
        self.hue = wrap_hue(self.hue + delta * easing);

        self.position = viewport.center();
    }
}

/// Signed angular distance from `from` to `to` in (-180, 180]
fn shortest_arc(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(smoothed: f32, dominant: f32) -> Features {
        Features {
            smoothed_volume: smoothed,
            dominant_frequency_ratio: dominant,
            ..Features::default()
        }
    }

    #[test]
    fn test_silence_keeps_base_radius_and_centres() {
        let mut orb = Orb::new(OrbParams::default());
        orb.update(&features(0.0, 0.0), Viewport::new(800, 600));
        assert_eq!(orb.position, Vec2::new(400.0, 300.0));
        assert_eq!(orb.target_radius, 100.0);
        assert_eq!(orb.current_radius, 100.0);
    }

    #[test]
    fn test_radius_moves_ten_percent_per_tick() {
        let mut orb = Orb::new(OrbParams::default());
        orb.update(&features(1.0, 0.0), Viewport::new(800, 600));
        assert!((orb.target_radius - 240.0).abs() < 1e-4);
        assert!((orb.current_radius - 114.0).abs() < 1e-4);
    }

    #[test]
    fn test_never_overshoots() {
        let mut orb = Orb::new(OrbParams::default());
        for _ in 0..500 {
            orb.update(&features(1.0, 0.5), Viewport::new(100, 100));
            assert!(orb.current_radius <= orb.target_radius + 1e-3);
            assert!(orb.hue <= 200.0 + 1e-3 && orb.hue >= 180.0 - 1e-3);
        }
        assert!((orb.hue - 180.0).abs() < 1e-2);
    }

    #[test]
    fn test_linear_hue_takes_long_way_across_seam() {
        let params = OrbParams {
            initial_hue: 350.0,
            ..OrbParams::default()
        };
        let mut orb = Orb::new(params);
        // target hue 18 degrees
        orb.update(&features(0.0, 0.05), Viewport::new(100, 100));
        assert!((orb.hue - (350.0 - 33.2)).abs() < 1e-3);
    }

    #[test]
    fn test_shortest_hue_crosses_seam() {
        let params = OrbParams {
            initial_hue: 350.0,
            hue_path: HuePath::Shortest,
            ..OrbParams::default()
        };
        let mut orb = Orb::new(params);
        orb.update(&features(0.0, 0.05), Viewport::new(100, 100));
        assert!((orb.hue - 352.8).abs() < 1e-3);
    }

    #[test]
    fn test_shortest_arc() {
        assert_eq!(shortest_arc(350.0, 10.0), 20.0);
        assert_eq!(shortest_arc(10.0, 350.0), -20.0);
        assert_eq!(shortest_arc(0.0, 180.0), 180.0);
    }
}
