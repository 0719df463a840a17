//! Current drawable size, supplied by the host every tick.

use glam::Vec2;

/// Pixel dimensions of the scene surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn diagonal(&self) -> f32 {
        (self.width as f32).hypot(self.height as f32)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.center(), Vec2::new(400.0, 300.0));
        assert!((viewport.diagonal() - 1000.0).abs() < 1e-3);
        assert_eq!(viewport.shorter_side(), 600.0);
        assert!(!viewport.is_empty());
        assert!(Viewport::new(0, 600).is_empty());
    }
}
