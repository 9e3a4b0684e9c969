use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A growable disc living at a fixed depth inside the tunnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub depth: f64,
    pub radius: f64,
    growing: bool,
}

impl Circle {
    /// Creates a disc that is still growing.
    pub fn new(center: DVec2, depth: f64, radius: f64) -> Self {
        Self {
            center,
            depth,
            radius,
            growing: true,
        }
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    /// Stops growth permanently.
    pub fn freeze(&mut self) {
        self.growing = false;
    }

    /// Increases the radius without any bounds or overlap checking.
    pub fn grow(&mut self, step: f64) {
        self.radius += step;
    }

    /// Returns `true` when the disc sticks out of the `width` x `height`
    /// rectangle anchored at the origin.
    pub fn has_left_bounds(&self, width: f64, height: f64) -> bool {
        let DVec2 { x, y } = self.center;
        self.radius > width - x || self.radius > x || self.radius > height - y || self.radius > y
    }

    /// Planar overlap test; depth is ignored.
    pub fn overlaps(&self, other: &Circle, tolerance: f64) -> bool {
        self.center.distance(other.center) - tolerance < self.radius + other.radius
    }

    /// Copy of this disc shifted `offset` units further back.
    pub fn shifted_back(&self, offset: f64) -> Self {
        Self {
            depth: self.depth - offset,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_is_unchecked() {
        let mut circle = Circle::new(DVec2::new(1.0, 1.0), 0.0, 1.0);
        for _ in 0..10 {
            circle.grow(0.5);
        }
        assert_eq!(circle.radius, 6.0);
        assert!(circle.is_growing());
    }

    #[test]
    fn detects_each_edge() {
        let inside = Circle::new(DVec2::new(50.0, 50.0), 0.0, 50.0);
        assert!(!inside.has_left_bounds(100.0, 100.0));

        for center in [
            DVec2::new(10.0, 50.0),
            DVec2::new(90.0, 50.0),
            DVec2::new(50.0, 10.0),
            DVec2::new(50.0, 90.0),
        ] {
            let circle = Circle::new(center, 0.0, 10.5);
            assert!(circle.has_left_bounds(100.0, 100.0), "{center:?}");
        }
    }

    #[test]
    fn overlap_honours_tolerance() {
        let a = Circle::new(DVec2::new(0.0, 0.0), 0.0, 5.0);
        let b = Circle::new(DVec2::new(10.5, 0.0), -40.0, 5.0);

        assert!(!a.overlaps(&b, 0.0));
        assert!(a.overlaps(&b, 1.0));
    }

    #[test]
    fn freeze_is_permanent() {
        let mut circle = Circle::new(DVec2::ZERO, 0.0, 1.0);
        circle.freeze();
        circle.grow(0.5);
        assert!(!circle.is_growing());
    }
}
