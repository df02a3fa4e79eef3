//! 2D vector helpers on top of `glam::DVec2`
//!
//! glam already provides `length` and `dot`. The simulation additionally needs
//! rotation by an angle (bounces are expressed as rotations, not reflections)
//! and a normalization that leaves the zero vector alone.

use glam::DVec2;

pub trait VecExt: Sized {
    /// Rotate counter-clockwise by `angle` radians
    fn rotated(self, angle: f64) -> Self;

    /// Rotate in place
    fn rotate_in_place(&mut self, angle: f64);

    /// Unit vector in the same direction, or zero for the zero vector
    fn unit(self) -> Self;

    /// Normalize in place; no-op for the zero vector
    fn normalize_in_place(&mut self);
}

impl VecExt for DVec2 {
    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn rotate_in_place(&mut self, angle: f64) {
        *self = self.rotated(angle);
    }

    #[inline]
    fn unit(self) -> Self {
        let len = self.length();
        if len != 0.0 { self / len } else { self }
    }

    #[inline]
    fn normalize_in_place(&mut self) {
        *self = self.unit();
    }
}
