//! Straight wall segments as implicit lines
//!
//! A boundary is defined by its endpoints `(x1, y1)-(x2, y2)` and the derived
//! coefficients of `ka·x + kb·y + kc = 0`:
//! - ka = y2 - y1
//! - kb = x1 - x2
//! - kc = y1·x2 - x1·y2
//!
//! Coefficients go stale whenever an endpoint moves and must be recomputed
//! before the next intersection test.
//!
//! Winding: rink walls must be listed clockwise (y-up), which makes `(ka, kb)`
//! point into the rink and `start - end` the direction that the bounce
//! rotation in `predict` expects.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vector::VecExt;

/// A wall segment (or trajectory line) in implicit form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    start: DVec2,
    end: DVec2,
    ka: f64,
    kb: f64,
    kc: f64,
    #[serde(skip)]
    stale: bool,
}

impl Boundary {
    /// Create a boundary with coefficients already computed
    pub fn new(start: DVec2, end: DVec2) -> Self {
        let mut boundary = Self {
            start,
            end,
            ka: 0.0,
            kb: 0.0,
            kc: 0.0,
            stale: true,
        };
        boundary.recompute_coefficients();
        boundary
    }

    /// Line through `origin` heading along `direction`
    pub fn through(origin: DVec2, direction: DVec2) -> Self {
        Self::new(origin, origin + direction)
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DVec2 {
        self.end
    }

    /// `(ka, kb, kc)` as last recomputed
    #[inline]
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.ka, self.kb, self.kc)
    }

    /// Move the endpoints. Coefficients are stale until `recompute_coefficients`.
    pub fn set_endpoints(&mut self, start: DVec2, end: DVec2) {
        self.start = start;
        self.end = end;
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn recompute_coefficients(&mut self) {
        self.ka = self.end.y - self.start.y;
        self.kb = self.start.x - self.end.x;
        self.kc = self.start.y * self.end.x - self.start.x * self.end.y;
        self.stale = false;
    }

    /// Unit normal `(ka, kb)`. For clockwise rink walls this points into the rink.
    pub fn normal(&self) -> DVec2 {
        DVec2::new(self.ka, self.kb).unit()
    }

    /// Wall direction used for incidence angles (`start - end`)
    pub fn direction(&self) -> DVec2 {
        self.start - self.end
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Intersection of the two infinite lines
    ///
    /// Returns `None` when the determinant is exactly zero (parallel or
    /// coincident lines). No tolerance is applied.
    pub fn intersect(&self, other: &Boundary) -> Option<DVec2> {
        debug_assert!(
            !self.stale && !other.stale,
            "boundary coefficients used before recompute_coefficients"
        );

        let det = self.kb * other.ka - self.ka * other.kb;
        if det == 0.0 {
            return None;
        }

        let x = (self.kc * other.kb - self.kb * other.kc) / det;
        let y = if self.kb != 0.0 {
            -(self.ka * x + self.kc) / self.kb
        } else {
            // Vertical self: recover y from the other line
            -(other.ka * x + other.kc) / other.kb
        };
        Some(DVec2::new(x, y))
    }

    /// Perpendicular distance from `point` to the infinite line
    pub fn distance_to_line(&self, point: DVec2) -> f64 {
        let norm = DVec2::new(self.ka, self.kb).length();
        if norm == 0.0 {
            // Degenerate segment
            return (point - self.start).length();
        }
        (self.ka * point.x + self.kb * point.y + self.kc).abs() / norm
    }
}
