//! Contact detection between circular bodies and walls
//!
//! Walls are handled analytically by the forecast; this module covers the
//! per-frame checks that can't be predicted ahead of time (a moving paddle)
//! and the simple touch predicates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::vector::VecExt;
use crate::consts::CONTACT_TOLERANCE;

/// A moving circle that other bodies bounce off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleObstacle {
    pub center: DVec2,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal from the obstacle center toward the body
    pub normal: DVec2,
    /// Overlap depth along the normal
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Position that exactly removes the overlap
    #[inline]
    pub fn resolved(&self, pos: DVec2) -> DVec2 {
        pos + self.normal * self.penetration
    }
}

/// Check a circle at `pos` against an obstacle
///
/// Only a live overlap counts: the center distance must be strictly between
/// zero and the sum of radii. Coincident centers have no usable direction
/// and are reported as a miss.
pub fn circle_obstacle_collision(pos: DVec2, radius: f64, obstacle: &CircleObstacle) -> CollisionResult {
    let offset = pos - obstacle.center;
    let dist = offset.length();
    let reach = radius + obstacle.radius;

    if dist > 0.0 && dist < reach {
        let normal = offset.unit();
        return CollisionResult {
            hit: true,
            normal,
            penetration: reach - dist,
        };
    }

    CollisionResult::miss()
}

/// Two circles touching or overlapping
#[inline]
pub fn circles_touch(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    (a - b).length() <= ra + rb
}

/// Circle center lying on a wall's line (within `CONTACT_TOLERANCE`)
#[inline]
pub fn touches_wall_line(pos: DVec2, wall: &Boundary) -> bool {
    wall.distance_to_line(pos) <= CONTACT_TOLERANCE
}
