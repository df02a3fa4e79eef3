//! Rigid bodies sliding on the rink
//!
//! Every body carries the same translational state (position, velocity,
//! external force, mass, friction). Circular bodies additionally know their
//! radius and can collide with moving circular obstacles; that capability is
//! attached through [`BodyKind`] instead of a separate type.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::collision::{CircleObstacle, circle_obstacle_collision, circles_touch, touches_wall_line};
use super::forecast::Bounce;
use super::predict::Trajectory;
use super::vector::VecExt;
use crate::consts::COINCIDENT_BOUNCE;
use crate::settings::{BodySettings, SimConfig};

/// Circular capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub radius: f64,
    /// Still interpenetrating an obstacle from a previous frame
    #[serde(default)]
    pub overlapping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Point mass: walls only, via the forecast
    Point,
    Circle(CircleShape),
}

/// What happened during one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum StepOutcome {
    /// Ordinary step, full displacement applied
    Free = 0,
    /// The forecast wall collision was reached and applied
    WallBounce = 1,
    /// A circular obstacle was hit and the body pushed out of it
    ObstacleHit = 2,
}

impl StepOutcome {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Artificial external force (N)
    pub force: DVec2,
    pub mass: f64,
    /// Kinetic friction coefficient
    pub friction: f64,
    pub kind: BodyKind,
}

impl Body {
    pub fn point(pos: DVec2, mass: f64, friction: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            force: DVec2::ZERO,
            mass,
            friction,
            kind: BodyKind::Point,
        }
    }

    pub fn circle(pos: DVec2, mass: f64, friction: f64, radius: f64) -> Self {
        Self {
            kind: BodyKind::Circle(CircleShape {
                radius,
                overlapping: false,
            }),
            ..Self::point(pos, mass, friction)
        }
    }

    /// Circular body from settings; friction falls back to `config.friction_base`
    pub fn from_settings(settings: &BodySettings, config: &SimConfig) -> Self {
        let mut body = Self::circle(
            settings.position,
            settings.mass,
            settings.friction_or(config),
            settings.radius,
        );
        body.vel = settings.velocity;
        body
    }

    /// Radius for circular bodies, zero for points
    pub fn radius(&self) -> f64 {
        match self.kind {
            BodyKind::Point => 0.0,
            BodyKind::Circle(shape) => shape.radius,
        }
    }

    pub fn is_overlapping(&self) -> bool {
        matches!(self.kind, BodyKind::Circle(shape) if shape.overlapping)
    }

    pub fn as_obstacle(&self) -> Option<CircleObstacle> {
        match self.kind {
            BodyKind::Point => None,
            BodyKind::Circle(shape) => Some(CircleObstacle::new(self.pos, shape.radius)),
        }
    }

    /// Current motion as a predictor starting point
    pub fn trajectory(&self, config: &SimConfig) -> Trajectory {
        Trajectory {
            position: self.pos,
            velocity: self.vel,
            acceleration: self.compute_acceleration(config),
        }
    }

    /// External force plus kinetic friction against the direction of travel, over mass
    pub fn compute_acceleration(&self, config: &SimConfig) -> DVec2 {
        let friction = config.friction_force(self.friction, self.mass);
        let resultant = self.force - self.vel.unit() * friction;
        resultant / self.mass
    }

    /// Advance one step, bouncing at `target` if the step would cross it
    ///
    /// Returns true when the bounce was consumed.
    pub fn integrate(&mut self, dt: f64, config: &SimConfig, target: Option<Bounce>) -> bool {
        let step = self.advance_velocity(dt, config);
        self.apply_step(step, target)
    }

    /// Like [`Body::integrate`], but circular bodies first check `obstacles`
    ///
    /// Obstacle contacts take priority over the forecast bounce. The 180°
    /// reflection only fires on the first frame of a new overlap; the latch
    /// clears once no obstacle overlaps.
    pub fn integrate_with_obstacles(
        &mut self,
        dt: f64,
        config: &SimConfig,
        target: Option<Bounce>,
        obstacles: &[CircleObstacle],
    ) -> StepOutcome {
        let step = self.advance_velocity(dt, config);

        if let BodyKind::Circle(shape) = &mut self.kind {
            let next = self.pos + step;
            let hit = obstacles
                .iter()
                .map(|obstacle| circle_obstacle_collision(next, shape.radius, obstacle))
                .find(|result| result.hit);

            match hit {
                Some(result) => {
                    if !shape.overlapping {
                        self.vel.rotate_in_place(PI);
                    }
                    shape.overlapping = true;
                    self.pos = result.resolved(next);
                    return StepOutcome::ObstacleHit;
                }
                None => shape.overlapping = false,
            }
        }

        if self.apply_step(step, target) {
            StepOutcome::WallBounce
        } else {
            StepOutcome::Free
        }
    }

    /// Circles touching or overlapping (points count as radius zero)
    pub fn touches_circle(&self, other: &Body) -> bool {
        circles_touch(self.pos, self.radius(), other.pos, other.radius())
    }

    /// Center lying on a wall's line
    pub fn touches_segment(&self, wall: &Boundary) -> bool {
        touches_wall_line(self.pos, wall)
    }

    /// Update velocity for this step and return the tentative displacement
    fn advance_velocity(&mut self, dt: f64, config: &SimConfig) -> DVec2 {
        let accel = self.compute_acceleration(config);
        self.vel.x = friction_clamped(self.vel.x, accel.x, self.force.x, dt);
        self.vel.y = friction_clamped(self.vel.y, accel.y, self.force.y, dt);
        self.vel * dt
    }

    /// Carry the displacement since `from` through a further bounce it crossed
    ///
    /// After a bounce near a corner the folded excess can reach past the
    /// adjacent wall within the same step; this applies that next bounce too.
    pub fn carry_through(&mut self, from: DVec2, bounce: Bounce) -> bool {
        let next = self.pos;
        self.fold_at(from, next, bounce)
    }

    fn apply_step(&mut self, step: DVec2, target: Option<Bounce>) -> bool {
        let next = self.pos + step;
        match target {
            Some(bounce) if self.fold_at(self.pos, next, bounce) => true,
            _ => {
                self.pos = next;
                false
            }
        }
    }

    /// Reflect the part of `from -> next` beyond the bounce point, if crossed
    fn fold_at(&mut self, from: DVec2, next: DVec2, bounce: Bounce) -> bool {
        let p = bounce.point;
        // Target between the two positions on either axis
        let x_check = (next.x - p.x) * (from.x - p.x);
        let y_check = (next.y - p.y) * (from.y - p.y);
        // Starting on the target counts as crossing it (second wall of a corner)
        let at_target = (from - p).length() <= COINCIDENT_BOUNCE;
        if x_check < 0.0 || y_check < 0.0 || next == p || at_target {
            let excess = (next - p).rotated(bounce.angle);
            self.vel.rotate_in_place(bounce.angle);
            self.pos = p + excess;
            log::trace!("bounce reached at ({:.4}, {:.4})", p.x, p.y);
            return true;
        }
        false
    }
}

/// Friction stops a body; it never reverses one
#[inline]
fn friction_clamped(v: f64, a: f64, force: f64, dt: f64) -> f64 {
    let next = v + a * dt;
    if force == 0.0 && v * next < 0.0 { 0.0 } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn config() -> SimConfig {
        SimConfig {
            gravity: 10.0,
            friction_base: 0.0,
        }
    }

    #[test]
    fn test_acceleration_opposes_velocity() {
        let mut body = Body::point(DVec2::ZERO, 2.0, 0.5);
        body.vel = DVec2::new(3.0, 4.0);
        // friction force = 0.5 * 2 * 10 = 10 N, accel = 5 m/s² against (0.6, 0.8)
        let a = body.compute_acceleration(&config());
        assert!((a - DVec2::new(-3.0, -4.0)).length() < EPS);
    }

    #[test]
    fn test_acceleration_at_rest_is_force_only() {
        let mut body = Body::point(DVec2::ZERO, 2.0, 0.5);
        assert_eq!(body.compute_acceleration(&config()), DVec2::ZERO);
        body.force = DVec2::new(4.0, 0.0);
        assert_eq!(body.compute_acceleration(&config()), DVec2::new(2.0, 0.0));
    }

    #[test]
    fn test_friction_stops_without_reversing() {
        let mut body = Body::point(DVec2::ZERO, 1.0, 1.0);
        body.vel = DVec2::new(0.05, 0.0);
        // Decel 10 m/s² over 0.1 s would give -0.95
        body.integrate(0.1, &config(), None);
        assert_eq!(body.vel, DVec2::ZERO);

        body.vel = DVec2::new(-0.05, 0.0);
        body.integrate(0.1, &config(), None);
        assert_eq!(body.vel, DVec2::ZERO);
    }

    #[test]
    fn test_external_force_may_reverse() {
        let mut body = Body::point(DVec2::ZERO, 1.0, 0.0);
        body.vel = DVec2::new(0.5, 0.0);
        body.force = DVec2::new(-10.0, 0.0);
        body.integrate(0.1, &config(), None);
        assert!((body.vel.x + 0.5).abs() < EPS);
    }

    #[test]
    fn test_free_step_without_target() {
        let mut body = Body::point(DVec2::new(1.0, 1.0), 1.0, 0.0);
        body.vel = DVec2::new(2.0, -1.0);
        assert!(!body.integrate(0.5, &config(), None));
        assert!((body.pos - DVec2::new(2.0, 0.5)).length() < EPS);
    }

    #[test]
    fn test_target_clamping_with_rotated_excess() {
        // Heading straight down onto a floor at y = 0.1
        let mut body = Body::point(DVec2::new(1.0, 0.2), 1.0, 0.0);
        body.vel = DVec2::new(0.0, -1.0);
        let bounce = Bounce::new(DVec2::new(1.0, 0.1), PI);

        assert!(body.integrate(0.25, &config(), Some(bounce)));
        // Would have ended at y = -0.05: 0.15 past the target, folded back up
        assert!((body.pos - DVec2::new(1.0, 0.25)).length() < EPS);
        assert!((body.vel - DVec2::new(0.0, 1.0)).length() < EPS);
    }

    #[test]
    fn test_exact_landing_consumes_bounce() {
        let mut body = Body::point(DVec2::new(0.0, 0.0), 1.0, 0.0);
        body.vel = DVec2::new(1.0, 0.0);
        let bounce = Bounce::new(DVec2::new(0.5, 0.0), PI);
        assert!(body.integrate(0.5, &config(), Some(bounce)));
        assert_eq!(body.pos, DVec2::new(0.5, 0.0));
    }

    #[test]
    fn test_carry_through_corner() {
        // Floor bounce 0.05 short of the left wall at x = 0.1
        let mut body = Body::point(DVec2::new(0.25, 0.2), 1.0, 0.0);
        body.vel = DVec2::new(-1.0, -1.0);
        let floor = Bounce::new(DVec2::new(0.15, 0.1), 3.0 * PI / 2.0);
        let wall = Bounce::new(DVec2::new(0.1, 0.15), 3.0 * PI / 2.0);

        assert!(body.integrate(0.2, &config(), Some(floor)));
        // Folded excess (-0.1, 0.1) lands beyond the left wall
        assert!((body.pos - DVec2::new(0.05, 0.2)).length() < EPS);

        assert!(body.carry_through(floor.point, wall));
        assert!((body.pos - DVec2::new(0.15, 0.2)).length() < EPS);
        assert!((body.vel - DVec2::new(1.0, 1.0)).length() < EPS);
        assert!(!body.carry_through(wall.point, Bounce::new(DVec2::new(2.0, 2.0), PI)));
    }

    #[test]
    fn test_carry_through_coincident_corner_bounce() {
        // Second wall of a corner, one ulp from the first bounce point
        let corner = DVec2::new(2.9, 1.9);
        let second = Bounce::new(DVec2::new(2.9 + 4.0 * f64::EPSILON, 1.9), PI);
        // Neither axis test sees a crossing from here
        let mut body = Body::point(DVec2::new(2.85, 1.85), 1.0, 0.0);
        body.vel = DVec2::new(1.0, 1.0);

        assert!(body.carry_through(corner, second));
        assert!((body.vel - DVec2::new(-1.0, -1.0)).length() < EPS);
        assert!((body.pos - DVec2::new(2.95, 1.95)).length() < EPS);
    }

    #[test]
    fn test_target_not_reached() {
        let mut body = Body::point(DVec2::new(0.0, 0.0), 1.0, 0.0);
        body.vel = DVec2::new(1.0, 1.0);
        let bounce = Bounce::new(DVec2::new(2.0, 2.0), PI);
        assert!(!body.integrate(0.1, &config(), Some(bounce)));
        assert!((body.pos - DVec2::new(0.1, 0.1)).length() < EPS);
    }

    #[test]
    fn test_obstacle_hit_reflects_once() {
        let mut puck = Body::circle(DVec2::new(0.0, 0.0), 1.0, 0.0, 0.1);
        puck.vel = DVec2::new(1.0, 0.0);
        let obstacle = CircleObstacle::new(DVec2::new(0.35, 0.0), 0.2);

        // Next position 0.1 overlaps (distance 0.25 < 0.3)
        let outcome = puck.integrate_with_obstacles(0.1, &config(), None, &[obstacle]);
        assert_eq!(outcome, StepOutcome::ObstacleHit);
        assert_eq!(outcome.code(), 2);
        assert!(puck.is_overlapping());
        assert!((puck.vel - DVec2::new(-1.0, 0.0)).length() < EPS);
        assert!(((puck.pos - obstacle.center).length() - 0.3).abs() < EPS);

        // Push the obstacle into the puck again: latched, no second reflection
        let closer = CircleObstacle::new(puck.pos + DVec2::new(0.2, 0.0), 0.2);
        let outcome = puck.integrate_with_obstacles(0.01, &config(), None, &[closer]);
        assert_eq!(outcome, StepOutcome::ObstacleHit);
        assert!((puck.vel - DVec2::new(-1.0, 0.0)).length() < EPS);

        // Clear of everything: latch resets
        let outcome = puck.integrate_with_obstacles(0.01, &config(), None, &[obstacle]);
        assert_eq!(outcome, StepOutcome::Free);
        assert!(!puck.is_overlapping());
    }

    #[test]
    fn test_obstacle_takes_priority_over_wall() {
        let mut puck = Body::circle(DVec2::new(0.0, 0.0), 1.0, 0.0, 0.1);
        puck.vel = DVec2::new(1.0, 0.0);
        let obstacle = CircleObstacle::new(DVec2::new(0.35, 0.0), 0.2);
        let bounce = Bounce::new(DVec2::new(0.05, 0.0), PI);
        let outcome = puck.integrate_with_obstacles(0.1, &config(), Some(bounce), &[obstacle]);
        assert_eq!(outcome, StepOutcome::ObstacleHit);
    }

    #[test]
    fn test_wall_bounce_outcome() {
        let mut puck = Body::circle(DVec2::new(1.0, 0.2), 1.0, 0.0, 0.1);
        puck.vel = DVec2::new(0.0, -1.0);
        let bounce = Bounce::new(DVec2::new(1.0, 0.1), PI);
        let outcome = puck.integrate_with_obstacles(0.25, &config(), Some(bounce), &[]);
        assert_eq!(outcome, StepOutcome::WallBounce);
        assert_eq!(outcome.code(), 1);
    }

    #[test]
    fn test_point_bodies_ignore_obstacles() {
        let mut body = Body::point(DVec2::ZERO, 1.0, 0.0);
        body.vel = DVec2::new(1.0, 0.0);
        let obstacle = CircleObstacle::new(DVec2::new(0.1, 0.0), 0.2);
        let outcome = body.integrate_with_obstacles(0.1, &config(), None, &[obstacle]);
        assert_eq!(outcome, StepOutcome::Free);
        assert!(body.as_obstacle().is_none());
    }

    #[test]
    fn test_touch_predicates() {
        let a = Body::circle(DVec2::new(0.0, 0.0), 1.0, 0.0, 0.1);
        let b = Body::circle(DVec2::new(0.25, 0.0), 1.0, 0.0, 0.2);
        assert!(a.touches_circle(&b));

        let wall = Boundary::new(DVec2::new(2.9, 0.1), DVec2::new(0.1, 0.1));
        let resting = Body::circle(DVec2::new(1.0, 0.1), 1.0, 0.0, 0.1);
        assert!(resting.touches_segment(&wall));
        assert!(!a.touches_segment(&wall));
    }

    #[test]
    fn test_from_settings_uses_friction_base() {
        let cfg = SimConfig {
            gravity: 10.0,
            friction_base: 0.3,
        };
        let settings = BodySettings {
            friction: None,
            ..BodySettings::puck()
        };
        let body = Body::from_settings(&settings, &cfg);
        assert_eq!(body.friction, 0.3);
        assert_eq!(body.radius(), settings.radius);
        assert_eq!(body.vel, settings.velocity);
    }
}
