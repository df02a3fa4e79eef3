//! Analytic multi-bounce trajectory prediction
//!
//! Walks a body's path under constant acceleration against a fixed set of
//! walls. Each iteration:
//! 1. Builds the trajectory line from the current position and velocity.
//! 2. Picks the nearest wall the body is heading toward (velocity against the
//!    wall normal) whose line the trajectory crosses.
//! 3. Measures the incidence angle against the wall direction.
//! 4. Solves the per-axis kinematic quadratic for the time to get there.
//! 5. Either stops (the body comes to rest first, or the depth is used up) or
//!    advances velocity, rotates velocity and acceleration by twice the
//!    incidence angle, and records the bounce.
//!
//! A batch that stops on depth can be resumed from [`ForecastBatch::end`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::forecast::Bounce;
use super::quadratic::time_to_cover;
use super::vector::VecExt;
use crate::consts::{COINCIDENT_BOUNCE, MAX_UNBOUNDED_BOUNCES};

/// Motion snapshot the predictor starts from (and hands back to resume)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
}

/// How many bounces one predictor call may compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    /// Until the body comes to rest (capped at `MAX_UNBOUNDED_BOUNCES`)
    Unbounded,
    Bounces(usize),
}

impl Depth {
    fn limit(self) -> usize {
        match self {
            Depth::Unbounded => MAX_UNBOUNDED_BOUNCES,
            Depth::Bounces(n) => n,
        }
    }
}

/// Output of one predictor call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastBatch {
    pub bounces: Vec<Bounce>,
    /// Where the body stops, once it can no longer reach a wall
    pub rest_point: Option<DVec2>,
    /// Prediction ended because the body comes to rest, not because of depth
    pub terminated: bool,
    /// State after the last bounce; resume point for the next call
    pub end: Trajectory,
}

impl ForecastBatch {
    /// Collision points in order, followed by the rest point if any
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.bounces.iter().map(|b| b.point).chain(self.rest_point)
    }
}

/// The wall a trajectory strikes next
#[derive(Debug, Clone, Copy)]
struct WallHit {
    index: usize,
    point: DVec2,
    /// Angle between travel direction and wall direction
    incidence: f64,
}

/// Predict up to `depth` bounces of `start` inside `walls`
///
/// Walls must be wound so their `(ka, kb)` normals point toward the region
/// the body moves in (see `Rink`).
pub fn predict(walls: &[Boundary], start: Trajectory, depth: Depth) -> ForecastBatch {
    let limit = depth.limit();
    let mut state = start;
    let mut batch = ForecastBatch::default();
    let mut path = Boundary::through(state.position, state.velocity);

    while batch.bounces.len() < limit {
        path.set_endpoints(state.position, state.position + state.velocity);
        path.recompute_coefficients();

        let Some(hit) = next_wall_hit(walls, &path, state.position, state.velocity) else {
            // At rest, or nothing ahead
            batch.rest_point = Some(state.position);
            batch.terminated = true;
            break;
        };

        // A hit at, behind or coincident with the body (the second wall of a
        // corner) bounces immediately. Only a hit with no usable root is out of reach.
        let gap = hit.point - state.position;
        let t = if gap.length() <= COINCIDENT_BOUNCE || gap.dot(state.velocity) <= 0.0 {
            Some(0.0)
        } else {
            time_to_reach(&state, hit.point)
        };
        let Some(t) = t else {
            let (rest, t_stop) = rest_point_toward(&state, hit.point);
            log::debug!(
                "forecast exhausted after {} bounces, rest at ({:.3}, {:.3})",
                batch.bounces.len(),
                rest.x,
                rest.y
            );
            state.velocity += state.acceleration * t_stop;
            state.position = rest;
            batch.rest_point = Some(rest);
            batch.terminated = true;
            break;
        };

        let angle = 2.0 * hit.incidence;
        state.velocity += state.acceleration * t;
        state.velocity.rotate_in_place(angle);
        state.acceleration.rotate_in_place(angle);
        state.position = hit.point;
        batch.bounces.push(Bounce::new(hit.point, angle));

        log::debug!(
            "bounce {} off wall {}: ({:.3}, {:.3}) t={:.4} angle={:.4}",
            batch.bounces.len(),
            hit.index,
            hit.point.x,
            hit.point.y,
            t,
            angle
        );
    }

    batch.end = state;
    batch
}

/// Nearest wall the body is moving toward, along the trajectory line
fn next_wall_hit(walls: &[Boundary], path: &Boundary, pos: DVec2, vel: DVec2) -> Option<WallHit> {
    let mut best: Option<(f64, WallHit)> = None;

    for (index, wall) in walls.iter().enumerate() {
        if vel.dot(wall.normal()) >= 0.0 {
            continue;
        }
        let Some(point) = wall.intersect(path) else {
            continue;
        };
        let dist = (point - pos).length();
        if best.is_some_and(|(closest, _)| dist >= closest) {
            continue;
        }
        // Rounding can push the cosine a hair outside [-1, 1]
        let cos = vel.unit().dot(wall.direction().unit()).clamp(-1.0, 1.0);
        best = Some((
            dist,
            WallHit {
                index,
                point,
                incidence: cos.acos(),
            },
        ));
    }

    best.map(|(_, hit)| hit)
}

/// Axis whose motion decides timing: x if it accelerates, else y
#[inline]
fn accelerating_axis(accel: DVec2) -> Option<usize> {
    if accel.x != 0.0 {
        Some(0)
    } else if accel.y != 0.0 {
        Some(1)
    } else {
        None
    }
}

/// Time until `state` reaches `point`, if it can
fn time_to_reach(state: &Trajectory, point: DVec2) -> Option<f64> {
    let delta = point - state.position;
    match accelerating_axis(state.acceleration) {
        Some(axis) => time_to_cover(state.acceleration[axis], state.velocity[axis], delta[axis]),
        None => {
            // Uniform motion reaches every wall it faces
            let axis = if state.velocity.x != 0.0 { 0 } else { 1 };
            let v = state.velocity[axis];
            if v == 0.0 {
                return Some(0.0);
            }
            Some((delta[axis] / v).max(0.0))
        }
    }
}

/// Where the body stops while heading toward an unreachable `point`
///
/// Stopping distance on the accelerating axis, projected proportionally along
/// the line to `point`. Returns the rest position and the time to stop.
fn rest_point_toward(state: &Trajectory, point: DVec2) -> (DVec2, f64) {
    let Some(axis) = accelerating_axis(state.acceleration) else {
        panic!("rest point requested for a trajectory with zero acceleration");
    };

    let v = state.velocity[axis];
    let a = state.acceleration[axis];
    // v + a·t = 0
    let t_stop = v / -a;
    let reach = v * t_stop / 2.0;

    let delta = point - state.position;
    if delta[axis] == 0.0 {
        return (state.position, t_stop);
    }
    // Never past the wall, whatever the size of delta
    let fraction = (reach / delta[axis]).clamp(0.0, 1.0);
    (state.position + delta * fraction, t_stop)
}
