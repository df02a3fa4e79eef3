//! Frame step
//!
//! Advances the simulation by one frame: control nudges, forecast
//! replenishment, paddle motion, then puck motion against the next forecast
//! bounce and the paddle. Replenishment always runs before integration so the
//! puck never steps without its next wall target.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::StepOutcome;
use super::forecast::Bounce;
use super::predict::{Depth, predict};
use super::state::SimState;

/// Input commands for a single frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Paddle velocity steps along x (+ right, - left)
    pub nudge_x: i32,
    /// Paddle velocity steps along y (+ up, - down)
    pub nudge_y: i32,
    /// Flip the trajectory overlay
    pub toggle_forecast: bool,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut SimState, input: &TickInput, dt: f64) -> StepOutcome {
    if input.toggle_forecast {
        state.show_forecast = !state.show_forecast;
    }
    if input.nudge_x != 0 || input.nudge_y != 0 {
        let nudge = DVec2::new(input.nudge_x as f64, input.nudge_y as f64);
        state.paddle.vel += nudge * state.settings.nudge_speed;
    }

    state.replenish_forecast();

    let config = state.settings.sim;
    state.paddle.integrate(dt, &config, None);

    let target = next_target(state);

    let obstacles: Vec<_> = state.paddle.as_obstacle().into_iter().collect();
    let was_overlapping = state.puck.is_overlapping();
    let outcome = state
        .puck
        .integrate_with_obstacles(dt, &config, target, &obstacles);

    match outcome {
        StepOutcome::WallBounce => {
            let mut reached = state.forecast.consume();
            while let Some(bounce) = reached {
                state.wall_bounces += 1;
                log::debug!(
                    "tick {}: wall bounce #{} at ({:.3}, {:.3})",
                    state.time_ticks,
                    state.wall_bounces,
                    bounce.point.x,
                    bounce.point.y
                );
                // Near a corner one step can cross two walls
                reached = match next_target(state) {
                    Some(next) if state.puck.carry_through(bounce.point, next) => {
                        state.forecast.consume()
                    }
                    _ => None,
                };
            }
        }
        StepOutcome::ObstacleHit => {
            // Paddle hands its momentum over and stops
            state.puck.vel += state.paddle.vel;
            state.paddle.vel = DVec2::ZERO;
            state.invalidate_forecast();
            if !was_overlapping {
                state.paddle_hits += 1;
                log::info!(
                    "tick {}: paddle hit, puck velocity ({:.3}, {:.3})",
                    state.time_ticks,
                    state.puck.vel.x,
                    state.puck.vel.y
                );
            }
        }
        StepOutcome::Free => {
            log::trace!(
                "tick {}: puck at ({:.3}, {:.3})",
                state.time_ticks,
                state.puck.pos.x,
                state.puck.pos.y
            );
        }
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    outcome
}

/// Front of the puck forecast, predicting another batch if it ran dry
fn next_target(state: &mut SimState) -> Option<Bounce> {
    let depth = state.settings.lookahead_depth.max(1);
    let walls = state.rink.walls();
    let resume = &mut state.resume;
    state.forecast.front_or_replenish(|| {
        let batch = predict(walls, *resume, Depth::Bounces(depth));
        *resume = batch.end;
        batch
    })
}
