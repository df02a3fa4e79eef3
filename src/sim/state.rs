//! Simulation state
//!
//! Owns the rink, both bodies, the puck's forecast queue and the point the
//! predictor resumes from. Everything mutable lives here and is touched only
//! by [`super::tick`].

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::forecast::ForecastQueue;
use super::predict::{Depth, ForecastBatch, Trajectory, predict};
use super::rink::Rink;
use crate::polar_to_cartesian;
use crate::settings::{Settings, SimConfig};

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub settings: Settings,
    pub rink: Rink,
    pub puck: Body,
    /// Player-controlled circle; the puck's only moving obstacle
    pub paddle: Body,
    /// Pending puck bounces
    pub forecast: ForecastQueue,
    /// Where the next predictor call picks up
    pub resume: Trajectory,
    /// Presentation toggle for the trajectory overlay
    pub show_forecast: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f64,
    pub wall_bounces: u64,
    pub paddle_hits: u64,
}

impl SimState {
    pub fn new(settings: Settings) -> Self {
        let config = settings.sim;
        let rink = Rink::from_settings(&settings.rink, settings.puck.radius);
        let mut puck = Body::from_settings(&settings.puck, &config);
        let paddle = Body::from_settings(&settings.paddle, &config);

        if let Some(seed) = settings.launch_seed {
            puck.vel = seeded_launch(seed, puck.vel.length());
            log::info!("Puck launched with seed {seed}: ({:.3}, {:.3})", puck.vel.x, puck.vel.y);
        }

        let resume = puck.trajectory(&config);
        let mut state = Self {
            settings,
            rink,
            puck,
            paddle,
            forecast: ForecastQueue::new(),
            resume,
            show_forecast: false,
            time_ticks: 0,
            elapsed: 0.0,
            wall_bounces: 0,
            paddle_hits: 0,
        };

        state.replenish_forecast();
        state
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.settings.sim
    }

    /// Top up the forecast to the lookahead depth
    pub fn replenish_forecast(&mut self) {
        let depth = self.settings.lookahead_depth;
        if !self.forecast.wants_more(depth) {
            return;
        }
        let batch = predict(self.rink.walls(), self.resume, Depth::Bounces(depth));
        self.resume = batch.end;
        self.forecast.extend(&batch);
        if batch.terminated {
            log::info!(
                "Puck forecast complete: {} bounces pending before rest",
                self.forecast.pending()
            );
        }
    }

    /// Throw away the forecast and restart prediction from the puck's current motion
    pub fn invalidate_forecast(&mut self) {
        self.forecast.reset();
        self.resume = self.puck.trajectory(&self.settings.sim);
    }

    /// Whole remaining forecast of the puck, computed fresh
    pub fn full_forecast(&self) -> ForecastBatch {
        predict(self.rink.walls(), self.puck.trajectory(self.config()), Depth::Unbounded)
    }

    /// Positions and radii of all bodies, puck first
    pub fn bodies(&self) -> [(DVec2, f64); 2] {
        [
            (self.puck.pos, self.puck.radius()),
            (self.paddle.pos, self.paddle.radius()),
        ]
    }

    /// Overlay path: the puck, then its pending bounces, then the rest point
    pub fn forecast_points(&self) -> Vec<DVec2> {
        std::iter::once(self.puck.pos).chain(self.forecast.points()).collect()
    }
}

/// Launch velocity with a seeded random heading
fn seeded_launch(seed: u64, speed: f64) -> DVec2 {
    let mut rng = Pcg32::seed_from_u64(seed);
    let heading = rng.random_range(0.0..std::f64::consts::TAU);
    polar_to_cartesian(speed, heading)
}
