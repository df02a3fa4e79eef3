//! Aero Hockey - air hockey rink simulation with bounce forecasting
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, wall forecasting, paddle contact)
//! - `settings`: Data-driven physics and rink configuration
//!
//! Everything is expressed in world units (meters, seconds, radians). Converting
//! to pixels, drawing and input polling belong to whatever host drives [`sim::tick`].

pub mod settings;
pub mod sim;

pub use settings::{BodySettings, RinkSettings, Settings, SettingsError, SimConfig};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Default frame step for headless runs (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;

    /// Gravitational acceleration used for kinetic friction (m/s²)
    pub const GRAVITY: f64 = 9.87;
    /// Friction coefficient for bodies that don't set their own
    pub const FRICTION_BASE: f64 = 0.04;

    /// Rink dimensions (meters)
    pub const FIELD_WIDTH: f64 = 3.0;
    pub const FIELD_HEIGHT: f64 = 2.0;

    /// Puck defaults
    pub const PUCK_RADIUS: f64 = 0.1;
    pub const PUCK_MASS: f64 = 0.005;
    pub const PUCK_FRICTION: f64 = 0.04;
    pub const PUCK_START: (f64, f64) = (1.5, 1.0);
    pub const PUCK_START_VELOCITY: (f64, f64) = (8.7, 4.7);

    /// Paddle defaults
    pub const PADDLE_RADIUS: f64 = 0.2;
    pub const PADDLE_MASS: f64 = 0.01;
    pub const PADDLE_FRICTION: f64 = 0.05;
    pub const PADDLE_START: (f64, f64) = (0.4, 1.0);
    /// Velocity added to the paddle per control press (m/s)
    pub const NUDGE_SPEED: f64 = 0.8;

    /// Bounces computed per background replenishment call
    pub const LOOKAHEAD_DEPTH: usize = 3;
    /// Hard stop for "unbounded" predictions (frictionless rinks never come to rest)
    pub const MAX_UNBOUNDED_BOUNCES: usize = 4096;

    /// Bounce points closer than this are the same point, e.g. both walls of a corner (meters)
    pub const COINCIDENT_BOUNCE: f64 = 1e-9;

    /// Distance under which a circle counts as touching a wall line (meters)
    pub const CONTACT_TOLERANCE: f64 = 0.001;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
