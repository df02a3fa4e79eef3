//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Wall collisions come from the analytic forecast, never from overlap tests
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod forecast;
pub mod predict;
pub mod quadratic;
pub mod rink;
pub mod state;
pub mod tick;
pub mod vector;

pub use body::{Body, BodyKind, CircleShape, StepOutcome};
pub use boundary::Boundary;
pub use collision::{CircleObstacle, CollisionResult, circle_obstacle_collision};
pub use forecast::{Bounce, ForecastQueue};
pub use predict::{Depth, ForecastBatch, Trajectory, predict};
pub use quadratic::{Roots, solve_quadratic, time_to_cover};
pub use rink::Rink;
pub use state::SimState;
pub use tick::{TickInput, tick};
pub use vector::VecExt;
