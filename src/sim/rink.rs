//! Rectangular rink
//!
//! Walls are built for the puck's center, inset from the physical edge by the
//! puck radius, and wound clockwise (y-up): bottom right→left, right
//! top→bottom, top left→right, left bottom→top. With that winding every
//! wall's `(ka, kb)` normal points into the rink and `start - end` gives the
//! direction the bounce rotation expects.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use crate::settings::RinkSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rink {
    pub width: f64,
    pub height: f64,
    /// Distance the walls are pulled in from the edges
    pub inset: f64,
    walls: Vec<Boundary>,
}

impl Rink {
    pub fn new(width: f64, height: f64, inset: f64) -> Self {
        let (lo_x, hi_x) = (inset, width - inset);
        let (lo_y, hi_y) = (inset, height - inset);

        let walls = vec![
            // Bottom
            Boundary::new(DVec2::new(hi_x, lo_y), DVec2::new(lo_x, lo_y)),
            // Right
            Boundary::new(DVec2::new(hi_x, hi_y), DVec2::new(hi_x, lo_y)),
            // Top
            Boundary::new(DVec2::new(lo_x, hi_y), DVec2::new(hi_x, hi_y)),
            // Left
            Boundary::new(DVec2::new(lo_x, lo_y), DVec2::new(lo_x, hi_y)),
        ];

        Self {
            width,
            height,
            inset,
            walls,
        }
    }

    /// Rink for a puck of `puck_radius`
    pub fn from_settings(settings: &RinkSettings, puck_radius: f64) -> Self {
        Self::new(settings.width, settings.height, puck_radius)
    }

    pub fn walls(&self) -> &[Boundary] {
        &self.walls
    }

    /// Whether `point` lies within the inset walls, allowing `tolerance`
    pub fn contains(&self, point: DVec2, tolerance: f64) -> bool {
        point.x >= self.inset - tolerance
            && point.x <= self.width - self.inset + tolerance
            && point.y >= self.inset - tolerance
            && point.y <= self.height - self.inset + tolerance
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}
