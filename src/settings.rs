//! Simulation settings
//!
//! Physics constants, rink size, body parameters and forecast lookahead.
//! Persisted as JSON; missing fields fall back to the defaults in `consts`.

use std::fmt;
use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics constants shared by every body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravitational acceleration for kinetic friction (m/s²)
    pub gravity: f64,
    /// Friction coefficient for bodies without their own
    pub friction_base: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction_base: FRICTION_BASE,
        }
    }
}

impl SimConfig {
    /// Kinetic friction force magnitude for a body of `mass`
    #[inline]
    pub fn friction_force(&self, coefficient: f64, mass: f64) -> f64 {
        coefficient * mass * self.gravity
    }
}

/// Rink dimensions (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RinkSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for RinkSettings {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Initial state and physical parameters for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySettings {
    pub position: DVec2,
    #[serde(default)]
    pub velocity: DVec2,
    pub mass: f64,
    pub radius: f64,
    /// Falls back to `SimConfig::friction_base`
    #[serde(default)]
    pub friction: Option<f64>,
}

impl BodySettings {
    pub fn puck() -> Self {
        Self {
            position: PUCK_START.into(),
            velocity: PUCK_START_VELOCITY.into(),
            mass: PUCK_MASS,
            radius: PUCK_RADIUS,
            friction: Some(PUCK_FRICTION),
        }
    }

    pub fn paddle() -> Self {
        Self {
            position: PADDLE_START.into(),
            velocity: DVec2::ZERO,
            mass: PADDLE_MASS,
            radius: PADDLE_RADIUS,
            friction: Some(PADDLE_FRICTION),
        }
    }

    /// Friction coefficient after applying the shared default
    pub fn friction_or(&self, config: &SimConfig) -> f64 {
        self.friction.unwrap_or(config.friction_base)
    }
}

/// Full simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim: SimConfig,
    pub rink: RinkSettings,
    pub puck: BodySettings,
    pub paddle: BodySettings,
    /// Bounces computed per replenishment call
    pub lookahead_depth: usize,
    /// Velocity added to the paddle per control press (m/s)
    pub nudge_speed: f64,
    /// Randomize the puck's launch direction (speed is kept)
    pub launch_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            rink: RinkSettings::default(),
            puck: BodySettings::puck(),
            paddle: BodySettings::paddle(),
            lookahead_depth: LOOKAHEAD_DEPTH,
            nudge_speed: NUDGE_SPEED,
            launch_seed: None,
        }
    }
}

/// Failure to load or store settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings I/O error: {e}"),
            Self::Parse(e) => write!(f, "settings parse error: {e}"),
            Self::Invalid(m) => write!(f, "invalid settings: {m}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_path(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.sim.gravity > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "gravity must be positive, got {}",
                self.sim.gravity
            )));
        }
        if self.sim.friction_base < 0.0 {
            return Err(SettingsError::Invalid("friction_base must be >= 0".into()));
        }
        for (name, body) in [("puck", &self.puck), ("paddle", &self.paddle)] {
            if !(body.mass > 0.0) {
                return Err(SettingsError::Invalid(format!("{name} mass must be positive")));
            }
            if body.radius < 0.0 {
                return Err(SettingsError::Invalid(format!("{name} radius must be >= 0")));
            }
            if body.friction.is_some_and(|k| k < 0.0) {
                return Err(SettingsError::Invalid(format!("{name} friction must be >= 0")));
            }
        }
        let r = self.puck.radius;
        if self.rink.width <= 2.0 * r || self.rink.height <= 2.0 * r {
            return Err(SettingsError::Invalid(format!(
                "rink {}x{} too small for puck radius {r}",
                self.rink.width, self.rink.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sim.gravity, GRAVITY);
        assert_eq!(settings.puck.velocity, DVec2::new(8.7, 4.7));
        assert_eq!(settings.lookahead_depth, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "sim": { "gravity": 9.81 } }"#).unwrap();
        assert_eq!(settings.sim.gravity, 9.81);
        assert_eq!(settings.sim.friction_base, FRICTION_BASE);
        assert_eq!(settings.rink, RinkSettings::default());
    }

    #[test]
    fn test_friction_falls_back_to_base() {
        let config = SimConfig {
            gravity: 10.0,
            friction_base: 0.2,
        };
        let mut body = BodySettings::puck();
        body.friction = None;
        assert_eq!(body.friction_or(&config), 0.2);
        assert!((config.friction_force(0.2, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = Settings::from_json(r#"{ "sim": { "gravity": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "rink": { "width": 0.1, "height": 2.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("aero_hockey_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.lookahead_depth = 7;
        settings.launch_seed = Some(42);
        settings.save_to_path(&path).unwrap();

        let loaded = Settings::load_from_path(&path).unwrap();
        assert_eq!(loaded.lookahead_depth, 7);
        assert_eq!(loaded.launch_seed, Some(42));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/aero_hockey.json");
        assert_eq!(settings.lookahead_depth, LOOKAHEAD_DEPTH);
    }
}
