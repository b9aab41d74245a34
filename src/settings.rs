//! Simulation settings
//!
//! Persisted as JSON. Missing fields fall back to their defaults so older
//! or hand-written files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{ChaseError, ChaseResult};

/// Obstacle burst triggered when the seeker catches the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    /// Tiles to try to hide per explosion
    pub count: u32,
    /// Offsets are drawn from `-radius..radius` on each axis
    pub radius: i32,
    /// Random draws per tile before giving up on it
    pub bailout: u32,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            count: EXPLOSION_COUNT,
            radius: EXPLOSION_RADIUS,
            bailout: EXPLOSION_BAILOUT,
        }
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    // === Grid ===
    /// Columns
    pub grid_width: usize,
    /// Rows
    pub grid_height: usize,
    pub floor_level: f32,
    /// Share of tiles that may be hidden at once (0.0 - 1.0)
    pub max_hidden_ratio: f32,

    // === Motion ===
    /// Seconds per waypoint-to-waypoint leg
    pub leg_duration: f32,
    /// Fixed timestep used by the runner
    pub sim_dt: f32,

    // === Collision ===
    pub explosion: ExplosionSettings,
    pub collision_impulse_scale: f32,

    /// Run seed; `None` picks one from the clock
    pub seed: Option<u64>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            floor_level: FLOOR_LEVEL,
            max_hidden_ratio: MAX_HIDDEN_RATIO,

            leg_duration: LEG_DURATION,
            sim_dt: SIM_DT,

            explosion: ExplosionSettings::default(),
            collision_impulse_scale: COLLISION_IMPULSE_SCALE,

            seed: None,
        }
    }
}

impl SimSettings {
    /// Check ranges that would otherwise break the simulation
    pub fn validate(&self) -> ChaseResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ChaseError::InvalidSettings(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        match self.grid_width.checked_mul(self.grid_height) {
            Some(area) if area <= MAX_GRID_AREA => {}
            _ => {
                return Err(ChaseError::InvalidSettings(format!(
                    "grid {}x{} exceeds {} tiles",
                    self.grid_width, self.grid_height, MAX_GRID_AREA
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.max_hidden_ratio) {
            return Err(ChaseError::InvalidSettings(format!(
                "max_hidden_ratio {} outside 0.0..=1.0",
                self.max_hidden_ratio
            )));
        }
        if !(self.leg_duration > 0.0) {
            return Err(ChaseError::InvalidSettings(format!(
                "leg_duration must be positive, got {}",
                self.leg_duration
            )));
        }
        if !(self.sim_dt > 0.0) {
            return Err(ChaseError::InvalidSettings(format!(
                "sim_dt must be positive, got {}",
                self.sim_dt
            )));
        }
        if self.explosion.radius < 1 {
            return Err(ChaseError::InvalidSettings(format!(
                "explosion radius must be at least 1, got {}",
                self.explosion.radius
            )));
        }
        Ok(())
    }

    /// Resolved run seed
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    pub fn from_json(json: &str) -> ChaseResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> ChaseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ChaseResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> ChaseResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
