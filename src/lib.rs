//! Grid Chase - a seeker pursuing a target across a tile grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, path search, path following, obstacle churn)
//! - `settings`: Tunable simulation parameters with JSON load/save
//! - `sandbox`: In-memory host used by the headless runner and tests

pub mod sandbox;
pub mod settings;
pub mod sim;

pub use sandbox::SandboxHost;
pub use settings::{ExplosionSettings, SimSettings};

use glam::{Vec2, Vec3};

/// Core error type for the chase simulation.
#[derive(thiserror::Error, Debug)]
pub enum ChaseError {
    /// Every tile is hidden or occupied
    #[error("no free tile found after {attempts} attempts")]
    NoFreeTile { attempts: usize },

    /// Grid dimensions must be non-zero
    #[error("invalid grid size {width}x{height}")]
    InvalidGrid { width: usize, height: usize },

    /// Settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type used throughout the crate.
pub type ChaseResult<T> = Result<T, ChaseError>;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Grid defaults
    pub const GRID_WIDTH: usize = 20;
    pub const GRID_HEIGHT: usize = 20;
    /// Vertical offset of the tile layer; waypoints are lifted to `-FLOOR_LEVEL`
    pub const FLOOR_LEVEL: f32 = -1.0;
    /// Half the side length of a tile footprint
    pub const TILE_HALF_EXTENT: f32 = 0.5;
    /// Share of the grid that may be hidden at once
    pub const MAX_HIDDEN_RATIO: f32 = 0.25;
    /// Largest tile count a grid may be built with
    pub const MAX_GRID_AREA: usize = 1 << 20;

    /// Cost of one orthogonal step
    pub const STEP_COST: f32 = 1.0;

    /// Seconds to walk one waypoint-to-waypoint leg
    pub const LEG_DURATION: f32 = 0.6;
    /// Ground height the seeker is pinned to while walking
    pub const SEEKER_HEIGHT: f32 = 0.0;

    /// Explosion defaults (tiles hidden around the target on collision)
    pub const EXPLOSION_COUNT: u32 = 6;
    pub const EXPLOSION_RADIUS: i32 = 3;
    pub const EXPLOSION_BAILOUT: u32 = 20;
    /// Scale applied to the travel vector when knocking the target back
    pub const COLLISION_IMPULSE_SCALE: f32 = 20.0;

    /// Random draws per grid tile before `random_free_tile` falls back to a scan
    pub const FREE_TILE_ATTEMPTS_PER_TILE: usize = 4;
}

/// Planar (x, z) projection of a world position
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]` (unclamped)
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_max;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range() {
        assert!((map_range(0.3, 0.0, 0.6, 0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((map_range(1.2, 0.0, 0.6, 0.0, 1.0) - 2.0).abs() < 1e-6);
        assert_eq!(map_range(5.0, 1.0, 1.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_planar_drops_height() {
        assert_eq!(planar(Vec3::new(1.5, 7.0, 2.5)), Vec2::new(1.5, 2.5));
    }
}
