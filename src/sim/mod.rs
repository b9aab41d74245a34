//! Deterministic simulation module
//!
//! All chase logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by tile index)
//! - No rendering or platform dependencies; the host is reached through `ChaseHost`

pub mod follower;
pub mod grid;
pub mod host;
mod obstacles;
pub mod search;
pub mod state;
pub mod tick;
pub mod tile;

pub use follower::{Heading, Leg, PathFollower, Pose};
pub use grid::Grid;
pub use host::{Actor, ChaseHost};
pub use search::{PathSearch, reconstruct_path};
pub use state::{ChaseEvent, ChaseState, ChaseStats};
pub use tick::{TickInput, tick};
pub use tile::Tile;
