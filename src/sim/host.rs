//! Contract with the host environment (entities, physics, rendering)
//!
//! The simulation holds no entity registry. It names its two actors
//! explicitly and asks the host to read and move them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The two entities the simulation drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// Pursuer, moved by the path follower
    Seeker,
    /// Pursued, moved by input/physics outside the simulation
    Target,
}

/// Host-side services the simulation calls into every tick
pub trait ChaseHost {
    /// Current world position of an actor
    fn position(&self, actor: Actor) -> Vec3;

    /// Teleport an actor
    fn set_position(&mut self, actor: Actor, position: Vec3);

    /// Yaw (radians, about +Y) the actor's model should face
    fn set_heading(&mut self, actor: Actor, yaw: f32);

    /// Push an actor through the host's physics
    fn apply_impulse(&mut self, actor: Actor, impulse: Vec3);

    /// Bounding-volume overlap between seeker and target
    fn actors_colliding(&self) -> bool;

    /// A tile was hidden (`false`) or revealed (`true`); stop or resume
    /// drawing and colliding with its visual entity
    fn set_tile_visible(&mut self, tile: usize, visible: bool);
}
