//! In-memory host for headless runs and tests
//!
//! Two point bodies with box extents, stepped with simple per-frame
//! physics, plus a visibility flag per tile. Not a physics engine: just
//! enough to satisfy `ChaseHost` the way a real host would.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::{Actor, ChaseHost};

/// Downward acceleration applied every step
pub const GRAVITY: f32 = 0.035;
/// Speed cap (units per step)
pub const MAX_SPEED: f32 = 5.0;
/// Fraction of velocity lost per step
pub const FRICTION: f32 = 0.1;
/// Speeds below this snap to rest
pub const REST_SPEED: f32 = 0.028;
/// Ground plane the bodies stand on
pub const GROUND: f32 = 0.0;

/// Actor footprint half-width and height
pub const BODY_HALF_WIDTH: f32 = 0.35;
pub const BODY_HEIGHT: f32 = 1.6;

/// A kinematic body whose position is its feet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    acceleration: Vec3,
    pub mass: f32,
    /// Yaw in radians about +Y
    pub yaw: f32,
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: 1.0,
            yaw: 0.0,
        }
    }

    /// Accumulate a force for the next step
    pub fn apply_force(&mut self, force: Vec3) {
        self.mass = self.mass.max(0.01);
        self.acceleration += force / self.mass;
    }

    /// Integrate one frame
    pub fn step(&mut self) {
        self.apply_force(Vec3::new(0.0, -GRAVITY, 0.0));

        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(MAX_SPEED);
        self.velocity *= 1.0 - FRICTION;

        self.position += self.velocity;
        if self.position.y <= GROUND {
            self.position.y = GROUND;
            self.velocity.y = 0.0;
        }

        // Checked after ground contact so gravity alone never keeps a body sliding
        if self.velocity.length() < REST_SPEED {
            self.velocity = Vec3::ZERO;
        }

        self.acceleration = Vec3::ZERO;
    }

    /// Axis-aligned bounds (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = Vec3::new(BODY_HALF_WIDTH, 0.0, BODY_HALF_WIDTH);
        (
            self.position - half,
            self.position + half + Vec3::new(0.0, BODY_HEIGHT, 0.0),
        )
    }

    /// Box overlap test, touching counts
    pub fn overlaps(&self, other: &Body) -> bool {
        let (min_a, max_a) = self.bounds();
        let (min_b, max_b) = other.bounds();
        min_a.cmple(max_b).all() && min_b.cmple(max_a).all()
    }
}

/// Host with a seeker, a target and per-tile visibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxHost {
    pub seeker: Body,
    pub target: Body,
    visible: Vec<bool>,
}

impl SandboxHost {
    pub fn new(seeker: Vec3, target: Vec3, tile_count: usize) -> Self {
        Self {
            seeker: Body::new(seeker),
            target: Body::new(target),
            visible: vec![true; tile_count],
        }
    }

    /// Step the target's physics. The seeker is driven by the simulation.
    pub fn step(&mut self) {
        self.target.step();
    }

    /// Push the target along a planar direction (x, z)
    pub fn push_target(&mut self, direction: Vec2, strength: f32) {
        let dir = direction.normalize_or_zero() * strength;
        self.target.apply_force(Vec3::new(dir.x, 0.0, dir.y));
    }

    pub fn is_tile_visible(&self, tile: usize) -> bool {
        self.visible.get(tile).copied().unwrap_or(false)
    }

    /// Tiles currently not drawn
    pub fn hidden_tiles(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|&(_, &visible)| !visible)
            .map(|(i, _)| i)
            .collect()
    }

    fn body_mut(&mut self, actor: Actor) -> &mut Body {
        match actor {
            Actor::Seeker => &mut self.seeker,
            Actor::Target => &mut self.target,
        }
    }
}

impl ChaseHost for SandboxHost {
    fn position(&self, actor: Actor) -> Vec3 {
        match actor {
            Actor::Seeker => self.seeker.position,
            Actor::Target => self.target.position,
        }
    }

    fn set_position(&mut self, actor: Actor, position: Vec3) {
        self.body_mut(actor).position = position;
    }

    fn set_heading(&mut self, actor: Actor, yaw: f32) {
        self.body_mut(actor).yaw = yaw;
    }

    fn apply_impulse(&mut self, actor: Actor, impulse: Vec3) {
        self.body_mut(actor).apply_force(impulse);
    }

    fn actors_colliding(&self) -> bool {
        self.seeker.overlaps(&self.target)
    }

    fn set_tile_visible(&mut self, tile: usize, visible: bool) {
        if let Some(flag) = self.visible.get_mut(tile) {
            *flag = visible;
        }
    }
}
