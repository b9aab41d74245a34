//! Fixed timestep simulation tick
//!
//! Per tick: apply operator input, re-search if the policy allows, walk
//! the seeker, then resolve a seeker/target collision.

use super::host::{Actor, ChaseHost};
use super::state::{ChaseEvent, ChaseState};
use crate::consts::SEEKER_HEIGHT;

/// Operator commands for a single tick (one-shot)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hide one more random tile
    pub add_obstacle: bool,
    /// Reveal one random hidden tile
    pub remove_obstacle: bool,
}

/// Advance the chase by one fixed timestep
pub fn tick<H: ChaseHost>(state: &mut ChaseState, host: &mut H, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    if input.add_obstacle {
        state.add_obstacle(host);
    }
    if input.remove_obstacle {
        state.remove_obstacle(host);
    }

    state.update_path(&*host);

    if state.follower.has_path() {
        move_seeker(state, host, dt);
    }

    if host.actors_colliding() {
        state.collide(host, dt);
    }
}

/// Walk the seeker along its path and publish the pose
fn move_seeker<H: ChaseHost>(state: &mut ChaseState, host: &mut H, dt: f32) {
    if let Some(pose) = state.follower.advance(dt, SEEKER_HEIGHT) {
        host.set_position(Actor::Seeker, pose.position);
        host.set_heading(Actor::Seeker, pose.heading.radians());
    }
}

impl ChaseState {
    /// Seeker caught the target: knock it back, blow holes around it,
    /// teleport the seeker and force a fresh search
    pub fn collide<H: ChaseHost>(&mut self, host: &mut H, dt: f32) {
        self.stats.collisions += 1;
        self.events.push(ChaseEvent::Collision);
        log::info!("Seeker caught target at tick {}", self.time_ticks);

        let impulse = self.follower.travel() * (dt * self.settings.collision_impulse_scale);
        host.apply_impulse(Actor::Target, impulse);

        self.explode(host);
        self.relocate_seeker(host);

        // The old route starts next to the target; walking it would undo the teleport
        self.follower.set_path(Vec::new());
        self.follower.reset_leg();
        self.request_search();
        self.override_search_memo();
    }

    /// Teleport the seeker to a random free tile
    pub fn relocate_seeker<H: ChaseHost>(&mut self, host: &mut H) -> Option<usize> {
        let occupants = self.occupants(&*host);
        match self.grid.random_free_tile(&mut self.rng, &occupants) {
            Ok(tile) => {
                let position = self.ground_position(tile);
                host.set_position(Actor::Seeker, position);
                host.set_heading(Actor::Seeker, 0.0);
                self.events.push(ChaseEvent::SeekerRelocated { tile });
                log::info!("Seeker relocated to tile {}", tile);
                Some(tile)
            }
            Err(e) => {
                log::warn!("Seeker stays put: {}", e);
                None
            }
        }
    }
}
