//! Simulation state and the search re-trigger policy
//!
//! `ChaseState` owns everything one chase needs: the grid, the search
//! lists, the follower and the seeded RNG. Nothing is shared or global.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::follower::PathFollower;
use super::grid::Grid;
use super::host::{Actor, ChaseHost};
use super::search::PathSearch;
use crate::consts::SEEKER_HEIGHT;
use crate::settings::SimSettings;
use crate::{ChaseResult, planar};

/// Something notable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChaseEvent {
    PathFound { start: usize, goal: usize, waypoints: usize },
    PathNotFound { start: usize, goal: usize },
    ObstacleAdded { tile: usize },
    ObstacleRemoved { tile: usize },
    Collision,
    Exploded { hidden: Vec<usize> },
    SeekerRelocated { tile: usize },
}

/// Running totals for a chase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaseStats {
    pub searches: u64,
    pub paths_found: u64,
    pub paths_failed: u64,
    pub collisions: u64,
    pub tiles_exploded: u64,
    pub obstacles_added: u64,
    pub obstacles_removed: u64,
}

/// Complete chase state
#[derive(Debug, Clone)]
pub struct ChaseState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: SimSettings,
    pub grid: Grid,
    pub search: PathSearch,
    pub follower: PathFollower,
    /// A search should be considered this tick
    pub(crate) recalculate: bool,
    /// Target's planar position when the policy last looked at it
    last_target_position: Option<Vec2>,
    /// Goal tile of the last search
    last_goal_tile: Option<usize>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub stats: ChaseStats,
    /// Events from the most recent tick
    pub events: Vec<ChaseEvent>,
}

impl ChaseState {
    /// Create a chase from validated settings
    pub fn new(settings: &SimSettings, seed: u64) -> ChaseResult<Self> {
        settings.validate()?;
        let grid = Grid::with_hidden_ratio(
            settings.grid_width,
            settings.grid_height,
            settings.floor_level,
            settings.max_hidden_ratio,
        )?;

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings: settings.clone(),
            grid,
            search: PathSearch::new(),
            follower: PathFollower::new(settings.leg_duration),
            recalculate: true,
            last_target_position: None,
            last_goal_tile: None,
            time_ticks: 0,
            stats: ChaseStats::default(),
            events: Vec::new(),
        })
    }

    /// Pick ground positions for the seeker and then the target on distinct free tiles
    pub fn spawn_points(&mut self) -> ChaseResult<(Vec3, Vec3)> {
        let seeker_tile = self.grid.random_free_tile(&mut self.rng, &[])?;
        let seeker = self.ground_position(seeker_tile);
        let target_tile = self.grid.random_free_tile(&mut self.rng, &[seeker])?;
        let target = self.ground_position(target_tile);
        Ok((seeker, target))
    }

    /// Tile center at the actors' ground height
    pub fn ground_position(&self, tile: usize) -> Vec3 {
        let mut position = self.grid.tile(tile).position();
        position.y = SEEKER_HEIGHT;
        position
    }

    /// Height waypoints are lifted to
    pub fn waypoint_height(&self) -> f32 {
        -self.grid.floor_level()
    }

    /// Positions of both actors, for occupancy checks
    pub fn occupants<H: ChaseHost>(&self, host: &H) -> [Vec3; 2] {
        [host.position(Actor::Target), host.position(Actor::Seeker)]
    }

    /// Flag a search if the target moved on the ground plane since last look
    pub fn target_moved(&mut self, target_position: Vec3) -> bool {
        let moved = self.last_target_position != Some(planar(target_position));
        if moved {
            self.recalculate = true;
        }
        moved
    }

    /// Decide whether a search between these tiles is worth running
    ///
    /// Rejects when either actor is off the grid, when the goal is the
    /// same tile as last time, or when either tile is an obstacle. Every
    /// outcome records the target position so a stationary target stops
    /// re-triggering.
    pub fn validate_search_input(
        &mut self,
        start: Option<usize>,
        goal: Option<usize>,
        target_position: Vec3,
    ) -> bool {
        self.last_target_position = Some(planar(target_position));

        let (Some(start), Some(goal)) = (start, goal) else {
            return false;
        };
        if self.last_goal_tile == Some(goal) {
            return false;
        }
        self.grid.tile(start).is_active() && self.grid.tile(goal).is_active()
    }

    /// Forget the memo so the next eligible tick searches unconditionally
    pub fn override_search_memo(&mut self) {
        self.last_target_position = None;
        self.last_goal_tile = None;
    }

    /// Request a search on the next tick
    pub fn request_search(&mut self) {
        self.recalculate = true;
    }

    /// Run a search and hand the result to the follower
    ///
    /// A failed search leaves the follower with an empty path.
    pub fn calculate_path(&mut self, start: usize, goal: usize) -> bool {
        let height = self.waypoint_height();
        let result = self.search.find_path(&mut self.grid, start, goal, height);
        self.stats.searches += 1;
        self.last_goal_tile = Some(goal);

        match result {
            Some(path) => {
                log::debug!(
                    "Path {} -> {}: {} waypoints, {} expanded",
                    start,
                    goal,
                    path.len(),
                    self.search.closed().len()
                );
                self.stats.paths_found += 1;
                self.events.push(ChaseEvent::PathFound {
                    start,
                    goal,
                    waypoints: path.len(),
                });
                self.follower.set_path(path);
                true
            }
            None => {
                log::debug!("No path {} -> {}", start, goal);
                self.stats.paths_failed += 1;
                self.events.push(ChaseEvent::PathNotFound { start, goal });
                self.follower.set_path(Vec::new());
                false
            }
        }
    }

    /// Re-search if the policy allows it; clears the request either way
    pub fn update_path<H: ChaseHost>(&mut self, host: &H) {
        let target = host.position(Actor::Target);
        self.target_moved(target);

        if !self.recalculate {
            return;
        }
        self.recalculate = false;

        let start = self.grid.closest_tile(host.position(Actor::Seeker));
        let goal = self.grid.closest_tile(target);
        if self.validate_search_input(start, goal, target) {
            if let (Some(start), Some(goal)) = (start, goal) {
                self.calculate_path(start, goal);
            }
        }
    }

    /// Remaining waypoints for debug drawing
    pub fn waypoints(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.follower.path().iter().copied()
    }

    /// Consecutive waypoint pairs `(to, from)`, one debug line each
    pub fn render_segments(&self) -> Vec<(Vec3, Vec3)> {
        let path = self.follower.path();
        (1..path.len()).map(|i| (path[i], path[i - 1])).collect()
    }
}
