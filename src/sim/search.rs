//! Shortest-path search on the 4-connected tile grid
//!
//! A* with a Manhattan heuristic, with one deliberate difference from the
//! textbook version: a tile is claimed (parent assigned) the first time it
//! is discovered and is never relaxed afterwards. The parent link doubles
//! as the open/closed membership test.

use glam::Vec3;

use super::grid::Grid;

/// Open/closed lists for one search pass
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    open: Vec<usize>,
    closed: Vec<usize>,
}

impl PathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles discovered but not yet expanded, in discovery order
    pub fn open(&self) -> &[usize] {
        &self.open
    }

    /// Tiles expanded during the last pass, in expansion order
    pub fn closed(&self) -> &[usize] {
        &self.closed
    }

    /// Reset every tile's scratch, compute heuristics toward `goal` and seed
    /// the open list with `start`.
    ///
    /// Inactive tiles get the grid area as a sentinel heuristic.
    pub fn setup(&mut self, grid: &mut Grid, start: usize, goal: usize) {
        let goal_pos = grid.tile(goal).planar_position();
        let sentinel = grid.area() as f32;

        for tile in grid.tiles_mut() {
            tile.reset_scratch();
            let h = if tile.is_active() {
                let d = goal_pos - tile.planar_position();
                d.x.abs() + d.y.abs()
            } else {
                sentinel
            };
            tile.set_h(h);
        }

        self.open.clear();
        self.closed.clear();

        grid.tile_mut(start).seed_root();
        self.open.push(start);
    }

    /// Expand tiles until `goal` is popped (true) or the open list runs dry (false)
    ///
    /// Expects `setup` to have been called for the same endpoints.
    pub fn run(&mut self, grid: &mut Grid, goal: usize) -> bool {
        if self.open.is_empty() {
            return false;
        }

        let mut slot = 0;
        loop {
            let current = self.open.remove(slot);
            self.closed.push(current);

            if current == goal {
                return true;
            }

            let current_g = grid.tile(current).g();
            let neighbors: Vec<usize> = grid.neighbors(current).collect();
            for neighbor in neighbors {
                let tile = grid.tile_mut(neighbor);
                if !tile.is_active() {
                    continue;
                }
                if tile.claim(current, current_g) {
                    self.open.push(neighbor);
                }
            }

            if self.open.is_empty() {
                return false;
            }

            slot = lowest_f_slot(grid, &self.open);
        }
    }

    /// Full pass: setup, run and reconstruct. `None` when the goal is unreachable.
    pub fn find_path(
        &mut self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        waypoint_height: f32,
    ) -> Option<Vec<Vec3>> {
        self.setup(grid, start, goal);
        if self.run(grid, goal) {
            reconstruct_path(grid, start, goal, waypoint_height)
        } else {
            None
        }
    }
}

/// Slot of the first open entry with the smallest `f` (strict `<`, earlier wins ties)
fn lowest_f_slot(grid: &Grid, open: &[usize]) -> usize {
    let mut lowest = 0;
    for (slot, &index) in open.iter().enumerate() {
        if grid.tile(index).f() < grid.tile(open[lowest]).f() {
            lowest = slot;
        }
    }
    lowest
}

/// Walk parent links from `goal` back to `start` and return the waypoints
/// in start-to-goal order, lifted to `waypoint_height`.
///
/// Returns `None` if the chain is broken or longer than the grid, which
/// only happens when called without a successful search.
pub fn reconstruct_path(
    grid: &Grid,
    start: usize,
    goal: usize,
    waypoint_height: f32,
) -> Option<Vec<Vec3>> {
    let mut path = Vec::new();
    let mut current = goal;

    loop {
        let mut position = grid.tile(current).position();
        position.y = waypoint_height;
        path.push(position);

        if current == start {
            break;
        }
        if path.len() > grid.area() {
            return None;
        }
        current = grid.tile(current).parent()?;
    }

    path.reverse();
    Some(path)
}
