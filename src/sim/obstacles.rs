//! Obstacle pool churn: operator add/remove and the collision explosion

use rand::Rng;

use super::host::{Actor, ChaseHost};
use super::state::{ChaseEvent, ChaseState};

impl ChaseState {
    /// Hide a random free tile. No-op at capacity.
    pub fn add_obstacle<H: ChaseHost>(&mut self, host: &mut H) -> Option<usize> {
        if self.grid.is_at_capacity() {
            log::debug!("Obstacle pool full ({})", self.grid.max_hidden());
            return None;
        }

        let occupants = self.occupants(&*host);
        let tile = match self.grid.random_free_tile(&mut self.rng, &occupants) {
            Ok(tile) => tile,
            Err(e) => {
                log::warn!("Cannot add obstacle: {}", e);
                return None;
            }
        };

        self.hide_tile(host, tile);
        self.stats.obstacles_added += 1;
        self.events.push(ChaseEvent::ObstacleAdded { tile });
        log::info!(
            "Obstacle added at tile {} ({}/{})",
            tile,
            self.grid.hidden_count(),
            self.grid.max_hidden()
        );

        self.request_search();
        self.override_search_memo();
        Some(tile)
    }

    /// Reveal a uniformly random hidden tile. No-op when none are hidden.
    pub fn remove_obstacle<H: ChaseHost>(&mut self, host: &mut H) -> Option<usize> {
        let hidden = self.grid.hidden_count();
        if hidden == 0 {
            return None;
        }

        let slot = self.rng.random_range(0..hidden);
        let tile = self.grid.reveal_hidden_at(slot)?;
        host.set_tile_visible(tile, true);
        self.stats.obstacles_removed += 1;
        self.events.push(ChaseEvent::ObstacleRemoved { tile });
        log::info!(
            "Obstacle removed at tile {} ({}/{})",
            tile,
            self.grid.hidden_count(),
            self.grid.max_hidden()
        );

        self.request_search();
        self.override_search_memo();
        Some(tile)
    }

    /// Hide up to `explosion.count` tiles around the target
    ///
    /// Each tile gets `explosion.bailout` random draws within the radius
    /// box; a tile with no free candidate is skipped. When the pool is
    /// full an existing obstacle is released first; if none can be, the
    /// rest of the blast is dropped. Returns the tiles still hidden by it.
    pub fn explode<H: ChaseHost>(&mut self, host: &mut H) -> Vec<usize> {
        let mut hidden = Vec::new();
        let Some(center) = self.grid.closest_tile(host.position(Actor::Target)) else {
            return hidden;
        };

        let (row, col) = {
            let tile = self.grid.tile(center);
            (tile.row as i64, tile.col as i64)
        };
        let blast = self.settings.explosion;

        'blast: for _ in 0..blast.count {
            for _ in 0..blast.bailout {
                let r = row + self.rng.random_range(-blast.radius..blast.radius) as i64;
                let c = col + self.rng.random_range(-blast.radius..blast.radius) as i64;
                let Some(index) = self.grid.index_of(r, c) else {
                    continue;
                };

                let occupants = self.occupants(&*host);
                if !self.grid.is_free(index, &occupants) {
                    continue;
                }

                // Sacrifice an older hole for this one, possibly one this blast made
                if self.grid.is_at_capacity() {
                    match self.remove_obstacle(host) {
                        Some(revealed) => hidden.retain(|&i| i != revealed),
                        None => break 'blast,
                    }
                }

                self.hide_tile(host, index);
                hidden.push(index);
                break;
            }
        }

        self.stats.tiles_exploded += hidden.len() as u64;
        log::info!("Explosion at tile {} hid {:?}", center, hidden);
        self.events.push(ChaseEvent::Exploded {
            hidden: hidden.clone(),
        });
        hidden
    }

    fn hide_tile<H: ChaseHost>(&mut self, host: &mut H, tile: usize) {
        if self.grid.hide_tile(tile) {
            host.set_tile_visible(tile, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SandboxHost;
    use crate::settings::SimSettings;

    fn setup(width: usize, height: usize, seeker: usize, target: usize) -> (ChaseState, SandboxHost) {
        let settings = SimSettings {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        };
        let state = ChaseState::new(&settings, 99).unwrap();
        let host = SandboxHost::new(
            state.ground_position(seeker),
            state.ground_position(target),
            state.grid.area(),
        );
        (state, host)
    }

    #[test]
    fn test_add_obstacle_hides_and_notifies() {
        let (mut state, mut host) = setup(6, 6, 0, 35);
        state.recalculate = false;
        let tile = state.add_obstacle(&mut host).unwrap();

        assert!(!state.grid.tile(tile).is_active());
        assert!(!host.is_tile_visible(tile));
        assert_ne!(tile, 0);
        assert_ne!(tile, 35);
        assert_eq!(state.grid.hidden(), &[tile]);
        assert!(state.recalculate);
    }

    #[test]
    fn test_add_obstacle_at_capacity_is_noop() {
        let (mut state, mut host) = setup(4, 4, 0, 15);
        while state.add_obstacle(&mut host).is_some() {}

        assert_eq!(state.grid.hidden_count(), state.grid.max_hidden());
        assert!(state.add_obstacle(&mut host).is_none());
        assert_eq!(state.grid.hidden_count(), 4);
    }

    #[test]
    fn test_remove_obstacle_on_empty_pool_is_noop() {
        let (mut state, mut host) = setup(4, 4, 0, 15);
        state.recalculate = false;
        assert!(state.remove_obstacle(&mut host).is_none());
        assert_eq!(state.grid.hidden_count(), 0);
        assert!(!state.recalculate);
    }

    #[test]
    fn test_remove_obstacle_reveals() {
        let (mut state, mut host) = setup(6, 6, 0, 35);
        let tile = state.add_obstacle(&mut host).unwrap();
        assert_eq!(state.remove_obstacle(&mut host), Some(tile));
        assert!(state.grid.tile(tile).is_active());
        assert!(host.is_tile_visible(tile));
        assert_eq!(state.stats.obstacles_removed, 1);
    }

    #[test]
    fn test_explosion_stays_near_target() {
        let (mut state, mut host) = setup(20, 20, 0, 210);
        let hidden = state.explode(&mut host);

        assert!(!hidden.is_empty());
        assert!(hidden.len() <= 6);
        for &index in &hidden {
            let tile = state.grid.tile(index);
            assert!((7..=12).contains(&tile.row), "row {}", tile.row);
            assert!((7..=12).contains(&tile.col), "col {}", tile.col);
            assert_ne!(index, 210);
        }
    }

    #[test]
    fn test_explosion_at_capacity_swaps_obstacles() {
        let (mut state, mut host) = setup(8, 8, 0, 27);
        while state.add_obstacle(&mut host).is_some() {}
        let max = state.grid.max_hidden();

        for _ in 0..20 {
            state.explode(&mut host);
            assert!(state.grid.hidden_count() <= max);
            assert!(state.grid.tile(27).is_active());
            assert!(state.grid.tile(0).is_active());
        }
    }

    #[test]
    fn test_explosion_reports_only_tiles_still_hidden() {
        for seed in 0..40 {
            let settings = SimSettings {
                grid_width: 8,
                grid_height: 8,
                ..Default::default()
            };
            let mut state = ChaseState::new(&settings, seed).unwrap();
            let mut host =
                SandboxHost::new(state.ground_position(0), state.ground_position(27), state.grid.area());
            while state.add_obstacle(&mut host).is_some() {}

            let before = state.stats.tiles_exploded;
            let hidden = state.explode(&mut host);

            for &tile in &hidden {
                assert!(!state.grid.tile(tile).is_active(), "seed {} tile {}", seed, tile);
                assert!(state.grid.hidden().contains(&tile));
            }
            assert_eq!(state.stats.tiles_exploded - before, hidden.len() as u64);
            assert!(state.events.contains(&ChaseEvent::Exploded { hidden }));
        }
    }

    #[test]
    fn test_explosion_with_no_capacity_gives_up() {
        let settings = SimSettings {
            grid_width: 6,
            grid_height: 6,
            max_hidden_ratio: 0.0,
            ..Default::default()
        };
        let mut state = ChaseState::new(&settings, 3).unwrap();
        let mut host =
            SandboxHost::new(state.ground_position(0), state.ground_position(21), state.grid.area());

        let mut expected_rng = state.rng.clone();
        assert!(state.explode(&mut host).is_empty());
        assert_eq!(state.grid.hidden_count(), 0);
        assert_eq!(state.stats.tiles_exploded, 0);
        assert!(host.hidden_tiles().is_empty());

        // Only draws up to the first free candidate were made
        let mut draws = 0;
        while expected_rng != state.rng {
            expected_rng.random_range(-3i32..3);
            draws += 1;
            assert!(draws <= 2 * 20, "explosion kept drawing");
        }
        assert_eq!(draws % 2, 0);
    }

    #[test]
    fn test_explosion_off_grid_target_does_nothing() {
        let (mut state, mut host) = setup(6, 6, 0, 35);
        host.set_position(Actor::Target, glam::Vec3::new(-5.0, 0.0, -5.0));
        assert!(state.explode(&mut host).is_empty());
        assert_eq!(state.grid.hidden_count(), 0);
    }
}
