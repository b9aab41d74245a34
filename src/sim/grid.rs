//! Fixed-size tile grid with a capacity-bounded pool of hidden tiles

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::consts::{FREE_TILE_ATTEMPTS_PER_TILE, MAX_GRID_AREA, MAX_HIDDEN_RATIO};
use crate::{ChaseError, ChaseResult};

/// Row-major grid of tiles
///
/// `width` is the number of columns, `height` the number of rows. Tiles are
/// allocated once and addressed by index for the lifetime of the grid; only
/// their active flag and search scratch change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    floor_level: f32,
    tiles: Vec<Tile>,
    /// Currently hidden tiles, in the order they were hidden
    hidden: Vec<usize>,
    max_hidden: usize,
}

impl Grid {
    /// Create a grid with the default hidden-tile ratio
    pub fn new(width: usize, height: usize, floor_level: f32) -> ChaseResult<Self> {
        Self::with_hidden_ratio(width, height, floor_level, MAX_HIDDEN_RATIO)
    }

    pub fn with_hidden_ratio(
        width: usize,
        height: usize,
        floor_level: f32,
        hidden_ratio: f32,
    ) -> ChaseResult<Self> {
        let area = width
            .checked_mul(height)
            .filter(|&area| area > 0 && area <= MAX_GRID_AREA)
            .ok_or(ChaseError::InvalidGrid { width, height })?;
        let tiles = (0..area)
            .map(|index| Tile::new(index, index / width, index % width, floor_level))
            .collect();

        Ok(Self {
            width,
            height,
            floor_level,
            tiles,
            hidden: Vec::new(),
            max_hidden: (area as f32 * hidden_ratio).floor() as usize,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn floor_level(&self) -> f32 {
        self.floor_level
    }

    /// Most tiles that may be hidden at once
    #[inline]
    pub fn max_hidden(&self) -> usize {
        self.max_hidden
    }

    /// Hidden tile indices, oldest first
    #[inline]
    pub fn hidden(&self) -> &[usize] {
        &self.hidden
    }

    #[inline]
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.hidden.len() >= self.max_hidden
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Tile by index. Panics on an out-of-range index like slice indexing.
    #[inline]
    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    #[inline]
    pub fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles[index]
    }

    /// Row-major index for a signed coordinate, if it is on the grid
    pub fn index_of(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Bounds-checked cell access
    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        self.index_of(row as i64, col as i64).map(|i| &self.tiles[i])
    }

    /// Orthogonal neighbors in search order: row-1, col-1, row+1, col+1
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let tile = &self.tiles[index];
        let (row, col) = (tile.row as i64, tile.col as i64);
        [(row - 1, col), (row, col - 1), (row + 1, col), (row, col + 1)]
            .into_iter()
            .filter_map(move |(r, c)| self.index_of(r, c))
    }

    /// Tile whose footprint contains the planar position (first in index order)
    ///
    /// Linear scan; fine for the few hundred tiles this grid is used with.
    pub fn closest_tile(&self, position: Vec3) -> Option<usize> {
        self.tiles
            .iter()
            .find(|tile| tile.contains_point(position))
            .map(|tile| tile.index)
    }

    /// Whether any occupant stands on the tile
    pub fn is_occupied(&self, index: usize, occupants: &[Vec3]) -> bool {
        let tile = &self.tiles[index];
        occupants.iter().any(|&pos| tile.contains_point(pos))
    }

    /// Active tile nobody stands on
    pub fn is_free(&self, index: usize, occupants: &[Vec3]) -> bool {
        self.tiles[index].is_active() && !self.is_occupied(index, occupants)
    }

    /// Uniformly sample an active, unoccupied tile
    ///
    /// Sampling is bounded; after `FREE_TILE_ATTEMPTS_PER_TILE * area` misses
    /// the grid is scanned from a random offset so a free tile is still found
    /// when one exists.
    pub fn random_free_tile<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupants: &[Vec3],
    ) -> ChaseResult<usize> {
        let area = self.area();
        let attempts = area * FREE_TILE_ATTEMPTS_PER_TILE;

        for _ in 0..attempts {
            let index = rng.random_range(0..area);
            if self.is_free(index, occupants) {
                return Ok(index);
            }
        }

        let offset = rng.random_range(0..area);
        (0..area)
            .map(|i| (offset + i) % area)
            .find(|&index| self.is_free(index, occupants))
            .ok_or(ChaseError::NoFreeTile {
                attempts: attempts + area,
            })
    }

    /// Hide a tile and add it to the pool. Capacity is the caller's concern.
    /// Returns false if the tile was already hidden.
    pub fn hide_tile(&mut self, index: usize) -> bool {
        let tile = &mut self.tiles[index];
        if !tile.is_active() {
            return false;
        }
        tile.enable_obstacle();
        self.hidden.push(index);
        true
    }

    /// Reveal a tile and drop it from the pool. Returns false if it was not hidden.
    pub fn reveal_tile(&mut self, index: usize) -> bool {
        let tile = &mut self.tiles[index];
        if tile.is_active() {
            return false;
        }
        tile.remove_obstacle();
        self.hidden.retain(|&i| i != index);
        true
    }

    /// Reveal the tile at position `slot` of the hidden pool
    pub fn reveal_hidden_at(&mut self, slot: usize) -> Option<usize> {
        if slot >= self.hidden.len() {
            return None;
        }
        let index = self.hidden.remove(slot);
        self.tiles[index].remove_obstacle();
        Some(index)
    }

    /// Manhattan distance between two tile centers on the ground plane
    pub fn manhattan(&self, a: usize, b: usize) -> f32 {
        let d = self.tiles[a].planar_position() - self.tiles[b].planar_position();
        d.x.abs() + d.y.abs()
    }
}
