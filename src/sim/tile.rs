//! Grid tiles and their per-search scratch state

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{STEP_COST, TILE_HALF_EXTENT};
use crate::planar;

/// A single grid cell
///
/// `active == false` marks the tile as an obstacle (hidden). The search
/// scratch (`parent`, `g`, `h`) is only meaningful during and after a
/// search pass and is reset at the start of every pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Row-major index in the grid
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Cell center (x = row axis, z = column axis)
    position: Vec3,
    active: bool,
    #[serde(skip)]
    parent: Option<usize>,
    #[serde(skip)]
    g: f32,
    #[serde(skip)]
    h: f32,
}

impl Tile {
    pub fn new(index: usize, row: usize, col: usize, floor_level: f32) -> Self {
        Self {
            index,
            row,
            col,
            position: Vec3::new(row as f32 + 0.5, floor_level, col as f32 + 0.5),
            active: true,
            parent: None,
            g: 0.0,
            h: 0.0,
        }
    }

    /// Cell center in world space
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Cell center projected onto the ground plane
    #[inline]
    pub fn planar_position(&self) -> Vec2 {
        planar(self.position)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the tile as an obstacle
    pub fn enable_obstacle(&mut self) {
        self.active = false;
    }

    /// Make the tile traversable again
    pub fn remove_obstacle(&mut self) {
        self.active = true;
    }

    /// Whether a planar point lies on this tile's footprint (edges inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let center = self.position;
        point.x <= center.x + TILE_HALF_EXTENT
            && point.x >= center.x - TILE_HALF_EXTENT
            && point.z <= center.z + TILE_HALF_EXTENT
            && point.z >= center.z - TILE_HALF_EXTENT
    }

    /// Clear search scratch
    pub fn reset_scratch(&mut self) {
        self.parent = None;
        self.g = 0.0;
        self.h = 0.0;
    }

    /// Predecessor on the best path found this pass (self for the root)
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Mark this tile as the root of a search pass
    pub fn seed_root(&mut self) {
        self.parent = Some(self.index);
        self.g = 0.0;
    }

    /// Claim the tile for `parent`. First writer wins; returns false if the
    /// tile was already claimed this pass.
    pub fn claim(&mut self, parent: usize, parent_g: f32) -> bool {
        if self.parent.is_some() {
            return false;
        }
        self.parent = Some(parent);
        self.g = parent_g + STEP_COST;
        true
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.g
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn set_h(&mut self, h: f32) {
        self.h = h;
    }

    /// Estimated total cost through this tile
    #[inline]
    pub fn f(&self) -> f32 {
        self.g + self.h
    }
}
