//! World grid container
//!
//! The world is a torus of cells. It is the only structure that outlives
//! generation: consumers read it through `at` or the serialized format.

use crate::terrain::{TerrainType, GRASS, MAX_ELEVATION, TERRAIN};
use crate::tilemap::Tilemap;

/// A single grid cell
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    /// Terrain type (a registry entry)
    pub terrain: &'static TerrainType,
    /// Elevation of the ground or of the surface of a liquid
    pub elevation: i32,
    /// How far the liquid surface sits above the dry ground
    pub depth: i32,
}

impl Cell {
    /// Elevation of the ground (or the floor of a liquid body).
    pub fn floor(&self) -> i32 {
        self.elevation - self.depth
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            terrain: GRASS,
            elevation: 0,
            depth: 0,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.terrain.is(other.terrain)
            && self.elevation == other.elevation
            && self.depth == other.depth
    }
}

/// The generated world
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub cells: Tilemap<Cell>,
    /// Start location (a grass cell), if one was placed
    pub start: Option<(usize, usize)>,
}

impl World {
    /// Create a world of grass at elevation 0.
    /// Panics if a dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Tilemap::new(width, height),
            start: None,
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Cell at any coordinate; coordinates wrap around the torus.
    pub fn at(&self, x: i64, y: i64) -> &Cell {
        self.cells.get(x, y)
    }

    pub fn at_mut(&mut self, x: i64, y: i64) -> &mut Cell {
        self.cells.get_mut(x, y)
    }

    /// Coordinates of all cells whose terrain is one of `types`, in storage order.
    pub fn locs_with_type(&self, types: &[char]) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .filter(|(_, _, c)| c.terrain.is_any(types))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Number of cells of each registry terrain, indexed like `TERRAIN`.
    pub fn terrain_counts(&self) -> [usize; TERRAIN.len()] {
        let mut counts = [0usize; TERRAIN.len()];
        for cell in self.cells.values() {
            counts[cell.terrain.index()] += 1;
        }
        counts
    }

    /// Clamp every elevation into `[0, MAX_ELEVATION]`.
    pub fn clamp_elevations(&mut self) {
        for (_, _, cell) in self.cells.iter_mut() {
            cell.elevation = cell.elevation.clamp(0, MAX_ELEVATION);
        }
    }

    /// Lowest and highest elevation present.
    pub fn elevation_range(&self) -> (i32, i32) {
        self.cells.values().fold((i32::MAX, i32::MIN), |(lo, hi), c| {
            (lo.min(c.elevation), hi.max(c.elevation))
        })
    }
}
