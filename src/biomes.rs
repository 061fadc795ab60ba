//! Terrain classification and growth
//!
//! `init_terrain` gives every cell its starting terrain from elevation alone.
//! The growth passes then spread forest, desert and glacier over contours of
//! the topological map, starting from a few random seeds.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::params::GrowthParams;
use crate::terrain::{terrain, GRASS, MAX_ELEVATION, MOUNTAIN};
use crate::topology::TopoMap;
use crate::world::World;

/// Mark cells at or above `mountain_frac * MAX_ELEVATION` as mountain and
/// everything else as grass.
pub fn init_terrain(world: &mut World, mountain_frac: f64) {
    let min_mountain = MAX_ELEVATION as f64 * mountain_frac;
    for (_, _, cell) in world.cells.iter_mut() {
        cell.terrain = if cell.elevation as f64 >= min_mountain { MOUNTAIN } else { GRASS };
    }
}

/// Outcome of a growth pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrowthReport {
    /// Cells the pass aimed for
    pub target: usize,
    /// Cells converted
    pub grown: usize,
    /// Contours used as initial seeds
    pub seeds: usize,
}

/// Grow forest over grass with the default forest parameters.
pub fn grow_trees<R: Rng>(world: &mut World, rng: &mut R) -> GrowthReport {
    let p = GrowthParams::forest();
    grow_terrain(world, &p.fertile, p.terrain, p.min_frac, p.max_frac, p.seed_frac, rng)
}

/// Run a growth pass described by `params`.
pub fn grow_with<R: Rng>(world: &mut World, params: &GrowthParams, rng: &mut R) -> GrowthReport {
    grow_terrain(
        world,
        &params.fertile,
        params.terrain,
        params.min_frac,
        params.max_frac,
        params.seed_frac,
        rng,
    )
}

/// Spread terrain `ch` over contours whose terrain is in `fertile`.
///
/// A random target between `min_frac` and `max_frac` of the area is chosen.
/// A shuffled `seed_frac` share of the target (at least one contour) is
/// converted up front; then random active contours claim random fertile
/// neighbors until the target is met. Neighbors that would push the total
/// past `max_frac` of the area are never taken, and a contour with no
/// candidates left is retired.
pub fn grow_terrain<R: Rng>(
    world: &mut World,
    fertile: &[char],
    ch: char,
    min_frac: f64,
    max_frac: f64,
    seed_frac: f64,
    rng: &mut R,
) -> GrowthReport {
    let grown_terrain = terrain(ch);
    let area = world.area() as f64;
    let min_cells = (area * min_frac) as usize;
    let max_cells = (area * max_frac) as usize;
    let target = rng.gen_range(min_cells..=max_cells);

    let mut map = TopoMap::new(world);
    let mut land: Vec<usize> = map
        .contours()
        .iter()
        .filter(|c| c.terrain.is_any(fertile))
        .map(|c| c.id)
        .collect();
    land.shuffle(rng);

    let n_seeds = ((target as f64 * seed_frac) as usize).max(1).min(land.len());
    let mut active: Vec<usize> = land[..n_seeds].to_vec();
    let mut n = 0usize;
    for &id in &active {
        let c = map.contour_mut(id);
        c.terrain = grown_terrain;
        n += c.size;
    }

    while !active.is_empty() && n < target {
        let i = rng.gen_range(0..active.len());
        let candidates: Vec<usize> = map
            .contour(active[i])
            .adj
            .iter()
            .copied()
            .filter(|&a| {
                let c = map.contour(a);
                c.terrain.is_any(fertile) && n + c.size <= max_cells
            })
            .collect();

        let Some(&next) = candidates.choose(rng) else {
            active.swap_remove(i);
            continue;
        };
        let c = map.contour_mut(next);
        c.terrain = grown_terrain;
        n += c.size;
        active.push(next);
    }

    map.rasterize(world);

    tracing::debug!(terrain = %grown_terrain, target, grown = n, seeds = n_seeds, "terrain grown");
    GrowthReport {
        target,
        grown: n,
        seeds: n_seeds,
    }
}
