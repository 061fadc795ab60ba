//! Liquid placement
//!
//! Floods local minima of the topological map until a target share of the
//! world is covered. Oceans and lakes are both made here; they differ only in
//! their parameters.

use rand::Rng;

use crate::params::LiquidParams;
use crate::terrain::{terrain, TerrainType, GRASS, MAX_ELEVATION};
use crate::tilemap::Tilemap;
use crate::topology::TopoMap;
use crate::world::World;

/// Outcome of a liquid placement pass
#[derive(Clone, Debug, Default)]
pub struct LiquidReport {
    /// Cells converted to the liquid by this pass
    pub added: Vec<(usize, usize)>,
    /// Number of bodies flooded
    pub bodies: usize,
    /// Minima abandoned because no height fit the budget
    pub abandoned: usize,
    /// Minima never tried; zero when the pass stopped for lack of candidates
    pub minima_left: usize,
}

impl LiquidReport {
    /// Mask of the converted cells (e.g. the ocean set used by rivers).
    pub fn mask(&self, width: usize, height: usize) -> Tilemap<bool> {
        let mut mask = Tilemap::new_with(width, height, false);
        for &(x, y) in &self.added {
            mask.set(x as i64, y as i64, true);
        }
        mask
    }
}

/// Flood random grass minima with the liquid `ch` until at least
/// `floor(area*min_frac)` cells are converted, never exceeding
/// `floor(area*max_frac)`. Surfaces never rise above `MAX_ELEVATION`.
pub fn add_liquid<R: Rng>(world: &mut World, ch: char, min_frac: f64, max_frac: f64, rng: &mut R) -> LiquidReport {
    let params = LiquidParams {
        terrain: ch,
        min_frac,
        max_frac,
        ..LiquidParams::default()
    };
    add_liquid_with(world, &params, rng)
}

/// Liquid placement with the full parameter set, including per-body bounds.
pub fn add_liquid_with<R: Rng>(world: &mut World, params: &LiquidParams, rng: &mut R) -> LiquidReport {
    let liquid = terrain(params.terrain);
    let area = world.area() as f64;
    let min_cells = (area * params.min_frac) as usize;
    let max_cells = (area * params.max_frac) as usize;
    let min_body = params.min_body_cells.max((area * params.min_body_frac) as usize);
    let max_body = (area * params.max_body_frac) as usize;
    let max_rise = (params.rise_frac * MAX_ELEVATION as f64).ceil() as i32;

    let mut map = TopoMap::new(world);
    let mut report = LiquidReport::default();
    let mut n = 0usize;

    let mut minima = map.minima();
    while !minima.is_empty() && n < min_cells {
        let min = minima.swap_remove(rng.gen_range(0..minima.len()));
        if !map.contour(min).terrain.is(GRASS) {
            continue;
        }

        let amount = if max_rise > 1 { rng.gen_range(1..max_rise) } else { 1 };
        let base = map.contour(min).height;
        let top = (base + amount).min(MAX_ELEVATION);

        let mut accepted = None;
        for target in (base + 1..=top).rev() {
            let flooded = map.flood(min, target);
            let size = additional_area(&map, &flooded, liquid);
            if size > max_body || n + size > max_cells {
                continue;
            }
            if size >= min_body {
                accepted = Some((target, flooded, size));
            }
            break;
        }

        let Some((target, flooded, size)) = accepted else {
            report.abandoned += 1;
            continue;
        };

        for id in flooded {
            let c = map.contour_mut(id);
            c.terrain = liquid;
            c.depth += target - c.height;
            c.height = target;
        }
        n += size;
        report.bodies += 1;
    }
    report.minima_left = minima.len();

    for idx in map.rasterize(world) {
        if world.cells.at_index(idx).terrain.is(liquid) {
            report.added.push(world.cells.coord(idx));
        }
    }

    tracing::debug!(
        terrain = %liquid,
        cells = n,
        bodies = report.bodies,
        abandoned = report.abandoned,
        "liquid placed"
    );
    report
}

/// Cells of the flooded contours that are not already the liquid.
fn additional_area(map: &TopoMap, flooded: &[usize], liquid: &TerrainType) -> usize {
    flooded
        .iter()
        .map(|&id| map.contour(id))
        .filter(|c| !c.terrain.is(liquid))
        .map(|c| c.size)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::generate_elevations;
    use crate::params::HeightmapParams;
    use crate::terrain::WATER;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bumpy_world(seed: u64) -> World {
        let mut world = World::new(80, 60);
        let params = HeightmapParams {
            gauss_factor: 0.01,
            ..HeightmapParams::default()
        };
        generate_elevations(&mut world, &params, &mut ChaCha8Rng::seed_from_u64(seed));
        world
    }

    fn water_cells(world: &World) -> usize {
        world.cells.values().filter(|c| c.terrain.is(WATER)).count()
    }

    #[test]
    fn test_single_basin_floods_one_level() {
        // A pit of 1s in a field of 3s: the basin rises to 2 at most.
        let mut world = World::new(6, 6);
        for (_, _, c) in world.cells.iter_mut() {
            c.elevation = 3;
        }
        world.at_mut(2, 2).elevation = 1;
        world.at_mut(3, 2).elevation = 1;

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let report = add_liquid(&mut world, 'w', 0.05, 0.5, &mut rng);

        assert_eq!(report.bodies, 1);
        assert_eq!(report.added.len(), 2);
        assert!(world.at(2, 2).terrain.is(WATER));
        assert_eq!(world.at(2, 2).elevation, 2);
        assert_eq!(world.at(2, 2).depth, 1);
        assert_eq!(world.at(0, 0).elevation, 3);
    }

    #[test]
    fn test_liquid_budget() {
        for seed in 0..6 {
            let mut world = bumpy_world(seed);
            let area = world.area() as f64;
            let (min_frac, max_frac) = (0.3, 0.4);
            let mut rng = ChaCha8Rng::seed_from_u64(seed + 100);

            let report = add_liquid(&mut world, 'w', min_frac, max_frac, &mut rng);
            let placed = water_cells(&world);

            assert_eq!(placed, report.added.len());
            assert!(placed <= (area * max_frac) as usize);
            // Either the minimum was reached or every minimum was tried.
            assert!(placed >= (area * min_frac) as usize || report.minima_left == 0);
        }
    }

    #[test]
    fn test_unreachable_budget_exhausts_minima() {
        for seed in 0..4 {
            let mut world = bumpy_world(seed);
            let report = add_liquid(&mut world, 'w', 1.0, 1.0, &mut ChaCha8Rng::seed_from_u64(seed));
            assert!(report.added.len() == world.area() || report.minima_left == 0);
        }
    }

    #[test]
    fn test_flooded_cells_are_level_with_depth() {
        let mut world = bumpy_world(11);
        let before = world.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = add_liquid(&mut world, 'w', 0.2, 0.3, &mut rng);

        for &(x, y) in &report.added {
            let (x, y) = (x as i64, y as i64);
            let now = world.at(x, y);
            let old = before.at(x, y);
            assert!(now.elevation >= old.elevation);
            assert_eq!(now.depth, now.elevation - old.elevation);
        }
        // Dry cells are untouched.
        for (x, y, c) in world.cells.iter() {
            if !c.terrain.is(WATER) {
                assert_eq!(c, before.at(x as i64, y as i64));
            }
        }
    }

    #[test]
    fn test_second_pass_skips_existing_liquid() {
        let mut world = bumpy_world(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let oceans = add_liquid_with(&mut world, &LiquidParams::oceans(), &mut rng);
        let ocean_mask = oceans.mask(world.width(), world.height());

        let lakes = add_liquid_with(&mut world, &LiquidParams::lakes(), &mut rng);
        for &(x, y) in &lakes.added {
            assert!(!*ocean_mask.get(x as i64, y as i64));
        }
        assert_eq!(water_cells(&world), oceans.added.len() + lakes.added.len());
    }

    #[test]
    fn test_surface_never_rises_past_max_elevation() {
        let params = LiquidParams {
            min_frac: 0.45,
            rise_frac: 1.0,
            ..LiquidParams::default()
        };
        params.validate().unwrap();

        for seed in 0..20 {
            let mut world = World::new(8, 8);
            for (_, _, c) in world.cells.iter_mut() {
                c.elevation = 6;
            }
            let report = add_liquid_with(&mut world, &params, &mut ChaCha8Rng::seed_from_u64(seed));

            assert_eq!(report.bodies, 1);
            assert!(world.cells.values().all(|c| c.elevation <= MAX_ELEVATION));
            assert!(world.cells.values().all(|c| c.depth == c.elevation - 6));
        }

        // A minimum already at the top has no room to flood.
        let mut world = World::new(4, 4);
        for (_, _, c) in world.cells.iter_mut() {
            c.elevation = MAX_ELEVATION;
        }
        let report = add_liquid_with(&mut world, &params, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.bodies, 0);
        assert_eq!(report.abandoned, 1);
    }

    #[test]
    fn test_body_limits_reject_small_floods() {
        let mut world = World::new(6, 6);
        for (_, _, c) in world.cells.iter_mut() {
            c.elevation = 3;
        }
        world.at_mut(2, 2).elevation = 1;

        let params = LiquidParams {
            min_frac: 0.05,
            max_frac: 0.5,
            min_body_cells: 2,
            ..LiquidParams::default()
        };
        let report = add_liquid_with(&mut world, &params, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(report.bodies, 0);
        assert!(report.added.is_empty());
        assert!(world.cells.values().all(|c| c.terrain.is(GRASS)));
    }
}
