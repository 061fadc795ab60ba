//! World generation pipeline
//!
//! Runs every stage in order, each with its own RNG seeded from
//! [`WorldSeeds`], and collects summary statistics.

use std::time::Instant;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::biomes::{grow_with, init_terrain};
use crate::heightmap::generate_elevations;
use crate::params::GenParams;
use crate::rivers::add_rivers;
use crate::seeds::WorldSeeds;
use crate::terrain::{GRASS, TERRAIN};
use crate::water_bodies::add_liquid_with;
use crate::world::World;

/// Cell count and share of the world for one terrain type
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TerrainShare {
    pub terrain: &'static str,
    pub cells: usize,
    pub percent: f64,
}

/// Summary of a generated world
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationStats {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub gaussians: usize,
    pub terrain: Vec<TerrainShare>,
    pub ocean_cells: usize,
    pub lake_cells: usize,
    pub lakes: usize,
    pub river_cells: usize,
    pub rivers: usize,
    pub start: Option<(usize, usize)>,
}

impl GenerationStats {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Wall-clock timer for one stage, logged when finished.
struct Stage {
    name: &'static str,
    started: Instant,
}

impl Stage {
    fn start(name: &'static str) -> Self {
        tracing::info!("{}...", name);
        Self {
            name,
            started: Instant::now(),
        }
    }

    fn finish(self) {
        tracing::info!(elapsed_ms = self.started.elapsed().as_millis() as u64, "{} done", self.name);
    }
}

/// Generate a complete world.
pub fn generate(width: usize, height: usize, seeds: &WorldSeeds, params: &GenParams) -> (World, GenerationStats) {
    let mut world = World::new(width, height);
    let area = world.area() as f64;

    let stage = Stage::start("Generating elevations");
    let gaussians = generate_elevations(&mut world, &params.heightmap, &mut ChaCha8Rng::seed_from_u64(seeds.heightmap));
    stage.finish();

    let stage = Stage::start("Initializing terrain");
    init_terrain(&mut world, params.mountain_frac);
    stage.finish();

    let stage = Stage::start("Adding oceans");
    let oceans = add_liquid_with(&mut world, &params.oceans, &mut ChaCha8Rng::seed_from_u64(seeds.oceans));
    let ocean_mask = oceans.mask(width, height);
    stage.finish();

    let stage = Stage::start("Adding lakes");
    let lakes = add_liquid_with(&mut world, &params.lakes, &mut ChaCha8Rng::seed_from_u64(seeds.lakes));
    stage.finish();

    for (pass, growth) in params.growth.iter().enumerate() {
        let stage = Stage::start("Growing terrain");
        let mut rng = ChaCha8Rng::seed_from_u64(seeds.growth_pass(pass));
        let report = grow_with(&mut world, growth, &mut rng);
        tracing::info!(terrain = %growth.terrain, cells = report.grown, "growth pass {}", pass);
        stage.finish();
    }

    let stage = Stage::start("Adding rivers");
    let max_count = (area * params.rivers.max_frac) as usize;
    let rivers = add_rivers(
        &mut world,
        &ocean_mask,
        params.rivers.min_size,
        max_count,
        &mut ChaCha8Rng::seed_from_u64(seeds.rivers),
    );
    stage.finish();

    let stage = Stage::start("Placing start location");
    place_start(&mut world, &mut ChaCha8Rng::seed_from_u64(seeds.start));
    stage.finish();

    let counts = world.terrain_counts();
    let terrain = TERRAIN
        .iter()
        .zip(counts)
        .map(|(t, cells)| TerrainShare {
            terrain: t.name,
            cells,
            percent: cells as f64 / area * 100.0,
        })
        .collect();

    let stats = GenerationStats {
        seed: seeds.master,
        width,
        height,
        gaussians,
        terrain,
        ocean_cells: oceans.added.len(),
        lake_cells: lakes.added.len(),
        lakes: lakes.bodies,
        river_cells: rivers.cells,
        rivers: rivers.rivers.len(),
        start: world.start,
    };
    (world, stats)
}

/// Put the start location on a random grass cell. Worlds without grass get
/// no start location.
pub fn place_start<R: Rng>(world: &mut World, rng: &mut R) {
    let grass = world.locs_with_type(&[GRASS.ch]);
    if grass.is_empty() {
        tracing::warn!("no grass for a start location");
        world.start = None;
        return;
    }

    let (x, y) = grass[rng.gen_range(0..grass.len())];
    assert!(
        world.at(x as i64, y as i64).terrain.is(GRASS),
        "start location ({}, {}) is not grass",
        x,
        y
    );
    world.start = Some((x, y));
}
