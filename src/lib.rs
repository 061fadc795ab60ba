//! Toroidal world generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod biomes;
pub mod export;
pub mod gaussian;
pub mod generator;
pub mod heightmap;
pub mod map_export;
pub mod params;
pub mod rivers;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod topology;
pub mod water_bodies;
pub mod world;
