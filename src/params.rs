//! Generation parameters and configuration files
//!
//! Every tunable of the pipeline lives here. Parameters can be loaded from a
//! JSON file; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::{TerrainType, DESERT, FOREST, GLACIER, GRASS, MAX_ELEVATION, WATER};

/// Errors from loading or validating parameters
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ParamsError {
    ParamsError::Invalid { field, reason: reason.into() }
}

fn check_frac_range(field: &'static str, min: f64, max: f64) -> Result<(), ParamsError> {
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
        return Err(invalid(field, format!("need 0 <= min ({}) <= max ({}) <= 1", min, max)));
    }
    Ok(())
}

fn check_terrain(field: &'static str, ch: char) -> Result<(), ParamsError> {
    if TerrainType::from_char(ch).is_none() {
        return Err(invalid(field, format!("unknown terrain '{}'", ch)));
    }
    Ok(())
}

/// Parameters of the Gaussian height field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapParams {
    /// Elevation every cell starts at
    pub initial_elevation: i32,
    /// Number of Gaussians as a factor of the map area
    pub gauss_factor: f64,
    /// Normal distribution over bump amplitudes
    pub mean_growth: f64,
    pub stdev_growth: f64,
    /// Range of the axis correlation
    pub min_cov: f64,
    pub max_cov: f64,
    /// Range of the standard deviations (cells)
    pub min_stdev: f64,
    pub max_stdev: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            initial_elevation: MAX_ELEVATION / 2,
            gauss_factor: 0.003,
            mean_growth: 0.0,
            stdev_growth: MAX_ELEVATION as f64 * 0.125,
            min_cov: -0.5,
            max_cov: 0.5,
            min_stdev: 3.0,
            max_stdev: 30.0,
        }
    }
}

impl HeightmapParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(0.0..).contains(&self.gauss_factor) || !self.gauss_factor.is_finite() {
            return Err(invalid("heightmap.gauss_factor", "must be a finite value >= 0"));
        }
        // Amplitudes are resampled until non-zero; a degenerate distribution never ends.
        if !(self.stdev_growth > 0.0 || self.mean_growth.abs() >= 1.0) {
            return Err(invalid("heightmap.stdev_growth", "amplitude distribution can only produce zero"));
        }
        if !(self.min_cov > -1.0 && self.max_cov < 1.0 && self.min_cov <= self.max_cov) {
            return Err(invalid("heightmap.min_cov", "need -1 < min_cov <= max_cov < 1"));
        }
        if !(self.min_stdev > 0.0 && self.min_stdev <= self.max_stdev) {
            return Err(invalid("heightmap.min_stdev", "need 0 < min_stdev <= max_stdev"));
        }
        Ok(())
    }
}

/// Parameters of one liquid placement pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidParams {
    /// Terrain character of the liquid
    pub terrain: char,
    /// Stop once this fraction of the area has been converted
    pub min_frac: f64,
    /// Never convert more than this fraction of the area
    pub max_frac: f64,
    /// Largest rise above a minimum, as a fraction of MAX_ELEVATION
    pub rise_frac: f64,
    /// Smallest accepted body, in cells and as a fraction of the area (the larger wins)
    pub min_body_cells: usize,
    pub min_body_frac: f64,
    /// Largest accepted body as a fraction of the area
    pub max_body_frac: f64,
}

impl Default for LiquidParams {
    fn default() -> Self {
        Self {
            terrain: WATER.ch,
            min_frac: 0.0,
            max_frac: 1.0,
            rise_frac: 0.2,
            min_body_cells: 0,
            min_body_frac: 0.0,
            max_body_frac: 1.0,
        }
    }
}

impl LiquidParams {
    /// Ocean pass: about half the world, large bodies only.
    pub fn oceans() -> Self {
        Self {
            min_frac: 0.45,
            max_frac: 0.55,
            min_body_frac: 0.01,
            max_body_frac: 0.4,
            ..Self::default()
        }
    }

    /// Lake pass: many small bodies.
    pub fn lakes() -> Self {
        Self {
            min_frac: 0.05,
            max_frac: 0.8,
            rise_frac: 0.1,
            min_body_cells: 7,
            max_body_frac: 0.01,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        check_terrain("liquid.terrain", self.terrain)?;
        check_frac_range("liquid.min_frac", self.min_frac, self.max_frac)?;
        check_frac_range("liquid.min_body_frac", self.min_body_frac, self.max_body_frac)?;
        if !(0.0..=1.0).contains(&self.rise_frac) {
            return Err(invalid("liquid.rise_frac", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Parameters of one terrain growth pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Terrain that is grown
    pub terrain: char,
    /// Terrains the growth may spread over
    pub fertile: Vec<char>,
    pub min_frac: f64,
    pub max_frac: f64,
    /// Fraction of the target that is seeded up front
    pub seed_frac: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self::forest()
    }
}

impl GrowthParams {
    pub fn forest() -> Self {
        Self {
            terrain: FOREST.ch,
            fertile: vec![GRASS.ch],
            min_frac: 0.20,
            max_frac: 0.25,
            seed_frac: 0.005,
        }
    }

    pub fn desert() -> Self {
        Self {
            terrain: DESERT.ch,
            fertile: vec![GRASS.ch, FOREST.ch],
            min_frac: 0.04,
            max_frac: 0.08,
            seed_frac: 0.0002,
        }
    }

    pub fn glacier() -> Self {
        Self {
            terrain: GLACIER.ch,
            ..Self::desert()
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        check_terrain("growth.terrain", self.terrain)?;
        for &ch in &self.fertile {
            check_terrain("growth.fertile", ch)?;
        }
        check_frac_range("growth.min_frac", self.min_frac, self.max_frac)?;
        if !(0.0..=1.0).contains(&self.seed_frac) {
            return Err(invalid("growth.seed_frac", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// River parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverParams {
    /// Shorter paths are discarded
    pub min_size: usize,
    /// Total river cells, as a fraction of the area
    pub max_frac: f64,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            min_size: 50,
            max_frac: 0.005,
        }
    }
}

/// All generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenParams {
    pub heightmap: HeightmapParams,
    /// Cells at or above this fraction of MAX_ELEVATION start as mountain
    pub mountain_frac: f64,
    pub oceans: LiquidParams,
    pub lakes: LiquidParams,
    /// Growth passes, applied in order
    pub growth: Vec<GrowthParams>,
    pub rivers: RiverParams,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            heightmap: HeightmapParams::default(),
            mountain_frac: 0.75,
            oceans: LiquidParams::oceans(),
            lakes: LiquidParams::lakes(),
            growth: vec![GrowthParams::forest(), GrowthParams::desert(), GrowthParams::glacier()],
            rivers: RiverParams::default(),
        }
    }
}

impl GenParams {
    /// Load parameters from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        let params: GenParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        self.heightmap.validate()?;
        if !(0.0..=1.0).contains(&self.mountain_frac) {
            return Err(invalid("mountain_frac", "must be within [0, 1]"));
        }
        self.oceans.validate()?;
        self.lakes.validate()?;
        for g in &self.growth {
            g.validate()?;
        }
        if !(0.0..=1.0).contains(&self.rivers.max_frac) {
            return Err(invalid("rivers.max_frac", "must be within [0, 1]"));
        }
        Ok(())
    }
}
