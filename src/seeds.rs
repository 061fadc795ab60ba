//! Seed management for world generation
//!
//! Each generation stage draws from its own RNG, seeded from a master seed,
//! so tweaking one stage's parameters does not reshuffle the others.

/// Seeds for all generation stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Gaussian height field
    pub heightmap: u64,
    /// Ocean placement
    pub oceans: u64,
    /// Lake placement
    pub lakes: u64,
    /// Terrain growth passes (forest, desert, glacier)
    pub growth: u64,
    /// River search
    pub rivers: u64,
    /// Start location
    pub start: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            heightmap: derive_seed(master, "heightmap"),
            oceans: derive_seed(master, "oceans"),
            lakes: derive_seed(master, "lakes"),
            growth: derive_seed(master, "growth"),
            rivers: derive_seed(master, "rivers"),
            start: derive_seed(master, "start"),
        }
    }

    /// Seed of the `pass`-th terrain growth pass.
    pub fn growth_pass(&self, pass: usize) -> u64 {
        derive_seed(self.growth, &format!("pass{}", pass))
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }
}

/// Builder for overriding individual seeds while deriving the rest from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn heightmap(mut self, seed: u64) -> Self {
        self.seeds.heightmap = seed;
        self
    }

    pub fn oceans(mut self, seed: u64) -> Self {
        self.seeds.oceans = seed;
        self
    }

    pub fn lakes(mut self, seed: u64) -> Self {
        self.seeds.lakes = seed;
        self
    }

    pub fn growth(mut self, seed: u64) -> Self {
        self.seeds.growth = seed;
        self
    }

    pub fn rivers(mut self, seed: u64) -> Self {
        self.seeds.rivers = seed;
        self
    }

    pub fn start(mut self, seed: u64) -> Self {
        self.seeds.start = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
///
/// Uses a fixed mixer so seeds stay the same across toolchains.
fn derive_seed(master: u64, stage: &str) -> u64 {
    stage
        .bytes()
        .fold(splitmix64(master), |h, b| splitmix64(h ^ b as u64))
}

/// One step of the SplitMix64 generator.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, heightmap: {}, oceans: {}, lakes: {}, \
             growth: {}, rivers: {}, start: {} }}",
            self.master, self.heightmap, self.oceans, self.lakes, self.growth, self.rivers, self.start,
        )
    }
}
