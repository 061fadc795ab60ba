//! Terrain type registry
//!
//! Every cell points into this static table. Terrain identity is reference
//! identity: two cells share a terrain when their references point at the same
//! registry entry.

/// Highest elevation a cell may hold once generation has finished.
/// Elevations are serialized as a single decimal digit.
pub const MAX_ELEVATION: i32 = 9;

/// A kind of terrain
#[derive(Debug)]
pub struct TerrainType {
    /// Character code used by the serialized world format
    pub ch: char,
    /// Human readable name
    pub name: &'static str,
    /// Color at the highest elevation (RGB)
    pub color: (u8, u8, u8),
}

impl TerrainType {
    /// Look up the registry entry for a character code.
    pub fn from_char(ch: char) -> Option<&'static TerrainType> {
        TERRAIN.iter().find(|t| t.ch == ch)
    }

    /// Identity comparison against a registry entry.
    pub fn is(&self, other: &TerrainType) -> bool {
        std::ptr::eq(self, other)
    }

    /// True if this terrain's character is one of `chars`.
    pub fn is_any(&self, chars: &[char]) -> bool {
        chars.contains(&self.ch)
    }

    /// Position of this entry in the registry (used for per-terrain counters).
    pub fn index(&self) -> usize {
        TERRAIN
            .iter()
            .position(|t| t.is(self))
            .unwrap_or_else(|| panic!("terrain '{}' is not a registry entry", self.ch))
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The canonical terrain table.
pub static TERRAIN: [TerrainType; 7] = [
    TerrainType { ch: 'g', name: "grass", color: (0, 255, 0) },
    TerrainType { ch: 'm', name: "mountain", color: (196, 128, 0) },
    TerrainType { ch: 'w', name: "water", color: (0, 0, 255) },
    TerrainType { ch: 'l', name: "lava", color: (255, 0, 0) },
    TerrainType { ch: 'd', name: "desert", color: (255, 255, 0) },
    TerrainType { ch: 'f', name: "forest", color: (0, 200, 128) },
    TerrainType { ch: 'i', name: "glacier", color: (196, 196, 255) },
];

pub static GRASS: &TerrainType = &TERRAIN[0];
pub static MOUNTAIN: &TerrainType = &TERRAIN[1];
pub static WATER: &TerrainType = &TERRAIN[2];
pub static DESERT: &TerrainType = &TERRAIN[4];
pub static FOREST: &TerrainType = &TERRAIN[5];
pub static GLACIER: &TerrainType = &TERRAIN[6];

/// Resolve a character to a registry entry, panicking on unknown codes.
/// Only for codes coming from validated parameters.
pub(crate) fn terrain(ch: char) -> &'static TerrainType {
    TerrainType::from_char(ch).unwrap_or_else(|| panic!("unknown terrain character '{}'", ch))
}
