//! Text serialization of a world
//!
//! Layout: a `"<width> <height>"` line, then two bytes per cell in storage
//! order (`'0' + elevation`, terrain char) on one line. Depth and the start
//! location are not serialized.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::terrain::{TerrainType, MAX_ELEVATION};
use crate::world::World;

/// Failure to read a serialized world
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("missing dimension line")]
    MissingHeader,

    #[error("bad dimension line {0:?}: expected two positive integers")]
    BadDimensions(String),

    #[error("cell {index}: elevation {digit:?} is outside 0..={max}", max = MAX_ELEVATION)]
    BadElevation { index: usize, digit: char },

    #[error("cell {index}: unknown terrain {ch:?}")]
    UnknownTerrain { index: usize, ch: char },

    #[error("truncated input: {found} of {expected} cells")]
    Truncated { found: usize, expected: usize },

    #[error("unexpected data after the last cell")]
    TrailingData,
}

/// Write `world` in the text format.
///
/// Panics if an elevation does not fit in one digit.
pub fn write_world<W: Write>(world: &World, out: &mut W) -> io::Result<()> {
    writeln!(out, "{} {}", world.width(), world.height())?;

    let mut body = Vec::with_capacity(2 * world.area() + 1);
    for (i, cell) in world.cells.values().enumerate() {
        assert!(
            (0..=MAX_ELEVATION).contains(&cell.elevation),
            "cell {} elevation {} out of range",
            i,
            cell.elevation
        );
        body.push(b'0' + cell.elevation as u8);
        let mut buf = [0u8; 4];
        body.extend_from_slice(cell.terrain.ch.encode_utf8(&mut buf).as_bytes());
    }
    body.push(b'\n');
    out.write_all(&body)
}

/// Serialize to a `String`.
pub fn world_to_string(world: &World) -> String {
    let mut buf = Vec::new();
    write_world(world, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

/// Read a world in the text format. Lines before the dimension line that
/// start with `#` are skipped.
pub fn read_world<R: BufRead>(input: R) -> Result<World, ReadError> {
    let mut lines = input.lines();

    let header = loop {
        match lines.next() {
            None => return Err(ReadError::MissingHeader),
            Some(line) => {
                let line = line?;
                if !line.starts_with('#') {
                    break line;
                }
            }
        }
    };
    let (width, height) = parse_dimensions(&header)?;

    let mut body = String::new();
    for line in lines {
        body.push_str(line?.trim_end());
    }

    // Check the body against the header before allocating the grid.
    let expected = width * height;
    let found = body.chars().count() / 2;
    if found < expected {
        return Err(ReadError::Truncated { found, expected });
    }

    let mut world = World::new(width, height);
    let mut chars = body.chars();
    for index in 0..expected {
        let (Some(digit), Some(ch)) = (chars.next(), chars.next()) else {
            return Err(ReadError::Truncated { found: index, expected });
        };
        let elevation = digit
            .to_digit(10)
            .map(|d| d as i32)
            .filter(|d| *d <= MAX_ELEVATION)
            .ok_or(ReadError::BadElevation { index, digit })?;
        let terrain = TerrainType::from_char(ch).ok_or(ReadError::UnknownTerrain { index, ch })?;

        let cell = world.cells.at_index_mut(index);
        cell.elevation = elevation;
        cell.terrain = terrain;
    }

    if chars.next().is_some() {
        return Err(ReadError::TrailingData);
    }
    Ok(world)
}

fn parse_dimensions(line: &str) -> Result<(usize, usize), ReadError> {
    let bad = || ReadError::BadDimensions(line.to_string());
    let mut fields = line.split_whitespace();
    let width: usize = fields.next().and_then(|f| f.parse().ok()).ok_or_else(bad)?;
    let height: usize = fields.next().and_then(|f| f.parse().ok()).ok_or_else(bad)?;
    if fields.next().is_some() || width == 0 || height == 0 || width.checked_mul(height).is_none() {
        return Err(bad());
    }
    Ok((width, height))
}
