//! River placement
//!
//! Rivers start on high ground (mountains, or lakes above the lowest ocean
//! cell) and run down to the ocean along a cheapest path through the raw
//! grid. Edge costs are random, drawn lazily the first time an edge is
//! relaxed, and a tenth as expensive going downhill. Paths never climb.

use std::collections::VecDeque;

use rand::Rng;

use crate::terrain::{MOUNTAIN, WATER};
use crate::tilemap::Tilemap;
use crate::world::{Cell, World};

/// Edge cost range, inclusive
const MIN_EDGE_COST: u32 = 1;
const MAX_EDGE_COST: u32 = 5;

/// Multiplier for edges into strictly lower cells
const DOWNHILL_DISCOUNT: f64 = 0.1;

/// Per-cell scratch state of one river search
#[derive(Clone, Debug)]
struct RiverNode {
    parent: Option<usize>,
    cost: f64,
    pending: bool,
    /// Cost of the edge toward each cardinal neighbor, drawn on first use
    edge_costs: [Option<f64>; 4],
}

impl RiverNode {
    fn new() -> Self {
        Self {
            parent: None,
            cost: f64::INFINITY,
            pending: false,
            edge_costs: [None; 4],
        }
    }
}

/// Outcome of the river pass
#[derive(Clone, Debug, Default)]
pub struct RiverReport {
    /// Accepted paths, each from source to ocean
    pub rivers: Vec<Vec<(usize, usize)>>,
    /// Cells marked as river
    pub cells: usize,
    /// Sources whose path was missing or too short
    pub discarded: usize,
}

/// Lowest elevation among ocean cells, or `None` without an ocean.
pub fn min_ocean_elevation(world: &World, ocean: &Tilemap<bool>) -> Option<i32> {
    world
        .cells
        .iter()
        .filter(|&(x, y, _)| *ocean.get(x as i64, y as i64))
        .map(|(_, _, c)| c.elevation)
        .min()
}

/// Candidate river sources: mountain cells, then non-ocean water cells, at
/// or above the lowest ocean elevation. Each group is in storage order.
pub fn river_sources(world: &World, ocean: &Tilemap<bool>) -> Vec<(usize, usize)> {
    let Some(min) = min_ocean_elevation(world, ocean) else {
        return Vec::new();
    };

    let mountains = world
        .cells
        .iter()
        .filter(|(_, _, c)| c.terrain.is(MOUNTAIN) && c.elevation >= min)
        .map(|(x, y, _)| (x, y));
    let lakes = world
        .cells
        .iter()
        .filter(|&(x, y, c)| c.terrain.is(WATER) && !*ocean.get(x as i64, y as i64) && c.elevation >= min)
        .map(|(x, y, _)| (x, y));
    mountains.chain(lakes).collect()
}

/// Search a path from `source` to the first ocean cell reached.
///
/// Pending cells sit in a FIFO queue; a cell whose cost improves after it
/// was settled is queued again. Returns an empty path if no ocean cell can
/// be reached without going uphill.
pub fn river_path<R: Rng>(
    world: &World,
    ocean: &Tilemap<bool>,
    source: (usize, usize),
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let cells = &world.cells;
    let mut nodes: Vec<Option<RiverNode>> = vec![None; cells.len()];
    let mut queue = VecDeque::new();

    let start = cells.index(source.0 as i64, source.1 as i64);
    let mut init = RiverNode::new();
    init.cost = 0.0;
    init.pending = true;
    nodes[start] = Some(init);
    queue.push_back(start);

    while let Some(idx) = queue.pop_front() {
        let (x, y) = cells.coord(idx);
        if *ocean.at_index(idx) {
            return trace_back(&nodes, cells, idx);
        }

        let (cost, elevation) = {
            let node = nodes[idx].get_or_insert_with(RiverNode::new);
            node.pending = false;
            (node.cost, cells.at_index(idx).elevation)
        };

        for (dir, (nx, ny)) in cells.neighbors(x, y).into_iter().enumerate() {
            let next = cells.index(nx as i64, ny as i64);
            let next_elevation = cells.at_index(next).elevation;
            if next_elevation > elevation {
                continue;
            }

            let edge = {
                let node = nodes[idx].get_or_insert_with(RiverNode::new);
                *node.edge_costs[dir].get_or_insert_with(|| {
                    let c = rng.gen_range(MIN_EDGE_COST..=MAX_EDGE_COST) as f64;
                    if next_elevation < elevation {
                        c * DOWNHILL_DISCOUNT
                    } else {
                        c
                    }
                })
            };

            let kid = nodes[next].get_or_insert_with(RiverNode::new);
            if cost + edge < kid.cost {
                kid.cost = cost + edge;
                kid.parent = Some(idx);
                if !kid.pending {
                    kid.pending = true;
                    queue.push_back(next);
                }
            }
        }
    }

    Vec::new()
}

/// Follow parent links back from `end`, returning the path source first.
fn trace_back(nodes: &[Option<RiverNode>], cells: &Tilemap<Cell>, end: usize) -> Vec<(usize, usize)> {
    let mut path = Vec::new();
    let mut cur = Some(end);
    while let Some(idx) = cur {
        path.push(cells.coord(idx));
        cur = nodes[idx].as_ref().and_then(|n| n.parent);
        assert!(path.len() <= nodes.len(), "cycle in river parent links");
    }
    path.reverse();
    path
}

/// Add rivers until `max_count` river cells are placed or the sources run
/// out. Each source is tried once, in random order. Paths shorter than
/// `min_size` are discarded.
pub fn add_rivers<R: Rng>(
    world: &mut World,
    ocean: &Tilemap<bool>,
    min_size: usize,
    max_count: usize,
    rng: &mut R,
) -> RiverReport {
    let mut report = RiverReport::default();
    let mut sources = river_sources(world, ocean);
    let n_sources = sources.len();

    while report.cells < max_count && !sources.is_empty() {
        let src = sources.swap_remove(rng.gen_range(0..sources.len()));
        let path = river_path(world, ocean, src, rng);
        if path.is_empty() || path.len() < min_size {
            report.discarded += 1;
            continue;
        }

        for &(x, y) in &path {
            let cell = world.at_mut(x as i64, y as i64);
            cell.terrain = WATER;
            cell.depth = cell.depth.max(1);
        }
        report.cells += path.len();
        report.rivers.push(path);
    }

    tracing::debug!(
        sources = n_sources,
        rivers = report.rivers.len(),
        cells = report.cells,
        discarded = report.discarded,
        "rivers placed"
    );
    report
}
