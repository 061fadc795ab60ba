//! Topological map of the world
//!
//! Cells of equal elevation that touch are grouped into contours with a
//! union-find forest. Contours and their adjacency form a graph that the
//! liquid and growth passes work on instead of raw cells, so their cost
//! scales with the number of contours rather than the number of cells.
//!
//! A map is a snapshot: build a fresh one before every pass that needs it.

use crate::terrain::TerrainType;
use crate::world::World;

/// Offsets joined when building contours: right, down and down-right.
/// The other diagonal is never joined, so two cells touching only along
/// that diagonal stay in separate contours.
const LINK_OFFSETS: [(i64, i64); 3] = [(1, 0), (0, 1), (1, 1)];

// =============================================================================
// DISJOINT SETS
// =============================================================================

/// Union-find forest over `0..len` with path compression and union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Canonical representative of `i`'s set.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        let mut steps = 0;
        while self.parent[root] != root {
            root = self.parent[root];
            steps += 1;
            if steps > self.parent.len() {
                panic!("disjoint set walk from {} visited more than {} nodes", i, self.parent.len());
            }
        }

        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already one set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else if self.rank[ra] > self.rank[rb] {
            self.parent[rb] = ra;
        } else {
            self.parent[rb] = ra;
            self.rank[ra] += 1;
        }
        true
    }
}

// =============================================================================
// CONTOURS
// =============================================================================

/// A maximal connected set of cells sharing one elevation.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Index of this contour in discovery order
    pub id: usize,
    /// Number of cells
    pub size: usize,
    /// Terrain of every cell of the contour
    pub terrain: &'static TerrainType,
    /// Elevation and depth shared by every cell
    pub height: i32,
    pub depth: i32,
    /// Ids of distinct adjacent contours
    pub adj: Vec<usize>,
}

/// Contours of a world plus the union-find forest that maps cells to them.
pub struct TopoMap {
    sets: DisjointSets,
    /// Contour id attached to each canonical root
    root_contour: Vec<Option<usize>>,
    contours: Vec<Contour>,
    width: usize,
    height: usize,
}

impl TopoMap {
    /// Build the topological map of the world's current elevations.
    pub fn new(world: &World) -> Self {
        let width = world.width();
        let height = world.height();
        let mut map = Self {
            sets: DisjointSets::new(world.area()),
            root_contour: vec![None; world.area()],
            contours: Vec::new(),
            width,
            height,
        };
        map.join_cells(world);
        map.find_contours(world);
        map.link_contours();
        map
    }

    fn index(&self, x: i64, y: i64) -> usize {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        x * self.height + y
    }

    fn join_cells(&mut self, world: &World) {
        for x in 0..self.width as i64 {
            for y in 0..self.height as i64 {
                let here = world.at(x, y).elevation;
                let idx = self.index(x, y);
                for (dx, dy) in LINK_OFFSETS {
                    if world.at(x + dx, y + dy).elevation == here {
                        let other = self.index(x + dx, y + dy);
                        self.sets.union(idx, other);
                    }
                }
            }
        }
    }

    fn find_contours(&mut self, world: &World) {
        for (x, y, cell) in world.cells.iter() {
            let root = self.sets.find(x * self.height + y);
            match self.root_contour[root] {
                Some(id) => self.contours[id].size += 1,
                None => {
                    let id = self.contours.len();
                    self.contours.push(Contour {
                        id,
                        size: 1,
                        terrain: cell.terrain,
                        height: cell.elevation,
                        depth: cell.depth,
                        adj: Vec::new(),
                    });
                    self.root_contour[root] = Some(id);
                }
            }
        }
    }

    fn link_contours(&mut self) {
        for x in 0..self.width as i64 {
            for y in 0..self.height as i64 {
                let c = self.contour_id_at(x, y);
                for (dx, dy) in LINK_OFFSETS {
                    let other = self.contour_id_at(x + dx, y + dy);
                    if c != other {
                        self.add_link(c, other);
                    }
                }
            }
        }
    }

    /// Link two contours if they are not linked already.
    fn add_link(&mut self, a: usize, b: usize) {
        if self.contours[a].adj.contains(&b) {
            return;
        }
        self.contours[a].adj.push(b);
        self.contours[b].adj.push(a);
    }

    /// Id of the contour containing cell (x, y); coordinates wrap.
    pub fn contour_id_at(&mut self, x: i64, y: i64) -> usize {
        let root = self.sets.find(self.index(x, y));
        match self.root_contour[root] {
            Some(id) => id,
            None => panic!("cell ({}, {}) resolves to a root without a contour", x, y),
        }
    }

    /// The contour containing cell (x, y).
    pub fn contour_at(&mut self, x: i64, y: i64) -> &Contour {
        let id = self.contour_id_at(x, y);
        &self.contours[id]
    }

    pub fn contour(&self, id: usize) -> &Contour {
        &self.contours[id]
    }

    pub fn contour_mut(&mut self, id: usize) -> &mut Contour {
        &mut self.contours[id]
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Ids of all contours with no strictly lower neighbor.
    pub fn minima(&self) -> Vec<usize> {
        self.contours
            .iter()
            .filter(|c| c.adj.iter().all(|&a| self.contours[a].height >= c.height))
            .map(|c| c.id)
            .collect()
    }

    /// Contours that liquid raised to `height` in `seed` would cover:
    /// everything reachable from `seed` through contours no higher than `height`.
    ///
    /// The seed is always included, even when it sits above `height`; the
    /// result is then just `[seed]`. Liquid placement only floods above the
    /// seed, so it never sees that case.
    pub fn flood(&self, seed: usize, height: i32) -> Vec<usize> {
        let mut flooded = Vec::new();
        self.walk(seed, |c| {
            if c.id != seed && c.height > height {
                return false;
            }
            flooded.push(c.id);
            true
        });
        flooded
    }

    /// Depth-first traversal from `init`. `visit` is called once per newly
    /// reached contour; returning false stops the search from expanding that
    /// contour, though its neighbors may still be reached another way.
    pub fn walk<F>(&self, init: usize, mut visit: F)
    where
        F: FnMut(&Contour) -> bool,
    {
        let mut seen = vec![false; self.contours.len()];
        let mut stack = vec![init];
        seen[init] = true;

        while let Some(id) = stack.pop() {
            let c = &self.contours[id];
            if !visit(c) {
                continue;
            }
            for &kid in &c.adj {
                if !seen[kid] {
                    seen[kid] = true;
                    stack.push(kid);
                }
            }
        }
    }

    /// Write each contour's terrain, height and depth back onto its cells.
    /// Returns the indices of cells whose terrain changed.
    pub fn rasterize(&mut self, world: &mut World) -> Vec<usize> {
        assert_eq!(world.area(), self.sets.len(), "topological map built for another world");
        let mut changed = Vec::new();
        for idx in 0..world.area() {
            let root = self.sets.find(idx);
            let id = match self.root_contour[root] {
                Some(id) => id,
                None => panic!("cell {} resolves to a root without a contour", idx),
            };
            let c = &self.contours[id];
            let cell = world.cells.at_index_mut(idx);
            if !cell.terrain.is(c.terrain) {
                changed.push(idx);
            }
            cell.terrain = c.terrain;
            cell.elevation = c.height;
            cell.depth = c.depth;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{GRASS, WATER};

    /// World from rows of elevation digits; `rows[y]` holds x = 0..width.
    fn world_from_rows(rows: &[&str]) -> World {
        let height = rows.len();
        let width = rows[0].len();
        let mut world = World::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                world.at_mut(x as i64, y as i64).elevation = ch.to_digit(10).unwrap() as i32;
            }
        }
        world
    }

    #[test]
    fn test_disjoint_sets() {
        let mut sets = DisjointSets::new(6);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(sets.union(1, 3));
        assert!(!sets.union(0, 2));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(4));
        assert_ne!(sets.find(4), sets.find(5));
    }

    #[test]
    fn test_uniform_torus_is_one_contour() {
        let world = world_from_rows(&["33", "33"]);
        let map = TopoMap::new(&world);
        assert_eq!(map.len(), 1);
        assert_eq!(map.contour(0).size, 4);
        assert!(map.contour(0).adj.is_empty());
        assert_eq!(map.minima(), vec![0]);
    }

    #[test]
    fn test_partition_follows_equal_elevation() {
        // x runs along each row, y down the rows.
        let world = world_from_rows(&[
            "1122",
            "1122",
            "3333",
        ]);
        let mut map = TopoMap::new(&world);
        assert_eq!(map.len(), 3);

        let ones = map.contour_id_at(0, 0);
        let twos = map.contour_id_at(2, 0);
        let threes = map.contour_id_at(0, 2);
        assert_eq!(map.contour_id_at(1, 1), ones);
        assert_eq!(map.contour_id_at(3, 1), twos);
        assert_eq!(map.contour_id_at(3, 2), threes);
        assert_eq!(map.contour(ones).size, 4);
        assert_eq!(map.contour(threes).size, 4);

        // Every contour touches the others (directly or across the seams).
        for id in [ones, twos, threes] {
            assert_eq!(map.contour(id).adj.len(), 2);
        }
    }

    #[test]
    fn test_contours_join_across_seams() {
        // The 5s sit on opposite edges of the map and meet across the seam.
        let world = world_from_rows(&[
            "5115",
            "1111",
            "1111",
        ]);
        let mut map = TopoMap::new(&world);
        assert_eq!(map.len(), 2);
        assert_eq!(map.contour_id_at(0, 0), map.contour_id_at(3, 0));
        assert_eq!(map.contour_at(-1, 0).size, 2);
    }

    #[test]
    fn test_only_down_right_diagonal_joins() {
        let down_right = world_from_rows(&[
            "700",
            "070",
            "000",
        ]);
        let mut map = TopoMap::new(&down_right);
        assert_eq!(map.contour_id_at(0, 0), map.contour_id_at(1, 1));

        let down_left = world_from_rows(&[
            "070",
            "700",
            "000",
        ]);
        let mut map = TopoMap::new(&down_left);
        assert_ne!(map.contour_id_at(1, 0), map.contour_id_at(0, 1));
    }

    #[test]
    fn test_adjacency_is_symmetric_and_deduplicated() {
        let world = world_from_rows(&[
            "12345",
            "23451",
            "34512",
            "45123",
        ]);
        let map = TopoMap::new(&world);
        for c in map.contours() {
            for &a in &c.adj {
                assert!(map.contour(a).adj.contains(&c.id));
                assert_eq!(c.adj.iter().filter(|&&b| b == a).count(), 1);
            }
            assert!(!c.adj.contains(&c.id));
        }
    }

    #[test]
    fn test_minima() {
        let world = world_from_rows(&[
            "55555",
            "51555",
            "55525",
            "55555",
        ]);
        let mut map = TopoMap::new(&world);
        let mut minima = map.minima();
        minima.sort();
        let mut expected = vec![map.contour_id_at(1, 1), map.contour_id_at(3, 2)];
        expected.sort();
        assert_eq!(minima, expected);
    }

    #[test]
    fn test_flood_containment() {
        let world = world_from_rows(&[
            "999999",
            "912349",
            "999999",
        ]);
        let mut map = TopoMap::new(&world);
        let seed = map.contour_id_at(1, 1);

        for ht in 0..=9 {
            let flooded = map.flood(seed, ht);
            assert!(flooded.contains(&seed));
            for &id in &flooded {
                assert!(id == seed || map.contour(id).height <= ht);
            }
        }

        assert_eq!(map.flood(seed, 1), vec![seed]);
        // Below the seed's own height only the seed comes back.
        assert_eq!(map.flood(seed, 0), vec![seed]);
        let fours = map.contour_id_at(4, 1);
        assert_eq!(map.flood(fours, 2), vec![fours]);
        assert_eq!(map.flood(seed, 3).len(), 3);
        assert_eq!(map.flood(seed, 9).len(), map.len());
    }

    #[test]
    fn test_walk_prunes_without_forgetting() {
        let world = world_from_rows(&["0123"]);
        let mut map = TopoMap::new(&world);
        let start = map.contour_id_at(0, 0);
        let mut visited = Vec::new();
        map.walk(start, |c| {
            visited.push(c.id);
            c.height < 1
        });
        // 0 expands to its neighbors 1 and 3 (wrapping); neither expands further.
        assert_eq!(visited.len(), 3);
    }

    #[test]
    fn test_rasterize_writes_contour_state() {
        let mut world = world_from_rows(&["1122"]);
        let mut map = TopoMap::new(&world);
        let ones = map.contour_id_at(0, 0);
        {
            let c = map.contour_mut(ones);
            c.terrain = WATER;
            c.depth += 1;
            c.height = 2;
        }
        let changed = map.rasterize(&mut world);
        assert_eq!(changed.len(), 2);
        assert!(world.at(0, 0).terrain.is(WATER));
        assert_eq!(world.at(1, 0).elevation, 2);
        assert_eq!(world.at(1, 0).depth, 1);
        assert!(world.at(2, 0).terrain.is(GRASS));
    }
}
