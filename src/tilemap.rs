/// Wrap `n` into `[0, bound)`, treating the axis as a ring.
pub fn wrap(n: i64, bound: usize) -> usize {
    assert!(bound > 0, "bad bound {} in wrap", bound);
    n.rem_euclid(bound as i64) as usize
}

/// Cardinal direction offsets (dx, dy): +x, -x, +y, -y
pub const CARDINALS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A 2D grid on a torus (wraps on both axes).
/// Storage is column major: the cell (x, y) lives at `x * height + y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_with(width, height, T::default())
    }
}

impl<T: Clone> Tilemap<T> {
    /// Panics if either dimension is zero or the cell count overflows.
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        assert!(width > 0 && height > 0, "tilemap dimensions must be positive: {}x{}", width, height);
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("tilemap dimensions are too big: {}x{}", width, height));
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

impl<T> Tilemap<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Normalize a coordinate onto the torus.
    pub fn wrap(&self, x: i64, y: i64) -> (usize, usize) {
        (wrap(x, self.width), wrap(y, self.height))
    }

    /// Index into the data array for any (possibly out of range) coordinate.
    pub fn index(&self, x: i64, y: i64) -> usize {
        let (x, y) = self.wrap(x, y);
        x * self.height + y
    }

    /// Coordinate of a data index.
    pub fn coord(&self, index: usize) -> (usize, usize) {
        (index / self.height, index % self.height)
    }

    pub fn get(&self, x: i64, y: i64) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: i64, y: i64, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn at_index(&self, index: usize) -> &T {
        &self.data[index]
    }

    pub fn at_index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }

    /// The 4 cardinal neighbors in `CARDINALS` order, wrapped.
    pub fn neighbors(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        CARDINALS.map(|(dx, dy)| self.wrap(x as i64 + dx, y as i64 + dy))
    }

    /// Iterate over all cells with their coordinates, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let height = self.height;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (idx / height, idx % height, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let height = self.height;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx / height, idx % height, val))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_cases() {
        assert_eq!(wrap(0, 500), 0);
        assert_eq!(wrap(-1, 500), 499);
        assert_eq!(wrap(-500, 500), 0);
        assert_eq!(wrap(500, 500), 0);
        assert_eq!(wrap(501, 500), 1);
    }

    #[test]
    fn test_wrap_range_and_congruence() {
        for bound in 1..20usize {
            for x in -100i64..100 {
                let w = wrap(x, bound);
                assert!(w < bound);
                assert_eq!((x - w as i64).rem_euclid(bound as i64), 0);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_wrap_zero_bound() {
        wrap(3, 0);
    }

    #[test]
    fn test_column_major_index() {
        let map: Tilemap<u8> = Tilemap::new(4, 3);
        assert_eq!(map.index(0, 0), 0);
        assert_eq!(map.index(0, 2), 2);
        assert_eq!(map.index(1, 0), 3);
        assert_eq!(map.index(3, 2), 11);
        assert_eq!(map.index(-1, -1), 11);
        assert_eq!(map.coord(7), (2, 1));
    }

    #[test]
    fn test_out_of_range_access_wraps() {
        let mut map = Tilemap::new_with(5, 5, 0i32);
        map.set(-1, 7, 42);
        assert_eq!(*map.get(4, 2), 42);
        assert_eq!(*map.get(9, -3), 42);
    }

    #[test]
    fn test_neighbors_wrap() {
        let map: Tilemap<u8> = Tilemap::new(3, 3);
        assert_eq!(map.neighbors(0, 0), [(1, 0), (2, 0), (0, 1), (0, 2)]);
        assert_eq!(map.neighbors(2, 2), [(0, 2), (1, 2), (2, 0), (2, 1)]);
    }

    #[test]
    #[should_panic]
    fn test_zero_dimension_is_fatal() {
        let _: Tilemap<u8> = Tilemap::new(0, 10);
    }
}
