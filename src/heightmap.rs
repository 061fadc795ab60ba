use rand::Rng;
use rand_distr::StandardNormal;

use crate::gaussian::Gaussian2d;
use crate::params::HeightmapParams;
use crate::world::World;

// =============================================================================
// GAUSSIAN SUPPLY
// =============================================================================

/// Standard deviations around the mean that a bump reaches.
const GROWTH_RADIUS: f64 = 2.0;

/// A finite, one-shot sequence of random Gaussians for a world.
///
/// Values are drawn from the RNG only as the iterator is advanced.
pub struct GaussianSupply<'a, R: Rng> {
    rng: &'a mut R,
    params: &'a HeightmapParams,
    width: f64,
    height: f64,
    remaining: usize,
}

impl<'a, R: Rng> GaussianSupply<'a, R> {
    /// `floor(area * gauss_factor)` Gaussians for a world of the given size.
    pub fn new(width: usize, height: usize, params: &'a HeightmapParams, rng: &'a mut R) -> Self {
        let count = ((width * height) as f64 * params.gauss_factor) as usize;
        Self::with_count(width, height, count, params, rng)
    }

    pub fn with_count(
        width: usize,
        height: usize,
        count: usize,
        params: &'a HeightmapParams,
        rng: &'a mut R,
    ) -> Self {
        Self {
            rng,
            params,
            width: width as f64,
            height: height as f64,
            remaining: count,
        }
    }

    fn random_gaussian(&mut self) -> Gaussian2d {
        let p = self.params;
        let mx = self.rng.gen::<f64>() * self.width;
        let my = self.rng.gen::<f64>() * self.height;

        let sx = self.rng.gen::<f64>() * (p.max_stdev - p.min_stdev) + p.min_stdev;
        let sy = self.rng.gen::<f64>() * (p.max_stdev - p.min_stdev) + p.min_stdev;

        // Reject amplitudes that would not change any elevation.
        let mut amplitude = 0.0f64;
        while amplitude.trunc() == 0.0 {
            let z: f64 = self.rng.sample(StandardNormal);
            amplitude = z * p.stdev_growth + p.mean_growth;
        }

        let cov = self.rng.gen::<f64>() * (p.max_cov - p.min_cov) + p.min_cov;

        Gaussian2d::new(mx, my, sx, sy, cov, amplitude)
    }
}

impl<R: Rng> Iterator for GaussianSupply<'_, R> {
    type Item = Gaussian2d;

    fn next(&mut self) -> Option<Gaussian2d> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.random_gaussian())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for GaussianSupply<'_, R> {}

// =============================================================================
// HEIGHT FIELD
// =============================================================================

/// Add a Gaussian bump to every cell within `GROWTH_RADIUS` standard
/// deviations of its mean. Each cell gains the integer part of the density.
pub fn grow_land(world: &mut World, g: &Gaussian2d) {
    let xmin = (g.mx - GROWTH_RADIUS * g.sx).ceil() as i64;
    let xmax = (g.mx + GROWTH_RADIUS * g.sx).floor() as i64;
    let ymin = (g.my - GROWTH_RADIUS * g.sy).ceil() as i64;
    let ymax = (g.my + GROWTH_RADIUS * g.sy).floor() as i64;

    for x in xmin..=xmax {
        for y in ymin..=ymax {
            let p = g.pdf(x as f64, y as f64);
            world.at_mut(x, y).elevation += p.trunc() as i32;
        }
    }
}

/// Build the elevation field of `world`: reset it to the initial elevation,
/// add every Gaussian of the supply and clamp. Returns the number of Gaussians.
pub fn generate_elevations<R: Rng>(world: &mut World, params: &HeightmapParams, rng: &mut R) -> usize {
    for (_, _, cell) in world.cells.iter_mut() {
        cell.elevation = params.initial_elevation;
        cell.depth = 0;
    }

    let (width, height) = (world.width(), world.height());
    let mut count = 0;
    for g in GaussianSupply::new(width, height, params, rng) {
        grow_land(world, &g);
        count += 1;
    }
    world.clamp_elevations();
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::MAX_ELEVATION;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_supply_is_finite_and_sized() {
        let params = HeightmapParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let supply = GaussianSupply::new(100, 100, &params, &mut rng);
        assert_eq!(supply.len(), 30);
        assert_eq!(supply.count(), 30);
    }

    #[test]
    fn test_gaussians_within_parameter_ranges() {
        let params = HeightmapParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for g in GaussianSupply::with_count(64, 32, 500, &params, &mut rng) {
            assert!(g.mx >= 0.0 && g.mx < 64.0);
            assert!(g.my >= 0.0 && g.my < 32.0);
            assert!(g.sx >= params.min_stdev && g.sx <= params.max_stdev);
            assert!(g.sy >= params.min_stdev && g.sy <= params.max_stdev);
            assert!(g.cov >= params.min_cov && g.cov <= params.max_cov);
            assert_ne!(g.amplitude.trunc(), 0.0);
        }
    }

    #[test]
    fn test_grow_land_wraps_and_peaks_at_mean() {
        let mut world = World::new(20, 20);
        let g = Gaussian2d::new(0.0, 0.0, 3.0, 3.0, 0.0, 5.0);
        grow_land(&mut world, &g);

        assert_eq!(world.at(0, 0).elevation, 5);
        // Bump crosses the torus seam.
        assert_eq!(world.at(-1, 0).elevation, world.at(1, 0).elevation);
        assert!(world.at(19, 19).elevation > 0);
        // Outside the two sigma box nothing changes.
        assert_eq!(world.at(10, 10).elevation, 0);
    }

    #[test]
    fn test_negative_bump_truncates_toward_zero() {
        let mut world = World::new(30, 30);
        let g = Gaussian2d::new(15.0, 15.0, 4.0, 4.0, 0.0, -2.0);
        grow_land(&mut world, &g);
        assert_eq!(world.at(15, 15).elevation, -2);
        // Far edge of the box has density in (-1, 0): no change.
        assert_eq!(world.at(23, 15).elevation, 0);
    }

    #[test]
    fn test_generate_elevations_clamped_and_deterministic() {
        let params = HeightmapParams {
            gauss_factor: 0.02,
            ..HeightmapParams::default()
        };
        let mut a = World::new(60, 40);
        let mut b = World::new(60, 40);
        let na = generate_elevations(&mut a, &params, &mut ChaCha8Rng::seed_from_u64(3));
        let nb = generate_elevations(&mut b, &params, &mut ChaCha8Rng::seed_from_u64(3));

        assert_eq!(na, 48);
        assert_eq!(na, nb);
        assert_eq!(a, b);
        let (lo, hi) = a.elevation_range();
        assert!(lo >= 0 && hi <= MAX_ELEVATION);
    }
}
