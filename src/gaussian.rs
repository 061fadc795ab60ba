//! Two dimensional Gaussian bumps used to build the height field.

/// A 2D normal distribution scaled so that its peak equals `amplitude`.
///
/// The density formula uses coefficients computed by `precompute`. Changing
/// any public field leaves them stale; call `precompute` again before the
/// next `pdf`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussian2d {
    /// Mean
    pub mx: f64,
    pub my: f64,
    /// Standard deviations
    pub sx: f64,
    pub sy: f64,
    /// Correlation between the axes, in (-1, 1)
    pub cov: f64,
    /// Height of the peak
    pub amplitude: f64,

    cached: Coefficients,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Coefficients {
    sxsx: f64,
    sysy: f64,
    sxsy: f64,
    cov2: f64,
    expcoeff: f64,
}

impl Gaussian2d {
    pub fn new(mx: f64, my: f64, sx: f64, sy: f64, cov: f64, amplitude: f64) -> Self {
        let mut g = Self {
            mx,
            my,
            sx,
            sy,
            cov,
            amplitude,
            cached: Coefficients::default(),
        };
        g.precompute();
        g
    }

    /// Recompute the cached density coefficients from the public fields.
    pub fn precompute(&mut self) {
        self.cached = Coefficients {
            sxsx: self.sx * self.sx,
            sysy: self.sy * self.sy,
            sxsy: self.sx * self.sy,
            cov2: 2.0 * self.cov,
            expcoeff: -0.5 / (1.0 - self.cov * self.cov),
        };
    }

    /// Density at (x, y).
    pub fn pdf(&self, x: f64, y: f64) -> f64 {
        let c = &self.cached;
        let devx = x - self.mx;
        let devy = y - self.my;
        let mut q = devx * devx / c.sxsx;
        q += devy * devy / c.sysy;
        q -= c.cov2 * devx * devy / c.sxsy;
        self.amplitude * (c.expcoeff * q).exp()
    }
}
