pub mod boundary;
pub mod grid;
pub mod linear;

use cgmath::{vec2, Vector2};

use self::boundary::{set_bnd, Boundary};
use self::linear::lin_solve;

pub use self::grid::{DenseGrid, Grid};

/// Divergence scaling used by the projection step, the `-0.5 * h` of the
/// published scheme.
const DIV_SCALE: f64 = -0.5;

/// Dye densities below this are treated as empty by [`Fluid::level`].
const LEVEL_THRESHOLD: f64 = 1e-4;

/// A dye-carrying incompressible fluid on a square grid.
///
/// The grid is `(size+2) x (size+2)`: interior cells run `1..=size` on
/// both axes and a one-cell boundary ring holds derived wall values, so
/// interior updates read their neighbours without bounds checks.
///
/// Each live field (`d`, `u`, `v`) is paired with a scratch field that
/// doubles as the source accumulator for the next step: `add_density` /
/// `add_velocity` fill the scratch fields, `step` consumes them and then
/// reuses them as the back buffers of the pipeline. Callers should not
/// read them between steps.
pub struct Fluid<G: Grid = DenseGrid> {
    size: usize,
    dt: f64,
    visc: f64,
    diff: f64,
    d: G,
    d0: G,
    u: G,
    u0: G,
    v: G,
    v0: G,
}

impl Fluid<DenseGrid> {
    /// Create a zero-filled simulation backed by [`DenseGrid`], given:
    ///
    /// - `size`: width and height of the interior in cells (at least 1)
    /// - `visc`: viscosity of the fluid
    /// - `diff`: diffusivity of the dye in the fluid
    /// - `dt`: change in time per step
    pub fn new(size: usize, visc: f64, diff: f64, dt: f64) -> Self {
        Self::with_factory(size, visc, diff, dt, DenseGrid::new)
    }
}

impl<G: Grid> Fluid<G> {
    /// Create a simulation whose six grids come from `factory`, called
    /// once per grid with the full dimension (interior plus ring).
    pub fn with_factory(
        size: usize,
        visc: f64,
        diff: f64,
        dt: f64,
        mut factory: impl FnMut(usize) -> G,
    ) -> Self {
        assert!(size >= 1, "grid resolution must be at least 1");
        assert!(visc >= 0.0, "viscosity must not be negative");
        assert!(diff >= 0.0, "diffusivity must not be negative");
        assert!(dt >= 0.0, "timestep must not be negative");

        let dim = size + 2;
        let mut alloc = || {
            let g = factory(dim);
            assert_eq!(g.dim(), dim, "grid factory returned the wrong dimension");
            g
        };

        Self {
            size,
            dt,
            visc,
            diff,
            d: alloc(),
            d0: alloc(),
            u: alloc(),
            u0: alloc(),
            v: alloc(),
            v0: alloc(),
        }
    }

    /// Width and height of the interior in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Dye density at a given cell.
    pub fn density(&self, i: i32, j: i32) -> f64 {
        self.d.get(i, j)
    }

    /// Fluid velocity at a given cell.
    pub fn velocity(&self, i: i32, j: i32) -> Vector2<f64> {
        vec2(self.u.get(i, j), self.v.get(i, j))
    }

    /// Minimum dye density over the interior.
    pub fn min_density(&self) -> f64 {
        let mut min = f64::INFINITY;

        for i in 1..=self.size as i32 {
            for j in 1..=self.size as i32 {
                min = min.min(self.d.get(i, j));
            }
        }

        min
    }

    /// Maximum dye density over the interior.
    pub fn max_density(&self) -> f64 {
        let mut max = 0.0f64;

        for i in 1..=self.size as i32 {
            for j in 1..=self.size as i32 {
                max = max.max(self.d.get(i, j));
            }
        }

        max
    }

    /// Set the density source to `amount` over the square of cells within
    /// `radius` of `(i, j)`; cells falling off the grid are dropped.
    ///
    /// Replaces whatever the source held, so only the most recent call
    /// before a `step` takes effect.
    pub fn add_density(&mut self, i: i32, j: i32, radius: i32, amount: f64) {
        Self::zero(&mut self.d0, self.size);

        for l in -radius..=radius {
            for m in -radius..=radius {
                self.d0.set(i + l, j + m, amount);
            }
        }
    }

    /// Set both velocity sources to `vel` over the square of cells within
    /// `radius` of `(i, j)`, replacing any previous injection.
    pub fn add_velocity(&mut self, i: i32, j: i32, radius: i32, vel: Vector2<f64>) {
        Self::zero(&mut self.u0, self.size);
        Self::zero(&mut self.v0, self.size);

        for l in -radius..=radius {
            for m in -radius..=radius {
                self.u0.set(i + l, j + m, vel.x);
                self.v0.set(i + l, j + m, vel.y);
            }
        }
    }

    /// Subtract `4 * min` dye from every interior cell, clamping results
    /// below a small threshold to exactly zero.
    ///
    /// Cosmetic contrast floor for display layers, not part of the
    /// physical model; a `min` below the threshold is a no-op and
    /// velocity is never touched.
    pub fn level(&mut self, min: f64) {
        if min < LEVEL_THRESHOLD {
            return;
        }

        for i in 1..=self.size as i32 {
            for j in 1..=self.size as i32 {
                let mut result = self.d.get(i, j) - 4.0 * min;

                if result < LEVEL_THRESHOLD {
                    result = 0.0;
                }
                self.d.set(i, j, result);
            }
        }

        set_bnd(Boundary::Scalar, &mut self.d, self.size);
    }

    /// Advance the simulation by one timestep.
    ///
    /// Consumes the source fields: velocity is injected, diffused,
    /// projected, self-advected and projected again; dye is injected,
    /// diffused and advected through the freshly computed velocity field.
    /// Afterwards the live fields hold the new state and the source
    /// fields are spent scratch.
    pub fn step(&mut self) {
        let (n, dt) = (self.size, self.dt);

        Self::add_source(&mut self.u, &self.u0, dt, n);
        Self::add_source(&mut self.v, &self.v0, dt, n);
        self.u.swap(&mut self.u0);
        self.v.swap(&mut self.v0);

        Self::diffuse(Boundary::U, &mut self.u, &self.u0, self.visc, dt, n);
        Self::diffuse(Boundary::V, &mut self.v, &self.v0, self.visc, dt, n);

        Self::project(&mut self.u, &mut self.v, &mut self.u0, &mut self.v0, n);
        self.u.swap(&mut self.u0);
        self.v.swap(&mut self.v0);

        Self::advect(Boundary::U, &mut self.u, &self.u0, &self.u0, &self.v0, dt, n);
        Self::advect(Boundary::V, &mut self.v, &self.v0, &self.u0, &self.v0, dt, n);
        Self::project(&mut self.u, &mut self.v, &mut self.u0, &mut self.v0, n);

        Self::add_source(&mut self.d, &self.d0, dt, n);
        self.d.swap(&mut self.d0);

        Self::diffuse(Boundary::Scalar, &mut self.d, &self.d0, self.diff, dt, n);
        self.d.swap(&mut self.d0);
        Self::advect(Boundary::Scalar, &mut self.d, &self.d0, &self.u, &self.v, dt, n);
    }

    fn zero(x: &mut G, n: usize) {
        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                x.set(i, j, 0.0);
            }
        }

        set_bnd(Boundary::Scalar, x, n);
    }

    fn add_source(dst: &mut G, src: &G, dt: f64, n: usize) {
        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                dst.set(i, j, dst.get(i, j) + dt * src.get(i, j));
            }
        }
    }

    /// Implicit diffusion of `x0` into `x` at the given rate.
    fn diffuse(bnd: Boundary, x: &mut G, x0: &G, rate: f64, dt: f64, n: usize) {
        let a = dt * rate * (n * n) as f64;

        lin_solve(bnd, x, x0, a, 1.0 + 4.0 * a, n);
    }

    /// Semi-Lagrangian advection: trace each cell backwards through the
    /// velocity field and interpolate the source there.
    #[allow(clippy::many_single_char_names)]
    fn advect(bnd: Boundary, d: &mut G, d0: &G, u: &G, v: &G, dt: f64, n: usize) {
        let nf = n as f64;
        let dt0 = dt * nf;

        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                // clamp the traced point into the band the ring makes valid
                let x = (i as f64 - dt0 * u.get(i, j)).max(0.5).min(nf + 0.5);
                let y = (j as f64 - dt0 * v.get(i, j)).max(0.5).min(nf + 0.5);

                let i0 = x as i32;
                let i1 = i0 + 1;
                let j0 = y as i32;
                let j1 = j0 + 1;

                let s1 = x - i0 as f64;
                let s0 = 1.0 - s1;
                let t1 = y - j0 as f64;
                let t0 = 1.0 - t1;

                let result = s0 * (t0 * d0.get(i0, j0) + t1 * d0.get(i0, j1))
                    + s1 * (t0 * d0.get(i1, j0) + t1 * d0.get(i1, j1));

                d.set(i, j, result);
            }
        }

        set_bnd(bnd, d, n);
    }

    /// Force the velocity field divergence-free: solve a Poisson equation
    /// for pressure in `p` (using `div` for the divergence) and subtract
    /// its gradient from `(u, v)`.
    #[allow(clippy::many_single_char_names)]
    fn project(u: &mut G, v: &mut G, p: &mut G, div: &mut G, n: usize) {
        let h = 1.0 / n as f64;

        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                let result = DIV_SCALE
                    * h
                    * (u.get(i + 1, j) - u.get(i - 1, j) + v.get(i, j + 1) - v.get(i, j - 1));

                div.set(i, j, result);
                p.set(i, j, 0.0);
            }
        }
        set_bnd(Boundary::Scalar, div, n);
        set_bnd(Boundary::Scalar, p, n);

        lin_solve(Boundary::Scalar, p, div, 1.0, 4.0, n);

        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                u.set(i, j, u.get(i, j) - 0.5 * (p.get(i + 1, j) - p.get(i - 1, j)) / h);
                v.set(i, j, v.get(i, j) - 0.5 * (p.get(i, j + 1) - p.get(i, j - 1)) / h);
            }
        }
        set_bnd(Boundary::U, u, n);
        set_bnd(Boundary::V, v, n);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::d2::grid::NaiveGrid;
    use approx::assert_abs_diff_eq;
    use cgmath::InnerSpace;

    fn max_divergence<G: Grid>(fl: &Fluid<G>) -> f64 {
        let n = fl.size as i32;
        let h = 1.0 / fl.size as f64;
        let mut worst = 0.0f64;

        for i in 1..=n {
            for j in 1..=n {
                let div = -0.5
                    * h
                    * (fl.u.get(i + 1, j) - fl.u.get(i - 1, j) + fl.v.get(i, j + 1)
                        - fl.v.get(i, j - 1));

                worst = worst.max(div.abs());
            }
        }

        worst
    }

    #[test]
    fn dye_stays_concentrated_after_one_step() {
        let mut fl = Fluid::new(10, 0.01, 0.0001, 0.001);

        fl.add_density(5, 5, 1, 9.0);
        fl.add_velocity(5, 5, 1, vec2(1000.0, 1000.0));
        fl.step();

        let centre = fl.density(5, 5);
        assert!(centre > 0.0);
        assert!(centre > fl.density(1, 1));

        let speed = fl.velocity(5, 5).magnitude();
        assert!(speed > 0.0);
        assert!(speed.is_finite());
    }

    #[test]
    fn zero_sources_are_a_fixed_point() {
        let mut fl = Fluid::new(8, 0.01, 0.0001, 0.1);

        for _ in 0..3 {
            fl.step();
        }

        let dim = (fl.size() + 2) as i32;
        for i in 0..dim {
            for j in 0..dim {
                assert_eq!(fl.density(i, j), 0.0);
                let vel = fl.velocity(i, j);
                assert_eq!(vel.x, 0.0);
                assert_eq!(vel.y, 0.0);
            }
        }
    }

    #[test]
    fn projection_removes_divergence() {
        let n = 4;
        let mut fl = Fluid::new(n, 0.0, 0.0, 0.1);

        // a lone velocity spike diverges on one side, converges on the other
        fl.u.set(2, 2, 0.5);
        assert!(max_divergence(&fl) > 1e-3);

        Fluid::<DenseGrid>::project(&mut fl.u, &mut fl.v, &mut fl.u0, &mut fl.v0, n);

        assert!(max_divergence(&fl) < 1e-3);
    }

    #[test]
    fn level_drops_the_floor() {
        let mut fl = Fluid::new(4, 0.0, 0.0, 0.1);

        for i in 1..=4 {
            for j in 1..=4 {
                fl.d.set(i, j, 1.0);
            }
        }
        fl.d.set(2, 2, 0.2);

        assert_abs_diff_eq!(fl.min_density(), 0.2);
        assert_abs_diff_eq!(fl.max_density(), 1.0);

        let min = fl.min_density();
        fl.level(min);

        // 1.0 - 4 * 0.2 survives the threshold, 0.2 - 0.8 clamps to zero
        assert_abs_diff_eq!(fl.max_density(), 1.0 - 4.0 * min);
        assert_abs_diff_eq!(fl.min_density(), 0.0);
    }

    #[test]
    fn level_ignores_trace_minimum() {
        let mut fl = Fluid::new(4, 0.0, 0.0, 0.1);
        fl.d.set(3, 3, 0.5);

        fl.level(1e-5);

        assert_abs_diff_eq!(fl.density(3, 3), 0.5);
    }

    #[test]
    fn extrema_scan_the_interior_only() {
        let mut fl = Fluid::new(3, 0.0, 0.0, 0.1);

        for i in 1..=3 {
            for j in 1..=3 {
                fl.d.set(i, j, 2.0);
            }
        }
        fl.d.set(2, 2, 1.0);
        // ring values must not win either extremum
        fl.d.set(0, 2, 99.0);
        fl.d.set(4, 1, -7.0);

        assert_abs_diff_eq!(fl.min_density(), 1.0);
        assert_abs_diff_eq!(fl.max_density(), 2.0);
    }

    #[test]
    fn injections_replace_previous_sources() {
        let mut fl = Fluid::new(6, 0.0, 0.0001, 0.1);

        fl.add_density(2, 2, 0, 5.0);
        fl.add_density(4, 4, 0, 7.0);
        fl.step();

        // only the second call survives in the source grid
        assert!(fl.density(4, 4) > fl.density(2, 2));
    }

    #[test]
    fn injection_clips_at_the_edge() {
        let mut fl = Fluid::new(4, 0.0, 0.0, 0.1);

        fl.add_density(0, 0, 2, 3.0);
        fl.step();

        assert!(fl.density(1, 1) > 0.0);
    }

    #[test]
    fn pipeline_runs_on_pluggable_storage() {
        let mut fl = Fluid::with_factory(6, 0.01, 0.0001, 0.01, NaiveGrid::new);

        fl.add_density(3, 3, 1, 4.0);
        fl.add_velocity(3, 3, 1, vec2(10.0, 0.0));
        fl.step();

        assert!(fl.density(3, 3) > 0.0);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_resolution() {
        Fluid::new(0, 0.01, 0.0001, 0.1);
    }

    #[test]
    #[should_panic]
    fn rejects_negative_viscosity() {
        Fluid::new(4, -0.01, 0.0001, 0.1);
    }
}
