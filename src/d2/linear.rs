use super::boundary::{set_bnd, Boundary};
use super::grid::Grid;

/// Gauss-Seidel sweep count for diffusion and the pressure solve.
///
/// The implicit schemes stay stable at any depth, so this trades
/// accuracy against a deterministic, bounded cost per step.
pub const RELAX_SWEEPS: usize = 20;

/// Relax `x[i,j] = (x0[i,j] + a * (sum of the four neighbours of x)) / c`
/// over the interior, re-applying boundary conditions after every sweep.
///
/// Neighbour reads within a sweep see values already updated in the same
/// pass (Gauss-Seidel, not Jacobi).
pub fn lin_solve<G: Grid>(bnd: Boundary, x: &mut G, x0: &G, a: f64, c: f64, n: usize) {
    for _ in 0..RELAX_SWEEPS {
        for i in 1..=n as i32 {
            for j in 1..=n as i32 {
                let neighbours =
                    x.get(i - 1, j) + x.get(i + 1, j) + x.get(i, j - 1) + x.get(i, j + 1);

                x.set(i, j, (x0.get(i, j) + a * neighbours) / c);
            }
        }

        set_bnd(bnd, x, n);
    }
}
