use super::grid::Grid;

/// Wall treatment a field receives when its boundary ring is refreshed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Ring copies the adjacent interior value (density, pressure,
    /// divergence).
    Scalar,
    /// Horizontal velocity component: negated on the left and right walls.
    U,
    /// Vertical velocity component: negated on the top and bottom walls.
    V,
}

/// Refresh the boundary ring of `x` from its interior.
///
/// Each velocity component is reflected on the pair of walls it runs
/// into, cancelling flow through them; every other edge copies the
/// adjacent interior value. Corners take the average of their two ring
/// neighbours.
pub fn set_bnd<G: Grid>(bnd: Boundary, x: &mut G, n: usize) {
    let n = n as i32;

    for i in 1..=n {
        if bnd == Boundary::U {
            x.set(0, i, -x.get(1, i));
            x.set(n + 1, i, -x.get(n, i));
        } else {
            x.set(0, i, x.get(1, i));
            x.set(n + 1, i, x.get(n, i));
        }

        if bnd == Boundary::V {
            x.set(i, 0, -x.get(i, 1));
            x.set(i, n + 1, -x.get(i, n));
        } else {
            x.set(i, 0, x.get(i, 1));
            x.set(i, n + 1, x.get(i, n));
        }
    }

    x.set(0, 0, 0.5 * (x.get(1, 0) + x.get(0, 1)));
    x.set(0, n + 1, 0.5 * (x.get(1, n + 1) + x.get(0, n)));
    x.set(n + 1, 0, 0.5 * (x.get(n, 0) + x.get(n + 1, 1)));
    x.set(n + 1, n + 1, 0.5 * (x.get(n, n + 1) + x.get(n + 1, n)));
}
