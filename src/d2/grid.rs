use ndarray::Array2;

/// Storage capability for a square scalar field.
///
/// Coordinates are signed: reads outside `[0, dim)` on either axis yield
/// `0.0` and writes there are dropped, so callers may address cells past
/// the edge (an injection square straddling a wall, say) without bounds
/// checks of their own.
pub trait Grid {
    /// Width and height of the backing square, boundary ring included.
    fn dim(&self) -> usize;

    /// Value at `(i, j)`, or `0.0` out of range.
    fn get(&self, i: i32, j: i32) -> f64;

    /// Store `value` at `(i, j)`; out-of-range writes are dropped.
    fn set(&mut self, i: i32, j: i32, value: f64);

    /// Exchange backing storage with `other` in O(1).
    ///
    /// Both grids keep their identity but trade contents. Panics if the
    /// dimensions differ.
    fn swap(&mut self, other: &mut Self);
}

/// The stock grid: one contiguous allocation of cells.
#[derive(Clone, Debug)]
pub struct DenseGrid {
    cells: Array2<f64>,
}

impl DenseGrid {
    pub fn new(dim: usize) -> Self {
        Self {
            cells: Array2::zeros((dim, dim)),
        }
    }

    fn index(&self, i: i32, j: i32) -> Option<(usize, usize)> {
        let dim = self.cells.nrows();

        if i < 0 || j < 0 || i as usize >= dim || j as usize >= dim {
            None
        } else {
            Some((i as usize, j as usize))
        }
    }
}

impl Grid for DenseGrid {
    fn dim(&self) -> usize {
        self.cells.nrows()
    }

    fn get(&self, i: i32, j: i32) -> f64 {
        match self.index(i, j) {
            Some(ij) => self.cells[ij],
            None => 0.0,
        }
    }

    fn set(&mut self, i: i32, j: i32, value: f64) {
        if let Some(ij) = self.index(i, j) {
            self.cells[ij] = value;
        }
    }

    fn swap(&mut self, other: &mut Self) {
        assert_eq!(
            self.dim(),
            other.dim(),
            "will not swap grids of differing dimensions"
        );

        std::mem::swap(&mut self.cells, &mut other.cells);
    }
}

/// Row-of-rows test double, deliberately nothing like the contiguous
/// production layout.
#[cfg(test)]
pub(crate) struct NaiveGrid {
    rows: Vec<Vec<f64>>,
}

#[cfg(test)]
impl NaiveGrid {
    pub(crate) fn new(dim: usize) -> Self {
        Self {
            rows: vec![vec![0.0; dim]; dim],
        }
    }
}

#[cfg(test)]
impl Grid for NaiveGrid {
    fn dim(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, i: i32, j: i32) -> f64 {
        if i < 0 || j < 0 {
            return 0.0;
        }

        match self.rows.get(i as usize).and_then(|row| row.get(j as usize)) {
            Some(value) => *value,
            None => 0.0,
        }
    }

    fn set(&mut self, i: i32, j: i32, value: f64) {
        if i < 0 || j < 0 {
            return;
        }

        if let Some(cell) = self
            .rows
            .get_mut(i as usize)
            .and_then(|row| row.get_mut(j as usize))
        {
            *cell = value;
        }
    }

    fn swap(&mut self, other: &mut Self) {
        assert_eq!(
            self.dim(),
            other.dim(),
            "will not swap grids of differing dimensions"
        );

        std::mem::swap(&mut self.rows, &mut other.rows);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn read_back<G: Grid>(mut g: G) {
        g.set(1, 2, 11.0);
        assert_eq!(g.get(1, 2), 11.0);
    }

    fn out_of_range<G: Grid>(mut g: G) {
        let dim = g.dim() as i32;

        for &(i, j) in &[(-1, 0), (0, -1), (dim, 0), (0, dim), (dim, dim), (-3, -3)] {
            assert_eq!(g.get(i, j), 0.0);
            g.set(i, j, 7.0);
        }

        // no in-bounds cell took the dropped writes
        for i in 0..dim {
            for j in 0..dim {
                assert_eq!(g.get(i, j), 0.0);
            }
        }
    }

    fn swapped_contents<G: Grid>(mut a: G, mut b: G) {
        a.set(0, 0, 1.0);
        b.set(1, 1, 2.0);

        a.swap(&mut b);

        assert_eq!(a.get(0, 0), 0.0);
        assert_eq!(a.get(1, 1), 2.0);
        assert_eq!(b.get(0, 0), 1.0);
        assert_eq!(b.get(1, 1), 0.0);
    }

    #[test]
    fn dense_read_back() {
        read_back(DenseGrid::new(4));
    }

    #[test]
    fn dense_out_of_range() {
        out_of_range(DenseGrid::new(4));
    }

    #[test]
    fn dense_swap() {
        swapped_contents(DenseGrid::new(3), DenseGrid::new(3));
    }

    #[test]
    #[should_panic]
    fn dense_swap_dimension_mismatch() {
        let mut a = DenseGrid::new(3);
        a.swap(&mut DenseGrid::new(4));
    }

    #[test]
    fn naive_read_back() {
        read_back(NaiveGrid::new(4));
    }

    #[test]
    fn naive_out_of_range() {
        out_of_range(NaiveGrid::new(4));
    }

    #[test]
    fn naive_swap() {
        swapped_contents(NaiveGrid::new(3), NaiveGrid::new(3));
    }

    #[test]
    #[should_panic]
    fn naive_swap_dimension_mismatch() {
        let mut a = NaiveGrid::new(2);
        a.swap(&mut NaiveGrid::new(5));
    }
}
