use nalgebra::DMatrix;
use num_complex::Complex64;

/// Voltage state and the injections it produces, from which the partial
/// derivatives of the polar power flow equations are evaluated.
struct Partials<'a> {
    y_bus: &'a DMatrix<Complex64>,
    vm: &'a [f64],
    va: &'a [f64],
    p: &'a [f64],
    q: &'a [f64],
}

impl<'a> Partials<'a> {
    #[inline]
    fn gb(&self, i: usize, k: usize) -> (f64, f64) {
        let y = self.y_bus[(i, k)];
        (y.re, y.im)
    }

    #[inline]
    fn sin_cos(&self, i: usize, k: usize) -> (f64, f64) {
        (self.va[i] - self.va[k]).sin_cos()
    }

    /// dP_i/dVa_k
    fn dp_dva(&self, i: usize, k: usize) -> f64 {
        let (g, b) = self.gb(i, k);
        if i == k {
            -self.q[i] - b * self.vm[i] * self.vm[i]
        } else {
            let (sin, cos) = self.sin_cos(i, k);
            self.vm[i] * self.vm[k] * (g * sin - b * cos)
        }
    }

    /// dP_i/dVm_k
    fn dp_dvm(&self, i: usize, k: usize) -> f64 {
        let (g, b) = self.gb(i, k);
        if i == k {
            self.p[i] / self.vm[i] + g * self.vm[i]
        } else {
            let (sin, cos) = self.sin_cos(i, k);
            self.vm[i] * (g * cos + b * sin)
        }
    }

    /// dQ_i/dVa_k
    fn dq_dva(&self, i: usize, k: usize) -> f64 {
        let (g, b) = self.gb(i, k);
        if i == k {
            self.p[i] - g * self.vm[i] * self.vm[i]
        } else {
            let (sin, cos) = self.sin_cos(i, k);
            -self.vm[i] * self.vm[k] * (g * cos + b * sin)
        }
    }

    /// dQ_i/dVm_k
    fn dq_dvm(&self, i: usize, k: usize) -> f64 {
        let (g, b) = self.gb(i, k);
        if i == k {
            self.q[i] / self.vm[i] - b * self.vm[i]
        } else {
            let (sin, cos) = self.sin_cos(i, k);
            self.vm[i] * (g * sin - b * cos)
        }
    }

    fn block(
        &self,
        rows: &[usize],
        cols: &[usize],
        d: fn(&Self, usize, usize) -> f64,
    ) -> DMatrix<f64> {
        DMatrix::from_fn(rows.len(), cols.len(), |r, c| d(self, rows[r], cols[c]))
    }
}

/// Forms the power flow Jacobian.
///
/// Rows are the real power mismatches of `pv_pq` followed by the reactive
/// power mismatches of `pq`; columns are the voltage angles of `pv_pq`
/// followed by the voltage magnitudes of `pq`:
///
/// ```txt
///     | dP/dVa  dP/dVm |   | J11  J12 |
///     |                | = |          |
///     | dQ/dVa  dQ/dVm |   | J21  J22 |
/// ```
///
/// `p` and `q` are the calculated injections at the voltage state. All
/// quantities are per unit with angles in radians.
pub fn make_jac(
    y_bus: &DMatrix<Complex64>,
    vm: &[f64],
    va: &[f64],
    p: &[f64],
    q: &[f64],
    pv_pq: &[usize],
    pq: &[usize],
) -> DMatrix<f64> {
    let d = Partials {
        y_bus,
        vm,
        va,
        p,
        q,
    };

    let j11 = d.block(pv_pq, pv_pq, Partials::dp_dva);
    let j12 = d.block(pv_pq, pq, Partials::dp_dvm);
    let j21 = d.block(pq, pv_pq, Partials::dq_dva);
    let j22 = d.block(pq, pq, Partials::dq_dvm);

    compose([[&j11, &j12], [&j21, &j22]])
}

/// Stacks a 2x2 grid of blocks into a single matrix.
fn compose(blocks: [[&DMatrix<f64>; 2]; 2]) -> DMatrix<f64> {
    let [[a, b], [c, d]] = blocks;
    let (r1, c1) = a.shape();
    let (r2, c2) = d.shape();

    let mut m = DMatrix::zeros(r1 + r2, c1 + c2);
    for (blk, start) in [(a, (0, 0)), (b, (0, c1)), (c, (r1, 0)), (d, (r1, c1))] {
        m.view_mut(start, blk.shape()).copy_from(blk);
    }
    m
}
