use nalgebra::DMatrix;
use num_complex::Complex64;
use num_traits::Zero;

use crate::{BusOrder, ConfigurationError, Line};

/// Series impedances with a magnitude below this are treated as zero.
pub const MIN_IMPEDANCE: f64 = 1e-9;

/// A line converted to internal indexing with its pi-model admittances.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// 1-based position of the line in the input table.
    pub line: usize,

    /// Internal index of the "from" bus.
    pub f: usize,
    /// Internal index of the "to" bus.
    pub t: usize,

    /// Series admittance 1/(r + jx).
    pub y_s: Complex64,
    /// Total line charging susceptance.
    pub b_c: f64,

    /// Thermal rating (MVA).
    pub rate_a: Option<f64>,
}

impl Branch {
    /// Checks a line against the bus ordering and computes its series
    /// admittance.
    pub fn new(line: usize, ln: &Line, order: &BusOrder) -> Result<Self, ConfigurationError> {
        let (from, to) = (ln.from_bus, ln.to_bus);

        let f = order.ext2int(from).ok_or(ConfigurationError::UnknownBus {
            line,
            from,
            to,
            bus: from,
        })?;
        let t = order.ext2int(to).ok_or(ConfigurationError::UnknownBus {
            line,
            from,
            to,
            bus: to,
        })?;
        if f == t {
            return Err(ConfigurationError::SelfLoop { line, bus: from });
        }
        if !ln.is_valid() {
            return Err(ConfigurationError::InvalidLine { line, from, to });
        }

        let z = Complex64::new(ln.r, ln.x);
        if z.norm() < MIN_IMPEDANCE {
            return Err(ConfigurationError::ZeroImpedance { line, from, to });
        }

        Ok(Self {
            line,
            f,
            t,
            y_s: z.inv(),
            b_c: ln.b,
            rate_a: ln.rate_a,
        })
    }

    /// Shunt admittance at each end (half the line charging).
    pub fn y_sh(&self) -> Complex64 {
        Complex64::new(0.0, self.b_c / 2.0)
    }

    /// Complex currents injected into the branch at the "from" and "to" ends.
    ///
    /// ```txt
    /// | If |   | Ys + Ysh    -Ys    |   | Vf |
    /// |    | = |                   | * |    |
    /// | It |   |   -Ys     Ys + Ysh |   | Vt |
    /// ```
    pub fn currents(&self, v: &[Complex64]) -> (Complex64, Complex64) {
        let (v_f, v_t) = (v[self.f], v[self.t]);
        let i_f = (v_f - v_t) * self.y_s + v_f * self.y_sh();
        let i_t = (v_t - v_f) * self.y_s + v_t * self.y_sh();
        (i_f, i_t)
    }
}

/// Builds the bus admittance matrix.
///
/// Parallel branches between the same pair of buses accumulate.
pub fn make_ybus(nb: usize, branch: &[Branch]) -> DMatrix<Complex64> {
    let mut y_bus = DMatrix::<Complex64>::from_element(nb, nb, Complex64::zero());

    for br in branch {
        let y_tt = br.y_s + br.y_sh();
        let (f, t) = (br.f, br.t);

        y_bus[(f, f)] += y_tt;
        y_bus[(f, t)] -= br.y_s;
        y_bus[(t, f)] -= br.y_s;
        y_bus[(t, t)] += y_tt;
    }
    y_bus
}
