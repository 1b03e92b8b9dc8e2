use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::Bus;

/// Builds the vector of scheduled complex bus power injections.
///
/// Returns generation minus load in per unit. Buses without scheduled
/// generation inject only their (negative) load, and no bus schedules
/// reactive generation. The entry of the slack bus is not used by the
/// solver.
pub fn make_sbus(base_mva: f64, bus: &[Bus]) -> Vec<Complex64> {
    bus.iter()
        .map(|b| Complex64::new(b.pg.unwrap_or(0.0) - b.pd, -b.qd) / base_mva)
        .collect()
}

/// Computes the real and reactive power injected at every bus for the
/// voltage state given in polar form.
///
/// ```txt
/// P_i = V_i * sum_k V_k * (G_ik cos(th_ik) + B_ik sin(th_ik))
/// Q_i = V_i * sum_k V_k * (G_ik sin(th_ik) - B_ik cos(th_ik))
/// ```
pub fn power_injections(
    y_bus: &DMatrix<Complex64>,
    vm: &[f64],
    va: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let nb = vm.len();
    let mut p = vec![0.0; nb];
    let mut q = vec![0.0; nb];

    for i in 0..nb {
        let (mut p_i, mut q_i) = (0.0, 0.0);
        for k in 0..nb {
            let y = y_bus[(i, k)];
            if y.re == 0.0 && y.im == 0.0 {
                continue;
            }
            let (sin, cos) = (va[i] - va[k]).sin_cos();
            p_i += vm[k] * (y.re * cos + y.im * sin);
            q_i += vm[k] * (y.re * sin - y.im * cos);
        }
        p[i] = vm[i] * p_i;
        q[i] = vm[i] * q_i;
    }
    (p, q)
}
