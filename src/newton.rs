use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::PI;

use crate::debug::{format_f64_mat, format_polar_vec};
use crate::{make_jac, power_injections, BusOrder, NumericalError, PFOptions};

/// Solver state. `Converged` and `MaxIterationsExceeded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum State {
    Iterating,
    Converged,
    MaxIterationsExceeded,
}

/// Largest active and reactive power mismatch of a voltage state.
///
/// Buses are internal indexes; `None` when there are no rows of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mismatch {
    pub p_mw: f64,
    pub p_bus: Option<usize>,
    pub q_mvar: f64,
    pub q_bus: Option<usize>,
}

impl Mismatch {
    fn new(f: &[f64], pv_pq: &[usize], pq: &[usize], base_mva: f64) -> Self {
        let (dp, dq) = f.split_at(pv_pq.len());
        let (p_mw, p_bus) = largest(dp, pv_pq, base_mva);
        let (q_mvar, q_bus) = largest(dq, pq, base_mva);
        Self {
            p_mw,
            p_bus,
            q_mvar,
            q_bus,
        }
    }

    fn is_finite(&self) -> bool {
        self.p_mw.is_finite() && self.q_mvar.is_finite()
    }
}

fn largest(rows: &[f64], buses: &[usize], base_mva: f64) -> (f64, Option<usize>) {
    let mut max = (0.0, None);
    for (&m, &i) in rows.iter().zip(buses) {
        let m = m.abs() * base_mva;
        if m.is_nan() {
            return (f64::NAN, Some(i));
        }
        if max.1.is_none() || m > max.0 {
            max = (m, Some(i));
        }
    }
    max
}

pub trait ProgressMonitor {
    fn update(&self, iteration: usize, mismatch: &Mismatch);
}

/// Logs the largest mismatches of each iteration using external bus numbers.
pub struct LogProgress<'a> {
    pub order: &'a BusOrder,
}

impl<'a> ProgressMonitor for LogProgress<'a> {
    fn update(&self, iteration: usize, mismatch: &Mismatch) {
        let bus = |i: Option<usize>| match i {
            Some(i) => self.order.int2ext(i).to_string(),
            None => "-".to_string(),
        };
        log::info!(
            "iteration {}: largest P mismatch {:.4} MW at bus {}, largest Q mismatch {:.4} Mvar at bus {}",
            iteration,
            mismatch.p_mw,
            bus(mismatch.p_bus),
            mismatch.q_mvar,
            bus(mismatch.q_bus)
        );
    }
}

/// Newton-Raphson power flow (power balance, polar) that can be driven one
/// iteration at a time.
///
/// The unknowns are the voltage angles of `pv_pq` followed by the voltage
/// magnitudes of `pq`. Every other magnitude and the slack angle are held at
/// their starting values.
pub struct NewtonPF<'a> {
    y_bus: &'a DMatrix<Complex64>,
    s_bus: &'a [Complex64],
    pv_pq: Vec<usize>,
    pq: Vec<usize>,

    base_mva: f64,
    max_mismatch_mw: f64,
    max_mismatch_mvar: f64,
    max_it: usize,

    vm: Vec<f64>,
    va: Vec<f64>,

    iteration: usize,
    state: State,
    mismatch: Mismatch,
}

impl<'a> NewtonPF<'a> {
    /// Prepares a solve from the starting voltage state (angles in radians).
    ///
    /// `pv` and `pq` are internal indexes in ascending order. Only the
    /// base and the termination criteria are taken from `opt`.
    pub fn new(
        y_bus: &'a DMatrix<Complex64>,
        s_bus: &'a [Complex64],
        vm0: Vec<f64>,
        va0: Vec<f64>,
        pv: &[usize],
        pq: &[usize],
        opt: &PFOptions,
    ) -> Self {
        let mut pv_pq = [pv, pq].concat();
        pv_pq.sort_unstable();

        log::debug!("V0: {}", format_polar_vec(&vm0, &va0));

        Self {
            y_bus,
            s_bus,
            pv_pq,
            pq: pq.to_vec(),
            base_mva: opt.base_mva,
            max_mismatch_mw: opt.max_mismatch_mw,
            max_mismatch_mvar: opt.max_mismatch_mvar,
            max_it: opt.max_it,
            vm: vm0,
            va: va0,
            iteration: 0,
            state: State::Iterating,
            mismatch: Mismatch::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn has_converged(&self) -> bool {
        self.state == State::Converged
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Mismatch of the most recently evaluated voltage state.
    pub fn mismatch(&self) -> &Mismatch {
        &self.mismatch
    }

    pub fn vm(&self) -> &[f64] {
        &self.vm
    }

    /// Voltage angles in radians.
    pub fn va(&self) -> &[f64] {
        &self.va
    }

    pub fn into_voltage(self) -> (Vec<f64>, Vec<f64>) {
        (self.vm, self.va)
    }

    /// Mismatch rows: dP for `pv_pq` then dQ for `pq`, scheduled minus
    /// calculated. Also returns the calculated injections.
    fn mismatch_rows(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let (p, q) = power_injections(self.y_bus, &self.vm, &self.va);
        let f = self
            .pv_pq
            .iter()
            .map(|&i| self.s_bus[i].re - p[i])
            .chain(self.pq.iter().map(|&i| self.s_bus[i].im - q[i]))
            .collect();
        (f, p, q)
    }

    fn within_tolerance(&self) -> bool {
        self.mismatch.p_mw <= self.max_mismatch_mw
            && self.mismatch.q_mvar <= self.max_mismatch_mvar
    }

    /// Performs one iteration: evaluate the mismatch, stop if it is within
    /// tolerance, otherwise solve for and apply the correction.
    ///
    /// Calling `step` in a terminal state does nothing.
    pub fn step(
        &mut self,
        progress: Option<&dyn ProgressMonitor>,
    ) -> Result<State, NumericalError> {
        if self.state != State::Iterating {
            return Ok(self.state);
        }
        self.iteration += 1;
        let iteration = self.iteration;

        let (f, p, q) = self.mismatch_rows();
        self.mismatch = Mismatch::new(&f, &self.pv_pq, &self.pq, self.base_mva);
        if let Some(pm) = progress {
            pm.update(iteration, &self.mismatch);
        }
        if !self.mismatch.is_finite() {
            return Err(NumericalError::NonFinite { iteration });
        }
        if self.within_tolerance() {
            self.state = State::Converged;
            log::info!(
                "Newton's method power flow (power balance, polar) converged in {} iterations.",
                iteration
            );
            return Ok(self.state);
        }

        let jac = make_jac(self.y_bus, &self.vm, &self.va, &p, &q, &self.pv_pq, &self.pq);
        log::trace!("J{}:\n{}", iteration, format_f64_mat(&jac));

        let dx = jac
            .lu()
            .solve(&DVector::from_vec(f))
            .ok_or(NumericalError::SingularJacobian { iteration })?;
        if dx.iter().any(|x| !x.is_finite()) {
            return Err(NumericalError::NonFinite { iteration });
        }

        // j1:j2 - V angle of pv and pq buses, j2:j3 - V mag of pq buses
        let (j1, j2) = (0, self.pv_pq.len());
        let j3 = j2 + self.pq.len();
        for (&i, j) in self.pv_pq.iter().zip(j1..j2) {
            self.va[i] += dx[j];
        }
        for (&i, j) in self.pq.iter().zip(j2..j3) {
            self.vm[i] += dx[j];
        }

        // fold back a magnitude that went negative
        for &i in &self.pq {
            if self.vm[i] < 0.0 {
                self.vm[i] = -self.vm[i];
                self.va[i] += PI;
            }
        }
        log::debug!("V{}: {}", iteration, format_polar_vec(&self.vm, &self.va));

        if iteration >= self.max_it {
            // no further step is allowed, so judge the updated state now
            let (f, _, _) = self.mismatch_rows();
            self.mismatch = Mismatch::new(&f, &self.pv_pq, &self.pq, self.base_mva);
            if !self.mismatch.is_finite() {
                return Err(NumericalError::NonFinite { iteration });
            }
            if self.within_tolerance() {
                self.state = State::Converged;
                log::info!(
                    "Newton's method power flow (power balance, polar) converged in {} iterations.",
                    iteration
                );
            } else {
                self.state = State::MaxIterationsExceeded;
                log::info!(
                    "Newton's method power flow (power balance, polar) did not converge in {} iterations.",
                    iteration
                );
            }
        }
        Ok(self.state)
    }
}

/// Solves power flow using full Newton's method (power/polar), stepping
/// until a terminal state is reached.
pub fn newtonpf<'a>(
    mut solver: NewtonPF<'a>,
    progress: Option<&dyn ProgressMonitor>,
) -> Result<NewtonPF<'a>, NumericalError> {
    while solver.step(progress)? == State::Iterating {}
    Ok(solver)
}
