use serde::Serialize;

use crate::{BusType, PFOptions, State};

/// Outcome of a power flow run together with the post-solution analysis.
///
/// When `provisional` is set the solver stopped at its iteration cap and
/// every voltage, flow and violation below describes the last state it
/// reached rather than a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerFlowResults {
    pub status: State,
    pub iterations: usize,

    /// Largest remaining mismatch, by external bus number.
    pub mismatch: FinalMismatch,

    pub provisional: bool,

    /// Buses in ascending bus number order.
    pub bus: Vec<BusResult>,

    /// Lines in input order.
    pub line: Vec<LineResult>,

    pub totals: Totals,

    pub options: PFOptions,
}

impl PowerFlowResults {
    pub fn converged(&self) -> bool {
        self.status == State::Converged
    }

    pub fn bus(&self, number: usize) -> Option<&BusResult> {
        self.bus.iter().find(|b| b.number == number)
    }

    pub fn voltage_violations(&self) -> impl Iterator<Item = &BusResult> {
        self.bus.iter().filter(|b| b.violation.is_some())
    }

    pub fn overloads(&self) -> impl Iterator<Item = &LineResult> {
        self.line.iter().filter(|l| l.overloaded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalMismatch {
    /// Largest active power mismatch (MW).
    pub p_mw: f64,
    pub p_bus: Option<usize>,

    /// Largest reactive power mismatch (Mvar).
    pub q_mvar: f64,
    pub q_bus: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoltageViolation {
    Under,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusResult {
    pub number: usize,
    pub bus_type: BusType,

    /// Voltage magnitude (p.u.).
    pub vm: f64,
    /// Voltage angle (degrees).
    pub va: f64,

    pub pd: f64,
    pub qd: f64,

    /// Real power generation (MW). Scheduled at PV buses, calculated at
    /// the slack bus, absent at load buses.
    pub pg: Option<f64>,
    /// Reactive power generation (Mvar) needed to hold the voltage of a
    /// slack or PV bus.
    pub qg: Option<f64>,

    pub violation: Option<VoltageViolation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineResult {
    /// 1-based position in the line table.
    pub line: usize,
    pub from_bus: usize,
    pub to_bus: usize,

    /// Real power injected at the "from" end (MW).
    pub pf: f64,
    /// Reactive power injected at the "from" end (Mvar).
    pub qf: f64,
    /// Real power injected at the "to" end (MW).
    pub pt: f64,
    /// Reactive power injected at the "to" end (Mvar).
    pub qt: f64,

    pub loss_mw: f64,
    pub loss_mvar: f64,

    /// Larger of the two end apparent powers (MVA).
    pub s_max: f64,
    /// `s_max` as a percentage of the rating, for rated lines.
    pub loading: Option<f64>,
    pub overloaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub pg: f64,
    pub qg: f64,
    pub pd: f64,
    pub qd: f64,
    pub loss_mw: f64,
    pub loss_mvar: f64,
}
