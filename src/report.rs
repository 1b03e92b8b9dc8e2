use std::fmt;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::{PowerFlowResults, State, VoltageViolation};

/// A float that prints with a fixed number of decimal places.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
struct FloatWrapper {
    value: f64,
    precision: usize,
}

impl FloatWrapper {
    fn new(value: f64, precision: usize) -> Self {
        FloatWrapper { value, precision }
    }
}

impl fmt::Display for FloatWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1$}", self.value, self.precision)
    }
}

fn opt_float(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| FloatWrapper::new(v, precision).to_string())
}

#[derive(Tabled)]
#[allow(non_snake_case)]
struct BusRow {
    Bus: usize,
    Type: String,
    Vm_pu: FloatWrapper,
    Va_deg: FloatWrapper,
    Pd_mw: FloatWrapper,
    Qd_mvar: FloatWrapper,
    Pg_mw: String,
    Qg_mvar: String,
    Violation: &'static str,
}

#[derive(Tabled)]
#[allow(non_snake_case)]
struct LineRow {
    Line: usize,
    From: usize,
    To: usize,
    P_from_mw: FloatWrapper,
    Q_from_mvar: FloatWrapper,
    P_to_mw: FloatWrapper,
    Q_to_mvar: FloatWrapper,
    Loss_mw: FloatWrapper,
    Loss_mvar: FloatWrapper,
    Loading_pct: String,
    Overload: &'static str,
}

/// Bus voltages and generation as a markdown table.
pub fn bus_table(res: &PowerFlowResults) -> String {
    let rows = res.bus.iter().map(|b| BusRow {
        Bus: b.number,
        Type: b.bus_type.to_string(),
        Vm_pu: FloatWrapper::new(b.vm, 4),
        Va_deg: FloatWrapper::new(b.va, 3),
        Pd_mw: FloatWrapper::new(b.pd, 2),
        Qd_mvar: FloatWrapper::new(b.qd, 2),
        Pg_mw: opt_float(b.pg, 2),
        Qg_mvar: opt_float(b.qg, 2),
        Violation: match b.violation {
            Some(VoltageViolation::Under) => "under",
            Some(VoltageViolation::Over) => "over",
            None => "",
        },
    });
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Line flows as a markdown table.
pub fn line_table(res: &PowerFlowResults) -> String {
    let rows = res.line.iter().map(|l| LineRow {
        Line: l.line,
        From: l.from_bus,
        To: l.to_bus,
        P_from_mw: FloatWrapper::new(l.pf, 2),
        Q_from_mvar: FloatWrapper::new(l.qf, 2),
        P_to_mw: FloatWrapper::new(l.pt, 2),
        Q_to_mvar: FloatWrapper::new(l.qt, 2),
        Loss_mw: FloatWrapper::new(l.loss_mw, 3),
        Loss_mvar: FloatWrapper::new(l.loss_mvar, 3),
        Loading_pct: opt_float(l.loading, 1),
        Overload: if l.overloaded { "yes" } else { "" },
    });
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Convergence status, final mismatch and system totals.
pub fn summary(res: &PowerFlowResults) -> String {
    let status = match res.status {
        State::Converged => "converged",
        State::MaxIterationsExceeded => "did not converge (results are provisional)",
        State::Iterating => "iterating",
    };
    let bus = |b: Option<usize>| b.map_or_else(|| "-".to_string(), |b| b.to_string());
    let t = &res.totals;

    let mut s = String::new();
    s += &format!("Newton-Raphson power flow {} in {} iterations\n", status, res.iterations);
    s += &format!(
        "Largest mismatch: {:.4} MW at bus {}, {:.4} Mvar at bus {}\n",
        res.mismatch.p_mw,
        bus(res.mismatch.p_bus),
        res.mismatch.q_mvar,
        bus(res.mismatch.q_bus)
    );
    s += &format!("Generation: {:.2} MW, {:.2} Mvar\n", t.pg, t.qg);
    s += &format!("Load:       {:.2} MW, {:.2} Mvar\n", t.pd, t.qd);
    s += &format!("Losses:     {:.3} MW, {:.3} Mvar\n", t.loss_mw, t.loss_mvar);
    s += &format!(
        "Voltage violations: {}, overloaded lines: {}",
        res.voltage_violations().count(),
        res.overloads().count()
    );
    s
}

/// Summary, bus and line tables.
pub fn report(res: &PowerFlowResults) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        summary(res),
        bus_table(res),
        line_table(res)
    )
}
