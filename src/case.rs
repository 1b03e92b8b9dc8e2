use serde::{Deserialize, Serialize};

/// Case is a power system described by its bus and line tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Power system nodes with their loads and generation.
    pub bus: Vec<Bus>,

    /// Transmission lines and transformers.
    pub line: Vec<Line>,
}

impl Case {
    pub fn new(bus: Vec<Bus>, line: Vec<Line>) -> Self {
        Self { bus, line }
    }

    /// Total real and reactive load (MW, Mvar).
    pub fn total_load(&self) -> (f64, f64) {
        self.bus
            .iter()
            .fold((0.0, 0.0), |(p, q), b| (p + b.pd, q + b.qd))
    }
}

/// Bus is a node in the power system graph.
///
/// Which of `pg` and `vm` are present decides the bus type: a bus with
/// either is voltage controlled, a bus with neither is a load bus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Bus number, a positive integer.
    pub number: usize,

    /// Real power demand (MW).
    pub pd: f64,

    /// Reactive power demand (Mvar).
    pub qd: f64,

    /// Scheduled real power generation (MW).
    pub pg: Option<f64>,

    /// Specified voltage magnitude (p.u.).
    pub vm: Option<f64>,
}

impl Bus {
    /// A load bus.
    pub fn pq(number: usize, pd: f64, qd: f64) -> Self {
        Self {
            number,
            pd,
            qd,
            ..Default::default()
        }
    }

    /// A voltage controlled bus with local load.
    pub fn pv(number: usize, pg: f64, vm: f64, pd: f64, qd: f64) -> Self {
        Self {
            number,
            pd,
            qd,
            pg: Some(pg),
            vm: Some(vm),
        }
    }

    /// A bus with a fixed voltage magnitude and no scheduled generation,
    /// as used for the slack bus.
    pub fn with_voltage(number: usize, vm: f64) -> Self {
        Self {
            number,
            vm: Some(vm),
            ..Default::default()
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.number > 0
            && self.pd.is_finite()
            && self.qd.is_finite()
            && self.pg.map_or(true, f64::is_finite)
            && self.vm.map_or(true, |vm| vm.is_finite() && vm > 0.0)
    }
}

/// Line is a pi-section branch between two buses.
///
/// The line is undirected for admittance purposes; `from_bus` and `to_bus`
/// only fix the sign convention of the reported flows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// "From" bus number.
    pub from_bus: usize,

    /// "To" bus number.
    pub to_bus: usize,

    /// Series resistance (p.u.).
    pub r: f64,

    /// Series reactance (p.u.).
    pub x: f64,

    /// Total line charging susceptance (p.u.).
    pub b: f64,

    /// Thermal rating (MVA).
    pub rate_a: Option<f64>,
}

impl Line {
    pub fn new(from_bus: usize, to_bus: usize, r: f64, x: f64, b: f64) -> Self {
        Self {
            from_bus,
            to_bus,
            r,
            x,
            b,
            rate_a: None,
        }
    }

    pub fn rated(mut self, rate_a: f64) -> Self {
        self.rate_a = Some(rate_a);
        self
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.r.is_finite()
            && self.x.is_finite()
            && self.b.is_finite()
            && self.rate_a.map_or(true, f64::is_finite)
    }
}
