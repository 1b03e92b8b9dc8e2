use std::collections::VecDeque;

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::{make_ybus, Branch, Bus, BusOrder, Case, ConfigurationError};

/// Network is the validated, internally indexed form of a [`Case`] together
/// with its bus admittance matrix. It is immutable once built.
#[derive(Debug, Clone)]
pub struct Network {
    pub order: BusOrder,

    /// Buses in internal (ascending bus number) order.
    pub bus: Vec<Bus>,

    /// Lines in input order.
    pub branch: Vec<Branch>,

    pub y_bus: DMatrix<Complex64>,
}

impl Network {
    /// Validates the case and builds the bus admittance matrix.
    ///
    /// Impedances are already per unit, so the power base plays no part
    /// here. Nothing is returned for a case that fails validation.
    pub fn new(case: &Case) -> Result<Self, ConfigurationError> {
        if case.bus.is_empty() {
            return Err(ConfigurationError::EmptyCase);
        }
        let order = BusOrder::new(&case.bus)?;

        let bus = order.sort_buses(&case.bus);
        if let Some(b) = bus.iter().find(|b| !b.is_valid()) {
            return Err(ConfigurationError::InvalidBus { bus: b.number });
        }

        let branch = case
            .line
            .iter()
            .enumerate()
            .map(|(i, ln)| Branch::new(i + 1, ln, &order))
            .collect::<Result<Vec<Branch>, ConfigurationError>>()?;

        let y_bus = make_ybus(order.len(), &branch);
        log::debug!(
            "network: {} buses, {} lines, {} non-zero admittances",
            order.len(),
            branch.len(),
            y_bus.iter().filter(|y| y.norm() != 0.0).count()
        );

        Ok(Self {
            order,
            bus,
            branch,
            y_bus,
        })
    }

    pub fn nb(&self) -> usize {
        self.bus.len()
    }

    /// External numbers of the buses with no path to bus `root`
    /// (an internal index), in ascending order.
    pub fn unreachable_from(&self, root: usize) -> Vec<usize> {
        let nb = self.nb();
        let mut adj = vec![Vec::new(); nb];
        for br in &self.branch {
            adj[br.f].push(br.t);
            adj[br.t].push(br.f);
        }

        let mut seen = vec![false; nb];
        let mut queue = VecDeque::from([root]);
        seen[root] = true;
        while let Some(i) = queue.pop_front() {
            for &j in &adj[i] {
                if !seen[j] {
                    seen[j] = true;
                    queue.push_back(j);
                }
            }
        }

        (0..nb)
            .filter(|&i| !seen[i])
            .map(|i| self.order.int2ext(i))
            .collect()
    }
}
