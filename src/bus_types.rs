use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Bus, ConfigurationError};

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum BusType {
    /// Reference voltage magnitude and angle. Slack active and reactive power.
    Slack,
    /// Fixed voltage magnitude and active power.
    PV,
    /// Fixed active and reactive power.
    PQ,
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::Slack => write!(f, "Slack"),
            BusType::PV => write!(f, "PV"),
            BusType::PQ => write!(f, "PQ"),
        }
    }
}

/// Classifies a single bus by the quantities it specifies.
pub fn bus_type(bus: &Bus, slack_bus: usize) -> BusType {
    if bus.number == slack_bus {
        BusType::Slack
    } else if bus.pg.is_some() || bus.vm.is_some() {
        BusType::PV
    } else {
        BusType::PQ
    }
}

/// Builds index lists for each type of bus (slack, PV, PQ).
///
/// Expects `bus` in internal order; the returned lists are internal
/// indexes in ascending order. Exactly one bus must carry the slack
/// bus number.
pub fn bus_types(
    bus: &[Bus],
    slack_bus: usize,
) -> Result<(usize, Vec<usize>, Vec<usize>), ConfigurationError> {
    let types: Vec<BusType> = bus.iter().map(|b| bus_type(b, slack_bus)).collect();

    let of_type = |t: BusType| -> Vec<usize> {
        types
            .iter()
            .enumerate()
            .filter(|(_, &bt)| bt == t)
            .map(|(i, _)| i)
            .collect()
    };

    let refbus = of_type(BusType::Slack);
    if refbus.len() != 1 {
        return Err(ConfigurationError::SlackBus {
            number: slack_bus,
            found: refbus.len(),
        });
    }

    Ok((refbus[0], of_type(BusType::PV), of_type(BusType::PQ)))
}
