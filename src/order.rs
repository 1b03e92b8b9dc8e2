use std::collections::HashMap;

use crate::{Bus, ConfigurationError};

/// Mapping between external bus numbers and consecutive internal indexes.
///
/// Internal indexes follow ascending bus number, so every vector and
/// matrix of a run shares one deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusOrder {
    pub e2i: HashMap<usize, usize>,
    pub i2e: Vec<usize>,
}

impl BusOrder {
    /// Builds the ordering for a bus table. Duplicate bus numbers are
    /// rejected.
    pub fn new(bus: &[Bus]) -> Result<Self, ConfigurationError> {
        let mut i2e: Vec<usize> = bus.iter().map(|b| b.number).collect();
        i2e.sort_unstable();

        if let Some(w) = i2e.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigurationError::DuplicateBus(w[0]));
        }

        let e2i = i2e.iter().enumerate().map(|(i, &e)| (e, i)).collect();
        Ok(Self { e2i, i2e })
    }

    pub fn len(&self) -> usize {
        self.i2e.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2e.is_empty()
    }

    /// Internal index of an external bus number.
    pub fn ext2int(&self, number: usize) -> Option<usize> {
        self.e2i.get(&number).copied()
    }

    /// External bus number of an internal index.
    pub fn int2ext(&self, i: usize) -> usize {
        self.i2e[i]
    }

    /// Returns a copy of the bus table in internal order. Buses unknown to
    /// the ordering sort last.
    pub(crate) fn sort_buses(&self, bus: &[Bus]) -> Vec<Bus> {
        let mut sorted = bus.to_vec();
        sorted.sort_by_key(|b| self.ext2int(b.number).unwrap_or(usize::MAX));
        sorted
    }
}
