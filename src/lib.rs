mod bus_types;
mod case;
mod error;
mod jac;
mod loadcase;
mod network;
mod newton;
mod options;
mod order;
mod pf;
mod pfsoln;
mod results;
mod sbus;
mod ybus;

pub mod debug;
pub mod report;

pub use bus_types::*;
pub use case::*;
pub use error::*;
pub use jac::*;
pub use loadcase::*;
pub use network::*;
pub use newton::*;
pub use options::*;
pub use order::*;
pub use pf::*;
pub use pfsoln::*;
pub use results::*;
pub use sbus::*;
pub use ybus::*;

#[cfg(test)]
mod tests;
