use thiserror::Error;

/// Malformed or inconsistent input, detected before any iteration runs.
///
/// Lines are identified by their 1-based position in the line table
/// together with their end bus numbers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("case contains no buses")]
    EmptyCase,

    #[error("bus {0} is defined more than once")]
    DuplicateBus(usize),

    #[error("bus {bus} has a non-finite value or a non-positive voltage")]
    InvalidBus { bus: usize },

    #[error("slack bus {number} must match exactly one bus (found {found})")]
    SlackBus { number: usize, found: usize },

    #[error("line {line} ({from}-{to}) references unknown bus {bus}")]
    UnknownBus {
        line: usize,
        from: usize,
        to: usize,
        bus: usize,
    },

    #[error("line {line} connects bus {bus} to itself")]
    SelfLoop { line: usize, bus: usize },

    #[error("line {line} ({from}-{to}) has zero series impedance")]
    ZeroImpedance { line: usize, from: usize, to: usize },

    #[error("line {line} ({from}-{to}) has non-finite parameters")]
    InvalidLine { line: usize, from: usize, to: usize },

    #[error("buses {0:?} are not connected to the slack bus")]
    Islanded(Vec<usize>),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Failure of the linear correction step.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NumericalError {
    #[error("singular Jacobian at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    #[error("non-finite mismatch or voltage correction at iteration {iteration}")]
    NonFinite { iteration: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PowerFlowError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("numerical error: {0}")]
    Numerical(#[from] NumericalError),
}
