//! Error types for ShuddhiSim

use crate::sim::RunMode;
use thiserror::Error;

/// ShuddhiSim error type
#[derive(Error, Debug)]
pub enum SimError {
    /// An operation was attempted in a run mode that forbids it.
    #[error("operation '{op}' is not allowed in {mode:?} mode")]
    IllegalMode {
        /// Name of the rejected operation.
        op: &'static str,
        /// Mode the simulation was in.
        mode: RunMode,
    },

    /// `start_simulation` was called before a robot was placed.
    #[error("cannot start simulation: no robot placed")]
    NoRobotPlaced,

    /// A layout id was requested that the configuration does not define.
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
