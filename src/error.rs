//! Error types for network construction and training.

use crate::engine::LayerKind;
use thiserror::Error;

/// Result type alias for this crate
pub type Result<R> = std::result::Result<R, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A layer has no neurons, so the network cannot produce output
    #[error("the {0} layer is empty")]
    EmptyLayer(LayerKind),

    #[error("expected {expected} input values, got {actual}")]
    InputShape { expected: usize, actual: usize },

    #[error("training requires at least one desired output value")]
    MissingDesiredOutput,

    #[error("no neuron with index {0} in this network")]
    UnknownNeuron(usize),

    #[error("no connection with index {0} in this network")]
    UnknownConnection(usize),

    /// Connecting `from` to `to` would close a cycle
    #[error("connecting neuron {from} to neuron {to} would create a cycle")]
    WouldCycle { from: usize, to: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
