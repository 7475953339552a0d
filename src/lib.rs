//! A minimal feed-forward network with online backpropagation.
//!
//! Networks are built by [`NetworkBuilder`] as three fully connected layers
//! (input, hidden, output) of sigmoid neurons, and trained one sample at a
//! time by [`Trainer`]. The [`task`] module drives a network on a synthetic
//! sum-approximation stream.

pub mod engine;
pub mod error;
pub mod nn;
pub mod report;
pub mod task;

pub use engine::{Connection, ConnectionId, Layer, LayerKind, Network, Neuron, NeuronId};
pub use error::{Error, Result};
pub use nn::{NetworkBuilder, Trainer};
pub use report::{ConnectionSnapshot, NetworkSnapshot, NeuronSnapshot};
pub use task::{Evaluation, Sample, Session, SumTask, TrainingConfig};
