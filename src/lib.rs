/// Implemented RL algorithms
pub mod algo;

/// Run configuration
pub mod config;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Greedy replay of a trained agent
pub mod demo;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

mod error;

/// Exploration policies
pub mod exploration;

/// Snake environment and its state encoding
pub mod gym;

/// Training loop
pub mod train;

/// Terminal visualization
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
pub use train::{train, TrainedModel};
