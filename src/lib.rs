//! A feed-forward neural network training engine.
//!
//! This crate trains arbitrary multi-layer perceptrons with mini-batch
//! stochastic gradient descent and backpropagation, and exposes a
//! forward-only evaluation path for inference.
//!
//! Conventions:
//! - Scalars are `f64`; matrices are flat row-major buffers.
//! - Numeric primitives and per-sample passes write into caller-supplied
//!   destinations, keeping the training hot path allocation-free.
//! - Low-level APIs (`forward`, `backward`, `process`) panic on shape
//!   mismatches; high-level APIs (construction, `train`, `save`/`load`)
//!   validate and return `Result`.
//! - Randomness is explicit: constructors and `train` take an `Rng`, and
//!   tests seed a `StdRng` up front.
//!
//! Per mini-batch, `train` fans sample gradients out over parallel workers,
//! joins them at a barrier, reduces their `WeightUpdates` and applies one
//! regularized update step to the network.

pub mod activation;
pub mod cost;
pub mod data;
pub mod error;
pub mod layer;
pub mod linalg;
pub mod metrics;
pub mod network;
pub mod persist;
pub mod train;
pub mod trainer;

pub use activation::Activation;
pub use cost::Cost;
pub use data::{samples_from_rows, TrainingSample};
pub use error::{Error, Result};
pub use layer::Layer;
pub use metrics::{correctness, Evaluation};
pub use network::Network;
pub use persist::{load, save};
pub use train::{train, EpochHook, TrainOptions};
pub use trainer::{Backprop, WeightUpdates};
