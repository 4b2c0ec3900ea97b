//! kiln — a training and evaluation harness for neural networks.
//!
//! The harness (`train::Trainer`) runs epochs over a dataset, computes
//! losses and metrics, checkpoints weights, and exports predictions as PNG
//! files. All numerics are injected behind traits (`Network`, `Loss`,
//! `Optimizer`, `Scheduler`, `DataSource`, `Metric`); the crate also ships
//! a small dense-network library implementing those traits so it is usable
//! end to end out of the box.

pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod metrics;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::Activation;
pub use data::{DataSource, InMemoryDataset, Sample};
pub use error::{KilnError, Result};
pub use layers::Dense;
pub use loss::{BceLoss, CrossEntropyLoss, Loss, MseLoss};
pub use math::Matrix;
pub use metrics::{Accuracy, Dice, Metric, MetricSet};
pub use network::{DenseNetwork, Mode, Network};
pub use optim::{Optimizer, ReduceOnPlateau, Scheduler, Sgd};
pub use train::{EpochLog, FitConfig, OutputShape, Trainer};
