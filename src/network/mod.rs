pub mod network;

pub use network::DenseNetwork;

use std::path::Path;

use crate::error::Result;

/// Explicit train/eval switch.
///
/// The trainer sets `Train` immediately before a training pass and restores
/// `Eval` afterward, so the mode is never left ambiguous between calls.
/// Training-only behavior (dropout) keys off this state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    Train,
    #[default]
    Eval,
}

/// The stateful function approximator driven by the harness.
///
/// The trainer treats the network as an opaque collaborator: it toggles the
/// mode, feeds samples forward, hands back loss gradients, and asks for
/// parameter snapshots. Gradients accumulate inside the network between a
/// `zero_grad` (issued through the optimizer) and the optimizer's `step`.
pub trait Network {
    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    /// Forward pass for a single sample.
    fn forward(&mut self, input: &[f64]) -> Vec<f64>;

    /// Backpropagates an output-space gradient, accumulating parameter
    /// gradients. Only valid straight after `forward` on the same sample.
    fn backward(&mut self, output_grad: &[f64]);

    /// Number of trainable parameters.
    fn param_count(&self) -> usize;

    /// Writes a serialized snapshot of the trainable parameters.
    fn save(&self, path: &Path) -> Result<()>;
}
