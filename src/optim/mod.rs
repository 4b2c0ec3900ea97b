pub mod plateau;
pub mod sgd;

pub use plateau::ReduceOnPlateau;
pub use sgd::Sgd;

/// Parameter-update rule for a network of type `N`.
///
/// Gradients live inside the network (accumulated by `Network::backward`);
/// the optimizer clears them at the start of each batch and folds them into
/// the parameters at the end.
pub trait Optimizer<N> {
    /// Clears the network's accumulated gradients.
    fn zero_grad(&self, net: &mut N);

    /// Applies one update from the currently accumulated gradients.
    fn step(&mut self, net: &mut N);

    fn learning_rate(&self) -> f64;

    fn set_learning_rate(&mut self, lr: f64);
}

/// Adjusts the optimizer's learning rate from a per-epoch scalar signal.
///
/// The trainer steps the scheduler once per epoch with that epoch's mean
/// training loss and applies whatever rate comes back.
pub trait Scheduler {
    /// Returns the learning rate to use from now on, given the latest
    /// signal and the rate currently in effect.
    fn step(&mut self, signal: f64, current_lr: f64) -> f64;
}
