pub mod bce;
pub mod cross_entropy;
pub mod mse;

pub use bce::BceLoss;
pub use cross_entropy::CrossEntropyLoss;
pub use mse::MseLoss;

/// Differentiable scalar objective comparing a predicted output with its
/// target. The trainer only ever calls these two methods; everything else
/// about the objective is the implementation's business.
pub trait Loss {
    /// Scalar loss for one sample.
    fn value(&self, predicted: &[f64], expected: &[f64]) -> f64;

    /// Gradient of the loss w.r.t. the network output, one entry per
    /// output unit.
    fn gradient(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64>;
}
