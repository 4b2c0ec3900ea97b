use super::Loss;

/// Categorical cross-entropy for use with a Softmax output layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss;

/// Small epsilon inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl Loss for CrossEntropyLoss {
    /// Scalar cross-entropy:
    ///   L = -sum(expected[i] * log(predicted[i] + eps))
    ///
    /// `predicted` are softmax probabilities, `expected` a one-hot (or soft)
    /// target distribution.
    fn value(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits, which simplifies to:
    ///   ∂L/∂z_i = predicted[i] - expected[i]
    ///
    /// The Softmax activation's derivative is identity (1.0) so this
    /// combined gradient is not double-applied on the way down.
    fn gradient(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}
