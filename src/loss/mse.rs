use super::Loss;

/// Mean-squared error; pair with Identity or Sigmoid output layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MseLoss;

impl Loss for MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    fn value(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| (p - e).powi(2))
            .sum::<f64>()
            / n
    }

    /// Per-output gradient: predicted - expected
    fn gradient(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}
