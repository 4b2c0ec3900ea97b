use super::Loss;

/// Binary cross-entropy; pair with a Sigmoid output layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BceLoss;

const EPS: f64 = 1e-12;

impl Loss for BceLoss {
    /// Scalar BCE: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    fn value(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum::<f64>()
            / n
    }

    /// Per-output gradient: (p - y) / (n · (p + ε) · (1 - p + ε))
    fn gradient(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, y)| (p - y) / (n * (p + EPS) * (1.0 - p + EPS)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_prediction_has_near_zero_loss() {
        let loss = BceLoss;
        assert!(loss.value(&[0.999], &[1.0]) < 0.01);
    }

    #[test]
    fn saturated_wrong_prediction_is_finite() {
        let loss = BceLoss;
        assert!(loss.value(&[1.0], &[0.0]).is_finite());
    }

    #[test]
    fn gradient_points_toward_target() {
        let loss = BceLoss;
        let g = loss.gradient(&[0.8], &[1.0]);
        assert!(g[0] < 0.0, "under-prediction of a positive must push up");
    }
}
