use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::math::Matrix;

/// Fully-connected layer.
///
/// Weights are input-major: `weights[(i, j)]` connects input `i` to unit `j`.
/// The layer caches its last input and pre-activation vector, so `backward`
/// must be called right after `forward` on the same sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub in_size: usize,
    pub out_size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activation: Activation,
    /// Drop probability for inverted dropout; `None` disables it. Active
    /// only in training passes and skipped entirely during evaluation.
    pub dropout: Option<f64>,

    // Per-sample caches and gradient accumulators; never serialized.
    #[serde(skip)]
    input: Vec<f64>,
    #[serde(skip)]
    pre_activation: Vec<f64>,
    #[serde(skip)]
    mask: Vec<f64>,
    #[serde(skip)]
    pub(crate) w_grad: Matrix,
    #[serde(skip)]
    pub(crate) b_grad: Vec<f64>,
}

impl Dense {
    /// Creates a layer with activation-appropriate weight initialization:
    /// He for the ReLU family, Xavier otherwise. Biases start at zero.
    pub fn new(in_size: usize, out_size: usize, activation: Activation) -> Dense {
        let weights = match activation {
            Activation::ReLU | Activation::LeakyReLU { .. } => Matrix::he(in_size, out_size),
            _ => Matrix::xavier(in_size, out_size),
        };
        Dense {
            in_size,
            out_size,
            weights,
            biases: vec![0.0; out_size],
            activation,
            dropout: None,
            input: vec![],
            pre_activation: vec![],
            mask: vec![],
            w_grad: Matrix::default(),
            b_grad: vec![],
        }
    }

    /// Enables inverted dropout with drop probability `p`.
    ///
    /// # Panics
    /// Panics unless `0.0 <= p < 1.0`.
    pub fn with_dropout(mut self, p: f64) -> Dense {
        assert!((0.0..1.0).contains(&p), "dropout probability must be in [0, 1)");
        self.dropout = Some(p);
        self
    }

    /// Forward pass for one sample. `training` controls dropout; kept units
    /// are scaled by 1/(1-p) so evaluation needs no rescaling.
    pub fn forward(&mut self, input: &[f64], training: bool) -> Vec<f64> {
        assert_eq!(input.len(), self.in_size, "input length must match in_size");

        let mut z = self.biases.clone();
        for (i, &x) in input.iter().enumerate() {
            for (zj, &w) in z.iter_mut().zip(self.weights.row(i)) {
                *zj += x * w;
            }
        }

        let mut a = self.activation.apply(&z);

        self.mask.clear();
        if training {
            if let Some(p) = self.dropout {
                let keep = 1.0 - p;
                let mut rng = rand::thread_rng();
                self.mask = a
                    .iter()
                    .map(|_| if rng.gen::<f64>() < keep { 1.0 / keep } else { 0.0 })
                    .collect();
                for (v, m) in a.iter_mut().zip(&self.mask) {
                    *v *= m;
                }
            }
        }

        self.input = input.to_vec();
        self.pre_activation = z;
        a
    }

    /// Accumulates this sample's parameter gradients from `grad` (∂L/∂a of
    /// this layer's output) and returns ∂L/∂a for the previous layer.
    pub fn backward(&mut self, grad: &[f64]) -> Vec<f64> {
        assert_eq!(grad.len(), self.out_size, "gradient length must match out_size");
        if self.w_grad.is_empty() {
            self.zero_grad();
        }

        // δ = grad ⊙ mask ⊙ σ'(z)
        let deriv = self.activation.derivative(&self.pre_activation);
        let delta: Vec<f64> = grad
            .iter()
            .enumerate()
            .map(|(j, g)| {
                let m = if self.mask.is_empty() { 1.0 } else { self.mask[j] };
                g * m * deriv[j]
            })
            .collect();

        for (i, &x) in self.input.iter().enumerate() {
            for (j, &dz) in delta.iter().enumerate() {
                self.w_grad[(i, j)] += x * dz;
            }
        }
        for (bg, &dz) in self.b_grad.iter_mut().zip(&delta) {
            *bg += dz;
        }

        (0..self.in_size)
            .map(|i| {
                self.weights
                    .row(i)
                    .iter()
                    .zip(&delta)
                    .map(|(w, dz)| w * dz)
                    .sum()
            })
            .collect()
    }

    /// Clears the accumulated gradients (and sizes the buffers on first use).
    pub fn zero_grad(&mut self) {
        self.w_grad = Matrix::zeros(self.in_size, self.out_size);
        self.b_grad = vec![0.0; self.out_size];
    }

    pub fn param_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2-in/1-out identity layer with known weights: y = 2a + 3b + 1.
    fn fixed_layer() -> Dense {
        let mut layer = Dense::new(2, 1, Activation::Identity);
        layer.weights = Matrix::from_vec(2, 1, vec![2.0, 3.0]);
        layer.biases = vec![1.0];
        layer
    }

    #[test]
    fn forward_computes_affine_map() {
        let mut layer = fixed_layer();
        let out = layer.forward(&[1.0, 2.0], false);
        assert_eq!(out, vec![9.0]);
    }

    #[test]
    fn backward_accumulates_gradients() {
        let mut layer = fixed_layer();
        layer.zero_grad();
        layer.forward(&[1.0, 2.0], true);

        // dL/dy = 1 → dL/dw = x, dL/db = 1, dL/dx = w
        let upstream = layer.backward(&[1.0]);
        assert_eq!(layer.w_grad[(0, 0)], 1.0);
        assert_eq!(layer.w_grad[(1, 0)], 2.0);
        assert_eq!(layer.b_grad, vec![1.0]);
        assert_eq!(upstream, vec![2.0, 3.0]);

        // A second sample adds on top.
        layer.forward(&[1.0, 0.0], true);
        layer.backward(&[1.0]);
        assert_eq!(layer.w_grad[(0, 0)], 2.0);
        assert_eq!(layer.b_grad, vec![2.0]);
    }

    #[test]
    fn dropout_is_disabled_in_eval() {
        let mut layer = Dense::new(4, 4, Activation::Identity).with_dropout(0.9);
        let input = [1.0, 1.0, 1.0, 1.0];
        let a = layer.forward(&input, false);
        let b = layer.forward(&input, false);
        assert_eq!(a, b, "eval passes must be deterministic");
    }

    #[test]
    fn dropout_zeroes_some_units_in_training() {
        let mut layer = Dense::new(1, 64, Activation::Identity).with_dropout(0.5);
        let out = layer.forward(&[1.0], true);
        let dropped = out.iter().filter(|&&v| v == 0.0).count();
        // P(no unit dropped) = 0.5^64; treat as impossible.
        assert!(dropped > 0);
    }

    #[test]
    fn backward_respects_dropout_mask() {
        let mut layer = Dense::new(1, 32, Activation::Identity).with_dropout(0.5);
        layer.zero_grad();
        let out = layer.forward(&[1.0], true);
        layer.backward(&vec![1.0; 32]);
        for (j, &v) in out.iter().enumerate() {
            if v == 0.0 {
                assert_eq!(layer.b_grad[j], 0.0, "dropped unit {j} must not leak gradient");
            }
        }
    }
}
