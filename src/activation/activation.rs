use serde::{Deserialize, Serialize};

/// Per-layer nonlinearity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    ReLU,
    LeakyReLU { alpha: f64 },
    Tanh,
    Identity,
    /// Softmax is vector-valued and applied over the whole pre-activation
    /// vector in `Activation::apply`. Pair it with `CrossEntropyLoss`: that
    /// loss emits the combined softmax+CE gradient, so `derivative` returns
    /// 1.0 here and the Jacobian is not applied twice.
    Softmax,
}

impl Activation {
    /// Applies the activation to a full pre-activation vector.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            Activation::Softmax => softmax(z),
            _ => z.iter().map(|&x| self.function(x)).collect(),
        }
    }

    /// Element-wise activation. Not reachable for `Softmax`, which `apply`
    /// handles at the vector level.
    fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::ReLU => x.max(0.0),
            Activation::LeakyReLU { alpha } => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            Activation::Tanh => x.tanh(),
            Activation::Identity => x,
            Activation::Softmax => unreachable!("softmax is applied at the vector level"),
        }
    }

    /// Element-wise derivative at each pre-activation value.
    pub fn derivative(&self, z: &[f64]) -> Vec<f64> {
        z.iter()
            .map(|&x| match self {
                Activation::Sigmoid => {
                    let s = 1.0 / (1.0 + (-x).exp());
                    s * (1.0 - s)
                }
                Activation::ReLU => {
                    if x > 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                Activation::LeakyReLU { alpha } => {
                    if x > 0.0 {
                        1.0
                    } else {
                        *alpha
                    }
                }
                Activation::Tanh => {
                    let t = x.tanh();
                    1.0 - t * t
                }
                Activation::Identity => 1.0,
                // Combined softmax+CE gradient arrives pre-composed from the
                // loss; pass it through unchanged.
                Activation::Softmax => 1.0,
            })
            .collect()
    }
}

/// Numerically stable softmax: exponents are shifted by the max element.
fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
