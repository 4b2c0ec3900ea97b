use super::Optimizer;
use crate::network::DenseNetwork;

/// Plain stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer<DenseNetwork> for Sgd {
    fn zero_grad(&self, net: &mut DenseNetwork) {
        for layer in &mut net.layers {
            layer.zero_grad();
        }
    }

    fn step(&mut self, net: &mut DenseNetwork) {
        for layer in &mut net.layers {
            // Nothing accumulated yet for this layer.
            if layer.w_grad.is_empty() {
                continue;
            }
            for (w, g) in layer.weights.values_mut().zip(layer.w_grad.values()) {
                *w -= self.learning_rate * g;
            }
            for (b, g) in layer.biases.iter_mut().zip(&layer.b_grad) {
                *b -= self.learning_rate * g;
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::layers::Dense;
    use crate::math::Matrix;
    use crate::network::Network;

    #[test]
    fn step_moves_weights_against_gradient() {
        let mut layer = Dense::new(1, 1, Activation::Identity);
        layer.weights = Matrix::from_vec(1, 1, vec![1.0]);
        layer.biases = vec![0.5];
        let mut net = DenseNetwork::new(vec![layer]);

        let mut sgd = Sgd::new(0.1);
        sgd.zero_grad(&mut net);
        net.forward(&[2.0]);
        net.backward(&[1.0]); // dL/dw = 2, dL/db = 1

        sgd.step(&mut net);
        assert!((net.layers[0].weights[(0, 0)] - 0.8).abs() < 1e-12);
        assert!((net.layers[0].biases[0] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn step_without_gradients_is_a_no_op() {
        let mut layer = Dense::new(1, 1, Activation::Identity);
        layer.weights = Matrix::from_vec(1, 1, vec![1.0]);
        let mut net = DenseNetwork::new(vec![layer]);

        let mut sgd = Sgd::new(0.1);
        sgd.step(&mut net);
        assert_eq!(net.layers[0].weights[(0, 0)], 1.0);
    }

    #[test]
    fn learning_rate_is_adjustable() {
        let mut sgd = Sgd::new(0.1);
        sgd.set_learning_rate(0.01);
        assert_eq!(sgd.learning_rate(), 0.01);
    }
}
