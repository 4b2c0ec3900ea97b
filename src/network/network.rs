use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Mode, Network};
use crate::error::Result;
use crate::layers::Dense;

/// A plain feed-forward stack of dense layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    pub layers: Vec<Dense>,
    #[serde(skip)]
    mode: Mode,
}

impl DenseNetwork {
    pub fn new(layers: Vec<Dense>) -> DenseNetwork {
        DenseNetwork {
            layers,
            mode: Mode::Eval,
        }
    }

    /// Reads a network previously written by `Network::save`.
    pub fn load(path: &Path) -> Result<DenseNetwork> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let net: DenseNetwork = serde_json::from_reader(reader)?;
        Ok(net)
    }
}

impl Network for DenseNetwork {
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let training = self.mode == Mode::Train;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current, training);
        }
        current
    }

    fn backward(&mut self, output_grad: &[f64]) {
        let mut grad = output_grad.to_vec();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad);
        }
    }

    fn param_count(&self) -> usize {
        self.layers.iter().map(Dense::param_count).sum()
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::math::Matrix;

    fn two_layer_net() -> DenseNetwork {
        let mut first = Dense::new(2, 2, Activation::Identity);
        first.weights = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]);
        first.biases = vec![1.0, -1.0];
        let mut second = Dense::new(2, 1, Activation::Identity);
        second.weights = Matrix::from_vec(2, 1, vec![1.0, 1.0]);
        second.biases = vec![0.0];
        DenseNetwork::new(vec![first, second])
    }

    #[test]
    fn forward_chains_layers() {
        let mut net = two_layer_net();
        // (3+1) + (4-1) = 7
        assert_eq!(net.forward(&[3.0, 4.0]), vec![7.0]);
    }

    #[test]
    fn mode_defaults_to_eval_and_round_trips() {
        let mut net = two_layer_net();
        assert_eq!(net.mode(), Mode::Eval);
        net.set_mode(Mode::Train);
        assert_eq!(net.mode(), Mode::Train);
    }

    #[test]
    fn save_and_load_preserve_weights() {
        let mut net = two_layer_net();
        let before = net.forward(&[3.0, 4.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights");
        net.save(&path).unwrap();

        let mut restored = DenseNetwork::load(&path).unwrap();
        assert_eq!(restored.forward(&[3.0, 4.0]), before);
        assert_eq!(restored.param_count(), net.param_count());
    }
}
