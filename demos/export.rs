//! Trains a toy 2-class "segmenter" on 4x4 images and exports its channel-1
//! predictions as PNGs.

use kiln::{
    Activation, Dense, DenseNetwork, FitConfig, InMemoryDataset, MetricSet, MseLoss, OutputShape,
    Sgd, Trainer,
};

const SIDE: usize = 4;
const PIXELS: usize = SIDE * SIDE;

fn main() -> kiln::Result<()> {
    env_logger::init();

    // Inputs are binary masks; the target output is two channels:
    // channel 0 = background, channel 1 = the mask itself.
    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for shift in 0..PIXELS {
        let mask: Vec<f64> = (0..PIXELS).map(|i| ((i + shift) % 3 == 0) as u8 as f64).collect();
        let background: Vec<f64> = mask.iter().map(|&v| 1.0 - v).collect();
        let mut target = background;
        target.extend_from_slice(&mask);
        inputs.push(mask);
        targets.push(target);
    }
    let dataset = InMemoryDataset::new(inputs, targets)?;

    let net = DenseNetwork::new(vec![Dense::new(PIXELS, 2 * PIXELS, Activation::Sigmoid)]);
    let checkpoint_dir = std::env::temp_dir().join("kiln-export");
    let mut trainer = Trainer::new(net, MseLoss, Sgd::new(1.0), &checkpoint_dir)?;

    let shape = OutputShape::new(2, SIDE, SIDE);
    let config = FitConfig::new(200, 4).save_freq(100);
    trainer.fit_dataset(
        &dataset,
        &config,
        None,
        Some((&dataset, shape)),
        &mut MetricSet::new(),
    )?;

    println!("predictions exported under {}", checkpoint_dir.join("100").display());
    Ok(())
}
