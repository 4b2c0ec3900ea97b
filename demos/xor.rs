use kiln::{
    data, Activation, Dense, DenseNetwork, FitConfig, MetricSet, MseLoss, Network,
    ReduceOnPlateau, Sgd, Trainer,
};

fn main() -> kiln::Result<()> {
    env_logger::init();

    let net = DenseNetwork::new(vec![
        Dense::new(2, 4, Activation::Sigmoid),
        Dense::new(4, 1, Activation::Sigmoid),
    ]);

    let checkpoint_dir = std::env::temp_dir().join("kiln-xor");
    let mut trainer = Trainer::new(net, MseLoss, Sgd::new(0.5), &checkpoint_dir)?
        .with_scheduler(ReduceOnPlateau::new(0.5, 50, 1e-3));

    let dataset = data::xor();
    let config = FitConfig::new(2000, 4).shuffle(true);
    let history = trainer.fit_dataset(&dataset, &config, Some(&dataset), None, &mut MetricSet::new())?;

    let last = history.last().unwrap();
    println!("final loss after {} epochs: {:.6}", last.epoch, last.train_loss);
    println!("checkpoints in {}", checkpoint_dir.display());

    let mut net = trainer.into_network();
    for input in [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]] {
        let out = net.forward(&input);
        println!("{:?} -> {:.4}", input, out[0]);
    }
    Ok(())
}
