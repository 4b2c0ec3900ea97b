/// Configuration for a `fit_dataset` run.
///
/// # Fields
/// - `epochs`     — total number of full passes over the training data
/// - `batch_size` — samples per mini-batch; use `1` for online SGD
/// - `shuffle`    — reshuffle the training sample order every epoch
/// - `save_freq`  — every this many epochs, write a numbered checkpoint
///                  folder (and predictions, when a prediction set is
///                  supplied); `None` disables periodic saves
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    pub save_freq: Option<usize>,
}

impl FitConfig {
    /// Creates a config with shuffling on and periodic saves off.
    pub fn new(epochs: usize, batch_size: usize) -> FitConfig {
        FitConfig {
            epochs,
            batch_size,
            shuffle: true,
            save_freq: None,
        }
    }

    pub fn shuffle(mut self, shuffle: bool) -> FitConfig {
        self.shuffle = shuffle;
        self
    }

    pub fn save_freq(mut self, freq: usize) -> FitConfig {
        self.save_freq = Some(freq);
        self
    }
}
