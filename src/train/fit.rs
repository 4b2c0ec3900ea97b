use std::collections::BTreeMap;
use std::time::Instant;

use log::info;

use crate::data::DataSource;
use crate::error::Result;
use crate::loss::Loss;
use crate::metrics::MetricSet;
use crate::network::Network;
use crate::optim::Optimizer;
use crate::train::{
    epoch_log, EpochLog, FitConfig, OutputShape, Trainer, BEST_MODEL, LATEST_MODEL, LOG_FILE,
};

impl<N, L, O> Trainer<N, L, O>
where
    N: Network,
    L: Loss,
    O: Optimizer<N>,
{
    /// Top-level loop over `config.epochs` epochs.
    ///
    /// Per epoch: train, step the scheduler with this epoch's training loss,
    /// optionally validate, checkpoint `best_model` on strict improvement of
    /// the tracked loss (validation loss when `val_data` is present,
    /// training loss otherwise), checkpoint `latest_model` unconditionally,
    /// append one row to `logs.csv`, and every `save_freq` epochs write a
    /// numbered checkpoint folder with optional prediction exports.
    ///
    /// Returns the full in-memory epoch history.
    pub fn fit_dataset(
        &mut self,
        data: &dyn DataSource,
        config: &FitConfig,
        val_data: Option<&dyn DataSource>,
        predict_data: Option<(&dyn DataSource, OutputShape)>,
        metrics: &mut MetricSet,
    ) -> Result<Vec<EpochLog>> {
        let mut best_loss = f64::INFINITY;
        let run_start = Instant::now();

        for epoch in 1..=config.epochs {
            let train_loss = self.fit_epoch(data, config.batch_size, config.shuffle)?;

            // The scheduler signal is always this epoch's training loss, so
            // it is well defined from the very first epoch, with or without
            // a validation set.
            if let Some(scheduler) = self.scheduler.as_mut() {
                let lr = scheduler.step(train_loss, self.optimizer.learning_rate());
                self.optimizer.set_learning_rate(lr);
            }

            let mut val_loss = None;
            let mut metric_results = BTreeMap::new();
            if let Some(val) = val_data {
                let (loss, results) = self.val_epoch(val, config.batch_size, metrics)?;
                val_loss = Some(loss);
                metric_results = results;
            }

            let tracked_loss = val_loss.unwrap_or(train_loss);
            if tracked_loss < best_loss {
                self.save_checkpoint(BEST_MODEL)?;
                best_loss = tracked_loss;
            }
            self.save_checkpoint(LATEST_MODEL)?;

            let record = EpochLog {
                epoch,
                time: run_start.elapsed().as_secs_f64(),
                memory: (self.net.param_count() * std::mem::size_of::<f64>()) as u64,
                train_loss,
                val_loss,
                metrics: metric_results,
            };
            match record.val_loss {
                Some(v) => info!(
                    "epoch {}/{}: train_loss={:.6} val_loss={:.6}",
                    epoch, config.epochs, record.train_loss, v
                ),
                None => info!(
                    "epoch {}/{}: train_loss={:.6}",
                    epoch, config.epochs, record.train_loss
                ),
            }

            // One row per completed epoch, flushed before the next starts.
            epoch_log::append_csv(&self.checkpoint_dir.join(LOG_FILE), &record)?;
            self.history.push(record);

            if let Some(freq) = config.save_freq {
                if freq > 0 && epoch % freq == 0 {
                    let epoch_dir = self.checkpoint_dir.join(epoch.to_string());
                    std::fs::create_dir_all(&epoch_dir)?;
                    self.net.save(&epoch_dir.join("model"))?;
                    if let Some((predict, shape)) = predict_data {
                        self.predict_dataset(predict, &epoch_dir, shape)?;
                    }
                }
            }
        }

        Ok(self.history.clone())
    }
}
