use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::data::{batch_plan, Batch, DataSource};
use crate::error::{KilnError, Result};
use crate::loss::Loss;
use crate::metrics::MetricSet;
use crate::network::{Mode, Network};
use crate::optim::{Optimizer, Scheduler};
use crate::train::EpochLog;

/// Orchestrates the training/validation/prediction control loop over an
/// injected network/loss/optimizer triple. The trainer owns no numerics of
/// its own; everything is delegated to the collaborators, which it holds
/// exclusively for the duration of each call.
pub struct Trainer<N, L, O> {
    pub(crate) net: N,
    pub(crate) loss: L,
    pub(crate) optimizer: O,
    pub(crate) scheduler: Option<Box<dyn Scheduler>>,
    pub(crate) checkpoint_dir: PathBuf,
    pub(crate) history: Vec<EpochLog>,
}

impl<N, L, O> Trainer<N, L, O>
where
    N: Network,
    L: Loss,
    O: Optimizer<N>,
{
    /// Creates the harness and its checkpoint directory. An unwritable
    /// directory is fatal and surfaces as `KilnError::Io`.
    pub fn new(
        net: N,
        loss: L,
        optimizer: O,
        checkpoint_dir: impl Into<PathBuf>,
    ) -> Result<Trainer<N, L, O>> {
        let checkpoint_dir = checkpoint_dir.into();
        std::fs::create_dir_all(&checkpoint_dir)?;
        Ok(Trainer {
            net,
            loss,
            optimizer,
            scheduler: None,
            checkpoint_dir,
            history: Vec::new(),
        })
    }

    /// Attaches a learning-rate scheduler, stepped once per epoch with that
    /// epoch's mean training loss.
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Trainer<N, L, O> {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn network(&self) -> &N {
        &self.net
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn into_network(self) -> N {
        self.net
    }

    pub fn checkpoint_dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    /// Epoch records accumulated by `fit_dataset` calls so far.
    pub fn history(&self) -> &[EpochLog] {
        &self.history
    }

    /// Runs one training pass over `data` in mini-batches: per batch, clear
    /// gradients, forward each sample, backpropagate the batch-mean loss
    /// gradient, and apply one optimizer step.
    ///
    /// Returns the mean of the per-batch losses. A dataset yielding zero
    /// batches is an `EmptyDataset` error, never a silent zero.
    pub fn fit_epoch(
        &mut self,
        data: &dyn DataSource,
        batch_size: usize,
        shuffle: bool,
    ) -> Result<f64> {
        let plan = batch_plan(data.len(), batch_size, shuffle)?;
        if plan.is_empty() {
            return Err(KilnError::EmptyDataset);
        }

        self.net.set_mode(Mode::Train);
        let mut running_loss = 0.0;

        for indices in &plan {
            let batch = Batch::gather(data, indices);
            let scale = 1.0 / batch.len() as f64;

            self.optimizer.zero_grad(&mut self.net);
            let mut batch_loss = 0.0;
            for (input, target) in batch.inputs.iter().zip(&batch.targets) {
                let output = self.net.forward(input);
                batch_loss += self.loss.value(&output, target);

                // Scale per-sample gradients so the step uses the batch mean.
                let mut grad = self.loss.gradient(&output, target);
                for g in &mut grad {
                    *g *= scale;
                }
                self.net.backward(&grad);
            }
            self.optimizer.step(&mut self.net);

            running_loss += batch_loss * scale;
        }

        self.net.set_mode(Mode::Eval);
        Ok(running_loss / plan.len() as f64)
    }

    /// Runs one validation pass: no gradients, no optimizer steps, network
    /// parameters untouched. Each batch's outputs and targets are fed to
    /// `metrics`; results come back normalized by the batch count.
    ///
    /// Returns the mean validation loss and the metric results. The same
    /// empty-dataset error as `fit_epoch` applies.
    pub fn val_epoch(
        &mut self,
        data: &dyn DataSource,
        batch_size: usize,
        metrics: &mut MetricSet,
    ) -> Result<(f64, BTreeMap<String, f64>)> {
        let plan = batch_plan(data.len(), batch_size, false)?;
        if plan.is_empty() {
            return Err(KilnError::EmptyDataset);
        }

        self.net.set_mode(Mode::Eval);
        metrics.reset();
        let mut running_loss = 0.0;

        for indices in &plan {
            let batch = Batch::gather(data, indices);
            let outputs: Vec<Vec<f64>> = batch
                .inputs
                .iter()
                .map(|input| self.net.forward(input))
                .collect();

            let batch_loss: f64 = outputs
                .iter()
                .zip(&batch.targets)
                .map(|(output, target)| self.loss.value(output, target))
                .sum::<f64>()
                / outputs.len() as f64;
            running_loss += batch_loss;

            metrics.accumulate(&outputs, &batch.targets);
        }

        Ok((running_loss / plan.len() as f64, metrics.results(plan.len())))
    }

    /// Forward passes in evaluation mode; raw outputs, no side effects.
    pub fn predict_batch(&mut self, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        self.net.set_mode(Mode::Eval);
        inputs.iter().map(|input| self.net.forward(input)).collect()
    }

    pub(crate) fn save_checkpoint(&self, name: &str) -> Result<()> {
        let path = self.checkpoint_dir.join(name);
        self.net.save(&path)?;
        debug!("wrote checkpoint {}", path.display());
        Ok(())
    }
}
