use super::Scheduler;

/// Multiplies the learning rate by `factor` once the signal has gone
/// `patience` consecutive epochs without a strict improvement, flooring
/// at `min_lr`.
#[derive(Debug, Clone)]
pub struct ReduceOnPlateau {
    factor: f64,
    patience: usize,
    min_lr: f64,
    best: f64,
    stale_epochs: usize,
}

impl ReduceOnPlateau {
    /// # Panics
    /// Panics unless `0.0 < factor < 1.0`.
    pub fn new(factor: f64, patience: usize, min_lr: f64) -> ReduceOnPlateau {
        assert!(
            factor > 0.0 && factor < 1.0,
            "factor must be strictly between 0 and 1"
        );
        ReduceOnPlateau {
            factor,
            patience,
            min_lr,
            best: f64::INFINITY,
            stale_epochs: 0,
        }
    }
}

impl Scheduler for ReduceOnPlateau {
    fn step(&mut self, signal: f64, current_lr: f64) -> f64 {
        if signal < self.best {
            self.best = signal;
            self.stale_epochs = 0;
            return current_lr;
        }

        self.stale_epochs += 1;
        if self.stale_epochs > self.patience {
            self.stale_epochs = 0;
            return (current_lr * self.factor).max(self.min_lr);
        }
        current_lr
    }
}
