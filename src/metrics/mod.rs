use std::collections::BTreeMap;

/// A per-batch evaluation statistic.
pub trait Metric {
    fn name(&self) -> &str;

    /// Value of the statistic over one batch of outputs/targets.
    fn measure(&self, outputs: &[Vec<f64>], targets: &[Vec<f64>]) -> f64;
}

/// Accumulates metric values across batches and reports normalized sums.
///
/// The trainer resets the set at the start of every validation epoch, feeds
/// it each batch, and asks for results normalized by the batch count.
#[derive(Default)]
pub struct MetricSet {
    metrics: Vec<Box<dyn Metric>>,
    sums: Vec<f64>,
}

impl MetricSet {
    pub fn new() -> MetricSet {
        MetricSet::default()
    }

    pub fn push(&mut self, metric: impl Metric + 'static) {
        self.metrics.push(Box::new(metric));
        self.sums.push(0.0);
    }

    pub fn reset(&mut self) {
        for sum in &mut self.sums {
            *sum = 0.0;
        }
    }

    pub fn accumulate(&mut self, outputs: &[Vec<f64>], targets: &[Vec<f64>]) {
        for (metric, sum) in self.metrics.iter().zip(&mut self.sums) {
            *sum += metric.measure(outputs, targets);
        }
    }

    /// Accumulated values divided by `normalize_by` (the batch count),
    /// keyed by metric name.
    pub fn results(&self, normalize_by: usize) -> BTreeMap<String, f64> {
        self.metrics
            .iter()
            .zip(&self.sums)
            .map(|(metric, sum)| (metric.name().to_string(), sum / normalize_by as f64))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Fraction of samples in the batch whose argmax matches the target's.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn name(&self) -> &str {
        "accuracy"
    }

    fn measure(&self, outputs: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
        if outputs.is_empty() {
            return 0.0;
        }
        let correct = outputs
            .iter()
            .zip(targets.iter())
            .filter(|(out, target)| argmax(out) == argmax(target))
            .count();
        correct as f64 / outputs.len() as f64
    }
}

/// Dice overlap coefficient for segmentation-style outputs: both outputs and
/// targets are thresholded at `threshold`, then 2·|A∩B| / (|A|+|B|) is
/// computed over every value in the batch. Both masks empty counts as 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Dice {
    pub threshold: f64,
}

impl Default for Dice {
    fn default() -> Self {
        Dice { threshold: 0.5 }
    }
}

impl Metric for Dice {
    fn name(&self) -> &str {
        "dice"
    }

    fn measure(&self, outputs: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
        let mut intersection = 0usize;
        let mut total = 0usize;
        for (out, target) in outputs.iter().zip(targets.iter()) {
            for (&p, &t) in out.iter().zip(target.iter()) {
                let p = p > self.threshold;
                let t = t > self.threshold;
                intersection += (p && t) as usize;
                total += p as usize + t as usize;
            }
        }
        if total == 0 {
            return 1.0;
        }
        2.0 * intersection as f64 / total as f64
    }
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_argmax_matches() {
        let outputs = vec![vec![0.9, 0.1], vec![0.2, 0.8]];
        let targets = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(Accuracy.measure(&outputs, &targets), 0.5);
    }

    #[test]
    fn dice_is_one_for_identical_masks() {
        let batch = vec![vec![0.9, 0.1, 0.8]];
        assert_eq!(Dice::default().measure(&batch, &batch), 1.0);
    }

    #[test]
    fn dice_is_zero_for_disjoint_masks() {
        let outputs = vec![vec![0.9, 0.1]];
        let targets = vec![vec![0.0, 1.0]];
        assert_eq!(Dice::default().measure(&outputs, &targets), 0.0);
    }

    #[test]
    fn dice_of_empty_masks_is_one() {
        let outputs = vec![vec![0.0, 0.0]];
        let targets = vec![vec![0.0, 0.0]];
        assert_eq!(Dice::default().measure(&outputs, &targets), 1.0);
    }

    #[test]
    fn metric_set_normalizes_by_batch_count() {
        let mut set = MetricSet::new();
        set.push(Accuracy);

        let targets = vec![vec![1.0, 0.0]];
        set.accumulate(&[vec![0.9, 0.1]], &targets); // 1.0
        set.accumulate(&[vec![0.1, 0.9]], &targets); // 0.0

        let results = set.results(2);
        assert_eq!(results["accuracy"], 0.5);
    }

    #[test]
    fn reset_clears_accumulated_sums() {
        let mut set = MetricSet::new();
        set.push(Accuracy);
        set.accumulate(&[vec![0.9, 0.1]], &[vec![1.0, 0.0]]);
        set.reset();
        assert_eq!(set.results(1)["accuracy"], 0.0);
    }
}
