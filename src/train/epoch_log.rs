use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

/// One epoch's results. Created fresh each epoch, appended to the log file
/// and the in-memory history, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochLog {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Wall-clock seconds since the start of the fit run.
    pub time: f64,
    /// Approximate bytes held by the network's trainable parameters.
    pub memory: u64,
    /// Mean training loss over this epoch's batches.
    pub train_loss: f64,
    /// Mean validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Validation metric results, keyed by metric name.
    pub metrics: BTreeMap<String, f64>,
}

impl EpochLog {
    /// Column names, in row order. Metric columns come last, sorted by name,
    /// so the layout is stable for the whole run.
    fn csv_header(&self) -> String {
        let mut columns = vec!["epoch", "time", "memory", "train_loss"];
        if self.val_loss.is_some() {
            columns.push("val_loss");
        }
        let mut header = columns.join(",");
        for name in self.metrics.keys() {
            header.push(',');
            header.push_str(name);
        }
        header
    }

    fn csv_row(&self) -> String {
        let mut row = format!(
            "{},{:.3},{},{}",
            self.epoch, self.time, self.memory, self.train_loss
        );
        if let Some(val_loss) = self.val_loss {
            row.push_str(&format!(",{val_loss}"));
        }
        for value in self.metrics.values() {
            row.push_str(&format!(",{value}"));
        }
        row
    }
}

/// Appends one row to the epoch log, writing the header first when the file
/// does not exist yet. The file is opened and closed per call so every
/// completed epoch is on disk immediately.
pub(crate) fn append_csv(path: &Path, log: &EpochLog) -> std::io::Result<()> {
    let write_header = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if write_header {
        writeln!(file, "{}", log.csv_header())?;
    }
    writeln!(file, "{}", log.csv_row())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> EpochLog {
        let mut metrics = BTreeMap::new();
        metrics.insert("accuracy".to_string(), 0.75);
        EpochLog {
            epoch: 3,
            time: 1.5,
            memory: 800,
            train_loss: 0.25,
            val_loss: Some(0.5),
            metrics,
        }
    }

    #[test]
    fn header_lists_metric_columns_last() {
        assert_eq!(
            sample_log().csv_header(),
            "epoch,time,memory,train_loss,val_loss,accuracy"
        );
    }

    #[test]
    fn row_matches_header_layout() {
        assert_eq!(sample_log().csv_row(), "3,1.500,800,0.25,0.5,0.75");
    }

    #[test]
    fn header_omits_val_loss_when_absent() {
        let mut log = sample_log();
        log.val_loss = None;
        log.metrics.clear();
        assert_eq!(log.csv_header(), "epoch,time,memory,train_loss");
    }

    #[test]
    fn append_writes_header_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        append_csv(&path, &sample_log()).unwrap();
        append_csv(&path, &sample_log()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("epoch,"));
        assert_eq!(lines[1], lines[2]);
    }
}
