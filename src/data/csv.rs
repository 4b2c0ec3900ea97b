//! CSV dataset loading.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it
//!   contains any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas
//!
//! Label modes:
//! - `ClassIndex` — the last column is a 0-based integer class index,
//!   one-hot-encoded to a vector of length `n_classes`.
//! - `OneHot`     — the last `n_label_cols` columns are floats forming the
//!   label vector.

use std::path::Path;

use super::InMemoryDataset;
use crate::error::{KilnError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Last column is an integer class index; one-hot encode to `n_classes`.
    ClassIndex { n_classes: usize },
    /// Last `n_label_cols` columns are the label vector.
    OneHot { n_label_cols: usize },
}

/// Reads and parses a CSV file into a dataset.
pub fn load_csv(path: &Path, label_mode: LabelMode) -> Result<InMemoryDataset> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, label_mode)
}

/// Parses CSV text into a dataset of (features, label) rows.
pub fn parse_csv(text: &str, label_mode: LabelMode) -> Result<InMemoryDataset> {
    let mut lines = text.lines().peekable();

    // Auto-detect header: skip the first line if any cell is non-numeric.
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut targets: Vec<Vec<f64>> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells = split_row(line);

        let (feature_cells, label) = match label_mode {
            LabelMode::ClassIndex { n_classes } => {
                if cells.len() < 2 {
                    return Err(invalid(row_idx, "expected features plus a class index column"));
                }
                let (features, label_cell) = cells.split_at(cells.len() - 1);
                let class_idx: usize = label_cell[0].trim().parse().map_err(|_| {
                    invalid(
                        row_idx,
                        &format!("class index '{}' is not a non-negative integer", label_cell[0]),
                    )
                })?;
                if class_idx >= n_classes {
                    return Err(invalid(
                        row_idx,
                        &format!("class index {class_idx} >= n_classes {n_classes}"),
                    ));
                }
                let mut one_hot = vec![0.0; n_classes];
                one_hot[class_idx] = 1.0;
                (features, one_hot)
            }
            LabelMode::OneHot { n_label_cols } => {
                if cells.len() < n_label_cols + 1 {
                    return Err(invalid(
                        row_idx,
                        &format!("expected at least {} columns, got {}", n_label_cols + 1, cells.len()),
                    ));
                }
                let (features, label_cells) = cells.split_at(cells.len() - n_label_cols);
                (features, parse_floats(label_cells, row_idx)?)
            }
        };

        inputs.push(parse_floats(feature_cells, row_idx)?);
        targets.push(label);
    }

    if inputs.is_empty() {
        return Err(KilnError::InvalidArgument(
            "CSV contains no data rows".into(),
        ));
    }

    let width = inputs[0].len();
    if let Some(pos) = inputs.iter().position(|row| row.len() != width) {
        return Err(invalid(
            pos,
            &format!("feature count {} does not match first row's {width}", inputs[pos].len()),
        ));
    }

    InMemoryDataset::new(inputs, targets)
}

fn invalid(row_idx: usize, msg: &str) -> KilnError {
    KilnError::InvalidArgument(format!("row {}: {msg}", row_idx + 1))
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    split_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits a single CSV row, handling double-quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote inside a quoted field.
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_idx: usize) -> Result<Vec<f64>> {
    cells
        .iter()
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| invalid(row_idx, &format!("'{c}' is not a valid number")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;

    #[test]
    fn class_index_rows_are_one_hot_encoded() {
        let data = parse_csv("1.0,2.0,0\n3.0,4.0,1\n", LabelMode::ClassIndex { n_classes: 2 })
            .unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(0).target, vec![1.0, 0.0]);
        assert_eq!(data.get(1).target, vec![0.0, 1.0]);
    }

    #[test]
    fn header_row_is_skipped() {
        let data = parse_csv("x,y,label\n1.0,2.0,0\n", LabelMode::ClassIndex { n_classes: 2 })
            .unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn one_hot_mode_splits_trailing_columns() {
        let data = parse_csv("1.0,2.0,0.0,1.0\n", LabelMode::OneHot { n_label_cols: 2 }).unwrap();
        let sample = data.get(0);
        assert_eq!(sample.input, vec![1.0, 2.0]);
        assert_eq!(sample.target, vec![0.0, 1.0]);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let row = split_row("\"a,b\",1.0");
        assert_eq!(row, vec!["a,b".to_string(), "1.0".to_string()]);
    }

    #[test]
    fn out_of_range_class_index_is_rejected() {
        let res = parse_csv("1.0,5\n", LabelMode::ClassIndex { n_classes: 2 });
        assert!(res.is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = parse_csv(
            "1.0,2.0,0\n1.0,0\n",
            LabelMode::ClassIndex { n_classes: 2 },
        );
        assert!(res.is_err());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_csv("", LabelMode::OneHot { n_label_cols: 1 }).is_err());
    }

    #[test]
    fn load_csv_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "1.0,0.5,1\n0.0,0.25,0\n").unwrap();

        let data = load_csv(&path, LabelMode::ClassIndex { n_classes: 2 }).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(0).input, vec![1.0, 0.5]);
    }
}
