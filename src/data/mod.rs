pub mod csv;

pub use csv::{load_csv, parse_csv, LabelMode};

use rand::seq::SliceRandom;

use crate::error::{KilnError, Result};

/// One training example plus its optional identifier.
///
/// The identifier is a typed, always-present field (possibly `None`), used by
/// prediction export to name output files.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
    pub id: Option<String>,
}

/// A finite, indexable source of samples.
///
/// Batching and shuffling are the harness's job; a source only has to hand
/// out samples by index.
pub trait DataSource {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Sample;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mini-batch gathered from a `DataSource`, as parallel vectors.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
    pub ids: Vec<Option<String>>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Collects the samples at `indices` into one batch.
    pub fn gather(data: &dyn DataSource, indices: &[usize]) -> Batch {
        let mut batch = Batch {
            inputs: Vec::with_capacity(indices.len()),
            targets: Vec::with_capacity(indices.len()),
            ids: Vec::with_capacity(indices.len()),
        };
        for &idx in indices {
            let sample = data.get(idx);
            batch.inputs.push(sample.input);
            batch.targets.push(sample.target);
            batch.ids.push(sample.id);
        }
        batch
    }
}

/// Splits `0..len` into consecutive index chunks of at most `batch_size`,
/// optionally in shuffled order. Returns no chunks for an empty range; the
/// trainer turns that into an explicit error.
pub fn batch_plan(len: usize, batch_size: usize, shuffle: bool) -> Result<Vec<Vec<usize>>> {
    if batch_size == 0 {
        return Err(KilnError::InvalidArgument(
            "batch_size must be at least 1".into(),
        ));
    }
    let mut indices: Vec<usize> = (0..len).collect();
    if shuffle {
        indices.shuffle(&mut rand::thread_rng());
    }
    Ok(indices.chunks(batch_size).map(<[usize]>::to_vec).collect())
}

/// Dataset held fully in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
    ids: Option<Vec<String>>,
}

impl InMemoryDataset {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<InMemoryDataset> {
        if inputs.len() != targets.len() {
            return Err(KilnError::InvalidArgument(format!(
                "inputs and targets must have equal length, got {} and {}",
                inputs.len(),
                targets.len()
            )));
        }
        Ok(InMemoryDataset {
            inputs,
            targets,
            ids: None,
        })
    }

    /// Attaches one identifier per sample, used as prediction filenames.
    pub fn with_ids(mut self, ids: Vec<String>) -> Result<InMemoryDataset> {
        if ids.len() != self.inputs.len() {
            return Err(KilnError::InvalidArgument(format!(
                "expected {} ids, got {}",
                self.inputs.len(),
                ids.len()
            )));
        }
        self.ids = Some(ids);
        Ok(self)
    }
}

impl DataSource for InMemoryDataset {
    fn len(&self) -> usize {
        self.inputs.len()
    }

    fn get(&self, index: usize) -> Sample {
        Sample {
            input: self.inputs[index].clone(),
            target: self.targets[index].clone(),
            id: self.ids.as_ref().map(|ids| ids[index].clone()),
        }
    }
}

/// The XOR dataset: 4 samples, 2 inputs, 1 output.
pub fn xor() -> InMemoryDataset {
    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];
    InMemoryDataset {
        inputs,
        targets,
        ids: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_plan_chunks_evenly_with_remainder() {
        let plan = batch_plan(7, 3, false).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0], vec![0, 1, 2]);
        assert_eq!(plan[2], vec![6]);
    }

    #[test]
    fn batch_plan_rejects_zero_batch_size() {
        assert!(batch_plan(4, 0, false).is_err());
    }

    #[test]
    fn batch_plan_of_empty_range_is_empty() {
        assert!(batch_plan(0, 4, true).unwrap().is_empty());
    }

    #[test]
    fn shuffled_plan_covers_every_index_once() {
        let plan = batch_plan(10, 3, true).unwrap();
        let mut seen: Vec<usize> = plan.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn dataset_length_mismatch_is_rejected() {
        let res = InMemoryDataset::new(vec![vec![1.0]], vec![]);
        assert!(res.is_err());
    }

    #[test]
    fn ids_are_surfaced_per_sample() {
        let data = InMemoryDataset::new(vec![vec![1.0], vec![2.0]], vec![vec![0.0], vec![1.0]])
            .unwrap()
            .with_ids(vec!["a.png".into(), "b.png".into()])
            .unwrap();
        assert_eq!(data.get(1).id.as_deref(), Some("b.png"));
    }

    #[test]
    fn gather_preserves_sample_order() {
        let data = xor();
        let batch = Batch::gather(&data, &[3, 0]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.inputs[0], vec![1.0, 1.0]);
        assert_eq!(batch.targets[1], vec![0.0]);
    }
}
