use std::path::Path;

use image::GrayImage;
use log::debug;

use crate::data::DataSource;
use crate::error::{KilnError, Result};
use crate::loss::Loss;
use crate::network::{Mode, Network};
use crate::optim::Optimizer;
use crate::train::Trainer;

/// Geometry used to slice a flat network output into image planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl OutputShape {
    pub fn new(channels: usize, height: usize, width: usize) -> OutputShape {
        OutputShape {
            channels,
            height,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N, L, O> Trainer<N, L, O>
where
    N: Network,
    L: Loss,
    O: Optimizer<N>,
{
    /// Runs the network over `data` one sample at a time in evaluation mode
    /// and writes channel index 1 of each output as a grayscale PNG under
    /// `export_path` (created if absent). Values are clamped to [0, 1] and
    /// scaled to 8-bit.
    ///
    /// Files are named by the sample's `id` when the source supplies one,
    /// else by a 1-based zero-padded sequence number (`001.png`, ...).
    pub fn predict_dataset(
        &mut self,
        data: &dyn DataSource,
        export_path: &Path,
        shape: OutputShape,
    ) -> Result<()> {
        if shape.channels < 2 {
            return Err(KilnError::InvalidArgument(format!(
                "output shape needs at least 2 channels to export channel 1, got {}",
                shape.channels
            )));
        }
        std::fs::create_dir_all(export_path)?;
        self.net.set_mode(Mode::Eval);

        let plane = shape.height * shape.width;
        for idx in 0..data.len() {
            let sample = data.get(idx);
            let output = self.net.forward(&sample.input);
            if output.len() != shape.len() {
                return Err(KilnError::InvalidArgument(format!(
                    "output length {} does not match shape {}x{}x{}",
                    output.len(),
                    shape.channels,
                    shape.height,
                    shape.width
                )));
            }

            let pixels: Vec<u8> = output[plane..2 * plane]
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect();
            let img = GrayImage::from_raw(shape.width as u32, shape.height as u32, pixels)
                .ok_or_else(|| {
                    KilnError::InvalidArgument("image buffer does not fill its shape".into())
                })?;

            let filename = match sample.id {
                Some(id) => id,
                None => format!("{:03}.png", idx + 1),
            };
            let target = export_path.join(&filename);
            img.save(&target)?;
            debug!("exported prediction {}", target.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_length_is_volume() {
        let shape = OutputShape::new(2, 3, 4);
        assert_eq!(shape.len(), 24);
        assert!(!shape.is_empty());
    }
}
