use std::path::Path;

use anyhow::{Context, Result, bail};
use image::RgbImage;
use ndarray::Array4;
use ort::{session::Session, value::Tensor};

use super::pixels::FRAME_SIZE;
use crate::skin::{ConditionScores, SkinCondition};

/// ONNX skin classifier with six softmax outputs in label order.
pub struct SkinModel {
    session: Session,
}

impl SkinModel {
    pub fn load(path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_intra_threads(1)?
            .commit_from_file(path)
            .with_context(|| format!("failed to load skin model from {}", path.display()))?;
        Ok(Self { session })
    }

    /// Class probabilities for a prepared frame.
    pub fn predict(&self, frame: &RgbImage) -> Result<ConditionScores> {
        let tensor = Tensor::from_array(to_input(frame))?;
        let outputs = self.session.run(ort::inputs![tensor]?)?;
        let probabilities = outputs[0].try_extract_tensor::<f32>()?;
        let values: Vec<f64> = probabilities.iter().map(|p| *p as f64).collect();
        if values.len() < SkinCondition::ALL.len() {
            bail!("model produced {} outputs, expected 6", values.len());
        }
        Ok(ConditionScores::from_fn(|c| values[c.index()]))
    }
}

/// NHWC input in `[-1, 1]`.
pub fn to_input(frame: &RgbImage) -> Array4<f32> {
    let size = FRAME_SIZE as usize;
    let mut input = Array4::<f32>::zeros((1, size, size, 3));
    for (x, y, pixel) in frame.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        if x >= size || y >= size {
            continue;
        }
        for channel in 0..3 {
            input[[0, y, x, channel]] = pixel[channel] as f32 / 127.5 - 1.0;
        }
    }
    input
}
