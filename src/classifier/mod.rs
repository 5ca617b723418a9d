//! Skin classification from a single face image.
//!
//! Every upload is cropped and resized to a fixed frame, checked for skin
//! coverage, then scored either by pixel statistics or, with the `cnn`
//! feature and a configured model, by an ONNX network.

#[cfg(feature = "cnn")]
pub mod cnn;
pub mod heuristic;
pub mod pixels;
pub mod training;

use std::path::{Path, PathBuf};
#[cfg(feature = "cnn")]
use std::sync::OnceLock;

use image::RgbImage;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::skin::{ConditionScores, format_label};
use heuristic::SkinTypeScores;
use pixels::PixelStats;

/// Frames with less skin-tone coverage than this are treated as faceless.
pub const MIN_SKIN_COVERAGE: f64 = 0.2;

pub const UNKNOWN_SKIN_TYPE: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image is empty")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Heuristic,
    Cnn,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Classification {
    /// Display label of the dominant condition, or `Unknown`.
    pub skin_type: String,
    /// Six condition percentages.
    pub scores: ConditionScores,
    pub skin_type_scores: SkinTypeScores,
    /// Strongest of `oily`, `dry`, `normal` and `acne`; absent without a face.
    pub base_skin_type: Option<String>,
    pub face_detected: bool,
    /// Percentage of the winning label.
    pub confidence: u32,
    pub engine: Engine,
}

impl Classification {
    fn unknown(engine: Engine) -> Self {
        Self {
            skin_type: UNKNOWN_SKIN_TYPE.to_string(),
            scores: ConditionScores::default(),
            skin_type_scores: SkinTypeScores::default(),
            base_skin_type: None,
            face_detected: false,
            confidence: 0,
            engine,
        }
    }

    fn from_scores(
        scores: ConditionScores,
        skin_type_scores: SkinTypeScores,
        engine: Engine,
    ) -> Self {
        let dominant = scores.dominant();
        let confidence = scores.get(dominant).clamp(0.0, 100.0).round() as u32;
        Self {
            skin_type: format_label(dominant.as_str()),
            scores,
            base_skin_type: Some(skin_type_scores.dominant().to_string()),
            skin_type_scores,
            face_detected: true,
            confidence,
            engine,
        }
    }
}

/// Shared classifier. The ONNX model, when enabled, is loaded on first use
/// and kept for the life of the process.
pub struct Classifier {
    model_path: Option<PathBuf>,
    #[cfg(feature = "cnn")]
    model: OnceLock<Option<cnn::SkinModel>>,
}

impl Classifier {
    pub fn new(model_path: Option<PathBuf>) -> Self {
        Self {
            model_path,
            #[cfg(feature = "cnn")]
            model: OnceLock::new(),
        }
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Whether a model file is configured and present on disk.
    pub fn model_available(&self) -> bool {
        cfg!(feature = "cnn") && self.model_path.as_deref().is_some_and(Path::is_file)
    }

    /// Decode and classify an uploaded image. CPU bound.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Classification, ClassifyError> {
        if bytes.is_empty() {
            return Err(ClassifyError::Empty);
        }
        let image = image::load_from_memory(bytes)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ClassifyError::Empty);
        }
        Ok(self.classify_frame(&pixels::prepare_frame(&image)))
    }

    pub fn classify_frame(&self, frame: &RgbImage) -> Classification {
        let stats = PixelStats::from_frame(frame);
        let skin_types = heuristic::skin_type_scores(&stats);

        if stats.skin_coverage < MIN_SKIN_COVERAGE {
            tracing::debug!(coverage = stats.skin_coverage, "no face in frame");
            return Classification::unknown(self.engine());
        }

        if let Some(scores) = self.predict_cnn(frame) {
            return Classification::from_scores(scores, skin_types, Engine::Cnn);
        }

        let scores = heuristic::condition_scores(&stats);
        Classification::from_scores(scores, skin_types, Engine::Heuristic)
    }

    fn engine(&self) -> Engine {
        if self.model_available() {
            Engine::Cnn
        } else {
            Engine::Heuristic
        }
    }

    #[cfg(feature = "cnn")]
    fn predict_cnn(&self, frame: &RgbImage) -> Option<ConditionScores> {
        let path = self.model_path.as_deref()?;
        let model = self
            .model
            .get_or_init(|| match cnn::SkinModel::load(path) {
                Ok(model) => {
                    tracing::info!(path = %path.display(), "skin model loaded");
                    Some(model)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skin model unavailable, using heuristic");
                    None
                }
            })
            .as_ref()?;

        match model.predict(frame) {
            Ok(probabilities) => Some(probabilities.map(|p| (p * 100.0).round())),
            Err(err) => {
                tracing::warn!(error = %err, "skin model inference failed, using heuristic");
                None
            }
        }
    }

    #[cfg(not(feature = "cnn"))]
    fn predict_cnn(&self, _frame: &RgbImage) -> Option<ConditionScores> {
        None
    }
}

