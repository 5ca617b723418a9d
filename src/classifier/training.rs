use std::{collections::BTreeMap, path::Path};

use serde::Serialize;
use utoipa::ToSchema;

use crate::skin::SkinCondition;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Hyper-parameters the bundled model was trained with.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrainingConfig {
    pub image_size: u32,
    pub batch_size: u32,
    pub epochs: u32,
    pub learning_rate: f64,
    pub validation_split: f64,
    pub labels: Vec<String>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            image_size: super::pixels::FRAME_SIZE,
            batch_size: 32,
            epochs: 15,
            learning_rate: 0.001,
            validation_split: 0.2,
            labels: labels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelInfo {
    pub labels: Vec<String>,
    pub path: Option<String>,
    pub loaded: bool,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DatasetStats {
    pub path: String,
    pub categories: BTreeMap<String, u64>,
    pub total_images: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrainingInfo {
    pub model: ModelInfo,
    pub training: TrainingConfig,
    pub dataset: DatasetStats,
}

pub fn labels() -> Vec<String> {
    SkinCondition::ALL
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}

/// Count images per label directory. A missing directory yields empty stats.
pub async fn dataset_stats(dir: &Path) -> DatasetStats {
    let mut stats = DatasetStats {
        path: dir.display().to_string(),
        ..DatasetStats::default()
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "dataset directory unavailable");
            return stats;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let count = count_images(&entry.path()).await;
        stats.total_images += count;
        stats
            .categories
            .insert(entry.file_name().to_string_lossy().into_owned(), count);
    }
    stats
}

async fn count_images(dir: &Path) -> u64 {
    let Ok(mut files) = tokio::fs::read_dir(dir).await else {
        return 0;
    };
    let mut count = 0;
    while let Ok(Some(file)) = files.next_entry().await {
        if is_image(&file.path()) {
            count += 1;
        }
    }
    count
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
