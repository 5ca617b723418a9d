use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rules::RecommendationView;
use crate::skin::ConditionScores;

/// Analysis submitted with user details. Scores are fractions in `[0, 1]`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub user_age: Option<i32>,
    pub acne_score: Option<f64>,
    pub blackheads_score: Option<f64>,
    pub clear_skin_score: Option<f64>,
    pub dark_spots_score: Option<f64>,
    pub puffy_eyes_score: Option<f64>,
    pub wrinkles_score: Option<f64>,
}

impl AnalysisRequest {
    /// All six scores, or `None` if any is missing.
    pub fn scores(&self) -> Option<ConditionScores> {
        Some(ConditionScores {
            acne: self.acne_score?,
            blackheads: self.blackheads_score?,
            clear_skin: self.clear_skin_score?,
            dark_spots: self.dark_spots_score?,
            puffy_eyes: self.puffy_eyes_score?,
            wrinkles: self.wrinkles_score?,
        })
    }
}

/// Classifier output saved for an anonymous visitor. Scores are percentages.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScanSaveRequest {
    pub scores: Option<ConditionScores>,
    #[serde(alias = "skinType")]
    pub skin_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendedProduct {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Rule confidence, or the weight match when no rule applies.
    pub score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub id: i64,
    pub dominant_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_type: Option<String>,
    pub recommendations: Vec<RecommendedProduct>,
    pub advice: Option<RecommendationView>,
}
