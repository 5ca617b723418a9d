use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::nullable;
use crate::models::Recommendation;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRuleRequest {
    pub skin_type_id: i64,
    pub product_id: i64,
    pub confidence_score: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRuleRequest {
    pub skin_type_id: Option<i64>,
    pub product_id: Option<i64>,
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecommendationRequest {
    pub condition: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRecommendationRequest {
    pub condition: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub tips: Option<Vec<String>>,
}

/// A recommendation with its tips decoded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationView {
    pub id: i64,
    pub condition: String,
    pub title: String,
    pub description: Option<String>,
    pub tips: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Recommendation> for RecommendationView {
    fn from(rec: Recommendation) -> Self {
        let tips = rec.tip_list();
        Self {
            id: rec.id,
            condition: rec.condition,
            title: rec.title,
            description: rec.description,
            tips,
            created_at: rec.created_at,
        }
    }
}
