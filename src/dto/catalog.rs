use serde::Deserialize;
use utoipa::ToSchema;

use super::nullable;
use crate::skin::{ConditionWeights, SkinCondition};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBrandRequest {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub effect: Option<String>,
    #[serde(flatten)]
    pub weights: ConditionWeights,
}

/// Only the weights present in the body are changed.
#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct WeightsPatch {
    pub w_acne: Option<f64>,
    pub w_blackheads: Option<f64>,
    pub w_clear_skin: Option<f64>,
    pub w_dark_spots: Option<f64>,
    pub w_puffy_eyes: Option<f64>,
    pub w_wrinkles: Option<f64>,
}

impl WeightsPatch {
    pub fn get(&self, condition: SkinCondition) -> Option<f64> {
        match condition {
            SkinCondition::Acne => self.w_acne,
            SkinCondition::Blackheads => self.w_blackheads,
            SkinCondition::ClearSkin => self.w_clear_skin,
            SkinCondition::DarkSpots => self.w_dark_spots,
            SkinCondition::PuffyEyes => self.w_puffy_eyes,
            SkinCondition::Wrinkles => self.w_wrinkles,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub effect: Option<Option<String>>,
    #[serde(flatten)]
    pub weights: WeightsPatch,
}
