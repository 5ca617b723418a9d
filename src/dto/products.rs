use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::nullable;
use crate::models::{Ingredient, ProductWithRefs};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Links the product to these ingredients and derives its weights.
    pub ingredient_ids: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub brand_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    /// Replaces all ingredient links when present, `[]` included.
    pub ingredient_ids: Option<Vec<i64>>,
}

/// Admin view of one product with its ingredients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductWithRefs,
    pub ingredients: Vec<Ingredient>,
}

/// Public catalog entry with display names resolved.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProduct {
    #[serde(flatten)]
    pub product: ProductWithRefs,
    pub brand: String,
    pub category: Option<String>,
    /// Comma-joined ingredient names.
    pub ingredients: String,
}
