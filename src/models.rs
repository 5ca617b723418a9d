use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::skin::{ConditionScores, ConditionWeights};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Brand {
    pub const TABLE: &'static str = "brands";
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductCategory {
    pub const TABLE: &'static str = "product_categories";
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub effect: Option<String>,
    #[serde(flatten)]
    pub weights: ConditionWeights,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    pub const TABLE: &'static str = "ingredients";
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub weights: ConditionWeights,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub const TABLE: &'static str = "products";
}

/// `{id, name}` of a joined brand or category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NameRef {
    pub id: i64,
    pub name: String,
}

/// A product row joined with its brand and category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductWithRefs {
    #[serde(flatten)]
    pub product: Product,
    pub brands: Option<NameRef>,
    pub product_categories: Option<NameRef>,
}

impl ProductWithRefs {
    pub fn brand_name(&self) -> Option<&str> {
        self.brands.as_ref().map(|b| b.name.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.product_categories.as_ref().map(|c| c.name.as_str())
    }
}

pub const PRODUCT_INGREDIENTS_TABLE: &str = "product_ingredients";

/// A `product_ingredients` link joined with its ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductIngredientRow {
    pub product_id: i64,
    pub ingredient_id: i64,
    pub ingredients: Option<Ingredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub id: i64,
    pub condition: String,
    pub title: String,
    pub description: Option<String>,
    /// JSON-encoded list of tips.
    pub tips: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub const TABLE: &'static str = "recommendations";

    /// Decoded tips; malformed JSON reads as no tips.
    pub fn tip_list(&self) -> Vec<String> {
        self.tips
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

/// Legacy view of a recommendation row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkinType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Recommendation> for SkinType {
    fn from(rec: Recommendation) -> Self {
        Self {
            id: rec.id,
            name: rec.condition,
            description: rec.description,
            created_at: rec.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rule {
    pub id: i64,
    pub skin_type_id: i64,
    pub product_id: i64,
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
}

impl Rule {
    pub const TABLE: &'static str = "rules";
}

/// Product columns as nested under a rule, including its brand and category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RuleProduct {
    #[serde(flatten)]
    pub product: Product,
    pub brands: Option<NameRef>,
    pub product_categories: Option<NameRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RuleWithProduct {
    #[serde(flatten)]
    pub rule: Rule,
    pub products: Option<RuleProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisLog {
    pub id: i64,
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub user_age: i32,
    pub acne_score: f64,
    pub blackheads_score: f64,
    pub clear_skin_score: f64,
    pub dark_spots_score: f64,
    pub puffy_eyes_score: f64,
    pub wrinkles_score: f64,
    pub dominant_condition: String,
    pub recommended_product_ids: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisLog {
    pub const TABLE: &'static str = "analysis_logs";

    pub fn scores(&self) -> ConditionScores {
        ConditionScores {
            acne: self.acne_score,
            blackheads: self.blackheads_score,
            clear_skin: self.clear_skin_score,
            dark_spots: self.dark_spots_score,
            puffy_eyes: self.puffy_eyes_score,
            wrinkles: self.wrinkles_score,
        }
    }

    /// Parsed product ids, skipping anything that is not a number.
    pub fn product_ids(&self) -> Vec<i64> {
        self.recommended_product_ids
            .split(',')
            .filter_map(|id| id.trim().parse::<i64>().ok())
            .collect()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
