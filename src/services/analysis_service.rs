use std::{cmp::Ordering, path::Path, sync::Arc};

use super::{
    insert_row, product_service,
    rule_service::{recommendation_for, top_rules},
};
use crate::{
    classifier::{
        Classification, Classifier,
        training::{self, ModelInfo, TrainingConfig, TrainingInfo},
    },
    db::DbPool,
    dto::{
        analysis::{AnalysisRequest, AnalysisResponse, RecommendedProduct, ScanSaveRequest},
        rules::RecommendationView,
    },
    error::{AppError, AppResult},
    models::{AnalysisLog, ProductWithRefs, Recommendation, RuleWithProduct},
    query::Record,
    response::{ApiResponse, Meta},
    skin::{ConditionScores, SkinCondition},
};

pub const MAX_RECOMMENDATIONS: usize = 3;

pub const GUEST_USER: &str = "Guest";

/// Who an analysis belongs to.
#[derive(Debug, Clone)]
pub struct AnalysisSubject {
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub user_age: i32,
}

impl AnalysisSubject {
    pub fn guest() -> Self {
        Self {
            user_name: GUEST_USER.to_string(),
            user_email: None,
            user_phone: None,
            user_age: 0,
        }
    }
}

/// Products chosen for a set of scores.
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub dominant: SkinCondition,
    pub products: Vec<RecommendedProduct>,
    pub advice: Option<Recommendation>,
}

impl Recommendations {
    pub fn product_ids(&self) -> String {
        join_ids(self.products.iter().map(|p| p.id))
    }
}

pub fn join_ids<I: IntoIterator<Item = i64>>(ids: I) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Rules that still point at a product, highest confidence first. Equal
/// confidences keep the order given.
pub fn from_rules(mut rules: Vec<RuleWithProduct>) -> Vec<RecommendedProduct> {
    rules.sort_by(|a, b| {
        b.rule
            .confidence_score
            .partial_cmp(&a.rule.confidence_score)
            .unwrap_or(Ordering::Equal)
    });
    rules
        .into_iter()
        .filter_map(|rule| {
            let confidence = rule.rule.confidence_score;
            rule.products.map(|linked| RecommendedProduct {
                id: linked.product.id,
                name: linked.product.name,
                brand: linked.brands.map(|b| b.name),
                category: linked.product_categories.map(|c| c.name),
                description: linked.product.description,
                image_url: linked.product.image_url,
                score: confidence,
            })
        })
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// Top products by dot product of `scores` with their weights. Equal scores
/// keep catalog order.
pub fn rank_by_weights(
    scores: &ConditionScores,
    products: Vec<ProductWithRefs>,
) -> Vec<RecommendedProduct> {
    let mut scored: Vec<(f64, ProductWithRefs)> = products
        .into_iter()
        .map(|p| (scores.weighted_sum(&p.product.weights), p))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(score, p)| RecommendedProduct {
            brand: p.brand_name().map(str::to_string),
            category: p.category_name().map(str::to_string),
            id: p.product.id,
            name: p.product.name,
            description: p.product.description,
            image_url: p.product.image_url,
            score,
        })
        .collect()
}

/// Pick the dominant condition and up to three products for it. Rules for
/// the condition win; without any, products are ranked by their weights.
pub async fn recommend(pool: &DbPool, scores: &ConditionScores) -> AppResult<Recommendations> {
    let dominant = scores.dominant();
    let advice = recommendation_for(pool, dominant.as_str()).await?;

    let mut products = match &advice {
        Some(rec) => from_rules(top_rules(pool, rec.id, MAX_RECOMMENDATIONS as u64).await?),
        None => Vec::new(),
    };
    if products.is_empty() {
        tracing::debug!(condition = %dominant, "no rules matched, ranking by weights");
        products = rank_by_weights(scores, product_service::all_products(pool).await?);
    }

    Ok(Recommendations {
        dominant,
        products,
        advice,
    })
}

pub async fn persist_log(
    pool: &DbPool,
    subject: &AnalysisSubject,
    scores: &ConditionScores,
    recommendations: &Recommendations,
) -> AppResult<AnalysisLog> {
    let product_ids = recommendations.product_ids();
    if product_ids.is_empty() {
        tracing::warn!(
            condition = %recommendations.dominant,
            "no products available to recommend"
        );
    }

    let mut record = Record::new()
        .set("user_name", subject.user_name.as_str())
        .set("user_email", subject.user_email.clone())
        .set("user_phone", subject.user_phone.clone())
        .set("user_age", subject.user_age);
    for (condition, score) in scores.iter() {
        record = record.set(&format!("{}_score", condition.as_str()), score);
    }
    let record = record
        .set("dominant_condition", recommendations.dominant.as_str())
        .set("recommended_product_ids", product_ids);

    insert_row(pool, AnalysisLog::TABLE, record).await
}

fn checked_scores(scores: ConditionScores, max: f64) -> AppResult<ConditionScores> {
    if !scores.is_finite() {
        return Err(AppError::BadRequest("Scores must be finite numbers".into()));
    }
    Ok(scores.map(|v| v.clamp(0.0, max)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn analyze(
    pool: &DbPool,
    subject: AnalysisSubject,
    scores: ConditionScores,
    skin_type: Option<String>,
) -> AppResult<ApiResponse<AnalysisResponse>> {
    let recommendations = recommend(pool, &scores).await?;
    let log = persist_log(pool, &subject, &scores, &recommendations).await?;
    tracing::info!(
        log_id = log.id,
        condition = %recommendations.dominant,
        products = recommendations.products.len(),
        "analysis saved"
    );

    let response = AnalysisResponse {
        id: log.id,
        dominant_condition: recommendations.dominant.as_str().to_string(),
        skin_type,
        recommendations: recommendations.products,
        advice: recommendations.advice.map(RecommendationView::from),
    };
    Ok(ApiResponse::success("Analysis saved", response, Some(Meta::empty())))
}

/// Score-based analysis with user details. Scores are fractions in `[0, 1]`.
pub async fn submit_analysis(
    pool: &DbPool,
    payload: AnalysisRequest,
) -> AppResult<ApiResponse<AnalysisResponse>> {
    let scores = payload.scores();
    let (Some(user_name), Some(user_age), Some(scores)) =
        (non_blank(payload.user_name), payload.user_age, scores)
    else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };

    let subject = AnalysisSubject {
        user_name,
        user_email: non_blank(payload.user_email),
        user_phone: non_blank(payload.user_phone),
        user_age: user_age.max(0),
    };
    analyze(pool, subject, checked_scores(scores, 1.0)?, None).await
}

/// Save a classifier result for a guest. Scores arrive as percentages.
pub async fn save_from_scan(
    pool: &DbPool,
    payload: ScanSaveRequest,
) -> AppResult<ApiResponse<AnalysisResponse>> {
    let Some(scores) = payload.scores else {
        return Err(AppError::BadRequest("Missing scores".into()));
    };
    let scores = checked_scores(scores, 100.0)?.map(|v| v / 100.0);
    let skin_type = non_blank(payload.skin_type).unwrap_or_else(|| scores.dominant().to_string());
    analyze(pool, AnalysisSubject::guest(), scores, Some(skin_type)).await
}

/// Classify an uploaded image off the async runtime.
pub async fn scan_image(
    classifier: Arc<Classifier>,
    bytes: Vec<u8>,
) -> AppResult<ApiResponse<Classification>> {
    let result = tokio::task::spawn_blocking(move || classifier.classify_bytes(&bytes))
        .await
        .map_err(|err| AppError::Internal(err.into()))?;

    let classification = result.map_err(|err| {
        tracing::warn!(error = %err, "image rejected");
        AppError::BadRequest(format!("Invalid image: {err}"))
    })?;
    tracing::info!(
        skin_type = %classification.skin_type,
        engine = ?classification.engine,
        face_detected = classification.face_detected,
        "image classified"
    );
    Ok(ApiResponse::success(
        "Scan complete",
        classification,
        Some(Meta::empty()),
    ))
}

pub async fn training_info(
    classifier: &Classifier,
    dataset_dir: &Path,
) -> AppResult<ApiResponse<TrainingInfo>> {
    let info = TrainingInfo {
        model: ModelInfo {
            labels: training::labels(),
            path: classifier.model_path().map(|p| p.display().to_string()),
            loaded: classifier.model_available(),
        },
        training: TrainingConfig::default(),
        dataset: training::dataset_stats(dataset_dir).await,
    };
    Ok(ApiResponse::success("Training info", info, None))
}
