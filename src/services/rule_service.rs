use serde_json::json;

use super::{delete_by_id, find_by_id, insert_row, update_by_id};
use crate::{
    db::DbPool,
    dto::{
        auth::SessionUser,
        rules::{
            CreateRecommendationRequest, CreateRuleRequest, RecommendationView,
            UpdateRecommendationRequest, UpdateRuleRequest,
        },
    },
    error::{AppError, AppResult},
    models::{Recommendation, Rule, RuleWithProduct, SkinType},
    query::{Query, Record, Relation, SortOrder},
    response::{ApiResponse, Meta},
};

/// Clamp a rule confidence into `[0, 1]`; non-finite input is rejected.
pub fn clamp_confidence(value: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::BadRequest(
            "confidence_score must be a finite number".into(),
        ));
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Highest-confidence rules of one recommendation row, with their products.
pub async fn top_rules(
    pool: &DbPool,
    skin_type_id: i64,
    limit: u64,
) -> AppResult<Vec<RuleWithProduct>> {
    Ok(Query::table(Rule::TABLE)
        .with(Relation::RuleProducts)
        .eq("skin_type_id", skin_type_id)
        .order("confidence_score", SortOrder::Desc)
        .limit(limit)
        .fetch(pool)
        .await?)
}

pub async fn list_rules(pool: &DbPool) -> AppResult<ApiResponse<Vec<RuleWithProduct>>> {
    let rules: Vec<RuleWithProduct> = Query::table(Rule::TABLE)
        .with(Relation::RuleProducts)
        .order("confidence_score", SortOrder::Desc)
        .fetch(pool)
        .await?;
    Ok(ApiResponse::list("Rules", rules))
}

pub async fn get_rule(pool: &DbPool, id: i64) -> AppResult<ApiResponse<RuleWithProduct>> {
    let rule = Query::table(Rule::TABLE)
        .with(Relation::RuleProducts)
        .eq("id", id)
        .single()
        .fetch::<Option<RuleWithProduct>>(pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Rule", rule, None))
}

pub async fn create_rule(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateRuleRequest,
) -> AppResult<ApiResponse<Rule>> {
    let record = Record::new()
        .set("skin_type_id", payload.skin_type_id)
        .set("product_id", payload.product_id)
        .set("confidence_score", clamp_confidence(payload.confidence_score)?);
    let rule: Rule = insert_row(pool, Rule::TABLE, record).await?;
    tracing::info!(admin = %admin.email, rule_id = rule.id, "rule created");
    Ok(ApiResponse::success("Rule created", rule, Some(Meta::empty())))
}

pub async fn update_rule(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateRuleRequest,
) -> AppResult<ApiResponse<Rule>> {
    let confidence = payload
        .confidence_score
        .map(clamp_confidence)
        .transpose()?;
    let record = Record::new()
        .set_some("skin_type_id", payload.skin_type_id)
        .set_some("product_id", payload.product_id)
        .set_some("confidence_score", confidence);
    let rule: Rule = update_by_id(pool, Rule::TABLE, id, record).await?;
    tracing::info!(admin = %admin.email, rule_id = id, "rule updated");
    Ok(ApiResponse::success("Updated", rule, Some(Meta::empty())))
}

pub async fn delete_rule(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, Rule::TABLE, id).await?;
    tracing::info!(admin = %admin.email, rule_id = id, "rule deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

/// The advice row for a condition, if one exists.
pub async fn recommendation_for(
    pool: &DbPool,
    condition: &str,
) -> AppResult<Option<Recommendation>> {
    Ok(Query::table(Recommendation::TABLE)
        .eq("condition", condition)
        .order("id", SortOrder::Asc)
        .single()
        .fetch(pool)
        .await?)
}

pub async fn get_advice(
    pool: &DbPool,
    condition: &str,
) -> AppResult<ApiResponse<RecommendationView>> {
    let recommendation = recommendation_for(pool, condition)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Recommendation",
        RecommendationView::from(recommendation),
        None,
    ))
}

async fn all_recommendations(pool: &DbPool) -> AppResult<Vec<Recommendation>> {
    Ok(Query::table(Recommendation::TABLE)
        .order("condition", SortOrder::Asc)
        .fetch(pool)
        .await?)
}

pub async fn list_recommendations(
    pool: &DbPool,
) -> AppResult<ApiResponse<Vec<RecommendationView>>> {
    let items = all_recommendations(pool)
        .await?
        .into_iter()
        .map(RecommendationView::from)
        .collect();
    Ok(ApiResponse::list("Recommendations", items))
}

pub async fn get_recommendation(
    pool: &DbPool,
    id: i64,
) -> AppResult<ApiResponse<RecommendationView>> {
    let rec: Recommendation = find_by_id(pool, Recommendation::TABLE, id).await?;
    Ok(ApiResponse::success("Recommendation", rec.into(), None))
}

fn encode_tips(tips: &[String]) -> AppResult<String> {
    serde_json::to_string(tips).map_err(|e| AppError::Internal(e.into()))
}

fn require_text(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub async fn create_recommendation(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateRecommendationRequest,
) -> AppResult<ApiResponse<RecommendationView>> {
    let record = Record::new()
        .set("condition", require_text(&payload.condition, "condition")?)
        .set("title", require_text(&payload.title, "title")?)
        .set("description", payload.description)
        .set("tips", encode_tips(&payload.tips)?);
    let rec: Recommendation = insert_row(pool, Recommendation::TABLE, record).await?;
    tracing::info!(admin = %admin.email, recommendation_id = rec.id, "recommendation created");
    Ok(ApiResponse::success(
        "Recommendation created",
        rec.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_recommendation(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateRecommendationRequest,
) -> AppResult<ApiResponse<RecommendationView>> {
    let condition = payload
        .condition
        .map(|c| require_text(&c, "condition"))
        .transpose()?;
    let title = payload
        .title
        .map(|t| require_text(&t, "title"))
        .transpose()?;
    let tips = payload.tips.map(|t| encode_tips(&t)).transpose()?;
    let record = Record::new()
        .set_some("condition", condition)
        .set_some("title", title)
        .set_some("description", payload.description)
        .set_some("tips", tips);
    let rec: Recommendation = update_by_id(pool, Recommendation::TABLE, id, record).await?;
    tracing::info!(admin = %admin.email, recommendation_id = id, "recommendation updated");
    Ok(ApiResponse::success("Updated", rec.into(), Some(Meta::empty())))
}

pub async fn delete_recommendation(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, Recommendation::TABLE, id).await?;
    tracing::info!(admin = %admin.email, recommendation_id = id, "recommendation deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

pub async fn all_skin_types(pool: &DbPool) -> AppResult<Vec<SkinType>> {
    Ok(all_recommendations(pool)
        .await?
        .into_iter()
        .map(SkinType::from)
        .collect())
}

pub async fn list_skin_types(pool: &DbPool) -> AppResult<ApiResponse<Vec<SkinType>>> {
    Ok(ApiResponse::list("Skin types", all_skin_types(pool).await?))
}

pub async fn get_skin_type(pool: &DbPool, id: i64) -> AppResult<ApiResponse<SkinType>> {
    let rec: Recommendation = find_by_id(pool, Recommendation::TABLE, id).await?;
    Ok(ApiResponse::success("Skin type", SkinType::from(rec), None))
}
