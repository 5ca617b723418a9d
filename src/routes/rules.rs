use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::rules::{
        CreateRecommendationRequest, CreateRuleRequest, RecommendationView,
        UpdateRecommendationRequest, UpdateRuleRequest,
    },
    error::AppResult,
    middleware::auth::AdminSession,
    models::{Rule, RuleWithProduct, SkinType},
    response::ApiResponse,
    services::rule_service,
    state::AppState,
};

pub fn rules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules).post(create_rule))
        .route("/{id}", get(get_rule).put(update_rule).delete(delete_rule))
}

pub fn recommendations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recommendations).post(create_recommendation))
        .route(
            "/{id}",
            get(get_recommendation)
                .put(update_recommendation)
                .delete(delete_recommendation),
        )
}

pub fn skin_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_skin_types))
        .route("/{id}", get(get_skin_type))
}

#[utoipa::path(
    get,
    path = "/api/admin/rules",
    responses(
        (status = 200, description = "Rules with their products", body = ApiResponse<Vec<RuleWithProduct>>)
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn list_rules(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<RuleWithProduct>>>> {
    let resp = rule_service::list_rules(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/rules/{id}",
    params(("id" = i64, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Get rule", body = ApiResponse<RuleWithProduct>),
        (status = 404, description = "Rule not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn get_rule(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RuleWithProduct>>> {
    let resp = rule_service::get_rule(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 200, description = "Rule created; confidence clamped to [0, 1]", body = ApiResponse<Rule>),
        (status = 400, description = "Non-finite confidence or unknown references")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn create_rule(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateRuleRequest>,
) -> AppResult<Json<ApiResponse<Rule>>> {
    let resp = rule_service::create_rule(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/rules/{id}",
    params(("id" = i64, Path, description = "Rule ID")),
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, description = "Rule updated", body = ApiResponse<Rule>),
        (status = 404, description = "Rule not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn update_rule(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRuleRequest>,
) -> AppResult<Json<ApiResponse<Rule>>> {
    let resp = rule_service::update_rule(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/rules/{id}",
    params(("id" = i64, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule deleted"),
        (status = 404, description = "Rule not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn delete_rule(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = rule_service::delete_rule(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/recommendations",
    responses(
        (status = 200, description = "Advice per condition", body = ApiResponse<Vec<RecommendationView>>)
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn list_recommendations(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<RecommendationView>>>> {
    let resp = rule_service::list_recommendations(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/recommendations/{id}",
    params(("id" = i64, Path, description = "Recommendation ID")),
    responses(
        (status = 200, description = "Get recommendation", body = ApiResponse<RecommendationView>),
        (status = 404, description = "Recommendation not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn get_recommendation(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RecommendationView>>> {
    let resp = rule_service::get_recommendation(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/recommendations",
    request_body = CreateRecommendationRequest,
    responses(
        (status = 200, description = "Recommendation created", body = ApiResponse<RecommendationView>),
        (status = 400, description = "Missing condition or title")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn create_recommendation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateRecommendationRequest>,
) -> AppResult<Json<ApiResponse<RecommendationView>>> {
    let resp = rule_service::create_recommendation(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/recommendations/{id}",
    params(("id" = i64, Path, description = "Recommendation ID")),
    request_body = UpdateRecommendationRequest,
    responses(
        (status = 200, description = "Recommendation updated", body = ApiResponse<RecommendationView>),
        (status = 404, description = "Recommendation not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn update_recommendation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecommendationRequest>,
) -> AppResult<Json<ApiResponse<RecommendationView>>> {
    let resp = rule_service::update_recommendation(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/recommendations/{id}",
    params(("id" = i64, Path, description = "Recommendation ID")),
    responses(
        (status = 200, description = "Recommendation deleted"),
        (status = 404, description = "Recommendation not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn delete_recommendation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = rule_service::delete_recommendation(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/skin-types",
    responses(
        (status = 200, description = "Legacy skin types, one per recommendation", body = ApiResponse<Vec<SkinType>>)
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn list_skin_types(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<SkinType>>>> {
    let resp = rule_service::list_skin_types(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/skin-types/{id}",
    params(("id" = i64, Path, description = "Skin type (recommendation) ID")),
    responses(
        (status = 200, description = "Get skin type", body = ApiResponse<SkinType>),
        (status = 404, description = "Skin type not found")
    ),
    security(("admin_session" = [])),
    tag = "Rules"
)]
pub async fn get_skin_type(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<SkinType>>> {
    let resp = rule_service::get_skin_type(&state.pool, id).await?;
    Ok(Json(resp))
}
