use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    classifier::{Classification, training::TrainingInfo},
    dto::{
        analysis::{AnalysisRequest, AnalysisResponse, ScanSaveRequest},
        rules::RecommendationView,
    },
    error::{AppError, AppResult},
    response::ApiResponse,
    services::{analysis_service, rule_service},
    state::AppState,
};

pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

const IMAGE_FIELD: &str = "image";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analysis", post(submit_analysis))
        .route("/analysis/save-from-scan", post(save_from_scan))
        .route(
            "/analysis/scan",
            post(scan).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/recommendations/{condition}", get(recommendation))
        .route("/training-info", get(training_info))
}

/// Multipart upload with a single `image` file field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanUpload {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 201, description = "Analysis stored with recommended products", body = ApiResponse<AnalysisResponse>),
        (status = 400, description = "Missing required fields")
    ),
    tag = "Analysis"
)]
pub async fn submit_analysis(
    State(state): State<AppState>,
    Json(payload): Json<AnalysisRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AnalysisResponse>>)> {
    let resp = analysis_service::submit_analysis(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/analysis/save-from-scan",
    request_body = ScanSaveRequest,
    responses(
        (status = 201, description = "Scan result stored for a guest", body = ApiResponse<AnalysisResponse>),
        (status = 400, description = "Missing scores")
    ),
    tag = "Analysis"
)]
pub async fn save_from_scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanSaveRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AnalysisResponse>>)> {
    let resp = analysis_service::save_from_scan(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/analysis/scan",
    request_body(content = ScanUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Classifier result", body = ApiResponse<Classification>),
        (status = 400, description = "No image, or the image could not be decoded"),
        (status = 413, description = "Upload too large")
    ),
    tag = "Analysis"
)]
pub async fn scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Classification>>> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            image = Some(bytes.to_vec());
            break;
        }
    }

    let Some(image) = image else {
        return Err(AppError::BadRequest("No image uploaded".into()));
    };
    let resp = analysis_service::scan_image(state.classifier.clone(), image).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recommendations/{condition}",
    params(
        ("condition" = String, Path, description = "Condition key, e.g. acne")
    ),
    responses(
        (status = 200, description = "Advice for the condition", body = ApiResponse<RecommendationView>),
        (status = 404, description = "No advice for this condition")
    ),
    tag = "Analysis"
)]
pub async fn recommendation(
    State(state): State<AppState>,
    Path(condition): Path<String>,
) -> AppResult<Json<ApiResponse<RecommendationView>>> {
    let resp = rule_service::get_advice(&state.pool, condition.trim()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/training-info",
    responses(
        (status = 200, description = "Model, training and dataset details", body = ApiResponse<TrainingInfo>)
    ),
    tag = "Analysis"
)]
pub async fn training_info(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TrainingInfo>>> {
    let resp =
        analysis_service::training_info(&state.classifier, &state.config.dataset_dir).await?;
    Ok(Json(resp))
}
