use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::reports::{DateRange, LogQuery, ReportSummary},
    error::AppResult,
    export::ExportFile,
    middleware::auth::AdminSession,
    models::AnalysisLog,
    response::ApiResponse,
    services::{analysis_log_service, report_service},
    state::AppState,
};

pub fn logs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_logs))
        .route("/{id}", get(get_log).delete(delete_log))
}

pub fn reports_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/export-csv", get(export_csv))
        .route("/export-json", get(export_json))
        .route("/export-xlsx", get(export_xlsx))
        .route("/export-pdf", get(export_pdf))
}

#[utoipa::path(
    get,
    path = "/api/admin/analysis-logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Analysis logs, newest first", body = ApiResponse<Vec<AnalysisLog>>)
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<ApiResponse<Vec<AnalysisLog>>>> {
    let resp = analysis_log_service::list_logs(&state.pool, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analysis-logs/{id}",
    params(("id" = i64, Path, description = "Analysis log ID")),
    responses(
        (status = 200, description = "Get analysis log", body = ApiResponse<AnalysisLog>),
        (status = 404, description = "Analysis log not found")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn get_log(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AnalysisLog>>> {
    let resp = analysis_log_service::get_log(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/analysis-logs/{id}",
    params(("id" = i64, Path, description = "Analysis log ID")),
    responses(
        (status = 200, description = "Analysis log deleted"),
        (status = 404, description = "Analysis log not found")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn delete_log(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = analysis_log_service::delete_log(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/summary",
    params(DateRange),
    responses(
        (status = 200, description = "Totals, condition distribution and top products", body = ApiResponse<ReportSummary>)
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn summary(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(range): Query<DateRange>,
) -> AppResult<Json<ApiResponse<ReportSummary>>> {
    let resp = report_service::summary(&state.pool, range).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/export-csv",
    params(DateRange),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn export_csv(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(range): Query<DateRange>,
) -> AppResult<ExportFile> {
    report_service::export_csv(&state.pool, range).await
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/export-json",
    params(DateRange),
    responses(
        (status = 200, description = "JSON attachment", content_type = "application/json")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn export_json(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(range): Query<DateRange>,
) -> AppResult<ExportFile> {
    report_service::export_json(&state.pool, range).await
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/export-xlsx",
    params(DateRange),
    responses(
        (status = 200, description = "XLSX workbook attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn export_xlsx(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(range): Query<DateRange>,
) -> AppResult<ExportFile> {
    report_service::export_xlsx(&state.pool, range).await
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/export-pdf",
    params(DateRange),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf")
    ),
    security(("admin_session" = [])),
    tag = "Reports"
)]
pub async fn export_pdf(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(range): Query<DateRange>,
) -> AppResult<ExportFile> {
    report_service::export_pdf(&state.pool, range).await
}
