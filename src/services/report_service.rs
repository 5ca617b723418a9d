use chrono::Utc;

use super::{
    analysis_log_service::logs_in_range, product_service::all_products,
    rule_service::all_skin_types,
};
use crate::{
    db::DbPool,
    dto::reports::{DateRange, ReportSummary},
    error::AppResult,
    export::{self, ExportFile, ReportData},
    response::{ApiResponse, Meta},
};

pub async fn load_report_data(pool: &DbPool, range: &DateRange) -> AppResult<ReportData> {
    let logs = logs_in_range(pool, range).await?;
    let products = all_products(pool).await?;
    let skin_types = all_skin_types(pool).await?;
    Ok(ReportData {
        logs,
        products,
        skin_types,
    })
}

pub async fn summary(pool: &DbPool, range: DateRange) -> AppResult<ApiResponse<ReportSummary>> {
    let data = load_report_data(pool, &range).await?;
    Ok(ApiResponse::success(
        "Report summary",
        export::summarize(&data),
        Some(Meta::empty()),
    ))
}

pub async fn export_csv(pool: &DbPool, range: DateRange) -> AppResult<ExportFile> {
    let data = load_report_data(pool, &range).await?;
    let file = export::tabular::render_csv(&data)?;
    tracing::info!(rows = data.logs.len(), "csv export rendered");
    Ok(file)
}

pub async fn export_json(pool: &DbPool, range: DateRange) -> AppResult<ExportFile> {
    let data = load_report_data(pool, &range).await?;
    Ok(export::tabular::render_json(&data, Utc::now())?)
}

pub async fn export_xlsx(pool: &DbPool, range: DateRange) -> AppResult<ExportFile> {
    let data = load_report_data(pool, &range).await?;
    let file = export::spreadsheet::render_xlsx(&data, Utc::now())?;
    tracing::info!(rows = data.logs.len(), "xlsx export rendered");
    Ok(file)
}

pub async fn export_pdf(pool: &DbPool, range: DateRange) -> AppResult<ExportFile> {
    let data = load_report_data(pool, &range).await?;
    Ok(export::document::render_pdf(&data, Utc::now())?)
}
