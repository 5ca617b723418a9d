use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ExportFile, ReportData};
use crate::models::{AnalysisLog, ProductWithRefs, SkinType};

pub const CSV_HEADER: [&str; 5] = ["ID", "Date", "Skin Condition", "Recommended Product", "User"];

const UNKNOWN_PRODUCT: &str = "Unknown";
const GUEST: &str = "Guest";

/// One row per log. The product column names the first recommended product.
pub fn render_csv(data: &ReportData) -> anyhow::Result<ExportFile> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for log in &data.logs {
        let product = log
            .product_ids()
            .first()
            .and_then(|id| data.product_name(*id))
            .unwrap_or(UNKNOWN_PRODUCT);
        let user = if log.user_name.trim().is_empty() {
            GUEST
        } else {
            log.user_name.as_str()
        };
        writer.write_record([
            log.id.to_string().as_str(),
            log.created_at.format("%Y-%m-%d").to_string().as_str(),
            log.dominant_condition.as_str(),
            product,
            user,
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(ExportFile {
        filename: "face_analysis_report.csv".to_string(),
        content_type: "text/csv; charset=utf-8",
        bytes,
    })
}

#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub total_logs: usize,
    pub total_products: usize,
    pub total_skin_types: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonExport<'a> {
    pub metadata: ExportMetadata,
    pub analysis_logs: &'a [AnalysisLog],
    pub products: &'a [ProductWithRefs],
    pub skin_types: &'a [SkinType],
}

pub fn render_json(data: &ReportData, exported_at: DateTime<Utc>) -> anyhow::Result<ExportFile> {
    let document = JsonExport {
        metadata: ExportMetadata {
            exported_at,
            total_logs: data.logs.len(),
            total_products: data.products.len(),
            total_skin_types: data.skin_types.len(),
        },
        analysis_logs: &data.logs,
        products: &data.products,
        skin_types: &data.skin_types,
    };

    Ok(ExportFile {
        filename: "face_analysis_report.json".to_string(),
        content_type: "application/json; charset=utf-8",
        bytes: serde_json::to_vec_pretty(&document)?,
    })
}
