//! Report rendering: summary statistics and downloadable files built from
//! analysis logs.

pub mod document;
pub mod spreadsheet;
pub mod summary;
pub mod tabular;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::models::{AnalysisLog, ProductWithRefs, SkinType};

pub use summary::summarize;

/// Everything an export needs, already loaded.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    /// Newest first.
    pub logs: Vec<AnalysisLog>,
    pub products: Vec<ProductWithRefs>,
    pub skin_types: Vec<SkinType>,
}

impl ReportData {
    pub fn product_name(&self, id: i64) -> Option<&str> {
        self.products
            .iter()
            .find(|p| p.product.id == id)
            .map(|p| p.product.name.as_str())
    }
}

/// A rendered file served as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
