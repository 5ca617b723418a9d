use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub use crate::query::SortOrder;
use crate::error::{AppError, AppResult};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
/// Postgres reads OFFSET as a bigint.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Pagination {
    /// `(page, per_page, offset)` with page >= 1 and per_page in 1..=100.
    /// A page whose offset does not fit a bigint is rejected.
    pub fn normalize(&self) -> AppResult<(u64, u64, u64)> {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let offset = (page - 1)
            .checked_mul(per_page)
            .filter(|offset| *offset <= MAX_OFFSET)
            .ok_or_else(|| AppError::BadRequest(format!("page {page} is out of range")))?;
        Ok((page, per_page, offset))
    }
}
