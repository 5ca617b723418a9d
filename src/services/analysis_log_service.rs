use serde_json::Value;

use super::{delete_by_id, find_by_id};
use crate::{
    db::DbPool,
    dto::{
        auth::SessionUser,
        reports::{DateRange, LogQuery},
    },
    error::AppResult,
    models::AnalysisLog,
    query::{Query, SortOrder},
    response::{ApiResponse, Meta},
};

#[derive(serde::Deserialize)]
struct CountRow {
    count: i64,
}

fn filtered(range: &DateRange, condition: Option<&str>) -> Query {
    let mut query = Query::table(AnalysisLog::TABLE);
    if let Some(start) = range.start() {
        query = query.gte("created_at", start);
    }
    if let Some(end) = range.end() {
        query = query.lte("created_at", end);
    }
    if let Some(condition) = condition {
        query = query.eq("dominant_condition", condition);
    }
    query
}

/// Every log in the range, newest first.
pub async fn logs_in_range(pool: &DbPool, range: &DateRange) -> AppResult<Vec<AnalysisLog>> {
    Ok(filtered(range, None)
        .order("created_at", SortOrder::Desc)
        .fetch(pool)
        .await?)
}

pub async fn list_logs(pool: &DbPool, query: LogQuery) -> AppResult<ApiResponse<Vec<AnalysisLog>>> {
    let (page, per_page, offset) = query.pagination().normalize()?;
    let range = query.range();
    let condition = query
        .condition
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let total = filtered(&range, condition)
        .count()
        .fetch::<Option<CountRow>>(pool)
        .await?
        .map(|row| row.count.max(0) as u64)
        .unwrap_or(0);

    let logs: Vec<AnalysisLog> = filtered(&range, condition)
        .order("created_at", SortOrder::Desc)
        .limit(per_page)
        .offset(offset)
        .fetch(pool)
        .await?;

    Ok(ApiResponse::success(
        "Analysis logs",
        logs,
        Some(Meta::new(page, per_page, total)),
    ))
}

pub async fn get_log(pool: &DbPool, id: i64) -> AppResult<ApiResponse<AnalysisLog>> {
    let log = find_by_id(pool, AnalysisLog::TABLE, id).await?;
    Ok(ApiResponse::success("Analysis log", log, None))
}

pub async fn delete_log(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<Value>> {
    delete_by_id(pool, AnalysisLog::TABLE, id).await?;
    tracing::info!(admin = %admin.email, log_id = id, "analysis log deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
