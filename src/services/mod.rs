use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    query::{Query, Record},
    skin::{ConditionWeights, SkinCondition},
};

pub mod analysis_log_service;
pub mod analysis_service;
pub mod auth_service;
pub mod catalog_service;
pub mod product_service;
pub mod report_service;
pub mod rule_service;

pub(crate) async fn find_by_id<T: DeserializeOwned>(
    pool: &DbPool,
    table: &str,
    id: i64,
) -> AppResult<T> {
    Query::table(table)
        .eq("id", id)
        .single()
        .fetch::<Option<T>>(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) async fn insert_row<T: DeserializeOwned>(
    pool: &DbPool,
    table: &str,
    record: Record,
) -> AppResult<T> {
    Query::table(table)
        .insert(record)
        .select("*")
        .single()
        .fetch::<Option<T>>(pool)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("insert into {table} returned no row")))
}

/// Apply a partial update. An empty record leaves the row as is.
pub(crate) async fn update_by_id<T: DeserializeOwned>(
    pool: &DbPool,
    table: &str,
    id: i64,
    record: Record,
) -> AppResult<T> {
    if record.is_empty() {
        return find_by_id(pool, table, id).await;
    }
    Query::table(table)
        .update(record)
        .eq("id", id)
        .select("*")
        .single()
        .fetch::<Option<T>>(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) async fn delete_by_id(pool: &DbPool, table: &str, id: i64) -> AppResult<()> {
    let deleted: Option<Value> = Query::table(table)
        .delete()
        .eq("id", id)
        .select("id")
        .single()
        .fetch(pool)
        .await?;
    deleted.map(|_| ()).ok_or(AppError::NotFound)
}

/// Set all six `w_*` columns.
pub(crate) fn with_weights(mut record: Record, weights: &ConditionWeights) -> Record {
    for condition in SkinCondition::ALL {
        record = record.set(ConditionWeights::column(condition), weights.get(condition));
    }
    record
}

pub(crate) fn require_name(name: &str, what: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!("{what} name is required")));
    }
    Ok(name.to_string())
}
