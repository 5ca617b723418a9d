use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    classifier::Engine,
    db::DbPool,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: bool,
    /// Engine used for image scans.
    pub classifier: Engine,
}

pub async fn database_reachable(pool: &DbPool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the database");
            false
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service liveness with database and classifier status", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let database = database_reachable(&state.pool).await;
    let data = HealthData {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        classifier: if state.classifier.model_available() {
            Engine::Cnn
        } else {
            Engine::Heuristic
        },
    };

    Json(ApiResponse::success("Health check", data, Some(Meta::empty())))
}
