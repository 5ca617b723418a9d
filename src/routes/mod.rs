use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod reports;
pub mod rules;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(analysis::router())
        .merge(products::public_router())
        .nest("/admin", admin::router())
}
