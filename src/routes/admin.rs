use axum::Router;

use super::{catalog, products, reports, rules};
use crate::state::AppState;

/// Every route here extracts `AdminSession`; anonymous requests are
/// redirected to the login page.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/brands", catalog::brands_router())
        .nest("/categories", catalog::categories_router())
        .nest("/ingredients", catalog::ingredients_router())
        .nest("/products", products::admin_router())
        .nest("/rules", rules::rules_router())
        .nest("/recommendations", rules::recommendations_router())
        .nest("/skin-types", rules::skin_types_router())
        .nest("/analysis-logs", reports::logs_router())
        .nest("/reports", reports::reports_router())
}
