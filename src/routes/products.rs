use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::products::{CreateProductRequest, ProductDetail, PublicProduct, UpdateProductRequest},
    error::AppResult,
    middleware::auth::AdminSession,
    models::ProductWithRefs,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/products", get(public_products))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products with brand, category and ingredient names", body = ApiResponse<Vec<PublicProduct>>)
    ),
    tag = "Products"
)]
pub async fn public_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PublicProduct>>>> {
    let resp = product_service::public_products(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "Products joined with brand and category", body = ApiResponse<Vec<ProductWithRefs>>)
    ),
    security(("admin_session" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<ProductWithRefs>>>> {
    let resp = product_service::list_products(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with its ingredients", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found")
    ),
    security(("admin_session" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created; weights follow its ingredients", body = ApiResponse<ProductDetail>),
        (status = 400, description = "Invalid product")
    ),
    security(("admin_session" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::create_product(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found")
    ),
    security(("admin_session" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::update_product(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    security(("admin_session" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = product_service::delete_product(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}
