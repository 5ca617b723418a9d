use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::catalog::{
        CreateBrandRequest, CreateCategoryRequest, CreateIngredientRequest, UpdateBrandRequest,
        UpdateCategoryRequest, UpdateIngredientRequest,
    },
    error::AppResult,
    middleware::auth::AdminSession,
    models::{Brand, Ingredient, ProductCategory},
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn brands_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route(
            "/{id}",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
}

pub fn categories_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub fn ingredients_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients).post(create_ingredient))
        .route(
            "/{id}",
            get(get_ingredient)
                .put(update_ingredient)
                .delete(delete_ingredient),
        )
}

#[utoipa::path(
    get,
    path = "/api/admin/brands",
    responses(
        (status = 200, description = "Brands ordered by name", body = ApiResponse<Vec<Brand>>),
        (status = 303, description = "Not signed in")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn list_brands(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<Brand>>>> {
    let resp = catalog_service::list_brands(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/brands/{id}",
    params(("id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Get brand", body = ApiResponse<Brand>),
        (status = 404, description = "Brand not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = catalog_service::get_brand(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/brands",
    request_body = CreateBrandRequest,
    responses(
        (status = 200, description = "Brand created", body = ApiResponse<Brand>),
        (status = 400, description = "Missing or duplicate name")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateBrandRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = catalog_service::create_brand(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/brands/{id}",
    params(("id" = i64, Path, description = "Brand ID")),
    request_body = UpdateBrandRequest,
    responses(
        (status = 200, description = "Brand updated", body = ApiResponse<Brand>),
        (status = 404, description = "Brand not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBrandRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = catalog_service::update_brand(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/brands/{id}",
    params(("id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 404, description = "Brand not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::delete_brand(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = ApiResponse<Vec<ProductCategory>>)
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<ProductCategory>>>> {
    let resp = catalog_service::list_categories(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<ProductCategory>),
        (status = 404, description = "Category not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn get_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductCategory>>> {
    let resp = catalog_service::get_category(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<ProductCategory>),
        (status = 400, description = "Missing or duplicate name")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<ProductCategory>>> {
    let resp = catalog_service::create_category(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<ProductCategory>),
        (status = 404, description = "Category not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn update_category(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<ProductCategory>>> {
    let resp = catalog_service::update_category(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::delete_category(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/ingredients",
    responses(
        (status = 200, description = "Ingredients with condition weights", body = ApiResponse<Vec<Ingredient>>)
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<Ingredient>>>> {
    let resp = catalog_service::list_ingredients(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Get ingredient", body = ApiResponse<Ingredient>),
        (status = 404, description = "Ingredient not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = catalog_service::get_ingredient(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient created", body = ApiResponse<Ingredient>),
        (status = 400, description = "Invalid name or weights")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateIngredientRequest>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = catalog_service::create_ingredient(&state.pool, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient ID")),
    request_body = UpdateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = ApiResponse<Ingredient>),
        (status = 400, description = "Invalid weights"),
        (status = 404, description = "Ingredient not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn update_ingredient(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateIngredientRequest>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = catalog_service::update_ingredient(&state.pool, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient deleted"),
        (status = 404, description = "Ingredient not found")
    ),
    security(("admin_session" = [])),
    tag = "Catalog"
)]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::delete_ingredient(&state.pool, &admin, id).await?;
    Ok(Json(resp))
}
