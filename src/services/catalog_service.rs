use serde_json::json;

use super::{delete_by_id, find_by_id, insert_row, require_name, update_by_id, with_weights};
use crate::{
    db::DbPool,
    dto::{
        auth::SessionUser,
        catalog::{
            CreateBrandRequest, CreateCategoryRequest, CreateIngredientRequest,
            UpdateBrandRequest, UpdateCategoryRequest, UpdateIngredientRequest,
        },
    },
    error::{AppError, AppResult},
    models::{Brand, Ingredient, ProductCategory},
    query::{Query, Record, SortOrder},
    response::{ApiResponse, Meta},
    skin::{ConditionWeights, SkinCondition},
};

pub async fn list_brands(pool: &DbPool) -> AppResult<ApiResponse<Vec<Brand>>> {
    let brands: Vec<Brand> = Query::table(Brand::TABLE)
        .order("name", SortOrder::Asc)
        .fetch(pool)
        .await?;
    Ok(ApiResponse::list("Brands", brands))
}

pub async fn get_brand(pool: &DbPool, id: i64) -> AppResult<ApiResponse<Brand>> {
    let brand = find_by_id(pool, Brand::TABLE, id).await?;
    Ok(ApiResponse::success("Brand", brand, None))
}

pub async fn create_brand(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    let record = Record::new()
        .set("name", require_name(&payload.name, "Brand")?)
        .set("logo_url", payload.logo_url);
    let brand: Brand = insert_row(pool, Brand::TABLE, record).await?;
    tracing::info!(admin = %admin.email, brand_id = brand.id, "brand created");
    Ok(ApiResponse::success("Brand created", brand, Some(Meta::empty())))
}

pub async fn update_brand(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    let name = payload
        .name
        .map(|n| require_name(&n, "Brand"))
        .transpose()?;
    let record = Record::new()
        .set_some("name", name)
        .set_some("logo_url", payload.logo_url);
    let brand: Brand = update_by_id(pool, Brand::TABLE, id, record).await?;
    tracing::info!(admin = %admin.email, brand_id = id, "brand updated");
    Ok(ApiResponse::success("Updated", brand, Some(Meta::empty())))
}

pub async fn delete_brand(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, Brand::TABLE, id).await?;
    tracing::info!(admin = %admin.email, brand_id = id, "brand deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<Vec<ProductCategory>>> {
    let categories: Vec<ProductCategory> = Query::table(ProductCategory::TABLE)
        .order("name", SortOrder::Asc)
        .fetch(pool)
        .await?;
    Ok(ApiResponse::list("Categories", categories))
}

pub async fn get_category(pool: &DbPool, id: i64) -> AppResult<ApiResponse<ProductCategory>> {
    let category = find_by_id(pool, ProductCategory::TABLE, id).await?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<ProductCategory>> {
    let record = Record::new()
        .set("name", require_name(&payload.name, "Category")?)
        .set("description", payload.description);
    let category: ProductCategory = insert_row(pool, ProductCategory::TABLE, record).await?;
    tracing::info!(admin = %admin.email, category_id = category.id, "category created");
    Ok(ApiResponse::success("Category created", category, Some(Meta::empty())))
}

pub async fn update_category(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<ProductCategory>> {
    let name = payload
        .name
        .map(|n| require_name(&n, "Category"))
        .transpose()?;
    let record = Record::new()
        .set_some("name", name)
        .set_some("description", payload.description);
    let category: ProductCategory = update_by_id(pool, ProductCategory::TABLE, id, record).await?;
    tracing::info!(admin = %admin.email, category_id = id, "category updated");
    Ok(ApiResponse::success("Updated", category, Some(Meta::empty())))
}

pub async fn delete_category(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, ProductCategory::TABLE, id).await?;
    tracing::info!(admin = %admin.email, category_id = id, "category deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

pub async fn list_ingredients(pool: &DbPool) -> AppResult<ApiResponse<Vec<Ingredient>>> {
    let ingredients: Vec<Ingredient> = Query::table(Ingredient::TABLE)
        .order("name", SortOrder::Asc)
        .fetch(pool)
        .await?;
    Ok(ApiResponse::list("Ingredients", ingredients))
}

pub async fn get_ingredient(pool: &DbPool, id: i64) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = find_by_id(pool, Ingredient::TABLE, id).await?;
    Ok(ApiResponse::success("Ingredient", ingredient, None))
}

pub async fn create_ingredient(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateIngredientRequest,
) -> AppResult<ApiResponse<Ingredient>> {
    let weights = checked_weights(&payload.weights)?;
    let record = Record::new()
        .set("name", require_name(&payload.name, "Ingredient")?)
        .set("effect", payload.effect);
    let record = with_weights(record, &weights);
    let ingredient: Ingredient = insert_row(pool, Ingredient::TABLE, record).await?;
    tracing::info!(admin = %admin.email, ingredient_id = ingredient.id, "ingredient created");
    Ok(ApiResponse::success("Ingredient created", ingredient, Some(Meta::empty())))
}

pub async fn update_ingredient(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateIngredientRequest,
) -> AppResult<ApiResponse<Ingredient>> {
    let name = payload
        .name
        .map(|n| require_name(&n, "Ingredient"))
        .transpose()?;
    let mut record = Record::new()
        .set_some("name", name)
        .set_some("effect", payload.effect);
    for condition in SkinCondition::ALL {
        if let Some(weight) = payload.weights.get(condition) {
            record = record.set(ConditionWeights::column(condition), checked_weight(weight)?);
        }
    }
    let ingredient: Ingredient = update_by_id(pool, Ingredient::TABLE, id, record).await?;
    tracing::info!(admin = %admin.email, ingredient_id = id, "ingredient updated");
    Ok(ApiResponse::success("Updated", ingredient, Some(Meta::empty())))
}

pub async fn delete_ingredient(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, Ingredient::TABLE, id).await?;
    tracing::info!(admin = %admin.email, ingredient_id = id, "ingredient deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

fn checked_weight(weight: f64) -> AppResult<f64> {
    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(AppError::BadRequest("Weights must be finite numbers".into()))
    }
}

fn checked_weights(weights: &ConditionWeights) -> AppResult<ConditionWeights> {
    for condition in SkinCondition::ALL {
        checked_weight(weights.get(condition))?;
    }
    Ok(*weights)
}
