use std::collections::{BTreeSet, HashMap};

use serde_json::json;

use super::{delete_by_id, insert_row, require_name, update_by_id, with_weights};
use crate::{
    db::DbPool,
    dto::{
        auth::SessionUser,
        products::{CreateProductRequest, ProductDetail, PublicProduct, UpdateProductRequest},
    },
    error::{AppError, AppResult},
    models::{Ingredient, PRODUCT_INGREDIENTS_TABLE, Product, ProductIngredientRow, ProductWithRefs},
    query::{Query, Record, Relation, SortOrder},
    response::{ApiResponse, Meta},
    skin::ConditionWeights,
};

/// All products with brand and category, by name.
pub async fn all_products(pool: &DbPool) -> AppResult<Vec<ProductWithRefs>> {
    Ok(Query::table(Product::TABLE)
        .with(Relation::ProductRefs)
        .order("name", SortOrder::Asc)
        .fetch(pool)
        .await?)
}

pub async fn find_product(pool: &DbPool, id: i64) -> AppResult<ProductWithRefs> {
    Query::table(Product::TABLE)
        .with(Relation::ProductRefs)
        .eq("id", id)
        .single()
        .fetch::<Option<ProductWithRefs>>(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Ingredients linked to a product, by name.
pub async fn product_ingredients(pool: &DbPool, product_id: i64) -> AppResult<Vec<Ingredient>> {
    let rows: Vec<ProductIngredientRow> = Query::table(PRODUCT_INGREDIENTS_TABLE)
        .with(Relation::ProductIngredients)
        .eq("product_id", product_id)
        .order("ingredients.name", SortOrder::Asc)
        .fetch(pool)
        .await?;
    Ok(rows.into_iter().filter_map(|row| row.ingredients).collect())
}

pub async fn list_products(pool: &DbPool) -> AppResult<ApiResponse<Vec<ProductWithRefs>>> {
    Ok(ApiResponse::list("Products", all_products(pool).await?))
}

pub async fn get_product(pool: &DbPool, id: i64) -> AppResult<ApiResponse<ProductDetail>> {
    let detail = product_detail(pool, id).await?;
    Ok(ApiResponse::success("Product", detail, None))
}

async fn product_detail(pool: &DbPool, id: i64) -> AppResult<ProductDetail> {
    let product = find_product(pool, id).await?;
    let ingredients = product_ingredients(pool, id).await?;
    Ok(ProductDetail {
        product,
        ingredients,
    })
}

/// Public catalog: products with brand name and ingredient names resolved.
pub async fn public_products(pool: &DbPool) -> AppResult<ApiResponse<Vec<PublicProduct>>> {
    let products = all_products(pool).await?;
    let links: Vec<ProductIngredientRow> = Query::table(PRODUCT_INGREDIENTS_TABLE)
        .with(Relation::ProductIngredients)
        .order("ingredients.name", SortOrder::Asc)
        .fetch(pool)
        .await?;

    let mut names: HashMap<i64, Vec<String>> = HashMap::new();
    for link in links {
        if let Some(ingredient) = link.ingredients {
            let name = ingredient.name.trim();
            if !name.is_empty() {
                names.entry(link.product_id).or_default().push(name.to_string());
            }
        }
    }

    let items = products
        .into_iter()
        .map(|product| {
            let ingredients = names
                .remove(&product.product.id)
                .map(|n| n.join(", "))
                .unwrap_or_default();
            PublicProduct {
                brand: product.brand_name().unwrap_or_default().to_string(),
                category: product.category_name().map(str::to_string),
                ingredients,
                product,
            }
        })
        .collect();
    Ok(ApiResponse::list("Products", items))
}

pub async fn create_product(
    pool: &DbPool,
    admin: &SessionUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    let record = Record::new()
        .set("name", require_name(&payload.name, "Product")?)
        .set("brand_id", payload.brand_id)
        .set("category_id", payload.category_id)
        .set("description", payload.description)
        .set("image_url", payload.image_url);
    let record = with_weights(record, &ConditionWeights::default());
    let product: Product = insert_row(pool, Product::TABLE, record).await?;

    if let Some(ids) = payload.ingredient_ids.filter(|ids| !ids.is_empty()) {
        set_ingredients(pool, product.id, &ids).await?;
    }
    tracing::info!(admin = %admin.email, product_id = product.id, "product created");

    let detail = product_detail(pool, product.id).await?;
    Ok(ApiResponse::success("Product created", detail, Some(Meta::empty())))
}

pub async fn update_product(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    let name = payload
        .name
        .map(|n| require_name(&n, "Product"))
        .transpose()?;
    let record = Record::new()
        .set_some("name", name)
        .set_some("brand_id", payload.brand_id)
        .set_some("category_id", payload.category_id)
        .set_some("description", payload.description)
        .set_some("image_url", payload.image_url);
    let _: Product = update_by_id(pool, Product::TABLE, id, record).await?;

    if let Some(ids) = payload.ingredient_ids {
        set_ingredients(pool, id, &ids).await?;
    }
    tracing::info!(admin = %admin.email, product_id = id, "product updated");

    let detail = product_detail(pool, id).await?;
    Ok(ApiResponse::success("Updated", detail, Some(Meta::empty())))
}

pub async fn delete_product(
    pool: &DbPool,
    admin: &SessionUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    delete_by_id(pool, Product::TABLE, id).await?;
    tracing::info!(admin = %admin.email, product_id = id, "product deleted");
    Ok(ApiResponse::success("Deleted", json!({ "id": id }), Some(Meta::empty())))
}

/// Replace a product's ingredient links and recompute its weights from them.
pub async fn set_ingredients(
    pool: &DbPool,
    product_id: i64,
    ingredient_ids: &[i64],
) -> AppResult<ConditionWeights> {
    Query::table(PRODUCT_INGREDIENTS_TABLE)
        .delete()
        .eq("product_id", product_id)
        .execute(pool)
        .await?;

    let unique: BTreeSet<i64> = ingredient_ids.iter().copied().collect();
    for ingredient_id in &unique {
        Query::table(PRODUCT_INGREDIENTS_TABLE)
            .insert(
                Record::new()
                    .set("product_id", product_id)
                    .set("ingredient_id", *ingredient_id),
            )
            .execute(pool)
            .await?;
    }

    let ingredients = product_ingredients(pool, product_id).await?;
    let weights = ConditionWeights::combine(ingredients.iter().map(|i| &i.weights));
    let _: Product =
        update_by_id(pool, Product::TABLE, product_id, with_weights(Record::new(), &weights))
            .await?;

    tracing::debug!(product_id, links = unique.len(), "product weights recomputed");
    Ok(weights)
}
