use skinlab_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::{auth_service::upsert_admin, product_service::set_ingredients},
    skin::{SkinCondition, argmax},
};

struct IngredientSeed {
    name: &'static str,
    effect: &'static str,
    /// acne, blackheads, clear_skin, dark_spots, puffy_eyes, wrinkles
    weights: [f64; 6],
}

struct ProductSeed {
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    description: &'static str,
    image_url: &'static str,
    ingredients: &'static [&'static str],
}

struct AdviceSeed {
    condition: SkinCondition,
    title: &'static str,
    description: &'static str,
    tips: &'static [&'static str],
    /// Product names with rule confidence.
    rules: &'static [(&'static str, f64)],
}

const CATEGORIES: [(&str, &str); 3] = [
    ("Face Wash", "Daily cleansers"),
    ("Serum", "Targeted treatments"),
    ("Moisturizer", "Hydration and barrier care"),
];

const INGREDIENTS: [IngredientSeed; 14] = [
    IngredientSeed { name: "Salicylic Acid", effect: "Unclogs pores", weights: [0.9, 0.9, 0.2, 0.1, 0.0, 0.1] },
    IngredientSeed { name: "Tea Tree Oil", effect: "Antibacterial", weights: [0.8, 0.4, 0.2, 0.0, 0.0, 0.0] },
    IngredientSeed { name: "Charcoal", effect: "Draws out impurities", weights: [0.4, 0.8, 0.2, 0.0, 0.0, 0.0] },
    IngredientSeed { name: "Hyaluronic Acid", effect: "Deep hydration", weights: [0.0, 0.0, 0.6, 0.1, 0.4, 0.6] },
    IngredientSeed { name: "Glycerin", effect: "Humectant", weights: [0.0, 0.0, 0.5, 0.0, 0.2, 0.3] },
    IngredientSeed { name: "Aloe Vera", effect: "Soothing", weights: [0.3, 0.0, 0.6, 0.1, 0.3, 0.1] },
    IngredientSeed { name: "Ceramide", effect: "Barrier repair", weights: [0.0, 0.0, 0.7, 0.0, 0.1, 0.4] },
    IngredientSeed { name: "Vitamin C", effect: "Brightening", weights: [0.1, 0.0, 0.4, 0.9, 0.2, 0.5] },
    IngredientSeed { name: "Niacinamide", effect: "Evens tone, controls oil", weights: [0.6, 0.5, 0.5, 0.7, 0.1, 0.3] },
    IngredientSeed { name: "Benzoyl Peroxide", effect: "Kills acne bacteria", weights: [1.0, 0.3, 0.0, 0.0, 0.0, 0.0] },
    IngredientSeed { name: "Sulfur", effect: "Dries out blemishes", weights: [0.7, 0.5, 0.0, 0.0, 0.0, 0.0] },
    IngredientSeed { name: "Witch Hazel", effect: "Astringent", weights: [0.4, 0.6, 0.2, 0.0, 0.3, 0.0] },
    IngredientSeed { name: "Menthol", effect: "Cooling, reduces puffiness", weights: [0.0, 0.1, 0.1, 0.0, 0.6, 0.0] },
    IngredientSeed { name: "Retinol", effect: "Cell renewal", weights: [0.4, 0.3, 0.2, 0.6, 0.1, 1.0] },
];

const PRODUCTS: [ProductSeed; 7] = [
    ProductSeed {
        name: "Oil Control Face Wash",
        brand: "ClearSkin",
        category: "Face Wash",
        description: "Controls excess oil and prevents breakouts",
        image_url: "/images/oil-control.jpg",
        ingredients: &["Salicylic Acid", "Tea Tree Oil", "Charcoal"],
    },
    ProductSeed {
        name: "Hydrating Face Wash",
        brand: "MoistureGlow",
        category: "Face Wash",
        description: "Gentle cleanser that hydrates while cleaning",
        image_url: "/images/hydrating.jpg",
        ingredients: &["Hyaluronic Acid", "Glycerin", "Aloe Vera", "Ceramide"],
    },
    ProductSeed {
        name: "Balancing Face Wash",
        brand: "SkinBalance",
        category: "Face Wash",
        description: "Maintains skin's natural balance",
        image_url: "/images/balancing.jpg",
        ingredients: &["Aloe Vera", "Vitamin C", "Niacinamide"],
    },
    ProductSeed {
        name: "Anti-Acne Face Wash",
        brand: "ClearSkin",
        category: "Face Wash",
        description: "Treats and prevents acne breakouts",
        image_url: "/images/anti-acne.jpg",
        ingredients: &["Benzoyl Peroxide", "Salicylic Acid", "Tea Tree Oil", "Sulfur"],
    },
    ProductSeed {
        name: "Deep Cleansing Charcoal Wash",
        brand: "PureDetox",
        category: "Face Wash",
        description: "Deep cleans pores and removes impurities",
        image_url: "/images/charcoal.jpg",
        ingredients: &["Charcoal", "Witch Hazel", "Menthol"],
    },
    ProductSeed {
        name: "Gentle Moisturizing Cleanser",
        brand: "SoftTouch",
        category: "Moisturizer",
        description: "Ultra-gentle formula for sensitive dry skin",
        image_url: "/images/gentle.jpg",
        ingredients: &["Glycerin", "Ceramide", "Hyaluronic Acid"],
    },
    ProductSeed {
        name: "Retinol Renewal Face Wash",
        brand: "YouthRevive",
        category: "Serum",
        description: "Anti-aging cleanser with retinol",
        image_url: "/images/retinol.jpg",
        ingredients: &["Retinol", "Niacinamide", "Vitamin C"],
    },
];

const ADVICE: [AdviceSeed; 6] = [
    AdviceSeed {
        condition: SkinCondition::Acne,
        title: "Calm active breakouts",
        description: "Use a salicylic or benzoyl peroxide cleanser and avoid heavy oils.",
        tips: &["Wash twice a day", "Do not pick blemishes", "Use non-comedogenic products"],
        rules: &[("Anti-Acne Face Wash", 0.95), ("Oil Control Face Wash", 0.85), ("Balancing Face Wash", 0.6)],
    },
    AdviceSeed {
        condition: SkinCondition::Blackheads,
        title: "Keep pores clear",
        description: "Exfoliate gently with BHA and use clay or charcoal once a week.",
        tips: &["Exfoliate two or three times a week", "Avoid pore strips"],
        rules: &[("Deep Cleansing Charcoal Wash", 0.9), ("Oil Control Face Wash", 0.8)],
    },
    AdviceSeed {
        condition: SkinCondition::ClearSkin,
        title: "Maintain healthy skin",
        description: "Keep a simple routine of gentle cleansing, moisturizer and sunscreen.",
        tips: &["Use sunscreen daily", "Stay hydrated"],
        rules: &[("Balancing Face Wash", 0.9), ("Hydrating Face Wash", 0.8), ("Gentle Moisturizing Cleanser", 0.7)],
    },
    AdviceSeed {
        condition: SkinCondition::DarkSpots,
        title: "Fade dark spots",
        description: "Vitamin C and niacinamide help even out tone over several weeks.",
        tips: &["Wear SPF 30 or higher", "Be patient, results take weeks"],
        rules: &[("Retinol Renewal Face Wash", 0.85), ("Balancing Face Wash", 0.75)],
    },
    AdviceSeed {
        condition: SkinCondition::PuffyEyes,
        title: "Reduce puffiness",
        description: "Cool compresses, sleep and hydration reduce under-eye swelling.",
        tips: &["Sleep seven to nine hours", "Limit salt in the evening"],
        rules: &[("Deep Cleansing Charcoal Wash", 0.6), ("Hydrating Face Wash", 0.55)],
    },
    AdviceSeed {
        condition: SkinCondition::Wrinkles,
        title: "Smooth fine lines",
        description: "Retinoids and hydration support collagen and skin elasticity.",
        tips: &["Introduce retinol slowly", "Moisturize morning and night"],
        rules: &[("Retinol Renewal Face Wash", 0.95), ("Gentle Moisturizing Cleanser", 0.7)],
    },
];

/// name, age, scores in label order
const SAMPLE_LOGS: [(&str, i32, [f64; 6]); 4] = [
    ("Rina", 24, [0.82, 0.31, 0.12, 0.08, 0.05, 0.03]),
    ("Budi", 31, [0.20, 0.74, 0.18, 0.10, 0.07, 0.05]),
    ("Sari", 45, [0.10, 0.12, 0.20, 0.35, 0.22, 0.77]),
    ("Guest", 0, [0.05, 0.06, 0.91, 0.04, 0.03, 0.02]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let admin_id = upsert_admin(&pool, &config.admin_email, &config.admin_password)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    for (name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO product_categories (name, description) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;
    }

    for ingredient in &INGREDIENTS {
        let [acne, blackheads, clear_skin, dark_spots, puffy_eyes, wrinkles] = ingredient.weights;
        sqlx::query(
            r#"
            INSERT INTO ingredients
                (name, effect, w_acne, w_blackheads, w_clear_skin, w_dark_spots, w_puffy_eyes, w_wrinkles)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO UPDATE SET
                effect = EXCLUDED.effect,
                w_acne = EXCLUDED.w_acne,
                w_blackheads = EXCLUDED.w_blackheads,
                w_clear_skin = EXCLUDED.w_clear_skin,
                w_dark_spots = EXCLUDED.w_dark_spots,
                w_puffy_eyes = EXCLUDED.w_puffy_eyes,
                w_wrinkles = EXCLUDED.w_wrinkles
            "#,
        )
        .bind(ingredient.name)
        .bind(ingredient.effect)
        .bind(acne)
        .bind(blackheads)
        .bind(clear_skin)
        .bind(dark_spots)
        .bind(puffy_eyes)
        .bind(wrinkles)
        .execute(&pool)
        .await?;
    }

    let mut product_count = 0;
    for product in &PRODUCTS {
        seed_product(&pool, product).await?;
        product_count += 1;
    }

    for advice in &ADVICE {
        seed_advice(&pool, advice).await?;
    }

    let existing_logs: (i64,) = sqlx::query_as("SELECT count(*) FROM analysis_logs")
        .fetch_one(&pool)
        .await?;
    if existing_logs.0 == 0 {
        seed_logs(&pool).await?;
    }

    println!("Seed completed. Admin ID: {admin_id}, products: {product_count}");
    Ok(())
}

async fn id_by_name(pool: &DbPool, table: &str, name: &str) -> anyhow::Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as(&format!("SELECT id FROM {table} WHERE name = $1"))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}

async fn seed_product(pool: &DbPool, product: &ProductSeed) -> anyhow::Result<i64> {
    let (brand_id,): (i64,) = sqlx::query_as(
        "INSERT INTO brands (name) VALUES ($1) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
    )
    .bind(product.brand)
    .fetch_one(pool)
    .await?;
    let category_id = id_by_name(pool, "product_categories", product.category).await?;

    let product_id = match id_by_name(pool, "products", product.name).await? {
        Some(id) => id,
        None => {
            let (id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO products (name, brand_id, category_id, description, image_url)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(product.name)
            .bind(brand_id)
            .bind(category_id)
            .bind(product.description)
            .bind(product.image_url)
            .fetch_one(pool)
            .await?;
            id
        }
    };

    let mut ingredient_ids = Vec::with_capacity(product.ingredients.len());
    for name in product.ingredients {
        if let Some(id) = id_by_name(pool, "ingredients", name).await? {
            ingredient_ids.push(id);
        }
    }
    set_ingredients(pool, product_id, &ingredient_ids)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(product_id)
}

async fn seed_advice(pool: &DbPool, advice: &AdviceSeed) -> anyhow::Result<()> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM recommendations WHERE condition = $1 ORDER BY id LIMIT 1")
            .bind(advice.condition.as_str())
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Ok(());
    }

    let tips = serde_json::to_string(advice.tips)?;
    let (recommendation_id,): (i64,) = sqlx::query_as(
        "INSERT INTO recommendations (condition, title, description, tips) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(advice.condition.as_str())
    .bind(advice.title)
    .bind(advice.description)
    .bind(tips)
    .fetch_one(pool)
    .await?;

    for (product_name, confidence) in advice.rules {
        let Some(product_id) = id_by_name(pool, "products", product_name).await? else {
            continue;
        };
        sqlx::query(
            "INSERT INTO rules (skin_type_id, product_id, confidence_score) VALUES ($1, $2, $3)",
        )
        .bind(recommendation_id)
        .bind(product_id)
        .bind(confidence)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_logs(pool: &DbPool) -> anyhow::Result<()> {
    for (name, age, scores) in SAMPLE_LOGS {
        let dominant = SkinCondition::ALL[argmax(scores).unwrap_or(0)];
        let rule_products: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT r.product_id FROM rules r
            JOIN recommendations rec ON rec.id = r.skin_type_id
            WHERE rec.condition = $1
            ORDER BY r.confidence_score DESC
            LIMIT 3
            "#,
        )
        .bind(dominant.as_str())
        .fetch_all(pool)
        .await?;
        let product_ids = rule_products
            .iter()
            .map(|(id,)| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        sqlx::query(
            r#"
            INSERT INTO analysis_logs
                (user_name, user_age, acne_score, blackheads_score, clear_skin_score,
                 dark_spots_score, puffy_eyes_score, wrinkles_score,
                 dominant_condition, recommended_product_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(name)
        .bind(age)
        .bind(scores[0])
        .bind(scores[1])
        .bind(scores[2])
        .bind(scores[3])
        .bind(scores[4])
        .bind(scores[5])
        .bind(dominant.as_str())
        .bind(product_ids)
        .execute(pool)
        .await?;
    }
    Ok(())
}
