use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use skinlab_api::{
    config::AppConfig,
    db::{DbPool, run_migrations},
    dto::analysis::AnalysisRequest,
    models::{Product, ProductWithRefs, Recommendation, Rule, RuleWithProduct},
    query::{Query, Record},
    routes::create_api_router,
    services::{
        analysis_service::{MAX_RECOMMENDATIONS, from_rules, rank_by_weights, submit_analysis},
        rule_service::{clamp_confidence, recommendation_for},
    },
    skin::ConditionScores,
    state::AppState,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn product_json(id: i64, name: &str, weights: Value) -> Value {
    let mut product = json!({
        "id": id,
        "name": name,
        "brand_id": null,
        "category_id": null,
        "description": null,
        "image_url": null,
        "created_at": "2024-01-01T00:00:00Z",
        "brands": null,
        "product_categories": null,
    });
    if let (Some(target), Some(extra)) = (product.as_object_mut(), weights.as_object()) {
        target.extend(extra.clone());
    }
    product
}

fn product(id: i64, name: &str, weights: Value) -> ProductWithRefs {
    serde_json::from_value(product_json(id, name, weights)).expect("product fixture")
}

fn rule(id: i64, confidence: f64, linked: Option<Value>) -> RuleWithProduct {
    serde_json::from_value(json!({
        "id": id,
        "skin_type_id": 1,
        "product_id": id * 10,
        "confidence_score": confidence,
        "created_at": "2024-01-01T00:00:00Z",
        "products": linked,
    }))
    .expect("rule fixture")
}

fn acne_heavy() -> ConditionScores {
    ConditionScores {
        acne: 0.8,
        blackheads: 0.3,
        clear_skin: 0.1,
        ..Default::default()
    }
}

#[tokio::test]
async fn weights_rank_products_by_match() {
    let products = vec![
        product(1, "Moisturizer", json!({ "w_clear_skin": 0.9 })),
        product(2, "Acne Serum", json!({ "w_acne": 0.9, "w_blackheads": 0.5 })),
        product(3, "Pore Strips", json!({ "w_blackheads": 0.9 })),
        product(4, "Eye Gel", json!({ "w_puffy_eyes": 0.9 })),
    ];

    let ranked = rank_by_weights(&acne_heavy(), products);
    let ids: Vec<i64> = ranked.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert!((ranked[0].score - 0.87).abs() < 1e-9);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn weight_ties_keep_catalog_order() {
    let products = (1..=5)
        .map(|id| product(id, &format!("Product {id}"), json!({})))
        .collect();
    let ranked = rank_by_weights(&acne_heavy(), products);

    assert_eq!(ranked.len(), MAX_RECOMMENDATIONS);
    let ids: Vec<i64> = ranked.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn empty_catalog_recommends_nothing() {
    assert!(rank_by_weights(&acne_heavy(), Vec::new()).is_empty());
}

#[tokio::test]
async fn rules_without_products_are_skipped() {
    let rules = vec![
        rule(1, 0.95, None),
        rule(2, 0.9, Some(product_json(20, "Hydrating Face Wash", json!({})))),
        rule(3, 0.8, Some(product_json(30, "Gentle Toner", json!({})))),
        rule(4, 0.7, Some(product_json(40, "Night Cream", json!({})))),
        rule(5, 0.6, Some(product_json(50, "Sunscreen", json!({})))),
    ];

    let products = from_rules(rules);
    let picked: Vec<(i64, f64)> = products.iter().map(|p| (p.id, p.score)).collect();
    assert_eq!(picked, vec![(20, 0.9), (30, 0.8), (40, 0.7)]);
}

#[tokio::test]
async fn rules_are_ranked_by_confidence() {
    let rules = vec![
        rule(1, 0.4, Some(product_json(10, "Gentle Toner", json!({})))),
        rule(2, 0.9, Some(product_json(20, "Hydrating Face Wash", json!({})))),
        rule(3, 0.7, Some(product_json(30, "Night Cream", json!({})))),
        rule(4, 0.9, Some(product_json(40, "Sunscreen", json!({})))),
    ];

    let picked: Vec<i64> = from_rules(rules).iter().map(|p| p.id).collect();
    assert_eq!(picked, vec![20, 40, 30]);
}

#[tokio::test]
async fn rule_confidence_is_clamped() {
    assert_eq!(clamp_confidence(1.7).expect("finite"), 1.0);
    assert_eq!(clamp_confidence(-0.3).expect("finite"), 0.0);
    assert_eq!(clamp_confidence(0.42).expect("finite"), 0.42);
    assert!(clamp_confidence(f64::NAN).is_err());
    assert!(clamp_confidence(f64::INFINITY).is_err());
}

async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()?;
    run_migrations(&pool).await.ok()?;
    Some(pool)
}

#[tokio::test]
async fn clear_skin_analysis_uses_rules() {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: no database configured");
        return;
    };

    let advice = match recommendation_for(&pool, "clear_skin").await.expect("lookup") {
        Some(existing) => existing,
        None => Query::table(Recommendation::TABLE)
            .insert(
                Record::new()
                    .set("condition", "clear_skin")
                    .set("title", "Keep it up")
                    .set("tips", r#"["Use sunscreen daily"]"#),
            )
            .select("*")
            .single()
            .fetch::<Option<Recommendation>>(&pool)
            .await
            .expect("insert recommendation")
            .expect("returned row"),
    };

    let mut product_ids = Vec::new();
    for (name, confidence) in [("Test Cleanser", 0.99), ("Test Toner", 0.98)] {
        let created: Product = Query::table(Product::TABLE)
            .insert(Record::new().set("name", name).set("w_clear_skin", 0.5))
            .select("*")
            .single()
            .fetch::<Option<Product>>(&pool)
            .await
            .expect("insert product")
            .expect("returned row");
        Query::table(Rule::TABLE)
            .insert(
                Record::new()
                    .set("skin_type_id", advice.id)
                    .set("product_id", created.id)
                    .set("confidence_score", confidence),
            )
            .execute(&pool)
            .await
            .expect("insert rule");
        product_ids.push(created.id);
    }

    let response = submit_analysis(
        &pool,
        AnalysisRequest {
            user_name: Some("Integration".into()),
            user_age: Some(30),
            acne_score: Some(0.1),
            blackheads_score: Some(0.1),
            clear_skin_score: Some(0.9),
            dark_spots_score: Some(0.05),
            puffy_eyes_score: Some(0.05),
            wrinkles_score: Some(0.05),
            ..Default::default()
        },
    )
    .await
    .expect("analysis");
    let analysis = response.data.expect("analysis data");

    assert_eq!(analysis.dominant_condition, "clear_skin");
    assert!(!analysis.recommendations.is_empty());
    assert!(analysis.recommendations.len() <= MAX_RECOMMENDATIONS);
    assert!(
        analysis
            .recommendations
            .windows(2)
            .all(|w| w[0].score >= w[1].score)
    );
    assert!(analysis.advice.is_some());

    let missing: Option<Product> = Query::table(Product::TABLE)
        .eq("id", -1_i64)
        .single()
        .fetch(&pool)
        .await
        .expect("lookup");
    assert!(missing.is_none());

    Query::table("analysis_logs")
        .delete()
        .eq("id", analysis.id)
        .execute(&pool)
        .await
        .expect("cleanup log");
    for id in product_ids {
        Query::table(Product::TABLE)
            .delete()
            .eq("id", id)
            .execute(&pool)
            .await
            .expect("cleanup product");
    }
}

#[tokio::test]
async fn saved_scan_answers_created() {
    let Some(pool) = test_pool().await else {
        eprintln!("skipping: no database configured");
        return;
    };
    let config = AppConfig::from_lookup(|key| {
        (key == "DATABASE_URL").then(|| "postgres://unused/skinlab".to_string())
    })
    .expect("config");
    let app = Router::new()
        .nest("/api", create_api_router())
        .with_state(AppState::new(pool.clone(), config));

    let body = json!({
        "scores": {
            "acne": 70.0,
            "blackheads": 10.0,
            "clear_skin": 10.0,
            "dark_spots": 5.0,
            "puffy_eyes": 3.0,
            "wrinkles": 2.0
        },
        "skinType": "Acne"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/analysis/save-from-scan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let payload: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(payload["data"]["dominant_condition"], "acne");
    assert_eq!(payload["data"]["skin_type"], "Acne");

    let id = payload["data"]["id"].as_i64().expect("log id");
    Query::table("analysis_logs")
        .delete()
        .eq("id", id)
        .execute(&pool)
        .await
        .expect("cleanup log");
}
