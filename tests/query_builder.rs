use serde_json::json;
use skinlab_api::query::{
    Query, QueryError, Record, Relation, SortOrder, SqlValue, relation::nest_row,
};

#[tokio::test]
async fn select_with_filters_order_and_paging() {
    let stmt = Query::table("analysis_logs")
        .eq("dominant_condition", "acne")
        .gte("user_age", 18_i64)
        .lte("user_age", 40_i64)
        .order("created_at", SortOrder::Desc)
        .limit(20)
        .offset(40)
        .statement()
        .expect("compiles");

    assert_eq!(
        stmt.sql,
        r#"SELECT * FROM "analysis_logs" WHERE "dominant_condition" = $1 AND "user_age" >= $2 AND "user_age" <= $3 ORDER BY "created_at" DESC LIMIT 20 OFFSET 40"#
    );
    assert_eq!(stmt.params.len(), 3);
    assert_eq!(stmt.placeholder_count(), stmt.params.len());
    assert!(stmt.returns_rows);
    assert!(!stmt.single);
}

#[tokio::test]
async fn placeholder_count_matches_bound_values() {
    let filter_sets: Vec<Vec<(&str, i64)>> = vec![
        vec![],
        vec![("id", 1)],
        vec![("brand_id", 2), ("category_id", 3)],
        vec![("id", 1), ("brand_id", 2), ("category_id", 3), ("id", 4)],
    ];

    for filters in filter_sets {
        let mut query = Query::table("products");
        for (column, value) in &filters {
            query = query.eq(column, *value);
        }
        let stmt = query.statement().expect("compiles");
        assert_eq!(stmt.params.len(), filters.len());
        assert_eq!(stmt.placeholder_count(), filters.len());
    }
}

#[tokio::test]
async fn single_forces_limit_one() {
    let stmt = Query::table("brands")
        .eq("id", 7_i64)
        .limit(50)
        .single()
        .statement()
        .expect("compiles");

    assert!(stmt.sql.ends_with("LIMIT 1"));
    assert!(!stmt.sql.contains("LIMIT 50"));
    assert!(stmt.single);
    assert_eq!(stmt.params, vec![SqlValue::Int(Some(7))]);
}

#[tokio::test]
async fn projection_is_quoted() {
    let stmt = Query::table("brands")
        .select("id, name")
        .statement()
        .expect("compiles");
    assert_eq!(stmt.sql, r#"SELECT "id", "name" FROM "brands""#);
}

#[tokio::test]
async fn insert_returns_rows_only_when_selected() {
    let record = Record::new().set("name", "Lumi").set("logo_url", None::<String>);

    let silent = Query::table("brands")
        .insert(record.clone())
        .statement()
        .expect("compiles");
    assert_eq!(
        silent.sql,
        r#"INSERT INTO "brands" ("name", "logo_url") VALUES ($1, $2)"#
    );
    assert!(!silent.returns_rows);

    let returning = Query::table("brands")
        .insert(record)
        .select("*")
        .single()
        .statement()
        .expect("compiles");
    assert_eq!(
        returning.sql,
        r#"INSERT INTO "brands" ("name", "logo_url") VALUES ($1, $2) RETURNING *"#
    );
    assert!(returning.returns_rows);
    assert_eq!(
        returning.params,
        vec![
            SqlValue::Text(Some("Lumi".into())),
            SqlValue::Text(None)
        ]
    );
    assert!(returning.json_sql().starts_with("WITH q AS (INSERT"));
}

#[tokio::test]
async fn update_numbers_set_values_before_filters() {
    let stmt = Query::table("rules")
        .update(Record::new().set("confidence_score", 0.5))
        .eq("id", 3_i64)
        .select("id, confidence_score")
        .statement()
        .expect("compiles");

    assert_eq!(
        stmt.sql,
        r#"UPDATE "rules" SET "confidence_score" = $1 WHERE "id" = $2 RETURNING "id", "confidence_score""#
    );
    assert_eq!(stmt.placeholder_count(), 2);
}

#[tokio::test]
async fn unfiltered_mutations_are_rejected() {
    let update = Query::table("rules")
        .update(Record::new().set("confidence_score", 1.0))
        .statement();
    assert!(matches!(update, Err(QueryError::UnfilteredMutation("UPDATE"))));

    let delete = Query::table("rules").delete().statement();
    assert!(matches!(delete, Err(QueryError::UnfilteredMutation("DELETE"))));

    let filtered = Query::table("rules").delete().eq("id", 1_i64).statement();
    assert_eq!(
        filtered.expect("compiles").sql,
        r#"DELETE FROM "rules" WHERE "id" = $1"#
    );
}

#[tokio::test]
async fn empty_insert_is_rejected() {
    let result = Query::table("brands").insert(Record::new()).statement();
    assert!(matches!(result, Err(QueryError::EmptyRecord)));
}

#[tokio::test]
async fn invalid_identifiers_are_rejected() {
    let cases = [
        Query::table("brands; DROP TABLE brands"),
        Query::table("brands").eq("name\" OR 1=1 --", "x"),
        Query::table("brands").order("a.b.c", SortOrder::Asc),
        Query::table("brands").select("id, 1name"),
    ];
    for query in cases {
        assert!(matches!(
            query.statement(),
            Err(QueryError::InvalidIdentifier(_))
        ));
    }
}

#[tokio::test]
async fn count_ignores_order_and_paging() {
    let stmt = Query::table("analysis_logs")
        .eq("dominant_condition", "wrinkles")
        .order("created_at", SortOrder::Desc)
        .limit(10)
        .offset(10)
        .count()
        .statement()
        .expect("compiles");

    assert_eq!(
        stmt.sql,
        r#"SELECT count(*) AS "count" FROM "analysis_logs" WHERE "dominant_condition" = $1"#
    );
    assert!(stmt.single);
}

#[tokio::test]
async fn product_refs_join_qualifies_columns() {
    let stmt = Query::table("products")
        .with(Relation::ProductRefs)
        .eq("id", 1_i64)
        .order("name", SortOrder::Asc)
        .statement()
        .expect("compiles");

    assert!(stmt.sql.starts_with(r#"SELECT "products".*, "brands"."id" AS "brands__id""#));
    assert!(stmt.sql.contains(r#"LEFT JOIN "brands" ON "products"."brand_id" = "brands"."id""#));
    assert!(stmt.sql.contains(r#"WHERE "products"."id" = $1"#));
    assert!(stmt.sql.ends_with(r#"ORDER BY "products"."name" ASC"#));
    assert_eq!(stmt.relation, Some(Relation::ProductRefs));
}

#[tokio::test]
async fn relation_must_match_table_and_select() {
    let mismatch = Query::table("brands").with(Relation::RuleProducts).statement();
    assert!(matches!(mismatch, Err(QueryError::RelationMismatch { .. })));

    let mutation = Query::table("rules")
        .with(Relation::RuleProducts)
        .delete()
        .eq("id", 1_i64)
        .statement();
    assert!(matches!(mutation, Err(QueryError::RelationOnMutation)));
}

#[tokio::test]
async fn nest_row_folds_aliases_and_nulls_unmatched_joins() {
    let row = json!({
        "id": 5,
        "product_id": 9,
        "products__id": 9,
        "products__name": "Hydrating Face Wash",
        "products__brands__id": 2,
        "products__brands__name": "MoistureGlow",
        "products__product_categories__id": null,
        "products__product_categories__name": null
    });

    let nested = nest_row(row);
    assert_eq!(
        nested,
        json!({
            "id": 5,
            "product_id": 9,
            "products": {
                "id": 9,
                "name": "Hydrating Face Wash",
                "brands": { "id": 2, "name": "MoistureGlow" },
                "product_categories": null
            }
        })
    );
}

#[tokio::test]
async fn json_wrapper_keeps_the_requested_order() {
    let logs = Query::table("analysis_logs")
        .order("created_at", SortOrder::Desc)
        .limit(5)
        .statement()
        .expect("compiles");
    assert_eq!(
        logs.json_sql(),
        r#"SELECT to_jsonb(q) FROM (SELECT * FROM "analysis_logs" ORDER BY "created_at" DESC LIMIT 5) AS q ORDER BY q."created_at" DESC"#
    );

    let rules = Query::table("rules")
        .with(Relation::RuleProducts)
        .eq("skin_type_id", 2_i64)
        .order("confidence_score", SortOrder::Desc)
        .limit(3)
        .statement()
        .expect("compiles");
    assert!(rules.json_sql().ends_with(r#"AS q ORDER BY q."confidence_score" DESC"#));
}

#[tokio::test]
async fn unprojected_order_column_stays_inside() {
    let stmt = Query::table("brands")
        .select("id, name")
        .order("created_at", SortOrder::Asc)
        .statement()
        .expect("compiles");
    assert!(stmt.json_sql().ends_with(") AS q"));

    let unordered = Query::table("brands").statement().expect("compiles");
    assert_eq!(
        unordered.json_sql(),
        r#"SELECT to_jsonb(q) FROM (SELECT * FROM "brands") AS q"#
    );
}
