use serde_json::{Map, Value};

/// Separator between path segments in joined column aliases,
/// e.g. `products__brands__name`.
pub const NEST_SEPARATOR: &str = "__";

const WEIGHT_COLUMNS: [&str; 6] = [
    "w_acne",
    "w_blackheads",
    "w_clear_skin",
    "w_dark_spots",
    "w_puffy_eyes",
    "w_wrinkles",
];

/// The join shapes the translator knows how to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `products` with its brand and category names.
    ProductRefs,
    /// `product_ingredients` with the linked ingredient row.
    ProductIngredients,
    /// `rules` with the linked product, including brand and category.
    RuleProducts,
}

/// One joined column: the qualified source and the alias path it lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedColumn {
    pub table: &'static str,
    pub column: &'static str,
    pub alias: String,
}

impl JoinedColumn {
    fn new(table: &'static str, column: &'static str, path: &[&str]) -> Self {
        let mut alias = path.join(NEST_SEPARATOR);
        alias.push_str(NEST_SEPARATOR);
        alias.push_str(column);
        Self {
            table,
            column,
            alias,
        }
    }
}

impl Relation {
    /// Table the relation has to be started from.
    pub fn base_table(&self) -> &'static str {
        match self {
            Relation::ProductRefs => "products",
            Relation::ProductIngredients => "product_ingredients",
            Relation::RuleProducts => "rules",
        }
    }

    pub fn from_clause(&self) -> &'static str {
        match self {
            Relation::ProductRefs => {
                r#""products" LEFT JOIN "brands" ON "products"."brand_id" = "brands"."id" LEFT JOIN "product_categories" ON "products"."category_id" = "product_categories"."id""#
            }
            Relation::ProductIngredients => {
                r#""product_ingredients" LEFT JOIN "ingredients" ON "product_ingredients"."ingredient_id" = "ingredients"."id""#
            }
            Relation::RuleProducts => {
                r#""rules" LEFT JOIN "products" ON "rules"."product_id" = "products"."id" LEFT JOIN "brands" ON "products"."brand_id" = "brands"."id" LEFT JOIN "product_categories" ON "products"."category_id" = "product_categories"."id""#
            }
        }
    }

    pub fn joined_columns(&self) -> Vec<JoinedColumn> {
        match self {
            Relation::ProductRefs => vec![
                JoinedColumn::new("brands", "id", &["brands"]),
                JoinedColumn::new("brands", "name", &["brands"]),
                JoinedColumn::new("product_categories", "id", &["product_categories"]),
                JoinedColumn::new("product_categories", "name", &["product_categories"]),
            ],
            Relation::ProductIngredients => ["id", "name", "effect"]
                .into_iter()
                .chain(WEIGHT_COLUMNS)
                .chain(["created_at"])
                .map(|c| JoinedColumn::new("ingredients", c, &["ingredients"]))
                .collect(),
            Relation::RuleProducts => {
                let mut cols: Vec<JoinedColumn> = [
                    "id",
                    "name",
                    "brand_id",
                    "category_id",
                    "description",
                    "image_url",
                ]
                .into_iter()
                .chain(WEIGHT_COLUMNS)
                .chain(["created_at"])
                .map(|c| JoinedColumn::new("products", c, &["products"]))
                .collect();
                cols.extend([
                    JoinedColumn::new("brands", "id", &["products", "brands"]),
                    JoinedColumn::new("brands", "name", &["products", "brands"]),
                    JoinedColumn::new("product_categories", "id", &["products", "product_categories"]),
                    JoinedColumn::new("product_categories", "name", &["products", "product_categories"]),
                ]);
                cols
            }
        }
    }
}

/// Fold `a__b__c` keys of a flat row into nested objects.
///
/// A nested object whose leaves are all null (an unmatched LEFT JOIN)
/// collapses to `null`.
pub fn nest_row(row: Value) -> Value {
    let Value::Object(flat) = row else {
        return row;
    };

    let mut out = Map::new();
    for (key, value) in flat {
        if !key.contains(NEST_SEPARATOR) {
            out.insert(key, value);
            continue;
        }
        let path: Vec<&str> = key.split(NEST_SEPARATOR).collect();
        insert_path(&mut out, &path, value);
    }

    collapse_nulls(Value::Object(out), true)
}

fn insert_path(target: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            target.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

fn collapse_nulls(value: Value, is_root: bool) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| {
                    let v = if v.is_object() { collapse_nulls(v, false) } else { v };
                    (k, v)
                })
                .collect();
            if !is_root && !map.is_empty() && map.values().all(Value::is_null) {
                Value::Null
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}
