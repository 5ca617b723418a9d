use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use skinlab_api::{
    export::{
        ReportData,
        document::render_pdf,
        spreadsheet::render_xlsx,
        summarize,
        tabular::{CSV_HEADER, render_csv, render_json},
    },
    models::{AnalysisLog, ProductWithRefs, SkinType},
};

fn log(id: i64, user: &str, condition: &str, products: &str, day: u32) -> AnalysisLog {
    serde_json::from_value(json!({
        "id": id,
        "user_name": user,
        "user_email": null,
        "user_phone": null,
        "user_age": 25,
        "acne_score": 10.0,
        "blackheads_score": 5.0,
        "clear_skin_score": 70.0,
        "dark_spots_score": 5.0,
        "puffy_eyes_score": 5.0,
        "wrinkles_score": 5.0,
        "dominant_condition": condition,
        "recommended_product_ids": products,
        "created_at": format!("2024-03-{day:02}T10:30:00Z"),
    }))
    .expect("log fixture")
}

fn product(id: i64, name: &str, brand: Option<&str>) -> ProductWithRefs {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "brand_id": brand.map(|_| 1),
        "category_id": null,
        "description": null,
        "image_url": null,
        "w_acne": 0.5,
        "created_at": "2024-01-01T00:00:00Z",
        "brands": brand.map(|b| json!({ "id": 1, "name": b })),
        "product_categories": null,
    }))
    .expect("product fixture")
}

fn skin_type(id: i64, name: &str) -> SkinType {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "description": null,
        "created_at": "2024-01-01T00:00:00Z",
    }))
    .expect("skin type fixture")
}

fn fixture() -> ReportData {
    ReportData {
        logs: vec![
            log(4, "Dina", "acne", "2,1", 4),
            log(3, "", "acne", "99", 3),
            log(2, "Budi", "wrinkles", "1,3", 2),
            log(1, "Ayu", "clear_skin", "", 1),
        ],
        products: vec![
            product(1, "Hydrating Face Wash", Some("MoistureGlow")),
            product(2, "Acne Control Serum", None),
            product(3, "Retinol Night Cream", Some("AgeLess")),
        ],
        skin_types: vec![skin_type(1, "acne"), skin_type(2, "wrinkles")],
    }
}

#[tokio::test]
async fn csv_lists_one_row_per_log() {
    let file = render_csv(&fixture()).expect("csv");
    assert_eq!(file.filename, "face_analysis_report.csv");
    assert!(file.content_type.starts_with("text/csv"));

    let text = String::from_utf8(file.bytes).expect("utf-8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert_eq!(lines[1], "4,2024-03-04,acne,Acne Control Serum,Dina");
    assert_eq!(lines[2], "3,2024-03-03,acne,Unknown,Guest");
    assert_eq!(lines[3], "2,2024-03-02,wrinkles,Hydrating Face Wash,Budi");
    assert_eq!(lines[4], "1,2024-03-01,clear_skin,Unknown,Ayu");
    assert_eq!(lines.len(), 5);
}

#[tokio::test]
async fn json_export_carries_metadata_counts() {
    let exported_at = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    let file = render_json(&fixture(), exported_at).expect("json");
    assert_eq!(file.filename, "face_analysis_report.json");

    let document: Value = serde_json::from_slice(&file.bytes).expect("valid json");
    assert_eq!(document["metadata"]["total_logs"], 4);
    assert_eq!(document["metadata"]["total_products"], 3);
    assert_eq!(document["metadata"]["total_skin_types"], 2);
    assert_eq!(document["analysis_logs"].as_array().map(Vec::len), Some(4));
    assert_eq!(document["products"][0]["brands"]["name"], "MoistureGlow");
    assert_eq!(document["products"][0]["w_acne"], 0.5);
}

#[tokio::test]
async fn xlsx_export_is_a_zip_workbook() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    let file = render_xlsx(&fixture(), generated_at).expect("xlsx");

    assert!(file.bytes.starts_with(b"PK"));
    assert_eq!(
        file.filename,
        format!("analysis-report-{}.xlsx", generated_at.timestamp_millis())
    );
}

#[tokio::test]
async fn pdf_export_renders_a_document() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    let file = render_pdf(&fixture(), generated_at).expect("pdf");

    assert!(file.bytes.starts_with(b"%PDF"));
    assert_eq!(file.content_type, "application/pdf");
}

#[tokio::test]
async fn pdf_export_handles_no_logs() {
    let generated_at = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    let file = render_pdf(&ReportData::default(), generated_at).expect("pdf");
    assert!(file.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn summary_counts_conditions_and_products() {
    let summary = summarize(&fixture());
    assert_eq!(summary.total_analyses, 4);

    let distribution: Vec<(&str, u64, f64)> = summary
        .condition_distribution
        .iter()
        .map(|c| (c.condition.as_str(), c.count, c.percentage))
        .collect();
    assert_eq!(
        distribution,
        vec![
            ("acne", 2, 50.0),
            ("clear_skin", 1, 25.0),
            ("wrinkles", 1, 25.0),
        ]
    );

    let top: Vec<(i64, Option<&str>, u64)> = summary
        .top_recommended_products
        .iter()
        .map(|p| (p.product_id, p.name.as_deref(), p.count))
        .collect();
    assert_eq!(
        top,
        vec![
            (1, Some("Hydrating Face Wash"), 2),
            (2, Some("Acne Control Serum"), 1),
            (3, Some("Retinol Night Cream"), 1),
            (99, None, 1),
        ]
    );
}

#[tokio::test]
async fn percentages_round_to_two_decimals() {
    let data = ReportData {
        logs: vec![
            log(1, "A", "acne", "", 1),
            log(2, "B", "acne", "", 1),
            log(3, "C", "dark_spots", "", 1),
        ],
        ..Default::default()
    };
    let summary = summarize(&data);
    assert_eq!(summary.condition_distribution[0].percentage, 66.67);
    assert_eq!(summary.condition_distribution[1].percentage, 33.33);
}

#[tokio::test]
async fn empty_report_has_no_distribution() {
    let summary = summarize(&ReportData::default());
    assert_eq!(summary.total_analyses, 0);
    assert!(summary.condition_distribution.is_empty());
    assert!(summary.top_recommended_products.is_empty());
}
