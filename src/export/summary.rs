use std::collections::HashMap;

use super::ReportData;
use crate::{
    dto::reports::{ConditionCount, ProductCount, ReportSummary},
    models::AnalysisLog,
    skin::SkinCondition,
};

const TOP_PRODUCTS: usize = 5;

/// Per-condition counts, most frequent first. Ties follow label order, with
/// unknown labels last.
pub fn condition_distribution(logs: &[AnalysisLog]) -> Vec<ConditionCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for log in logs {
        *counts.entry(log.dominant_condition.as_str()).or_default() += 1;
    }

    let total = logs.len() as f64;
    let rank = |label: &str| {
        label
            .parse::<SkinCondition>()
            .map(|c| c.index())
            .unwrap_or(usize::MAX)
    };

    let mut distribution: Vec<ConditionCount> = counts
        .into_iter()
        .map(|(condition, count)| ConditionCount {
            condition: condition.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| rank(&a.condition).cmp(&rank(&b.condition)))
            .then_with(|| a.condition.cmp(&b.condition))
    });
    distribution
}

fn percentage(count: u64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (count as f64 / total * 10_000.0).round() / 100.0
}

pub fn summarize(data: &ReportData) -> ReportSummary {
    let mut product_counts: HashMap<i64, u64> = HashMap::new();
    for log in &data.logs {
        for id in log.product_ids() {
            *product_counts.entry(id).or_default() += 1;
        }
    }

    let mut top: Vec<(i64, u64)> = product_counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ReportSummary {
        total_analyses: data.logs.len() as u64,
        condition_distribution: condition_distribution(&data.logs),
        top_recommended_products: top
            .into_iter()
            .take(TOP_PRODUCTS)
            .map(|(product_id, count)| ProductCount {
                product_id,
                name: data.product_name(product_id).map(str::to_string),
                count,
            })
            .collect(),
    }
}
