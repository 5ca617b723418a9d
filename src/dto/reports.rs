use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::routes::params::Pagination;

/// Inclusive day range; either end may be open.
#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRange {
    #[serde(alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate")]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    /// First instant of `start_date`, in UTC.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Last microsecond of `end_date`, in UTC.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.and_hms_micro_opt(23, 59, 59, 999_999))
            .map(|dt| dt.and_utc())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    #[serde(alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate")]
    pub end_date: Option<NaiveDate>,
    pub condition: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl LogQuery {
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConditionCount {
    pub condition: String,
    pub count: u64,
    /// Share of all analyses, two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductCount {
    pub product_id: i64,
    pub name: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSummary {
    pub total_analyses: u64,
    pub condition_distribution: Vec<ConditionCount>,
    pub top_recommended_products: Vec<ProductCount>,
}
