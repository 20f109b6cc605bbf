//! # Fixed Aggregation Reports
//!
//! The two analytical reports over the tours collection, expressed as
//! aggregation pipelines: statistics by difficulty tier and the
//! monthly start-date plan for a year.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::pipeline::{Accumulator, GroupKey, GroupSpec, Stage};
use crate::query::{FilterExpr, FilterSet, SortKey};

/// Minimum rating a tour needs to enter the stats report.
pub const STATS_MIN_RATING: f64 = 4.5;

/// Maximum number of rows in the monthly plan (one per month).
pub const PLAN_MAX_ROWS: usize = 12;

/// One row of the difficulty-tier report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: String,
    pub num_tours: u64,
    pub num_ratings: f64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// One row of the monthly plan report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlanRow {
    pub month: u32,
    pub num_tour_starts: u64,
    pub tours: Vec<String>,
}

/// Stats by difficulty tier: tours rated at least 4.5, grouped by
/// uppercased difficulty, sorted by ascending average price.
pub fn stats_pipeline() -> Vec<Stage> {
    vec![
        Stage::Match(
            FilterSet::new().and(FilterExpr::gte("ratingsAverage", json!(STATS_MIN_RATING))),
        ),
        Stage::Group(GroupSpec {
            key: GroupKey::UpperField("difficulty".to_string()),
            key_name: "difficulty".to_string(),
            fields: vec![
                ("numTours".to_string(), Accumulator::Count),
                (
                    "numRatings".to_string(),
                    Accumulator::Sum("ratingsQuantity".to_string()),
                ),
                (
                    "avgRating".to_string(),
                    Accumulator::Avg("ratingsAverage".to_string()),
                ),
                ("avgPrice".to_string(), Accumulator::Avg("price".to_string())),
                ("minPrice".to_string(), Accumulator::Min("price".to_string())),
                ("maxPrice".to_string(), Accumulator::Max("price".to_string())),
            ],
        }),
        Stage::Sort(vec![SortKey::asc("avgPrice")]),
    ]
}

/// Monthly plan for one year: start dates expanded one per row,
/// bucketed by calendar month, busiest months first.
///
/// The year window is `[Y-01-01, (Y+1)-01-01)` so starts late on
/// December 31 stay inside the year.
pub fn monthly_plan_pipeline(year: i32) -> Vec<Stage> {
    let from = format!("{}-01-01", year);
    let until = format!("{}-01-01", year + 1);

    vec![
        Stage::Unwind("startDates".to_string()),
        Stage::Match(
            FilterSet::new()
                .and(FilterExpr::gte("startDates", json!(from)))
                .and(FilterExpr::lt("startDates", json!(until))),
        ),
        Stage::Group(GroupSpec {
            key: GroupKey::Month("startDates".to_string()),
            key_name: "month".to_string(),
            fields: vec![
                ("numTourStarts".to_string(), Accumulator::Count),
                ("tours".to_string(), Accumulator::Push("name".to_string())),
            ],
        }),
        Stage::Sort(vec![SortKey::desc("numTourStarts")]),
        Stage::Limit(PLAN_MAX_ROWS),
    ]
}
