//! # Aggregation Pipeline
//!
//! An ordered sequence of transform stages (match, unwind, group,
//! sort, limit) executed over a vector of JSON documents to produce
//! summary rows. The two fixed reports are built from these stages.

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

use crate::query::{sort_documents, FilterSet, SortKey};

/// How the group key is derived from a document.
#[derive(Debug, Clone)]
pub enum GroupKey {
    /// The field value as-is.
    Field(String),
    /// The field's string value, uppercased.
    UpperField(String),
    /// Calendar month (1-12) of an RFC 3339 / ISO date string field.
    Month(String),
}

impl GroupKey {
    /// Evaluate the key for one document. Documents without a usable
    /// key are dropped from the grouping.
    fn eval(&self, doc: &Value) -> Option<Value> {
        match self {
            GroupKey::Field(field) => doc.get(field).cloned(),
            GroupKey::UpperField(field) => doc
                .get(field)
                .and_then(Value::as_str)
                .map(|s| Value::String(s.to_uppercase())),
            GroupKey::Month(field) => {
                let raw = doc.get(field)?.as_str()?;
                let month = date_of(raw)?.month();
                Some(Value::Number(month.into()))
            }
        }
    }
}

/// Per-group reduction over a field.
#[derive(Debug, Clone)]
pub enum Accumulator {
    /// Number of documents in the group.
    Count,
    /// Sum of a numeric field.
    Sum(String),
    /// Average of a numeric field.
    Avg(String),
    /// Minimum of a numeric field.
    Min(String),
    /// Maximum of a numeric field.
    Max(String),
    /// All values of a field, in document order.
    Push(String),
}

/// A group stage: key derivation plus named accumulator outputs.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    /// Key derivation.
    pub key: GroupKey,
    /// Output field the key is emitted under.
    pub key_name: String,
    /// Output field name paired with its accumulator.
    pub fields: Vec<(String, Accumulator)>,
}

/// One pipeline stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep documents matching the filter set.
    Match(FilterSet),
    /// Emit one document per element of an array field.
    Unwind(String),
    /// Reduce documents into one row per distinct key.
    Group(GroupSpec),
    /// Order rows by a sort key chain.
    Sort(Vec<SortKey>),
    /// Truncate to at most `n` rows.
    Limit(usize),
}

/// Execute a pipeline over a document vector.
pub fn execute(docs: Vec<Value>, stages: &[Stage]) -> Vec<Value> {
    let mut rows = docs;

    for stage in stages {
        rows = match stage {
            Stage::Match(filter) => rows.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::Unwind(field) => unwind(rows, field),
            Stage::Group(spec) => group(rows, spec),
            Stage::Sort(keys) => {
                sort_documents(&mut rows, keys);
                rows
            }
            Stage::Limit(n) => {
                rows.truncate(*n);
                rows
            }
        };
    }

    rows
}

/// Parse the date part of an RFC 3339 / ISO 8601 string.
pub fn date_of(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn unwind(docs: Vec<Value>, field: &str) -> Vec<Value> {
    let mut out = Vec::new();

    for doc in docs {
        let Some(Value::Array(items)) = doc.get(field) else {
            continue;
        };
        for item in items.clone() {
            let mut expanded = doc.clone();
            if let Some(obj) = expanded.as_object_mut() {
                obj.insert(field.to_string(), item);
            }
            out.push(expanded);
        }
    }

    out
}

fn group(docs: Vec<Value>, spec: &GroupSpec) -> Vec<Value> {
    // First-seen key order keeps output deterministic before a sort stage.
    let mut keys: Vec<Value> = Vec::new();
    let mut buckets: Vec<Vec<Value>> = Vec::new();

    for doc in docs {
        let Some(key) = spec.key.eval(&doc) else {
            continue;
        };
        match keys.iter().position(|k| *k == key) {
            Some(idx) => buckets[idx].push(doc),
            None => {
                keys.push(key);
                buckets.push(vec![doc]);
            }
        }
    }

    keys.into_iter()
        .zip(buckets)
        .map(|(key, members)| {
            let mut row = Map::new();
            row.insert(spec.key_name.clone(), key);
            for (name, acc) in &spec.fields {
                row.insert(name.clone(), accumulate(acc, &members));
            }
            Value::Object(row)
        })
        .collect()
}

fn accumulate(acc: &Accumulator, members: &[Value]) -> Value {
    match acc {
        Accumulator::Count => Value::Number(members.len().into()),
        Accumulator::Sum(field) => number(numeric_values(members, field).iter().sum()),
        Accumulator::Avg(field) => {
            let values = numeric_values(members, field);
            if values.is_empty() {
                Value::Null
            } else {
                number(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        Accumulator::Min(field) => numeric_values(members, field)
            .into_iter()
            .fold(None, |min: Option<f64>, v| {
                Some(min.map_or(v, |m| m.min(v)))
            })
            .map_or(Value::Null, number),
        Accumulator::Max(field) => numeric_values(members, field)
            .into_iter()
            .fold(None, |max: Option<f64>, v| {
                Some(max.map_or(v, |m| m.max(v)))
            })
            .map_or(Value::Null, number),
        Accumulator::Push(field) => Value::Array(
            members
                .iter()
                .filter_map(|doc| doc.get(field).cloned())
                .collect(),
        ),
    }
}

fn numeric_values(members: &[Value], field: &str) -> Vec<f64> {
    members
        .iter()
        .filter_map(|doc| doc.get(field).and_then(Value::as_f64))
        .collect()
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterExpr;
    use serde_json::json;

    fn tours() -> Vec<Value> {
        vec![
            json!({
                "name": "Forest Hiker",
                "difficulty": "easy",
                "price": 10.0,
                "ratingsAverage": 4.7,
                "ratingsQuantity": 30,
                "startDates": ["2030-03-10T09:00:00Z", "2030-07-01T09:00:00Z"]
            }),
            json!({
                "name": "Sea Explorer",
                "difficulty": "easy",
                "price": 20.0,
                "ratingsAverage": 4.8,
                "ratingsQuantity": 20,
                "startDates": ["2030-03-22T09:00:00Z"]
            }),
            json!({
                "name": "City Stroll",
                "difficulty": "medium",
                "price": 40.0,
                "ratingsAverage": 4.2,
                "ratingsQuantity": 5,
                "startDates": ["2029-11-02T09:00:00Z"]
            }),
        ]
    }

    #[test]
    fn test_match_stage() {
        let stages = [Stage::Match(
            FilterSet::new().and(FilterExpr::gte("ratingsAverage", json!(4.5))),
        )];

        let rows = execute(tours(), &stages);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_unwind_expands_start_dates() {
        let stages = [Stage::Unwind("startDates".to_string())];

        let rows = execute(tours(), &stages);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["startDates"], json!("2030-03-10T09:00:00Z"));
        assert_eq!(rows[0]["name"], json!("Forest Hiker"));
    }

    #[test]
    fn test_unwind_skips_missing_field() {
        let docs = vec![json!({"name": "no dates"})];
        let rows = execute(docs, &[Stage::Unwind("startDates".to_string())]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_group_by_upper_field() {
        let stages = [Stage::Group(GroupSpec {
            key: GroupKey::UpperField("difficulty".to_string()),
            key_name: "difficulty".to_string(),
            fields: vec![
                ("numTours".to_string(), Accumulator::Count),
                ("avgPrice".to_string(), Accumulator::Avg("price".to_string())),
                ("minPrice".to_string(), Accumulator::Min("price".to_string())),
                ("maxPrice".to_string(), Accumulator::Max("price".to_string())),
            ],
        })];

        let rows = execute(tours(), &stages);
        let easy = rows
            .iter()
            .find(|r| r["difficulty"] == json!("EASY"))
            .unwrap();
        assert_eq!(easy["numTours"], json!(2));
        assert_eq!(easy["avgPrice"], json!(15.0));
        assert_eq!(easy["minPrice"], json!(10.0));
        assert_eq!(easy["maxPrice"], json!(20.0));
    }

    #[test]
    fn test_group_by_month_with_push() {
        let stages = [
            Stage::Unwind("startDates".to_string()),
            Stage::Group(GroupSpec {
                key: GroupKey::Month("startDates".to_string()),
                key_name: "month".to_string(),
                fields: vec![
                    ("numTourStarts".to_string(), Accumulator::Count),
                    ("tours".to_string(), Accumulator::Push("name".to_string())),
                ],
            }),
        ];

        let rows = execute(tours(), &stages);
        let march = rows.iter().find(|r| r["month"] == json!(3)).unwrap();
        assert_eq!(march["numTourStarts"], json!(2));
        assert_eq!(march["tours"], json!(["Forest Hiker", "Sea Explorer"]));
    }

    #[test]
    fn test_sort_and_limit_stages() {
        let stages = [
            Stage::Sort(vec![SortKey::asc("price")]),
            Stage::Limit(2),
        ];

        let rows = execute(tours(), &stages);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["price"], json!(10.0));
        assert_eq!(rows[1]["price"], json!(20.0));
    }

    #[test]
    fn test_date_of() {
        assert_eq!(
            date_of("2030-03-10T09:00:00Z").map(|d| d.month()),
            Some(3)
        );
        assert_eq!(date_of("2030-03-10").map(|d| d.month()), Some(3));
        assert!(date_of("not a date").is_none());
    }
}
