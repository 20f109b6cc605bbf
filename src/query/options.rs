//! # Query Options
//!
//! Translates a raw mapping of string query parameters into the
//! directive set executed by the store: filter, sort chain, field
//! projection, and pagination. The translation is total: malformed
//! input falls back to documented defaults instead of erroring.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use super::filter::{compare_values, FilterExpr, FilterOperator, FilterSet};

/// Default page when `page` is missing or malformed.
pub const DEFAULT_PAGE: usize = 1;

/// Default limit when `limit` is missing or malformed.
pub const DEFAULT_LIMIT: usize = 100;

/// Control keys that never become filter expressions.
pub const RESERVED_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// Identity field, always included in projections.
const ID_FIELD: &str = "id";

/// Internal version field, never selectable.
const REV_FIELD: &str = "__rev";

/// One key of a sort chain. Earlier keys win; later keys break ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// The composed, request-scoped query directive set.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Filter predicate built from non-reserved parameters.
    pub filter: FilterSet,

    /// Sort chain. Defaults to newest-first by creation time.
    pub sort: Vec<SortKey>,

    /// Projection: `None` returns all fields (minus internal ones).
    pub fields: Option<Vec<String>>,

    /// 1-based page number.
    pub page: usize,

    /// Page size. No upper bound is enforced.
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            filter: FilterSet::new(),
            sort: vec![SortKey::desc("createdAt")],
            fields: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryOptions {
    /// Translate raw query parameters.
    ///
    /// Applied in fixed order: filter, sort, field limiting,
    /// pagination. Reserved keys (`page`, `sort`, `limit`, `fields`)
    /// are consumed by their stage and never reach the filter.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut options = QueryOptions::default();

        for (key, value) in params {
            match key.as_str() {
                "sort" => {
                    if let Some(sort) = parse_sort(value) {
                        options.sort = sort;
                    }
                }
                "fields" => {
                    options.fields = parse_fields(value);
                }
                "page" => {
                    options.page = parse_positive(value, DEFAULT_PAGE);
                }
                "limit" => {
                    options.limit = parse_positive(value, DEFAULT_LIMIT);
                }
                _ => {
                    options.filter.exprs.push(parse_filter(key, value));
                }
            }
        }

        options
    }

    /// Number of documents skipped before the page window.
    ///
    /// Saturating: an absurdly large page or limit skips past every
    /// document instead of overflowing.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Builder-style filter addition, used by preset views and tests.
    pub fn with_filter(mut self, expr: FilterExpr) -> Self {
        self.filter.exprs.push(expr);
        self
    }
}

/// Parse `sort=-a,b` into a sort chain. Leading `-` means descending.
/// Returns `None` when no usable field remains.
fn parse_sort(value: &str) -> Option<Vec<SortKey>> {
    let keys: Vec<SortKey> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "-")
        .map(|part| match part.strip_prefix('-') {
            Some(field) => SortKey::desc(field),
            None => SortKey::asc(part),
        })
        .collect();

    if keys.is_empty() {
        None
    } else {
        Some(keys)
    }
}

/// Parse `fields=name,price` into a projection. The identity field is
/// always included even if omitted.
fn parse_fields(value: &str) -> Option<Vec<String>> {
    let mut fields: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != REV_FIELD)
        .map(|part| part.to_string())
        .collect();

    if fields.is_empty() {
        return None;
    }

    if !fields.iter().any(|f| f == ID_FIELD) {
        fields.push(ID_FIELD.to_string());
    }

    Some(fields)
}

/// Coerce a page/limit string to a positive integer, falling back to
/// the stage default on anything missing, non-numeric, or < 1.
fn parse_positive(value: &str, default: usize) -> usize {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n,
        _ => default,
    }
}

/// Parse one non-reserved parameter into a filter expression.
///
/// Value syntax `op:value` selects a comparison operator; an unknown
/// prefix (or no prefix) means equality on the whole value.
fn parse_filter(field: &str, value: &str) -> FilterExpr {
    if let Some((prefix, rest)) = value.split_once(':') {
        if let Some(op) = FilterOperator::parse(prefix) {
            return FilterExpr::new(field, op, coerce_value(rest));
        }
    }

    FilterExpr::eq(field, coerce_value(value))
}

/// Coerce a raw string into the closest JSON scalar.
fn coerce_value(value: &str) -> Value {
    if value == "true" {
        return Value::Bool(true);
    }
    if value == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }
    Value::String(value.to_string())
}

/// Sort documents in place by a sort key chain.
///
/// Stable; missing fields sort before present ones, values of
/// different types order by type (null < bool < number < string).
pub fn sort_documents(docs: &mut [Value], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }

    docs.sort_by(|a, b| {
        for key in keys {
            let ordering = compare_fields(a.get(&key.field), b.get(&key.field));
            let ordering = if key.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Compare two optional field values for sorting.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            compare_values(a_val, b_val).unwrap_or(Ordering::Equal)
        }
    }
}
