//! # Filter Expression AST
//!
//! Represents the filter predicate of a translated query. Filters are
//! matched directly against JSON documents.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison operators accepted in query parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,
    /// Not equals
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
}

impl FilterOperator {
    /// Parse an operator keyword as it appears in a query value prefix.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(FilterOperator::Eq),
            "ne" => Some(FilterOperator::Ne),
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            _ => None,
        }
    }

    /// Get the operator keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
        }
    }
}

/// A single field comparison.
#[derive(Debug, Clone)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    /// Create a new filter expression.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create a greater-or-equal filter.
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gte, value)
    }

    /// Create a less-than filter.
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Lt, value)
    }

    /// Check whether a document matches this filter.
    ///
    /// A document without the field only matches `Ne`.
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = match doc.get(&self.field) {
            Some(v) => v,
            None => return self.operator == FilterOperator::Ne,
        };

        match self.operator {
            FilterOperator::Eq => values_equal(field_value, &self.value),
            FilterOperator::Ne => !values_equal(field_value, &self.value),
            FilterOperator::Gt => {
                compare_values(field_value, &self.value) == Some(Ordering::Greater)
            }
            FilterOperator::Gte => matches!(
                compare_values(field_value, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lt => compare_values(field_value, &self.value) == Some(Ordering::Less),
            FilterOperator::Lte => matches!(
                compare_values(field_value, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

/// Value equality for filtering. Scalars compare by order so integer
/// and float representations of the same number are equal; non-scalar
/// types fall back to structural equality.
fn values_equal(a: &Value, b: &Value) -> bool {
    match compare_values(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// Compare two JSON values for ordering.
///
/// Numbers compare as f64, strings and booleans by natural order.
/// Mixed or non-scalar types are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a_f = a.as_f64()?;
            let b_f = b.as_f64()?;
            a_f.partial_cmp(&b_f)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A set of filters combined with AND logic.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub exprs: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, expr: FilterExpr) -> Self {
        self.exprs.push(expr);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Check whether a document matches all filters.
    pub fn matches(&self, doc: &Value) -> bool {
        self.exprs.iter().all(|f| f.matches(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("difficulty", json!("easy"));

        assert!(filter.matches(&json!({"difficulty": "easy"})));
        assert!(!filter.matches(&json!({"difficulty": "medium"})));
    }

    #[test]
    fn test_eq_matches_across_numeric_representations() {
        let filter = FilterExpr::eq("price", json!(397));
        assert!(filter.matches(&json!({"price": 397.0})));

        let float_filter = FilterExpr::eq("price", json!(397.0));
        assert!(float_filter.matches(&json!({"price": 397})));

        let ne = FilterExpr::new("price", FilterOperator::Ne, json!(397));
        assert!(!ne.matches(&json!({"price": 397.0})));
        assert!(ne.matches(&json!({"price": 398.0})));
    }

    #[test]
    fn test_gte_filter() {
        let filter = FilterExpr::gte("ratingsAverage", json!(4.5));

        assert!(filter.matches(&json!({"ratingsAverage": 4.7})));
        assert!(filter.matches(&json!({"ratingsAverage": 4.5})));
        assert!(!filter.matches(&json!({"ratingsAverage": 4.4})));
    }

    #[test]
    fn test_lt_filter_on_strings() {
        let filter = FilterExpr::lt("startDates", json!("2031-01-01"));

        assert!(filter.matches(&json!({"startDates": "2030-12-31T23:00:00Z"})));
        assert!(!filter.matches(&json!({"startDates": "2031-06-01T09:00:00Z"})));
    }

    #[test]
    fn test_missing_field_matches_only_ne() {
        let eq = FilterExpr::eq("price", json!(100));
        let ne = FilterExpr::new("price", FilterOperator::Ne, json!(100));

        assert!(!eq.matches(&json!({"name": "Forest Hiker"})));
        assert!(ne.matches(&json!({"name": "Forest Hiker"})));
    }

    #[test]
    fn test_mixed_types_do_not_compare() {
        let filter = FilterExpr::gte("price", json!(100));
        assert!(!filter.matches(&json!({"price": "cheap"})));
    }

    #[test]
    fn test_filter_set() {
        let filters = FilterSet::new()
            .and(FilterExpr::eq("difficulty", json!("easy")))
            .and(FilterExpr::gte("price", json!(200)));

        assert!(filters.matches(&json!({"difficulty": "easy", "price": 250})));
        assert!(!filters.matches(&json!({"difficulty": "hard", "price": 250})));
        assert!(!filters.matches(&json!({"difficulty": "easy", "price": 150})));
    }
}
