//! # Tour Model
//!
//! The catalog document: validated on create, and re-validated as a
//! whole after every partial update merge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::date_of;

use super::ValidationError;

/// Difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

/// A tour document. Unknown fields in request bodies are dropped by
/// round-tripping through this type; store-managed fields (`id`,
/// `createdAt`) are ignored on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub name: String,

    pub price: f64,

    #[serde(default = "default_ratings_average")]
    pub ratings_average: f64,

    #[serde(default)]
    pub ratings_quantity: u64,

    pub summary: String,

    pub difficulty: Difficulty,

    /// RFC 3339 date strings.
    #[serde(default)]
    pub start_dates: Vec<String>,
}

fn default_ratings_average() -> f64 {
    4.5
}

impl Tour {
    /// Deserialize and validate a JSON body.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        let tour: Tour = serde_json::from_value(value.clone())
            .map_err(|e| ValidationError::new("body", e.to_string()))?;
        tour.validate()?;
        Ok(tour)
    }

    /// Field-level constraints beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "A tour must have a name"));
        }
        if self.price <= 0.0 {
            return Err(ValidationError::new("price", "Price must be above 0"));
        }
        if !(1.0..=5.0).contains(&self.ratings_average) {
            return Err(ValidationError::new(
                "ratingsAverage",
                "Rating must be between 1.0 and 5.0",
            ));
        }
        if self.summary.trim().is_empty() {
            return Err(ValidationError::new(
                "summary",
                "A tour must have a summary",
            ));
        }
        for date in &self.start_dates {
            if date_of(date).is_none() {
                return Err(ValidationError::new(
                    "startDates",
                    format!("'{}' is not a valid date", date),
                ));
            }
        }
        Ok(())
    }

    /// Canonical JSON form: defaults applied, unknown fields dropped.
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "The Forest Hiker",
            "price": 397.0,
            "summary": "Breathtaking hike through the Canadian Banff National Park",
            "difficulty": "easy",
            "startDates": ["2030-04-25T09:00:00Z"]
        })
    }

    #[test]
    fn test_parse_applies_defaults() {
        let tour = Tour::parse(&valid_body()).unwrap();
        assert_eq!(tour.ratings_average, 4.5);
        assert_eq!(tour.ratings_quantity, 0);
    }

    #[test]
    fn test_parse_drops_unknown_fields() {
        let mut body = valid_body();
        body["internalNote"] = json!("should not persist");

        let doc = Tour::parse(&body).unwrap().to_document();
        assert!(doc.get("internalNote").is_none());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("price");

        let err = Tour::parse(&body).unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut body = valid_body();
        body["price"] = json!(0);

        let err = Tour::parse(&body).unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let mut body = valid_body();
        body["difficulty"] = json!("impossible");

        assert!(Tour::parse(&body).is_err());
    }

    #[test]
    fn test_bad_start_date_is_rejected() {
        let mut body = valid_body();
        body["startDates"] = json!(["soon"]);

        let err = Tour::parse(&body).unwrap_err();
        assert_eq!(err.field, "startDates");
    }

    #[test]
    fn test_rating_range() {
        let mut body = valid_body();
        body["ratingsAverage"] = json!(5.5);

        let err = Tour::parse(&body).unwrap_err();
        assert_eq!(err.field, "ratingsAverage");
    }
}
