//! # Response Envelope
//!
//! The fixed outer JSON shape wrapping every success response:
//! `{status, results?, data: {<resource>: <payload>}}`.

use serde::Serialize;
use serde_json::{json, Value};

/// Success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: &'static str,

    /// List responses carry the number of returned records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,

    /// Payload keyed by resource name.
    pub data: Value,
}

impl Envelope {
    /// Wrap a single record under its resource name.
    pub fn single(resource: &str, payload: Value) -> Self {
        Self {
            status: "success",
            results: None,
            data: json!({ resource: payload }),
        }
    }

    /// Wrap a record list under its resource name, with a count.
    pub fn list(resource: &str, payload: Vec<Value>) -> Self {
        Self {
            status: "success",
            results: Some(payload.len()),
            data: json!({ resource: payload }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_envelope_shape() {
        let envelope = Envelope::single("tour", json!({"name": "x"}));
        let body = serde_json::to_value(&envelope).unwrap();

        assert_eq!(body["status"], json!("success"));
        assert_eq!(body["data"]["tour"]["name"], json!("x"));
        assert!(body.get("results").is_none());
    }

    #[test]
    fn test_list_envelope_counts_results() {
        let envelope = Envelope::list("tours", vec![json!({"a": 1}), json!({"a": 2})]);
        let body = serde_json::to_value(&envelope).unwrap();

        assert_eq!(body["results"], json!(2));
        assert_eq!(body["data"]["tours"].as_array().unwrap().len(), 2);
    }
}
