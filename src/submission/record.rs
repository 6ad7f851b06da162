//! Wire-ready submission payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// A sanitized submission as it goes over the wire.
///
/// Only fields that carried a value are present. Once built it cannot be
/// changed; it is dropped after the request that carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmissionRecord(Map<String, Value>);

impl SubmissionRecord {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Collects fields, skipping the ones without a value.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    /// Always set, even when empty.
    pub fn required(mut self, field: &str, value: impl Into<String>) -> Self {
        self.fields.insert(field.to_string(), Value::String(value.into()));
        self
    }

    /// Set only when `value` is non-empty.
    pub fn text(mut self, field: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.fields.insert(field.to_string(), Value::String(value));
        }
        self
    }

    /// Set only when present and non-zero.
    pub fn count(mut self, field: &str, value: Option<u32>) -> Self {
        if let Some(n) = value.filter(|n| *n != 0) {
            self.fields.insert(field.to_string(), Value::from(n));
        }
        self
    }

    /// Set whenever present, `false` included.
    pub fn flag(mut self, field: &str, value: Option<bool>) -> Self {
        if let Some(b) = value {
            self.fields.insert(field.to_string(), Value::Bool(b));
        }
        self
    }

    pub fn millis(mut self, field: &str, value: u64) -> Self {
        self.fields.insert(field.to_string(), Value::from(value));
        self
    }

    pub fn build(self) -> SubmissionRecord {
        SubmissionRecord(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::fields;

    #[test]
    fn test_builder_skips_empty_values() {
        let record = SubmissionRecord::builder()
            .required(fields::NAME, "Mari")
            .text(fields::PHONE, "")
            .text(fields::EMAIL, "mari@test.ee")
            .count(fields::GUESTS, Some(0))
            .count(fields::PIZZAS, None)
            .count(fields::DRINKS, Some(10))
            .flag(fields::HAS_CAKE, Some(false))
            .build();

        let names: Vec<&str> = record.fields().collect();
        assert_eq!(names.len(), 4);
        assert!(!record.contains(fields::PHONE));
        assert!(!record.contains(fields::GUESTS));
        assert_eq!(record.get(fields::DRINKS), Some(&Value::from(10)));
        assert_eq!(record.get(fields::HAS_CAKE), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let record = SubmissionRecord::builder()
            .required(fields::NAME, "Mari")
            .millis(fields::LOAD_TIME, 1_700_000_000_000)
            .build();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Mari");
        assert_eq!(json["_loadTime"], 1_700_000_000_000u64);
    }
}
