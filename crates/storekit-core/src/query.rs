//! Query shapes understood by every document collection backend

use crate::{Result, StoreError};
use bson::{doc, Bson, Document};

/// A document filter.
///
/// Backends either render it with [`Filter::to_document`] or evaluate it in
/// process with [`Filter::matches`]; both follow MongoDB semantics, where an
/// array field matches when any of its elements does.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    #[default]
    All,
    Eq(String, Bson),
    In(String, Vec<Bson>),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Field (or an element of an array field) equals `value`, as `$in: [value]`.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::In(field.into(), vec![value.into()])
    }

    pub fn any_of<V: Into<Bson>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Render the MongoDB query document.
    pub fn to_document(&self) -> Document {
        match self {
            Filter::All => Document::new(),
            Filter::Eq(field, value) => {
                let mut document = Document::new();
                document.insert(field.clone(), value.clone());
                document
            }
            Filter::In(field, values) => {
                let mut document = Document::new();
                document.insert(field.clone(), doc! { "$in": values.clone() });
                document
            }
            Filter::And(filters) => {
                let parts: Vec<Document> = filters.iter().map(Filter::to_document).collect();

                // Merge into one document unless two parts constrain the same key
                let mut merged = Document::new();
                for part in &parts {
                    for (key, value) in part {
                        if merged.contains_key(key) {
                            let clauses: Vec<Bson> =
                                parts.iter().cloned().map(Bson::Document).collect();
                            return doc! { "$and": clauses };
                        }
                        merged.insert(key.clone(), value.clone());
                    }
                }
                merged
            }
        }
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => document
                .get(field)
                .map(|actual| field_matches(actual, |candidate| values_equal(candidate, value)))
                .unwrap_or(matches!(value, Bson::Null)),
            Filter::In(field, values) => match document.get(field) {
                Some(actual) => field_matches(actual, |candidate| {
                    values.iter().any(|value| values_equal(candidate, value))
                }),
                None => values.iter().any(|value| matches!(value, Bson::Null)),
            },
            Filter::And(filters) => filters.iter().all(|filter| filter.matches(document)),
        }
    }
}

fn field_matches(actual: &Bson, predicate: impl Fn(&Bson) -> bool) -> bool {
    if predicate(actual) {
        return true;
    }
    match actual {
        Bson::Array(items) => items.iter().any(predicate),
        _ => false,
    }
}

/// Equality with numeric types compared by value, as the server does.
pub fn values_equal(left: &Bson, right: &Bson) -> bool {
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// One row of a grouped count
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCount {
    pub key: Bson,
    pub count: u64,
}

impl GroupCount {
    pub fn new(key: impl Into<Bson>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }

    /// Parse an aggregation result row shaped `{_id: key, count: n}`.
    pub fn from_document(document: &Document) -> Result<Self> {
        let key = document.get("_id").cloned().unwrap_or(Bson::Null);
        let count = match document.get("count") {
            Some(Bson::Int32(n)) if *n >= 0 => *n as u64,
            Some(Bson::Int64(n)) if *n >= 0 => *n as u64,
            Some(Bson::Double(n)) if *n >= 0.0 => *n as u64,
            other => {
                return Err(StoreError::Serialization(format!(
                    "Invalid count in aggregation result: {:?}",
                    other
                )))
            }
        };
        Ok(Self { key, count })
    }

    /// The group key as display text; strings are shown unquoted.
    pub fn key_text(&self) -> String {
        match &self.key {
            Bson::String(s) => s.clone(),
            Bson::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

/// `$group` by `field` with `$sum: 1`, sorted by count descending, limited.
pub fn group_count_pipeline(field: &str, limit: i64) -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": format!("${}", field), "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1 } },
        doc! { "$limit": limit },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_merges_distinct_fields() {
        let filter = Filter::and([Filter::eq("method", "GET"), Filter::eq("path", "/status")]);
        assert_eq!(filter.to_document(), doc! { "method": "GET", "path": "/status" });
    }

    #[test]
    fn test_and_falls_back_on_shared_field() {
        let filter = Filter::and([Filter::eq("a", 1), Filter::eq("a", 2)]);
        assert_eq!(filter.to_document(), doc! { "$and": [{ "a": 1 }, { "a": 2 }] });
    }

    #[test]
    fn test_contains_renders_in() {
        let filter = Filter::contains("topics", "Python");
        assert_eq!(filter.to_document(), doc! { "topics": { "$in": ["Python"] } });
        assert_eq!(Filter::All.to_document(), Document::new());
    }

    #[test]
    fn test_matches_array_membership() {
        let school = doc! { "name": "Holberton", "topics": ["C", "Python"] };
        assert!(Filter::contains("topics", "Python").matches(&school));
        assert!(Filter::eq("topics", "C").matches(&school));
        assert!(!Filter::contains("topics", "Rust").matches(&school));
        assert!(!Filter::contains("missing", "Python").matches(&school));
    }

    #[test]
    fn test_matches_numbers_across_types() {
        let document = doc! { "status": 200_i64 };
        assert!(Filter::eq("status", 200_i32).matches(&document));
        assert!(Filter::any_of("status", [404_i32, 200_i32]).matches(&document));
    }

    #[test]
    fn test_missing_field_equals_null() {
        let document = doc! { "ip": "1.2.3.4" };
        assert!(Filter::eq("method", Bson::Null).matches(&document));
        assert!(!Filter::eq("method", "GET").matches(&document));
    }

    #[test]
    fn test_group_count_pipeline_shape() {
        let pipeline = group_count_pipeline("ip", 10);
        assert_eq!(pipeline.len(), 3);
        assert_eq!(
            pipeline[0],
            doc! { "$group": { "_id": "$ip", "count": { "$sum": 1 } } }
        );
        assert_eq!(pipeline[2], doc! { "$limit": 10_i64 });
    }

    #[test]
    fn test_group_count_from_document() -> Result<()> {
        let row = GroupCount::from_document(&doc! { "_id": "172.31.63.67", "count": 15805 })?;
        assert_eq!(row, GroupCount::new("172.31.63.67", 15805));
        assert_eq!(row.key_text(), "172.31.63.67");

        assert!(GroupCount::from_document(&doc! { "_id": "x" }).is_err());
        Ok(())
    }
}
