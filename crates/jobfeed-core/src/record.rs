//! Stored record and deletion criteria shapes.

use serde_json::{Map, Value};

/// Mapping form of a persisted vacancy (or any mapping-shaped data).
pub type Record = Map<String, Value>;

/// Field → value pairs selecting records for deletion.
pub type Criteria = Map<String, Value>;

/// Returns true when every criteria pair matches the record.
///
/// A key missing from the record matches only a `null` criterion. Empty
/// criteria match every record.
///
/// # Examples
///
/// ```
/// use jobfeed_core::record::{matches_criteria, Criteria, Record};
/// use serde_json::json;
///
/// let mut record = Record::new();
/// record.insert("title".into(), json!("Rust Developer"));
///
/// let mut criteria = Criteria::new();
/// criteria.insert("title".into(), json!("Rust Developer"));
/// assert!(matches_criteria(&record, &criteria));
///
/// criteria.insert("url".into(), json!("http://x"));
/// assert!(!matches_criteria(&record, &criteria));
/// ```
pub fn matches_criteria(record: &Record, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|(key, expected)| values_equal(record.get(key).unwrap_or(&Value::Null), expected))
}

/// Deep record equality, with numbers compared by value.
///
/// `100` and `100.0` are the same salary, so they must not produce two
/// stored copies of one posting.
pub fn same_record(a: &Record, b: &Record) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => same_record(x, y),
        _ => a == b,
    }
}
