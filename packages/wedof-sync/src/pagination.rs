//! Page request parameters and response envelope normalization.
//!
//! Wedof list endpoints are not consistent about how a page is wrapped. A
//! response is one of:
//!
//! - a bare JSON array of records,
//! - an object with a `data` field holding the records,
//! - a single record object.
//!
//! [`PageEnvelope`] names these three shapes and turns each into the list of
//! records making up the page.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Result, WedofError};

/// One schema-less business object as returned by the API.
pub type Record = Map<String, Value>;

/// Query parameters sent with a request.
pub type QueryParams = BTreeMap<String, String>;

/// Field holding the page items in wrapped responses.
pub const DATA_FIELD: &str = "data";

/// Build the parameters for one page request.
///
/// `page` and `limit` always override caller-supplied keys of the same name.
#[must_use]
pub fn page_params(base: &QueryParams, page: u32, limit: usize) -> QueryParams {
    let mut params = base.clone();
    params.insert("page".to_string(), page.to_string());
    params.insert("limit".to_string(), limit.to_string());
    params
}

/// The shape of one list response.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEnvelope {
    /// The response is the array of items.
    Bare(Vec<Value>),
    /// The response is an object; its `data` field holds the items.
    Wrapped(Value),
    /// The response is a single object without a `data` field.
    ///
    /// Coerced into a one-item page. An empty object is an empty page.
    Single(Record),
}

impl PageEnvelope {
    /// Classify a decoded response body.
    pub fn classify(response: Value) -> Result<Self> {
        match response {
            Value::Array(items) => Ok(Self::Bare(items)),
            Value::Object(mut object) => match object.remove(DATA_FIELD) {
                Some(data) => Ok(Self::Wrapped(data)),
                None => Ok(Self::Single(object)),
            },
            other => Err(WedofError::MalformedResponse(format!(
                "expected a JSON array or object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Extract the records of this page, in response order.
    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Self::Bare(items) => items_to_records(items),
            Self::Wrapped(Value::Array(items)) => items_to_records(items),
            Self::Wrapped(Value::Null) => Ok(Vec::new()),
            Self::Wrapped(Value::Object(object)) => Ok(single(object)),
            Self::Wrapped(other) => Err(WedofError::MalformedResponse(format!(
                "`{DATA_FIELD}` field holds {}",
                kind_of(&other)
            ))),
            Self::Single(object) => Ok(single(object)),
        }
    }
}

/// Normalize a decoded response into the records of one page.
pub fn normalize_page(response: Value) -> Result<Vec<Record>> {
    PageEnvelope::classify(response)?.into_records()
}

fn single(object: Record) -> Vec<Record> {
    if object.is_empty() {
        Vec::new()
    } else {
        vec![object]
    }
}

fn items_to_records(items: Vec<Value>) -> Result<Vec<Record>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(WedofError::MalformedResponse(format!(
                "item {index} is {}, expected an object",
                kind_of(&other)
            ))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    #[test]
    fn test_classify_bare_array() {
        let envelope = PageEnvelope::classify(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert!(matches!(envelope, PageEnvelope::Bare(ref items) if items.len() == 2));
        assert_eq!(
            envelope.into_records().unwrap(),
            vec![record(json!({"id": 1})), record(json!({"id": 2}))]
        );
    }

    #[test]
    fn test_classify_wrapped() {
        let envelope = PageEnvelope::classify(json!({"data": [{"id": 1}], "total": 1})).unwrap();
        assert_eq!(envelope, PageEnvelope::Wrapped(json!([{"id": 1}])));
        assert_eq!(envelope.into_records().unwrap(), vec![record(json!({"id": 1}))]);
    }

    #[test]
    fn test_classify_single_object() {
        let envelope = PageEnvelope::classify(json!({"id": 1})).unwrap();
        assert_eq!(envelope, PageEnvelope::Single(record(json!({"id": 1}))));
        assert_eq!(envelope.into_records().unwrap(), vec![record(json!({"id": 1}))]);
    }

    #[test]
    fn test_empty_pages() {
        assert!(normalize_page(json!([])).unwrap().is_empty());
        assert!(normalize_page(json!({"data": []})).unwrap().is_empty());
        assert!(normalize_page(json!({"data": null})).unwrap().is_empty());
        assert!(normalize_page(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_wrapped_single_object() {
        let records = normalize_page(json!({"data": {"id": 7}})).unwrap();
        assert_eq!(records, vec![record(json!({"id": 7}))]);
    }

    #[test]
    fn test_preserves_item_order() {
        let records = normalize_page(json!([{"id": 3}, {"id": 1}, {"id": 2}])).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn test_malformed_shapes() {
        for response in [json!(null), json!(42), json!("users"), json!(true)] {
            let err = normalize_page(response).unwrap_err();
            assert!(matches!(err, WedofError::MalformedResponse(_)));
        }

        let err = normalize_page(json!({"data": "nope"})).unwrap_err();
        assert!(err.to_string().contains("`data` field holds a string"));

        let err = normalize_page(json!([{"id": 1}, 2])).unwrap_err();
        assert!(err.to_string().contains("item 1 is a number"));
    }

    #[test]
    fn test_page_params_override_base() {
        let mut base = QueryParams::new();
        base.insert("state".to_string(), "accepted".to_string());
        base.insert("page".to_string(), "9".to_string());
        base.insert("limit".to_string(), "5".to_string());

        let params = page_params(&base, 2, 100);
        assert_eq!(params.get("state").map(String::as_str), Some("accepted"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert_eq!(params.get("limit").map(String::as_str), Some("100"));
        assert_eq!(params.len(), 3);

        // The caller's map is left untouched.
        assert_eq!(base.get("page").map(String::as_str), Some("9"));
    }
}
