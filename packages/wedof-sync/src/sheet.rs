//! Tabular rendering of record collections.
//!
//! A [`Sheet`] is what a spreadsheet writer receives: a title, a header row
//! and string cells.

use serde::Serialize;
use serde_json::Value;

use crate::pagination::Record;

/// Sheet title for an endpoint name.
///
/// # Examples
/// ```
/// use wedof_sync::sheet::sheet_name;
///
/// assert_eq!(sheet_name("registration_folders"), "Registration Folders");
/// assert_eq!(sheet_name("users"), "Users");
/// ```
#[must_use]
pub fn sheet_name(endpoint_name: &str) -> String {
    endpoint_name
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Text of one cell.
///
/// Missing and `null` values are empty; nested arrays and objects are
/// written as compact JSON.
#[must_use]
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => nested.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet from records.
    ///
    /// Columns are the union of record keys in first-seen order; a record
    /// lacking a column gets an empty cell.
    pub fn from_records(title: impl Into<String>, records: &[Record]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|header| cell_text(record.get(header)))
                    .collect()
            })
            .collect();

        Self {
            title: title.into(),
            headers,
            rows,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
