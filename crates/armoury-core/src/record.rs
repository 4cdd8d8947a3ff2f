use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// One parsed row: field name to coerced value, in column order.
///
/// Missing values are kept so callers can tell "empty" from "not selected",
/// but they are skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// The field's value unless it is absent or missing.
    pub fn present_value(&self, field: &str) -> Option<&Value> {
        self.get(field).filter(|v| !v.is_missing())
    }

    /// The field as text, if present and textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    pub fn number(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_number)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Whether the field holds a non-missing value.
    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_missing())
    }

    /// Fields with non-missing values, in column order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(_, v)| !v.is_missing())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self.present().collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (field, value) in present {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
