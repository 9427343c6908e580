//! Structured listing records

use crate::listing::ListingId;
use serde::Serialize;
use std::collections::BTreeMap;

/// A typed value extracted from a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Fields extracted from one cached listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub id: ListingId,
    pub fields: BTreeMap<String, FieldValue>,
}

impl ListingRecord {
    pub fn new(id: ListingId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field, replacing any previous value
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the listing category, or an empty string if it was not extracted
    pub fn category(&self) -> &str {
        self.get(super::CATEGORY_FIELD)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }
}
