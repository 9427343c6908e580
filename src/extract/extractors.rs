//! Field extractors
//!
//! Every extractor receives the same document root and writes one field of
//! the shared record. Extractors do not depend on each other, so adding one
//! never changes how the others behave.

use crate::config::{FieldEntry, FieldKind, MissingPolicy};
use crate::extract::record::{FieldValue, ListingRecord};
use crate::tree::{
    find_first, first_content_child, is_text, next_element_sibling, parent, text_content, DocNode,
};
use thiserror::Error;

/// Why a single field could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldFailure {
    #[error("anchor '{0}' not found")]
    AnchorNotFound(String),

    #[error("value '{0}' is not a number")]
    InvalidValue(String),
}

/// A single step of the extraction pipeline
pub trait FieldExtractor: Send + Sync {
    /// Name of the field this extractor populates
    fn field(&self) -> &str;

    /// Policy applied when extraction fails
    fn on_missing(&self) -> MissingPolicy;

    /// Value written when extraction fails under `MissingPolicy::Default`
    fn empty_value(&self) -> FieldValue;

    /// Locates the value in the document and writes it to the record
    fn extract(&self, root: DocNode<'_>, record: &mut ListingRecord) -> Result<(), FieldFailure>;
}

/// Extracts the value that follows a label in the page
///
/// The label is a text node; the value is the first child of the element
/// that follows the label's parent, e.g. `<dt>Boligtype</dt><dd>Leilighet</dd>`.
#[derive(Debug, Clone)]
pub struct LabeledField {
    field: String,
    label: String,
    kind: FieldKind,
    on_missing: MissingPolicy,
}

impl LabeledField {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            kind: FieldKind::Text,
            on_missing: MissingPolicy::Fail,
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_policy(mut self, policy: MissingPolicy) -> Self {
        self.on_missing = policy;
        self
    }

    /// Walks from the label to the node holding its value
    ///
    /// Blank text between the tags is skipped at every step.
    fn locate<'a>(&self, root: DocNode<'a>) -> Option<DocNode<'a>> {
        let anchor = find_first(root, |n| is_text(n, &self.label))?;
        let label_element = parent(&anchor)?;
        let value_element = next_element_sibling(&label_element)?;
        first_content_child(&value_element)
    }

    fn normalize(&self, raw: &str) -> Result<FieldValue, FieldFailure> {
        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(raw.trim().to_lowercase())),
            FieldKind::Integer => parse_integer(raw).map(FieldValue::Integer),
        }
    }
}

impl From<&FieldEntry> for LabeledField {
    fn from(entry: &FieldEntry) -> Self {
        LabeledField::new(entry.field.clone(), entry.label.trim())
            .with_kind(entry.kind)
            .with_policy(entry.on_missing)
    }
}

impl FieldExtractor for LabeledField {
    fn field(&self) -> &str {
        &self.field
    }

    fn on_missing(&self) -> MissingPolicy {
        self.on_missing
    }

    fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Integer => FieldValue::Integer(0),
        }
    }

    fn extract(&self, root: DocNode<'_>, record: &mut ListingRecord) -> Result<(), FieldFailure> {
        let node = self
            .locate(root)
            .ok_or_else(|| FieldFailure::AnchorNotFound(self.label.clone()))?;
        let value = self.normalize(&text_content(&node))?;
        record.set(self.field.clone(), value);
        Ok(())
    }
}

/// Reads the digits of a value such as `"1 250 000 kr"` or `"65 m²"`
fn parse_integer(raw: &str) -> Result<i64, FieldFailure> {
    let trimmed = raw.trim();
    let digits: String = trimmed
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || c.is_whitespace())
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return Err(FieldFailure::InvalidValue(trimmed.to_string()));
    }

    digits
        .parse()
        .map_err(|_| FieldFailure::InvalidValue(trimmed.to_string()))
}
