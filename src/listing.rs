//! Listing identifiers
//!
//! A listing is named by a strictly positive integer. The identifier is the
//! sole cache key and renders as the name of its cache directory; only that
//! canonical decimal text parses back into an identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing an identifier from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingIdError {
    #[error("Listing id is not a number: '{0}'")]
    NotNumeric(String),

    #[error("Listing id must be positive")]
    Zero,
}

/// Identifier of one remote listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(u64);

impl ListingId {
    /// Creates an identifier, returning `None` for zero
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = ListingIdError;

    /// Accepts only the canonical decimal form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "0" {
            return Err(ListingIdError::Zero);
        }
        if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ListingIdError::NotNumeric(s.to_string()));
        }

        let value: u64 = s
            .parse()
            .map_err(|_| ListingIdError::NotNumeric(s.to_string()))?;
        Self::new(value).ok_or(ListingIdError::Zero)
    }
}
