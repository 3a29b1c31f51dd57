//! Price values as the server sends them
//!
//! Catalog endpoints return prices either as JSON numbers (`45`) or as
//! currency-formatted strings (`"$45"`, `"AED 1,250.00"`). [`Price`] keeps
//! the original value so persisted entries round-trip byte-for-byte, and
//! parses it to a [`Decimal`] only when arithmetic is needed.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A price exactly as received from the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl Price {
    /// Numeric amount, if the value can be read as one
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Self::Text(s) => parse_amount(s),
        }
    }

    /// Numeric amount, zero when unreadable
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount().unwrap_or(Decimal::ZERO)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Read a number out of a currency-formatted string.
///
/// Currency symbols, codes, spaces and thousands separators are ignored.
/// Returns `None` when no digits are present.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Label → value price breakdown returned by the server
/// (`{"Subtotal": 45, "Tax": 4, "Total": 49}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceBreakdown(BTreeMap<String, Price>);

/// Label of the grand total line
pub const TOTAL_LABEL: &str = "Total";

impl PriceBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&Price> {
        self.0.get(label)
    }

    /// The grand total line, if the server sent one
    pub fn total(&self) -> Option<&Price> {
        self.get(TOTAL_LABEL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Price)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>, P: Into<Price>> FromIterator<(L, P)> for PriceBreakdown {
    fn from_iter<I: IntoIterator<Item = (L, P)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, p)| (l.into(), p.into())).collect())
    }
}
