//! Size schemes and the canonical ordering of size labels.
//!
//! A product's size taxonomy is one of two fixed schemes. Only the scheme
//! tag is persisted (on the product row, values `NUMERI`/`LETTERE`); the
//! label lists themselves live here.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Canonical ordered labels of the numeric scheme.
const NUMERIC_LABELS: &[&str] = &["38", "40", "42", "44", "46", "48", "50", "52"];

/// Canonical ordered labels of the letter scheme.
const LETTER_LABELS: &[&str] = &["XS", "S", "M", "L", "XL"];

/// A product's size taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeScheme {
    #[serde(rename = "NUMERI")]
    Numeric,
    #[serde(rename = "LETTERE")]
    Letter,
}

impl SizeScheme {
    /// Return the scheme tag as stored on the product row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERI",
            Self::Letter => "LETTERE",
        }
    }

    /// Parse a stored scheme tag.
    ///
    /// Total over any input: matching is case-insensitive and anything that
    /// is not the letter tag (including empty or unknown values) falls back
    /// to [`SizeScheme::Numeric`].
    pub fn parse(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("LETTERE") {
            Self::Letter
        } else {
            Self::Numeric
        }
    }

    /// The canonical ordered size labels of this scheme.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Numeric => NUMERIC_LABELS,
            Self::Letter => LETTER_LABELS,
        }
    }
}

impl std::fmt::Display for SizeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort rank of a letter-scheme label. Unrecognized labels rank last.
fn letter_rank(label: &str) -> u32 {
    match label {
        "XS" => 1,
        "S" => 2,
        "M" => 3,
        "L" => 4,
        "XL" => 5,
        "XXL" => 6,
        _ => 999,
    }
}

/// Sort key of a numeric-scheme label. Unparsable labels rank last.
fn numeric_key(label: &str) -> i64 {
    label.trim().parse().unwrap_or(i64::MAX)
}

/// Compare two size labels under a scheme.
///
/// Numeric labels order by numeric value ascending; letter labels by the
/// fixed rank XS < S < M < L < XL < XXL. Labels outside the scheme compare
/// equal to each other and after every recognized one, so a stable sort
/// keeps their relative order.
pub fn compare_labels(scheme: SizeScheme, a: &str, b: &str) -> Ordering {
    match scheme {
        SizeScheme::Numeric => numeric_key(a).cmp(&numeric_key(b)),
        SizeScheme::Letter => letter_rank(a).cmp(&letter_rank(b)),
    }
}
