//! Inclusive integer ranges, used for the document-cardinality contract.

use std::fmt;

use serde::Serialize;

use crate::error::DocumentCountError;

/// An inclusive range of integers with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntegerRange {
    lower: Option<i64>,
    upper: Option<i64>,
}

impl IntegerRange {
    /// Range with both bounds optional. `None` means unbounded.
    pub const fn new(lower: Option<i64>, upper: Option<i64>) -> Self {
        Self { lower, upper }
    }

    /// Exactly one value.
    pub const fn exactly(n: i64) -> Self {
        Self::new(Some(n), Some(n))
    }

    /// `n` or more.
    pub const fn at_least(n: i64) -> Self {
        Self::new(Some(n), None)
    }

    /// `n` or fewer.
    pub const fn at_most(n: i64) -> Self {
        Self::new(None, Some(n))
    }

    /// Between `lower` and `upper`, both inclusive.
    pub const fn between(lower: i64, upper: i64) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    pub fn lower_bound(&self) -> Option<i64> {
        self.lower
    }

    pub fn upper_bound(&self) -> Option<i64> {
        self.upper
    }

    /// Whether `n` lies inside the range.
    pub fn contains(&self, n: i64) -> bool {
        self.lower.map_or(true, |lo| n >= lo) && self.upper.map_or(true, |hi| n <= hi)
    }

    /// Check a YAML stream's document count against this range.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentCountError`] if `found` is outside the range.
    pub fn check_document_count(&self, found: usize) -> Result<(), DocumentCountError> {
        let within = i64::try_from(found).map_or(false, |n| self.contains(n));
        if within {
            Ok(())
        } else {
            Err(DocumentCountError {
                expected: *self,
                found,
            })
        }
    }
}

impl fmt::Display for IntegerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "exactly {lo}"),
            (Some(lo), Some(hi)) => write!(f, "between {lo} and {hi}"),
            (Some(lo), None) => write!(f, "at least {lo}"),
            (None, Some(hi)) => write!(f, "at most {hi}"),
            (None, None) => write!(f, "any number of"),
        }
    }
}
