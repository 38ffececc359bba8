//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the schema engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Value parse errors are ordinary return values, never panics. They carry
//!   the offending raw text and a [`ParseErrorKind`] so callers can tell
//!   "not a number" apart from "out of range".
//! - Hint-source errors never reach a document diagnostic. They are
//!   swallowed at the [`HintSource`](crate::hints::HintSource) boundary.
//! - Schema build errors are programming errors in a schema definition and
//!   surface from the construction functions as `Result`s.
//! - There is no umbrella error: each operation returns the one error type
//!   it can produce.

use thiserror::Error;

use crate::range::IntegerRange;

/// Why a raw scalar was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Empty or whitespace-only input where a value is required.
    #[error("value must not be empty")]
    Empty,

    /// Input is not an integer at all.
    #[error("not an integer")]
    NotAnInteger,

    /// Integer is below the allowed minimum.
    #[error("must be at least {min}")]
    BelowMinimum {
        /// Smallest accepted value.
        min: i64,
    },

    /// Integer is too large to represent.
    #[error("must be at most {max}")]
    AboveMaximum {
        /// Largest accepted value.
        max: i64,
    },

    /// Magnitude of a quantity is not a number.
    #[error("not a number")]
    NotANumber,

    /// Quantity has no unit suffix.
    #[error("missing unit; valid units are {valid}")]
    MissingUnit {
        /// Human-readable list of accepted units.
        valid: String,
    },

    /// Quantity has a unit suffix that is not recognized.
    #[error("'{unit}' is not a recognized unit; valid units are {valid}")]
    UnknownUnit {
        /// The suffix as written.
        unit: String,
        /// Human-readable list of accepted units.
        valid: String,
    },

    /// Value is not one of the known values for its type.
    #[error("unknown {type_name}; valid values are: {known}")]
    UnknownValue {
        /// Display name of the type that rejected the value.
        type_name: String,
        /// Comma separated list of accepted values.
        known: String,
    },

    /// A scalar was given where a structured value is expected.
    #[error("expected {type_name}, found a scalar")]
    NotAScalar {
        /// Display name of the expected type.
        type_name: String,
    },

    /// Route string is structurally invalid.
    #[error("malformed route: {reason}")]
    MalformedRoute {
        /// What part of the route is wrong.
        reason: String,
    },
}

/// A scalar value that failed to parse, with its raw text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (value: '{raw}')")]
pub struct ValueParseError {
    /// The raw scalar text exactly as given to the parser.
    pub raw: String,
    /// Why it was rejected.
    pub kind: ParseErrorKind,
}

impl ValueParseError {
    /// Build an error for `raw` with the given kind.
    pub fn new(raw: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }
}

/// Failure of a deferred hint computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    /// The backing data source could not be reached or returned garbage.
    #[error("hint source '{source_name}' unavailable: {reason}")]
    Unavailable {
        /// Name of the failing source.
        source_name: String,
        /// Underlying failure, rendered.
        reason: String,
    },

    /// The source did not answer within its time bound.
    #[error("hint source '{source_name}' timed out after {millis} ms")]
    TimedOut {
        /// Name of the slow source.
        source_name: String,
        /// The bound that was exceeded.
        millis: u64,
    },
}

/// Inconsistent schema definition detected during construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaBuildError {
    /// A bean already has a property with this name.
    #[error("bean '{bean}' already has a property named '{property}'")]
    DuplicateProperty {
        /// Owning bean.
        bean: String,
        /// Offending property name.
        property: String,
    },

    /// An enum was declared without members.
    #[error("enum '{type_name}' has no members")]
    EmptyEnum {
        /// The enum type.
        type_name: String,
    },

    /// A deprecation names a value that is not a member.
    #[error("enum '{type_name}' cannot deprecate '{value}': not a member")]
    DeprecatedNotMember {
        /// The enum type.
        type_name: String,
        /// The deprecated value.
        value: String,
    },

    /// A deprecation's replacement is not a member, or is itself deprecated.
    #[error(
        "enum '{type_name}' cannot replace '{value}' with '{replacement}': \
         replacement must be a non-deprecated member"
    )]
    InvalidReplacement {
        /// The enum type.
        type_name: String,
        /// The deprecated value.
        value: String,
        /// The proposed replacement.
        replacement: String,
    },
}

/// A YAML stream with the wrong number of documents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} YAML document(s), found {found}")]
pub struct DocumentCountError {
    /// The accepted range.
    pub expected: IntegerRange,
    /// The number of documents actually present.
    pub found: usize,
}

/// Convenience alias for schema construction.
pub type BuildResult<T> = Result<T, SchemaBuildError>;
