//! # Value Parsers
//!
//! A value parser turns the raw text of a YAML scalar into a typed
//! [`ParsedValue`], or rejects it with a [`ValueParseError`]. Parsers are
//! pure and total: they never perform I/O, never mutate state and never
//! panic, whatever the input. Rejection is an ordinary return value that a
//! consuming engine reports as a diagnostic against the offending node.
//!
//! Parsers that restrict input to a dynamic set (routes, service names) read
//! the set through [`HintSource::known_values`], a non-blocking snapshot.
//! When no snapshot is available they accept the value, because the dynamic
//! source may simply be unreachable.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ParseErrorKind, ValueParseError};
use crate::hints::HintSource;

/// Converts raw scalar text into a typed value.
pub trait ValueParser: Send + Sync + fmt::Debug {
    /// Parse `raw`. Must not panic for any input.
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError>;
}

/// A successfully parsed scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedValue {
    /// Free text, as written.
    Text(String),
    /// An integer.
    Integer(i64),
    /// A memory or disk quantity.
    Memory(MemoryQuantity),
    /// A route with its structure split out.
    Route(RouteValue),
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Memory(m) => write!(f, "{m}"),
            Self::Route(r) => write!(f, "{r}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Accepts any string that is not empty or whitespace-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyString;

impl ValueParser for NonEmptyString {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        require_non_empty(raw)?;
        Ok(ParsedValue::Text(raw.to_string()))
    }
}

fn require_non_empty(raw: &str) -> Result<(), ValueParseError> {
    if raw.trim().is_empty() {
        Err(ValueParseError::new(raw, ParseErrorKind::Empty))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

/// Accepts integers greater than or equal to `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerAtLeast {
    min: i64,
}

impl IntegerAtLeast {
    pub const fn new(min: i64) -> Self {
        Self { min }
    }

    pub fn min(&self) -> i64 {
        self.min
    }
}

impl ValueParser for IntegerAtLeast {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        let text = raw.trim();
        let n: i64 = text.parse().map_err(|_| {
            let kind = match integer_overflow(text) {
                Some(Overflow::Negative) => ParseErrorKind::BelowMinimum { min: self.min },
                Some(Overflow::Positive) => ParseErrorKind::AboveMaximum { max: i64::MAX },
                None => ParseErrorKind::NotAnInteger,
            };
            ValueParseError::new(raw, kind)
        })?;
        if n < self.min {
            return Err(ValueParseError::new(
                raw,
                ParseErrorKind::BelowMinimum { min: self.min },
            ));
        }
        Ok(ParsedValue::Integer(n))
    }
}

enum Overflow {
    Negative,
    Positive,
}

/// Which way a well-formed integer that failed to parse overflowed.
fn integer_overflow(text: &str) -> Option<Overflow> {
    let (overflow, digits) = match text.strip_prefix('-') {
        Some(rest) => (Overflow::Negative, rest),
        None => (Overflow::Positive, text.strip_prefix('+').unwrap_or(text)),
    };
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(overflow)
}

/// Integers of at least `min`.
pub const fn integer_at_least(min: i64) -> IntegerAtLeast {
    IntegerAtLeast::new(min)
}

/// Integers of at least 1.
pub const fn strictly_positive_integer() -> IntegerAtLeast {
    IntegerAtLeast::new(1)
}

/// Integers of at least 1; rejects zero and negatives like
/// [`strictly_positive_integer`].
pub const fn positive_integer() -> IntegerAtLeast {
    IntegerAtLeast::new(1)
}

// ---------------------------------------------------------------------------
// Memory quantities
// ---------------------------------------------------------------------------

const MEMORY_UNITS: &str = "'M', 'MB', 'G', 'GB'";

/// Unit of a [`MemoryQuantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryUnit {
    Megabytes,
    Gigabytes,
}

impl MemoryUnit {
    /// Canonical one-letter suffix.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Megabytes => "M",
            Self::Gigabytes => "G",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_uppercase().as_str() {
            "M" | "MB" => Some(Self::Megabytes),
            "G" | "GB" => Some(Self::Gigabytes),
            _ => None,
        }
    }
}

/// A positive amount of memory or disk, such as `512M` or `1G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MemoryQuantity {
    pub amount: u64,
    pub unit: MemoryUnit,
}

impl MemoryQuantity {
    /// Size in megabytes, saturating on overflow.
    pub fn megabytes(&self) -> u64 {
        match self.unit {
            MemoryUnit::Megabytes => self.amount,
            MemoryUnit::Gigabytes => self.amount.saturating_mul(1024),
        }
    }
}

impl fmt::Display for MemoryQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for MemoryQuantity {
    type Err = ValueParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValueParseError::new(raw, ParseErrorKind::Empty));
        }
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
            .unwrap_or(text.len());
        let (magnitude, unit) = (&text[..split], text[split..].trim());

        let amount: u64 = match magnitude.parse() {
            Ok(n) => n,
            Err(_) => {
                let kind = match magnitude.parse::<i64>() {
                    Ok(n) if n < 1 => ParseErrorKind::BelowMinimum { min: 1 },
                    _ => ParseErrorKind::NotANumber,
                };
                return Err(ValueParseError::new(raw, kind));
            }
        };
        if unit.is_empty() {
            return Err(ValueParseError::new(
                raw,
                ParseErrorKind::MissingUnit {
                    valid: MEMORY_UNITS.to_string(),
                },
            ));
        }
        let unit = MemoryUnit::from_suffix(unit).ok_or_else(|| {
            ValueParseError::new(
                raw,
                ParseErrorKind::UnknownUnit {
                    unit: unit.to_string(),
                    valid: MEMORY_UNITS.to_string(),
                },
            )
        })?;
        if amount == 0 {
            return Err(ValueParseError::new(
                raw,
                ParseErrorKind::BelowMinimum { min: 1 },
            ));
        }
        Ok(Self { amount, unit })
    }
}

/// Parses memory quantities with `M`/`MB`/`G`/`GB` suffixes, any case.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryParser;

impl ValueParser for MemoryParser {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        raw.parse::<MemoryQuantity>().map(ParsedValue::Memory)
    }
}

// ---------------------------------------------------------------------------
// Enumerations and dynamic sets
// ---------------------------------------------------------------------------

/// Accepts exactly the declared members of an enum type.
#[derive(Debug, Clone)]
pub struct EnumValueParser {
    type_name: String,
    members: Vec<String>,
}

impl EnumValueParser {
    pub fn new(type_name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members,
        }
    }
}

impl ValueParser for EnumValueParser {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        if self.members.iter().any(|m| m == raw) {
            Ok(ParsedValue::Text(raw.to_string()))
        } else {
            Err(unknown_value(raw, &self.type_name, &self.members))
        }
    }
}

/// Non-empty values, restricted to a dynamic set when one is known.
///
/// Used for service names: completion and validation share one source.
#[derive(Debug, Clone)]
pub struct KnownValuesParser {
    type_name: String,
    source: HintSource,
}

impl KnownValuesParser {
    pub fn new(type_name: impl Into<String>, source: HintSource) -> Self {
        Self {
            type_name: type_name.into(),
            source,
        }
    }
}

impl ValueParser for KnownValuesParser {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        require_non_empty(raw)?;
        match self.source.known_values() {
            Some(known) if !known.iter().any(|k| k == raw) => {
                Err(unknown_value(raw, &self.type_name, &known))
            }
            _ => Ok(ParsedValue::Text(raw.to_string())),
        }
    }
}

fn unknown_value(raw: &str, type_name: &str, known: &[String]) -> ValueParseError {
    ValueParseError::new(
        raw,
        ParseErrorKind::UnknownValue {
            type_name: type_name.to_string(),
            known: known.join(", "),
        },
    )
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A route of the form `host.domain[:port][/path]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteValue {
    /// Full host name including the domain.
    pub host: String,
    /// The known domain the host falls under, if one matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Path including its leading `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

/// Validates route structure and matches its trailing domain.
///
/// Domain matching is advisory by default: a host under no known domain is
/// accepted with `domain: None`. In strict mode it is rejected, but only
/// when the known-domain snapshot is non-empty.
#[derive(Debug, Clone, Default)]
pub struct RouteValueParser {
    domains: Option<HintSource>,
    strict: bool,
}

impl RouteValueParser {
    pub fn new(domains: Option<HintSource>) -> Self {
        Self {
            domains,
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn malformed(raw: &str, reason: impl Into<String>) -> ValueParseError {
        ValueParseError::new(
            raw,
            ParseErrorKind::MalformedRoute {
                reason: reason.into(),
            },
        )
    }
}

impl ValueParser for RouteValueParser {
    fn parse(&self, raw: &str) -> Result<ParsedValue, ValueParseError> {
        require_non_empty(raw)?;
        let text = raw.trim();
        if text.chars().any(char::is_whitespace) {
            return Err(Self::malformed(raw, "contains whitespace"));
        }

        let (authority, path) = match text.find('/') {
            Some(i) => (&text[..i], Some(text[i..].to_string())),
            None => (text, None),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port.parse().map_err(|_| {
                    Self::malformed(raw, format!("'{port}' is not a valid port"))
                })?;
                (host, Some(port))
            }
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(Self::malformed(raw, "missing host"));
        }
        if host.split('.').any(str::is_empty) {
            return Err(Self::malformed(raw, "empty domain segment"));
        }

        let known = self.domains.as_ref().and_then(HintSource::known_values);
        // Host names compare case-insensitively.
        let host_lower = host.to_ascii_lowercase();
        let domain = known.as_ref().and_then(|domains| {
            domains
                .iter()
                .filter(|d| {
                    let d = d.to_ascii_lowercase();
                    host_lower == d || host_lower.ends_with(&format!(".{d}"))
                })
                .max_by_key(|d| d.len())
                .cloned()
        });
        if let (Some(known), None, true) = (&known, &domain, self.strict) {
            return Err(unknown_value(raw, "domain", known));
        }

        Ok(ParsedValue::Route(RouteValue {
            host: host.to_string(),
            domain,
            port,
            path,
        }))
    }
}
