//! # Type Introspection
//!
//! [`YTypeUtil`] answers structural questions about the schema graph so a
//! consuming engine never has to match on node variants itself: what kind
//! of node is this, which properties does a bean have, which values are
//! valid here, and is this value deprecated.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::description::Renderable;
use crate::error::{ParseErrorKind, ValueParseError};
use crate::hints::ValueHint;
use crate::parsers::ParsedValue;
use crate::types::{EnumMember, TypeKind, YPropertyRef, YType, YTypeRef};

/// A deprecated enum value together with its suggested substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub value: String,
    pub replacement: String,
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is deprecated; use '{}' instead",
            self.value, self.replacement
        )
    }
}

/// Result of checking one scalar against an atomic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarCheck {
    pub value: ParsedValue,
    /// Present when the value is accepted but deprecated.
    pub deprecation: Option<Deprecation>,
}

/// Structural queries over type nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct YTypeUtil;

impl YTypeUtil {
    pub fn kind(&self, ty: &YType) -> TypeKind {
        ty.kind()
    }

    pub fn type_name<'a>(&self, ty: &'a YType) -> &'a str {
        ty.name()
    }

    /// True for scalars, including enums.
    pub fn is_atomic(&self, ty: &YType) -> bool {
        matches!(ty, YType::Atomic(_))
    }

    pub fn is_enum(&self, ty: &YType) -> bool {
        ty.kind() == TypeKind::Enum
    }

    pub fn is_bean(&self, ty: &YType) -> bool {
        matches!(ty, YType::Bean(_))
    }

    pub fn is_sequence(&self, ty: &YType) -> bool {
        matches!(ty, YType::Seq(_))
    }

    pub fn is_map(&self, ty: &YType) -> bool {
        matches!(ty, YType::Map(_))
    }

    /// Properties of a bean, in declaration order. Empty for other kinds.
    pub fn properties(&self, ty: &YType) -> Vec<YPropertyRef> {
        match ty {
            YType::Bean(bean) => bean.properties().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn property_names<'a>(&self, ty: &'a YType) -> Vec<&'a str> {
        match ty {
            YType::Bean(bean) => bean.properties().map(|p| p.name()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn property(&self, ty: &YType, name: &str) -> Option<YPropertyRef> {
        match ty {
            YType::Bean(bean) => bean.property(name).cloned(),
            _ => None,
        }
    }

    /// Properties a document node of this bean type must contain.
    pub fn required_properties(&self, ty: &YType) -> Vec<YPropertyRef> {
        self.properties(ty)
            .into_iter()
            .filter(|p| p.is_required())
            .collect()
    }

    /// Documentation for a bean property; `NoDescription` if there is none.
    pub fn describe(&self, ty: &YType, property: &str) -> Renderable {
        self.property(ty, property)
            .map_or(Renderable::NoDescription, |p| p.description())
    }

    /// Item type of a sequence, or value type of a map.
    pub fn domain_type<'a>(&self, ty: &'a YType) -> Option<&'a YTypeRef> {
        match ty {
            YType::Seq(seq) => Some(seq.element()),
            YType::Map(map) => Some(map.value()),
            _ => None,
        }
    }

    /// Key type of a map.
    pub fn key_type<'a>(&self, ty: &'a YType) -> Option<&'a YTypeRef> {
        match ty {
            YType::Map(map) => Some(map.key()),
            _ => None,
        }
    }

    /// Enum members with deprecation flags. Empty for non-enums.
    pub fn enum_members(&self, ty: &YType) -> Vec<EnumMember> {
        match ty {
            YType::Atomic(atomic) => atomic
                .enum_values()
                .map(|values| values.members())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn is_valid_enum_member(&self, ty: &YType, value: &str) -> bool {
        match ty {
            YType::Atomic(atomic) => atomic
                .enum_values()
                .is_some_and(|values| values.contains(value)),
            _ => false,
        }
    }

    pub fn deprecation_for(&self, ty: &YType, value: &str) -> Option<Deprecation> {
        let YType::Atomic(atomic) = ty else {
            return None;
        };
        let replacement = atomic.enum_values()?.replacement_for(value)?;
        Some(Deprecation {
            value: value.to_string(),
            replacement: replacement.to_string(),
        })
    }

    /// Parse a scalar against an atomic type and flag deprecated values.
    ///
    /// Atomics without a parser accept any text.
    ///
    /// # Errors
    ///
    /// Returns the parser's error, or [`ParseErrorKind::NotAScalar`] when
    /// `ty` is a bean, sequence or map.
    pub fn check_scalar(&self, ty: &YType, raw: &str) -> Result<ScalarCheck, ValueParseError> {
        let YType::Atomic(atomic) = ty else {
            return Err(ValueParseError::new(
                raw,
                ParseErrorKind::NotAScalar {
                    type_name: ty.name().to_string(),
                },
            ));
        };
        let value = match atomic.parser() {
            Some(parser) => parser.parse(raw)?,
            None => ParsedValue::Text(raw.to_string()),
        };
        Ok(ScalarCheck {
            value,
            deprecation: self.deprecation_for(ty, raw),
        })
    }

    /// Completion suggestions for a node.
    ///
    /// Combines non-deprecated enum members, static hints and every dynamic
    /// source, first occurrence wins. Failing sources contribute nothing.
    pub async fn hints_for(&self, ty: &YType) -> Vec<ValueHint> {
        let YType::Atomic(atomic) = ty else {
            return Vec::new();
        };
        let mut hints: Vec<ValueHint> = Vec::new();
        if let Some(values) = atomic.enum_values() {
            hints.extend(
                values
                    .members()
                    .into_iter()
                    .filter(|m| !m.is_deprecated())
                    .map(|m| ValueHint::new(m.value)),
            );
        }
        hints.extend(atomic.static_hints().iter().cloned());
        for source in atomic.hint_sources() {
            hints.extend(source.hints().await);
        }

        let mut seen = HashSet::new();
        hints.retain(|h| seen.insert(h.value.clone()));
        hints
    }
}
