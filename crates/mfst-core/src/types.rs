//! # Schema Type Nodes
//!
//! The schema graph is built from four node shapes, expressed as the closed
//! sum type [`YType`]:
//!
//! - [`YAtomicType`]: a scalar, optionally parsed, hinted and/or
//!   restricted to enum members.
//! - [`YBeanType`]: an object with named, typed properties in insertion
//!   order.
//! - [`YSeqType`]: a homogeneous list.
//! - [`YMapType`]: a homogeneous string-keyed dictionary.
//!
//! ## Sharing
//!
//! Nodes and properties are shared by [`Arc`]: the same property instance
//! can be attached to several beans and the same node to several properties
//! or containers. Nodes are mutable while being composed and frozen with
//! `into_ref()`; the frozen graph is immutable and `Send + Sync`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::description::{LazyDescription, Renderable};
use crate::error::{BuildResult, SchemaBuildError};
use crate::hints::{HintSource, ValueHint};
use crate::parsers::ValueParser;

/// Shared handle to a frozen type node.
pub type YTypeRef = Arc<YType>;

/// Shared handle to a frozen property.
pub type YPropertyRef = Arc<YTypedProperty>;

/// Structural kind of a node, as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Atomic,
    Enum,
    Bean,
    Sequence,
    Map,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atomic => "atomic",
            Self::Enum => "enum",
            Self::Bean => "bean",
            Self::Sequence => "sequence",
            Self::Map => "map",
        })
    }
}

/// A node in the schema graph.
#[derive(Debug)]
pub enum YType {
    Atomic(YAtomicType),
    Bean(YBeanType),
    Seq(YSeqType),
    Map(YMapType),
}

impl YType {
    /// Display name, used in diagnostics and completion labels.
    pub fn name(&self) -> &str {
        match self {
            Self::Atomic(t) => &t.name,
            Self::Bean(t) => &t.name,
            Self::Seq(t) => &t.name,
            Self::Map(t) => &t.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Atomic(t) if t.enum_values.is_some() => TypeKind::Enum,
            Self::Atomic(_) => TypeKind::Atomic,
            Self::Bean(_) => TypeKind::Bean,
            Self::Seq(_) => TypeKind::Sequence,
            Self::Map(_) => TypeKind::Map,
        }
    }
}

impl fmt::Display for YType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Atomic
// ---------------------------------------------------------------------------

/// A scalar type.
#[derive(Debug)]
pub struct YAtomicType {
    name: String,
    parser: Option<Arc<dyn ValueParser>>,
    hint_sources: Vec<HintSource>,
    static_hints: Vec<ValueHint>,
    enum_values: Option<EnumValues>,
}

impl YAtomicType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parser: None,
            hint_sources: Vec::new(),
            static_hints: Vec::new(),
            enum_values: None,
        }
    }

    pub(crate) fn with_enum_values(mut self, values: EnumValues) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Add fixed suggestions.
    pub fn add_hints<I, H>(&mut self, hints: I) -> &mut Self
    where
        I: IntoIterator<Item = H>,
        H: Into<ValueHint>,
    {
        self.static_hints.extend(hints.into_iter().map(Into::into));
        self
    }

    /// Add a dynamic suggestion source.
    pub fn add_hint_provider(&mut self, source: HintSource) -> &mut Self {
        self.hint_sources.push(source);
        self
    }

    /// Set the parser, replacing any previous one.
    pub fn parse_with(&mut self, parser: Arc<dyn ValueParser>) -> &mut Self {
        self.parser = Some(parser);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parser(&self) -> Option<&Arc<dyn ValueParser>> {
        self.parser.as_ref()
    }

    pub fn hint_sources(&self) -> &[HintSource] {
        &self.hint_sources
    }

    pub fn static_hints(&self) -> &[ValueHint] {
        &self.static_hints
    }

    pub fn enum_values(&self) -> Option<&EnumValues> {
        self.enum_values.as_ref()
    }

    /// Freeze into a shared node.
    pub fn into_ref(self) -> YTypeRef {
        Arc::new(YType::Atomic(self))
    }
}

/// Members of an enum type, with deprecations.
#[derive(Debug, Clone, Default)]
pub struct EnumValues {
    members: Vec<String>,
    replacements: IndexMap<String, String>,
}

impl EnumValues {
    /// Build from members and `deprecated -> replacement` pairs.
    ///
    /// # Errors
    ///
    /// Fails if there are no members, if a deprecated value is not a member,
    /// or if a replacement is not a non-deprecated member.
    pub fn new(
        type_name: &str,
        members: Vec<String>,
        replacements: IndexMap<String, String>,
    ) -> BuildResult<Self> {
        if members.is_empty() {
            return Err(SchemaBuildError::EmptyEnum {
                type_name: type_name.to_string(),
            });
        }
        for (value, replacement) in &replacements {
            if !members.contains(value) {
                return Err(SchemaBuildError::DeprecatedNotMember {
                    type_name: type_name.to_string(),
                    value: value.clone(),
                });
            }
            if !members.contains(replacement) || replacements.contains_key(replacement) {
                return Err(SchemaBuildError::InvalidReplacement {
                    type_name: type_name.to_string(),
                    value: value.clone(),
                    replacement: replacement.clone(),
                });
            }
        }
        Ok(Self {
            members,
            replacements,
        })
    }

    /// Declared members, in declaration order.
    pub fn values(&self) -> &[String] {
        &self.members
    }

    /// Members with their deprecation status, in declaration order.
    pub fn members(&self) -> Vec<EnumMember> {
        self.members
            .iter()
            .map(|value| EnumMember {
                value: value.clone(),
                replacement: self.replacements.get(value).cloned(),
            })
            .collect()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.members.iter().any(|m| m == value)
    }

    /// The suggested substitute if `value` is deprecated.
    pub fn replacement_for(&self, value: &str) -> Option<&str> {
        self.replacements.get(value).map(String::as_str)
    }
}

/// One enum member as reported to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub value: String,
    /// Set when the member is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl EnumMember {
    pub fn is_deprecated(&self) -> bool {
        self.replacement.is_some()
    }
}

// ---------------------------------------------------------------------------
// Bean
// ---------------------------------------------------------------------------

/// An object type with named properties.
#[derive(Debug)]
pub struct YBeanType {
    name: String,
    properties: IndexMap<String, YPropertyRef>,
}

impl YBeanType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Attach a property after those already present.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaBuildError::DuplicateProperty`] if the name is taken.
    pub fn add_property(&mut self, property: YPropertyRef) -> BuildResult<&mut Self> {
        if self.properties.contains_key(property.name()) {
            return Err(SchemaBuildError::DuplicateProperty {
                bean: self.name.clone(),
                property: property.name().to_string(),
            });
        }
        self.properties.insert(property.name().to_string(), property);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &YPropertyRef> {
        self.properties.values()
    }

    pub fn property(&self, name: &str) -> Option<&YPropertyRef> {
        self.properties.get(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_ref(self) -> YTypeRef {
        Arc::new(YType::Bean(self))
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// A list whose items all have the same type.
#[derive(Debug)]
pub struct YSeqType {
    name: String,
    element: YTypeRef,
}

impl YSeqType {
    pub fn new(element: YTypeRef) -> Self {
        Self {
            name: format!("{}[]", element.name()),
            element,
        }
    }

    pub fn element(&self) -> &YTypeRef {
        &self.element
    }

    pub fn into_ref(self) -> YTypeRef {
        Arc::new(YType::Seq(self))
    }
}

/// A dictionary from keys of one type to values of another.
#[derive(Debug)]
pub struct YMapType {
    name: String,
    key: YTypeRef,
    value: YTypeRef,
}

impl YMapType {
    pub fn new(key: YTypeRef, value: YTypeRef) -> Self {
        Self {
            name: format!("Map<{}, {}>", key.name(), value.name()),
            key,
            value,
        }
    }

    pub fn key(&self) -> &YTypeRef {
        &self.key
    }

    pub fn value(&self) -> &YTypeRef {
        &self.value
    }

    pub fn into_ref(self) -> YTypeRef {
        Arc::new(YType::Map(self))
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// A named, typed slot of a bean.
#[derive(Debug, Clone)]
pub struct YTypedProperty {
    name: String,
    ty: YTypeRef,
    required: bool,
    description: Option<LazyDescription>,
}

impl YTypedProperty {
    pub fn new(name: impl Into<String>, ty: YTypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn described_by(mut self, description: LazyDescription) -> Self {
        self.description = Some(description);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &YTypeRef {
        &self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Resolve the documentation now.
    pub fn description(&self) -> Renderable {
        self.description
            .as_ref()
            .map_or(Renderable::NoDescription, LazyDescription::resolve)
    }

    pub fn into_ref(self) -> YPropertyRef {
        Arc::new(self)
    }
}
