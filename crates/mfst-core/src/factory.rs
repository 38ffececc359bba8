//! # Schema Type Factory
//!
//! Convenience constructors for every node shape. The factory holds no
//! registry: each call returns a fresh node and ownership passes to the
//! caller, who composes nodes into a graph through shared references.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::BuildResult;
use crate::parsers::EnumValueParser;
use crate::types::{
    EnumValues, YAtomicType, YBeanType, YMapType, YSeqType, YTypeRef, YTypedProperty,
};
use crate::util::YTypeUtil;

/// Builds type nodes and exposes the shared introspection utility.
#[derive(Debug, Clone, Default)]
pub struct YTypeFactory {
    type_util: YTypeUtil,
}

impl YTypeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The introspection utility for nodes built by this factory.
    pub fn type_util(&self) -> &YTypeUtil {
        &self.type_util
    }

    /// A plain scalar type. Add parsers and hints before freezing it.
    pub fn atomic(&self, name: impl Into<String>) -> YAtomicType {
        YAtomicType::new(name)
    }

    /// Start an enum type, to be refined with deprecations.
    pub fn enum_builder<I, S>(&self, name: impl Into<String>, members: I) -> EnumTypeBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumTypeBuilder {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            replacements: IndexMap::new(),
        }
    }

    /// An enum type with no deprecated members.
    ///
    /// # Errors
    ///
    /// Fails if `members` is empty.
    pub fn enum_type<I, S>(&self, name: impl Into<String>, members: I) -> BuildResult<YAtomicType>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_builder(name, members).build()
    }

    /// An object type without properties yet.
    pub fn bean(&self, name: impl Into<String>) -> YBeanType {
        YBeanType::new(name)
    }

    /// A list of `element`.
    pub fn seq(&self, element: &YTypeRef) -> YTypeRef {
        YSeqType::new(Arc::clone(element)).into_ref()
    }

    /// A dictionary from `key` to `value`.
    pub fn map(&self, key: &YTypeRef, value: &YTypeRef) -> YTypeRef {
        YMapType::new(Arc::clone(key), Arc::clone(value)).into_ref()
    }

    /// An optional, undocumented property. Refine with
    /// [`YTypedProperty::required`] and [`YTypedProperty::described_by`].
    pub fn prop(&self, name: impl Into<String>, ty: &YTypeRef) -> YTypedProperty {
        YTypedProperty::new(name, Arc::clone(ty))
    }
}

/// Fluent builder for enum types.
#[derive(Debug, Clone)]
pub struct EnumTypeBuilder {
    name: String,
    members: Vec<String>,
    replacements: IndexMap<String, String>,
}

impl EnumTypeBuilder {
    /// Mark `value` as deprecated; diagnostics will suggest `replacement`.
    pub fn deprecate_with_replacement(
        mut self,
        value: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.replacements.insert(value.into(), replacement.into());
        self
    }

    /// Finish the enum. Its parser accepts exactly the declared members.
    ///
    /// # Errors
    ///
    /// Fails if there are no members or a deprecation is inconsistent.
    pub fn build(self) -> BuildResult<YAtomicType> {
        let values = EnumValues::new(&self.name, self.members.clone(), self.replacements)?;
        let mut ty = YAtomicType::new(self.name.clone()).with_enum_values(values);
        ty.parse_with(Arc::new(EnumValueParser::new(self.name, self.members)));
        Ok(ty)
    }
}
