//! # mfst-core — Typed YAML Schema Engine
//!
//! A small meta-type system for describing YAML dialects in a way that an
//! editor-style analysis engine can introspect: which properties exist at a
//! location, what values are valid, what a property means, and whether a
//! value is deprecated.
//!
//! ## Building Blocks
//!
//! - [`types`]: the closed [`YType`] sum type (atomic, bean, sequence, map)
//!   and [`YTypedProperty`]. Nodes are shared through `Arc`.
//! - [`factory`]: [`YTypeFactory`] constructors, including the fluent enum
//!   builder with deprecations.
//! - [`util`]: [`YTypeUtil`], pure structural queries over the graph.
//! - [`parsers`]: pure, total value parsers (non-empty strings, bounded
//!   integers, memory quantities, routes, restricted value sets).
//! - [`hints`]: async [`HintProvider`]s wrapped in [`HintSource`], which
//!   turns failures and timeouts into empty suggestion lists.
//! - [`description`]: lazily resolved property documentation.
//! - [`schema`]: the [`YamlSchema`] trait a concrete dialect implements.
//!
//! ## Crate Policy
//!
//! - No YAML parsing here; consumers bring their own document tree.
//! - No `.unwrap()` outside tests. Schema construction returns `Result`.
//! - A frozen graph is immutable and safe to share across threads.

pub mod description;
pub mod error;
pub mod factory;
pub mod hints;
pub mod parsers;
pub mod range;
pub mod schema;
pub mod types;
pub mod util;

// Re-export primary types for ergonomic imports.
pub use description::{
    DescriptionSource, DirectoryDescriptions, LazyDescription, NoDescriptions, Renderable,
    StaticDescriptions,
};
pub use error::{
    BuildResult, DocumentCountError, HintError, ParseErrorKind, SchemaBuildError, ValueParseError,
};
pub use factory::{EnumTypeBuilder, YTypeFactory};
pub use hints::{HintProvider, HintSource, StaticHints, ValueHint};
pub use parsers::{MemoryQuantity, MemoryUnit, ParsedValue, RouteValue, ValueParser};
pub use range::IntegerRange;
pub use schema::YamlSchema;
pub use types::{
    EnumMember, EnumValues, TypeKind, YAtomicType, YBeanType, YMapType, YPropertyRef, YSeqType,
    YType, YTypeRef, YTypedProperty,
};
pub use util::{Deprecation, ScalarCheck, YTypeUtil};
