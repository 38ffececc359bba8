//! The seam between a concrete schema and the engine that consumes it.

use crate::range::IntegerRange;
use crate::types::YTypeRef;
use crate::util::YTypeUtil;

/// A complete schema for one YAML dialect.
///
/// Implementations build their type graph once, at construction, and hand
/// out shared references to it afterwards.
pub trait YamlSchema: Send + Sync {
    /// Type every document in a file is matched against.
    fn top_level_type(&self) -> &YTypeRef;

    /// Introspection utility for the graph.
    fn type_util(&self) -> &YTypeUtil;

    /// How many YAML documents a file of this dialect must contain.
    fn expected_number_of_documents(&self) -> IntegerRange;
}
