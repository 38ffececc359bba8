//! # mfst-cli — CLI Tool for Deployment Manifests
//!
//! Provides the `mfst` command-line interface over the manifest schema.
//!
//! ## Subcommands
//!
//! - `mfst schema` — Print the manifest type graph (text or JSON).
//! - `mfst hints` — List completion suggestions for a named type.
//! - `mfst check` — Check a manifest file against the schema.
//!
//! ```bash
//! mfst schema --json
//! mfst --config hints.yml hints Buildpack
//! mfst check manifest.yml
//! ```

pub mod check;
pub mod hints;
pub mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use mfst_core::{YType, YTypeRef, YamlSchema};
use mfst_schema::{HintSourceConfig, ManifestSchema};

/// Load hint configuration from `path` (if given), then apply `MFST_*`
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<HintSourceConfig> {
    let base = match path {
        Some(path) => HintSourceConfig::from_file(path)?,
        None => HintSourceConfig::default(),
    };
    let config = base.with_env_overrides()?;
    tracing::debug!(
        buildpacks = config.buildpacks.as_ref().map_or(0, Vec::len),
        services = config.services.as_ref().map_or(0, Vec::len),
        domains = config.domains.as_ref().map_or(0, Vec::len),
        "loaded hint configuration"
    );
    Ok(config)
}

/// Build the manifest schema wired to the configured hint sources.
pub fn build_schema(config: &HintSourceConfig) -> Result<ManifestSchema> {
    ManifestSchema::new(&config.hint_providers(), config.description_source())
        .context("failed to build manifest schema")
}

/// Find a type by display name, searching the graph from the top level.
///
/// Several distinct nodes may share a display name; the first one reached
/// in property declaration order wins.
pub fn find_type(schema: &dyn YamlSchema, name: &str) -> Option<YTypeRef> {
    let mut stack = vec![schema.top_level_type().clone()];
    let mut seen: Vec<YTypeRef> = Vec::new();
    while let Some(ty) = stack.pop() {
        if seen.iter().any(|s| std::sync::Arc::ptr_eq(s, &ty)) {
            continue;
        }
        if ty.name() == name {
            return Some(ty);
        }
        seen.push(ty.clone());
        let mut children: Vec<YTypeRef> = match ty.as_ref() {
            YType::Bean(bean) => bean.properties().map(|p| p.ty().clone()).collect(),
            YType::Seq(seq) => vec![seq.element().clone()],
            YType::Map(map) => vec![map.key().clone(), map.value().clone()],
            YType::Atomic(_) => Vec::new(),
        };
        // Depth-first in declaration order.
        children.reverse();
        stack.extend(children);
    }
    None
}
