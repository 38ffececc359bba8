//! # mfst-schema — Deployment Manifest Schema
//!
//! The concrete schema for deployment manifest YAML files, composed from
//! the `mfst-core` type engine.
//!
//! ## Modules
//!
//! - [`manifest`]: [`ManifestSchema`], the top-level and `Application`
//!   beans, routes, services, memory quantities and health checks.
//! - [`providers`]: [`ManifestHintProviders`], the optional dynamic sources
//!   for buildpacks, services and domains.
//! - [`config`]: [`HintSourceConfig`], static hint lists loaded from YAML
//!   and environment variables.
//!
//! ## Crate Policy
//!
//! - Depends only on `mfst-core` internally.
//! - No network access. Dynamic data arrives through injected providers.
//! - The schema is built once and never mutated afterwards.

pub mod config;
pub mod manifest;
pub mod providers;

pub use config::{ConfigError, HintSourceConfig};
pub use manifest::{
    ManifestSchema, APPLICATION_TYPE_NAME, MEMORY_HINTS, TOPLEVEL_EXCLUDED, TOPLEVEL_TYPE_NAME,
};
pub use providers::ManifestHintProviders;
