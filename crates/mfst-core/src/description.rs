//! # Property Descriptions
//!
//! Hover documentation for properties is resolved lazily, by a stable string
//! key, through a [`DescriptionSource`] supplied by the host. Resolution
//! never fails hard: a missing or unreadable description is reported as
//! [`Renderable::NoDescription`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

/// Documentation text ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "text", rename_all = "snake_case")]
pub enum Renderable {
    /// Plain text.
    Text(String),
    /// Markdown source.
    Markdown(String),
    /// No documentation is available.
    NoDescription,
}

impl Renderable {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoDescription)
    }

    /// Raw text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Markdown(s) => Some(s),
            Self::NoDescription => None,
        }
    }
}

/// Looks up documentation by key.
pub trait DescriptionSource: Send + Sync + fmt::Debug {
    /// Resolve the description for `key`. Must not panic.
    fn description_for(&self, key: &str) -> Renderable;
}

/// A source with no documentation at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDescriptions;

impl DescriptionSource for NoDescriptions {
    fn description_for(&self, _key: &str) -> Renderable {
        Renderable::NoDescription
    }
}

/// In-memory descriptions, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptions {
    entries: BTreeMap<String, Renderable>,
}

impl StaticDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, description: Renderable) -> Self {
        self.entries.insert(key.into(), description);
        self
    }
}

impl DescriptionSource for StaticDescriptions {
    fn description_for(&self, key: &str) -> Renderable {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or(Renderable::NoDescription)
    }
}

/// Markdown files in a directory, one per key: `<dir>/<key>.md`.
///
/// Files are read on each lookup, so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct DirectoryDescriptions {
    dir: PathBuf,
}

impl DirectoryDescriptions {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        // Keys are property names; anything that could escape the directory is refused.
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return None;
        }
        Some(self.dir.join(format!("{key}.md")))
    }
}

impl DescriptionSource for DirectoryDescriptions {
    fn description_for(&self, key: &str) -> Renderable {
        let Some(path) = self.path_for(key) else {
            return Renderable::NoDescription;
        };
        match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Renderable::NoDescription,
            Ok(text) => Renderable::Markdown(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Renderable::NoDescription,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read description");
                Renderable::NoDescription
            }
        }
    }
}

/// A description bound to its key, resolved only when asked for.
#[derive(Clone)]
pub struct LazyDescription {
    source: Arc<dyn DescriptionSource>,
    key: String,
}

impl LazyDescription {
    pub fn new(source: Arc<dyn DescriptionSource>, key: impl Into<String>) -> Self {
        Self {
            source,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn resolve(&self) -> Renderable {
        self.source.description_for(&self.key)
    }
}

impl fmt::Debug for LazyDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyDescription")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
