//! # Hint Providers
//!
//! A hint provider is a deferred, possibly failing computation that yields
//! suggested values for an atomic type. Providers are supplied by the host
//! application (for example, a client that lists the buildpacks installed on
//! a platform) and are only invoked on demand by a completion engine.
//!
//! ## Boundary contract
//!
//! [`HintProvider::fetch`] may fail or hang. [`HintSource`] wraps a provider
//! and enforces the contract the rest of the engine relies on: a fetch is
//! bounded by a timeout, and any failure degrades to an empty suggestion
//! list. Dropping the future returned by [`HintSource::hints`] abandons the
//! fetch without side effects.
//!
//! ## Known values
//!
//! Value parsers are synchronous and cannot await a fetch. They read
//! [`HintSource::known_values`]: the provider's own non-blocking answer if
//! it gives one, otherwise the values of the last successful fetch through
//! the source. Clones of a source share that snapshot.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;

use crate::error::HintError;

/// A suggested value, with an optional display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValueHint {
    /// Text inserted into the document.
    pub value: String,
    /// Text shown to the user, if different from `value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ValueHint {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn with_label(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// Label if set, otherwise the value.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

impl From<&str> for ValueHint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ValueHint {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Source of suggested values for an atomic type.
#[async_trait]
pub trait HintProvider: Send + Sync + fmt::Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Compute the current set of suggestions. No ordering is guaranteed.
    async fn fetch(&self) -> Result<Vec<ValueHint>, HintError>;

    /// Values known right now without blocking, if any.
    ///
    /// Value parsers that restrict input to a dynamic set use this instead of
    /// [`fetch`](Self::fetch), because parsing is synchronous. `None` means
    /// "unknown", in which case those parsers accept any value.
    fn known_values(&self) -> Option<Vec<String>> {
        None
    }
}

/// A provider backed by a fixed list.
#[derive(Debug, Clone)]
pub struct StaticHints {
    name: String,
    hints: Vec<ValueHint>,
}

impl StaticHints {
    pub fn new<I, H>(name: impl Into<String>, hints: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<ValueHint>,
    {
        Self {
            name: name.into(),
            hints: hints.into_iter().map(Into::into).collect(),
        }
    }

    pub fn hints(&self) -> &[ValueHint] {
        &self.hints
    }
}

#[async_trait]
impl HintProvider for StaticHints {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<ValueHint>, HintError> {
        Ok(self.hints.clone())
    }

    fn known_values(&self) -> Option<Vec<String>> {
        Some(self.hints.iter().map(|h| h.value.clone()).collect())
    }
}

/// A provider wrapped with the never-fail, time-bounded contract.
#[derive(Clone)]
pub struct HintSource {
    provider: Arc<dyn HintProvider>,
    timeout: Duration,
    /// Values from the last successful fetch.
    last_fetched: Arc<RwLock<Option<Vec<String>>>>,
}

impl HintSource {
    /// Time bound applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

    pub fn new(provider: Arc<dyn HintProvider>) -> Self {
        Self {
            provider,
            timeout: Self::DEFAULT_TIMEOUT,
            last_fetched: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch hints, surfacing failures and timeouts as [`HintError`].
    ///
    /// A successful fetch replaces the known-values snapshot; a failed one
    /// leaves it as it was.
    pub async fn try_hints(&self) -> Result<Vec<ValueHint>, HintError> {
        let hints = match tokio::time::timeout(self.timeout, self.provider.fetch()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(HintError::TimedOut {
                    source_name: self.name().to_string(),
                    millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        };
        *self.last_fetched.write() = Some(hints.iter().map(|h| h.value.clone()).collect());
        Ok(hints)
    }

    /// Fetch hints. Failures and timeouts yield an empty list.
    pub async fn hints(&self) -> Vec<ValueHint> {
        match self.try_hints().await {
            Ok(hints) => hints,
            Err(e) => {
                tracing::warn!(
                    source = %self.name(),
                    error = %e,
                    "hint source failed; offering no suggestions"
                );
                Vec::new()
            }
        }
    }

    /// Non-blocking snapshot of known values. Empty snapshots count as unknown.
    ///
    /// The provider's own answer wins; otherwise this is the result of the
    /// last successful fetch, or `None` if there has been none.
    pub fn known_values(&self) -> Option<Vec<String>> {
        self.provider
            .known_values()
            .or_else(|| self.last_fetched.read().clone())
            .filter(|values| !values.is_empty())
    }
}

impl fmt::Debug for HintSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HintSource")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
