//! Hint sources injected into the manifest schema at construction time.

use std::sync::Arc;

use mfst_core::{HintProvider, HintSource};

/// The three dynamic sources the manifest schema can use.
///
/// Every source is optional. A missing source leaves the corresponding type
/// without suggestions, and without validation in the case of services.
#[derive(Debug, Clone, Default)]
pub struct ManifestHintProviders {
    pub buildpacks: Option<HintSource>,
    pub services: Option<HintSource>,
    pub domains: Option<HintSource>,
}

impl ManifestHintProviders {
    /// No dynamic sources at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_buildpacks(mut self, provider: Arc<dyn HintProvider>) -> Self {
        self.buildpacks = Some(HintSource::new(provider));
        self
    }

    pub fn with_services(mut self, provider: Arc<dyn HintProvider>) -> Self {
        self.services = Some(HintSource::new(provider));
        self
    }

    pub fn with_domains(mut self, provider: Arc<dyn HintProvider>) -> Self {
        self.domains = Some(HintSource::new(provider));
        self
    }
}
