//! Hint source configuration.
//!
//! Hosts that have no live connection to a platform can still offer
//! completion by listing known buildpacks, services and domains in a YAML
//! file, optionally overridden from the environment:
//!
//! ```yaml
//! buildpacks: [java_buildpack, nodejs_buildpack]
//! services: [mysql, redis]
//! domains: [apps.example.com]
//! hint_timeout_ms: 1500
//! descriptions_dir: ./descriptions
//! ```
//!
//! Environment variables (comma separated lists):
//! - `MFST_BUILDPACKS`, `MFST_SERVICES`, `MFST_DOMAINS`
//! - `MFST_HINT_TIMEOUT_MS` (default: 2000)
//! - `MFST_DESCRIPTIONS_DIR`

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mfst_core::{
    DescriptionSource, DirectoryDescriptions, HintSource, NoDescriptions, StaticHints,
};
use serde::{Deserialize, Serialize};

use crate::providers::ManifestHintProviders;

/// Static hint lists and related settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HintSourceConfig {
    pub buildpacks: Option<Vec<String>>,
    pub services: Option<Vec<String>>,
    pub domains: Option<Vec<String>>,
    pub hint_timeout_ms: Option<u64>,
    pub descriptions_dir: Option<PathBuf>,
}

impl HintSourceConfig {
    /// Load from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Replace fields with any `MFST_*` variables that are set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Replace fields from a variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MFST_BUILDPACKS") {
            self.buildpacks = Some(split_list(&v));
        }
        if let Some(v) = lookup("MFST_SERVICES") {
            self.services = Some(split_list(&v));
        }
        if let Some(v) = lookup("MFST_DOMAINS") {
            self.domains = Some(split_list(&v));
        }
        if let Some(v) = lookup("MFST_HINT_TIMEOUT_MS") {
            let ms = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "MFST_HINT_TIMEOUT_MS".to_string(),
                value: v.clone(),
            })?;
            self.hint_timeout_ms = Some(ms);
        }
        if let Some(v) = lookup("MFST_DESCRIPTIONS_DIR") {
            self.descriptions_dir = Some(PathBuf::from(v));
        }
        Ok(self)
    }

    pub fn hint_timeout(&self) -> Duration {
        self.hint_timeout_ms
            .map_or(HintSource::DEFAULT_TIMEOUT, Duration::from_millis)
    }

    /// Static providers for every configured list. Unlisted sources stay unset.
    pub fn hint_providers(&self) -> ManifestHintProviders {
        let timeout = self.hint_timeout();
        let source = |name: &str, values: &Option<Vec<String>>| {
            values.as_ref().map(|values| {
                HintSource::new(Arc::new(StaticHints::new(name, values.clone())))
                    .with_timeout(timeout)
            })
        };
        ManifestHintProviders {
            buildpacks: source("buildpacks", &self.buildpacks),
            services: source("services", &self.services),
            domains: source("domains", &self.domains),
        }
    }

    /// Descriptions from the configured directory, or none.
    pub fn description_source(&self) -> Arc<dyn DescriptionSource> {
        match &self.descriptions_dir {
            Some(dir) => Arc::new(DirectoryDescriptions::new(dir)),
            None => Arc::new(NoDescriptions),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file '{path}': {reason}")]
    Parse { path: String, reason: String },
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn parses_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.yml");
        std::fs::write(
            &path,
            "buildpacks: [java_buildpack]\nservices: [mysql, redis]\nhint_timeout_ms: 150\n",
        )
        .unwrap();
        let cfg = HintSourceConfig::from_file(&path).unwrap();
        assert_eq!(cfg.buildpacks, Some(vec!["java_buildpack".to_string()]));
        assert_eq!(cfg.services.as_ref().map(Vec::len), Some(2));
        assert_eq!(cfg.domains, None);
        assert_eq!(cfg.hint_timeout(), Duration::from_millis(150));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.yml");
        std::fs::write(&path, "stacks: [cflinuxfs4]\n").unwrap();
        assert!(matches!(
            HintSourceConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = HintSourceConfig::from_file(Path::new("/nonexistent/hints.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn overrides_replace_lists() {
        let cfg = HintSourceConfig {
            domains: Some(vec!["old.example.com".into()]),
            ..Default::default()
        }
        .with_overrides(lookup(&[
            ("MFST_DOMAINS", "a.example.com, b.example.com,,"),
            ("MFST_HINT_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.domains,
            Some(vec!["a.example.com".to_string(), "b.example.com".to_string()])
        );
        assert_eq!(cfg.hint_timeout_ms, Some(250));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = HintSourceConfig::default()
            .with_overrides(lookup(&[("MFST_HINT_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn providers_follow_configured_lists() {
        let cfg = HintSourceConfig {
            services: Some(vec!["mysql".into()]),
            hint_timeout_ms: Some(10),
            ..Default::default()
        };
        let providers = cfg.hint_providers();
        assert!(providers.buildpacks.is_none());
        assert!(providers.domains.is_none());
        let services = providers.services.unwrap();
        assert_eq!(services.known_values(), Some(vec!["mysql".to_string()]));
        assert_eq!(services.timeout(), Duration::from_millis(10));
    }
}
