//! # Hints Subcommand
//!
//! Lists the completion suggestions the schema offers for a type, using the
//! hint lists from the configuration file and environment.
//!
//! ```bash
//! MFST_BUILDPACKS=java_buildpack,go_buildpack mfst hints Buildpack
//! mfst hints "Health Check Type"
//! ```

use anyhow::{Context, Result};
use clap::Args;

use mfst_core::{ValueHint, YamlSchema};
use mfst_schema::HintSourceConfig;

/// Arguments for the `mfst hints` subcommand.
#[derive(Args, Debug)]
pub struct HintsArgs {
    /// Display name of the type (e.g. "Memory", "Buildpack").
    pub type_name: String,

    /// Emit JSON instead of one suggestion per line.
    #[arg(long)]
    pub json: bool,
}

/// Execute the hints subcommand.
pub fn run_hints(args: &HintsArgs, config: &HintSourceConfig) -> Result<u8> {
    let schema = crate::build_schema(config)?;
    let Some(hints) = collect_hints(&schema, &args.type_name)? else {
        eprintln!("unknown type: {}", args.type_name);
        return Ok(2);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hints)?);
    } else {
        for hint in &hints {
            match &hint.label {
                Some(label) => println!("{}\t{label}", hint.value),
                None => println!("{}", hint.value),
            }
        }
    }
    Ok(0)
}

/// Suggestions for the named type, or `None` if the schema has no such type.
///
/// Dynamic sources are awaited on a private current-thread runtime.
pub fn collect_hints(schema: &dyn YamlSchema, type_name: &str) -> Result<Option<Vec<ValueHint>>> {
    let Some(ty) = crate::find_type(schema, type_name) else {
        return Ok(None);
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let hints = runtime.block_on(schema.type_util().hints_for(&ty));
    tracing::debug!(type_name, count = hints.len(), "collected hints");
    Ok(Some(hints))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(hints: Vec<ValueHint>) -> Vec<String> {
        hints.into_iter().map(|h| h.value).collect()
    }

    #[test]
    fn memory_hints_are_static() {
        let schema = crate::build_schema(&HintSourceConfig::default()).unwrap();
        let hints = collect_hints(&schema, "Memory").unwrap().unwrap();
        assert_eq!(values(hints), ["256M", "512M", "1024M"]);
    }

    #[test]
    fn configured_buildpacks_are_offered() {
        let config = HintSourceConfig {
            buildpacks: Some(vec!["java_buildpack".into(), "go_buildpack".into()]),
            ..Default::default()
        };
        let schema = crate::build_schema(&config).unwrap();
        let hints = collect_hints(&schema, "Buildpack").unwrap().unwrap();
        assert_eq!(values(hints), ["java_buildpack", "go_buildpack"]);
    }

    #[test]
    fn unconfigured_services_offer_nothing() {
        let schema = crate::build_schema(&HintSourceConfig::default()).unwrap();
        let hints = collect_hints(&schema, "Service").unwrap().unwrap();
        assert!(hints.is_empty());
    }

    #[test]
    fn unknown_type_is_none() {
        let schema = crate::build_schema(&HintSourceConfig::default()).unwrap();
        assert!(collect_hints(&schema, "Flux Capacitor").unwrap().is_none());
    }
}
