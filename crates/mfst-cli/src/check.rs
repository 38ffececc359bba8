//! # Check Subcommand
//!
//! Checks a manifest file against the schema:
//!
//! 1. The file must hold the expected number of YAML documents.
//! 2. Each document is walked against the type graph. Scalars go through
//!    their type's parser, beans report missing required properties and
//!    unknown keys, and deprecated enum values produce warnings.
//!
//! Exit status is 1 when any error is reported, 0 otherwise. Warnings do
//! not affect the exit status.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use mfst_core::{YType, YTypeRef, YTypeUtil, YamlSchema};
use mfst_schema::HintSourceConfig;

/// Arguments for the `mfst check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest file to check.
    pub file: PathBuf,

    /// Emit diagnostics as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Location as a dotted path, e.g. `applications[0].memory`. Empty for
    /// the document itself.
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.to_string(),
            message: message.into(),
        }
    }

    fn warning(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_empty() {
            write!(f, "{severity}: {}", self.message)
        } else {
            write!(f, "{severity}: {}: {}", self.path, self.message)
        }
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &HintSourceConfig) -> Result<u8> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read manifest: {}", args.file.display()))?;
    let schema = crate::build_schema(config)?;
    let diagnostics = check_source(&schema, &text);

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    tracing::info!(
        file = %args.file.display(),
        errors,
        warnings = diagnostics.len() - errors,
        "manifest checked"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else if diagnostics.is_empty() {
        println!("OK: {}", args.file.display());
    } else {
        for d in &diagnostics {
            println!("{d}");
        }
    }

    Ok(if errors > 0 { 1 } else { 0 })
}

/// Check YAML text against a schema.
pub fn check_source(schema: &dyn YamlSchema, text: &str) -> Vec<Diagnostic> {
    let mut documents = Vec::new();
    // The parser reports one null document for a stream with no content.
    if !is_blank(text) {
        for document in serde_yaml::Deserializer::from_str(text) {
            match Value::deserialize(document) {
                Ok(value) => documents.push(value),
                Err(e) => return vec![Diagnostic::error("", format!("invalid YAML: {e}"))],
            }
        }
    }

    let mut out = Vec::new();
    if let Err(e) = schema
        .expected_number_of_documents()
        .check_document_count(documents.len())
    {
        out.push(Diagnostic::error("", e.to_string()));
        return out;
    }

    let u = schema.type_util();
    for document in &documents {
        walk(u, schema.top_level_type(), document, "", &mut out);
    }
    out
}

/// True if the text holds only whitespace and comments.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn walk(u: &YTypeUtil, ty: &YTypeRef, value: &Value, path: &str, out: &mut Vec<Diagnostic>) {
    // An empty optional value (`services:` with nothing after it) is not
    // checked. Required properties are handled by the owning bean.
    if value.is_null() {
        return;
    }
    match ty.as_ref() {
        YType::Atomic(_) => {
            let Some(raw) = scalar_text(value) else {
                out.push(mismatch(path, ty, value));
                return;
            };
            match u.check_scalar(ty, &raw) {
                Ok(check) => {
                    if let Some(deprecation) = check.deprecation {
                        out.push(Diagnostic::warning(path, deprecation.to_string()));
                    }
                }
                Err(e) => out.push(Diagnostic::error(path, e.to_string())),
            }
        }
        YType::Bean(_) => {
            let Value::Mapping(mapping) = value else {
                out.push(mismatch(path, ty, value));
                return;
            };
            for (key, child) in mapping {
                let Some(key) = key.as_str() else {
                    out.push(Diagnostic::error(path, "property names must be strings"));
                    continue;
                };
                let child_path = join(path, key);
                match u.property(ty, key) {
                    Some(prop) if prop.is_required() && child.is_null() => {
                        out.push(Diagnostic::error(
                            &child_path,
                            format!("required property '{key}' has no value"),
                        ));
                    }
                    Some(prop) => walk(u, prop.ty(), child, &child_path, out),
                    None => out.push(Diagnostic::warning(
                        &child_path,
                        format!("unknown property for {}", ty.name()),
                    )),
                }
            }
            for prop in u.required_properties(ty) {
                if !mapping.contains_key(prop.name()) {
                    out.push(Diagnostic::error(
                        path,
                        format!("missing required property '{}'", prop.name()),
                    ));
                }
            }
        }
        YType::Seq(seq) => {
            let Value::Sequence(items) = value else {
                out.push(mismatch(path, ty, value));
                return;
            };
            for (i, item) in items.iter().enumerate() {
                walk(u, seq.element(), item, &format!("{path}[{i}]"), out);
            }
        }
        YType::Map(map) => {
            let Value::Mapping(mapping) = value else {
                out.push(mismatch(path, ty, value));
                return;
            };
            for (key, child) in mapping {
                let key_text = scalar_text(key).unwrap_or_default();
                let child_path = join(path, &key_text);
                walk(u, map.key(), key, &child_path, out);
                walk(u, map.value(), child, &child_path, out);
            }
        }
    }
}

/// A value whose YAML shape does not fit the expected type.
fn mismatch(path: &str, ty: &YType, value: &Value) -> Diagnostic {
    Diagnostic::error(path, format!("expected {}, found a {}", ty.name(), shape(value)))
}

/// Text of a YAML scalar as a parser sees it.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) | Value::Number(_) | Value::String(_) => "scalar",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
