//! # Schema Subcommand
//!
//! Prints the manifest type graph, either as an indented outline or as
//! JSON for tooling that wants to consume the schema without linking the
//! Rust crates.
//!
//! A bean that already appears on the current path is printed by name only,
//! so the output is finite for any graph.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use mfst_core::{YType, YTypeRef, YTypeUtil, YamlSchema};
use mfst_schema::HintSourceConfig;

/// Arguments for the `mfst schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Emit JSON instead of an indented outline.
    #[arg(long)]
    pub json: bool,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, config: &HintSourceConfig) -> Result<u8> {
    let schema = crate::build_schema(config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&schema))?);
    } else {
        print!("{}", render_text(&schema));
    }
    Ok(0)
}

/// Indented outline of the graph, one property per line.
pub fn render_text(schema: &dyn YamlSchema) -> String {
    let mut out = String::new();
    let root = schema.top_level_type();
    let _ = writeln!(out, "{}", root.name());
    let mut path = vec![root.clone()];
    outline(schema.type_util(), root, 1, &mut path, &mut out);
    out
}

fn outline(u: &YTypeUtil, ty: &YTypeRef, depth: usize, path: &mut Vec<YTypeRef>, out: &mut String) {
    let indent = "  ".repeat(depth);
    for prop in u.properties(ty) {
        let marker = if prop.is_required() { " (required)" } else { "" };
        let _ = writeln!(out, "{indent}{}: {}{marker}", prop.name(), prop.ty().name());

        let members = u.enum_members(prop.ty());
        if !members.is_empty() {
            let rendered: Vec<String> = members
                .iter()
                .map(|m| match &m.replacement {
                    Some(r) => format!("{} (deprecated, use {r})", m.value),
                    None => m.value.clone(),
                })
                .collect();
            let _ = writeln!(out, "{indent}  values: {}", rendered.join(", "));
        }

        // Descend into beans reachable through the property, directly or
        // as a container element.
        let Some(bean) = bean_of(u, prop.ty()) else {
            continue;
        };
        if path.iter().any(|p| Arc::ptr_eq(p, bean)) {
            continue;
        }
        path.push(bean.clone());
        outline(u, bean, depth + 1, path, out);
        path.pop();
    }
}

fn bean_of<'a>(u: &YTypeUtil, ty: &'a YTypeRef) -> Option<&'a YTypeRef> {
    if u.is_bean(ty) {
        return Some(ty);
    }
    u.domain_type(ty).filter(|t| u.is_bean(t))
}

/// JSON rendering of the graph rooted at the top-level type.
pub fn render_json(schema: &dyn YamlSchema) -> Value {
    let mut path = Vec::new();
    let root = node_json(schema.type_util(), schema.top_level_type(), &mut path);
    json!({
        "documents": schema.expected_number_of_documents().to_string(),
        "root": root,
    })
}

fn node_json(u: &YTypeUtil, ty: &YTypeRef, path: &mut Vec<YTypeRef>) -> Value {
    let mut node = json!({
        "name": ty.name(),
        "kind": u.kind(ty),
    });
    match ty.as_ref() {
        YType::Atomic(_) => {
            let members = u.enum_members(ty);
            if !members.is_empty() {
                node["members"] = json!(members);
            }
        }
        YType::Bean(_) => {
            if path.iter().any(|p| Arc::ptr_eq(p, ty)) {
                node["recursive"] = json!(true);
                return node;
            }
            path.push(ty.clone());
            let props: Vec<Value> = u
                .properties(ty)
                .iter()
                .map(|p| {
                    let mut entry = json!({
                        "name": p.name(),
                        "required": p.is_required(),
                        "type": node_json(u, p.ty(), path),
                    });
                    if let Some(text) = p.description().text() {
                        entry["description"] = json!(text);
                    }
                    entry
                })
                .collect();
            path.pop();
            node["properties"] = json!(props);
        }
        YType::Seq(seq) => {
            node["element"] = node_json(u, seq.element(), path);
        }
        YType::Map(map) => {
            node["key"] = node_json(u, map.key(), path);
            node["value"] = node_json(u, map.value(), path);
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> mfst_schema::ManifestSchema {
        crate::build_schema(&HintSourceConfig::default()).unwrap()
    }

    #[test]
    fn text_outline_nests_applications() {
        let text = render_text(&schema());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Cloudfoundry Manifest"));
        assert_eq!(lines.next(), Some("  applications: Application[]"));
        assert!(text.contains("\n    name: String (required)\n"));
        assert!(text.contains("\n      route: route (required)\n"));
        assert!(text.contains("values: none (deprecated, use process), process, port, http"));
    }

    #[test]
    fn json_lists_top_level_properties() {
        let value = render_json(&schema());
        assert_eq!(value["documents"], "exactly 1");
        let root = &value["root"];
        assert_eq!(root["kind"], "bean");
        let props = root["properties"].as_array().unwrap();
        assert_eq!(props[0]["name"], "applications");
        assert_eq!(props[0]["type"]["kind"], "sequence");
        assert_eq!(props[0]["type"]["element"]["name"], "Application");
        assert!(props.iter().all(|p| p["name"] != "name"));
    }

    #[test]
    fn json_marks_deprecated_members() {
        let value = render_json(&schema());
        let props = value["root"]["properties"].as_array().unwrap();
        let health = props
            .iter()
            .find(|p| p["name"] == "health-check-type")
            .unwrap();
        let members = health["type"]["members"].as_array().unwrap();
        assert_eq!(members[0], json!({"value": "none", "replacement": "process"}));
        assert_eq!(members[1], json!({"value": "process"}));
    }
}
