//! Integration tests: the manifest schema as seen by a consuming engine.
//!
//! These exercise the schema only through the public `YamlSchema` and
//! `YTypeUtil` surface, the way a completion/validation engine would.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mfst_core::{
    HintError, HintProvider, HintSource, NoDescriptions, ParseErrorKind, ParsedValue, Renderable,
    StaticDescriptions, StaticHints, TypeKind, ValueHint, YType, YamlSchema,
};
use mfst_schema::{ManifestHintProviders, ManifestSchema, TOPLEVEL_EXCLUDED};

fn bare_schema() -> ManifestSchema {
    ManifestSchema::new(&ManifestHintProviders::none(), Arc::new(NoDescriptions))
        .expect("manifest schema should build")
}

fn names(schema: &ManifestSchema, ty: &YType) -> BTreeSet<String> {
    schema
        .type_util()
        .property_names(ty)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Provider whose platform is unreachable.
#[derive(Debug)]
struct Unreachable(&'static str);

#[async_trait]
impl HintProvider for Unreachable {
    fn name(&self) -> &str {
        self.0
    }

    async fn fetch(&self) -> Result<Vec<ValueHint>, HintError> {
        Err(HintError::Unavailable {
            source_name: self.0.to_string(),
            reason: "platform unreachable".to_string(),
        })
    }
}

#[test]
fn toplevel_is_application_minus_excluded() {
    let schema = bare_schema();
    let app = names(&schema, schema.application_type());
    let top = names(&schema, schema.top_level_type());

    let excluded: BTreeSet<String> = TOPLEVEL_EXCLUDED.iter().map(|s| s.to_string()).collect();
    let top_only: BTreeSet<String> = ["applications", "inherit"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let expected: BTreeSet<String> = app.difference(&excluded).cloned().collect();
    let actual: BTreeSet<String> = top.difference(&top_only).cloned().collect();
    assert_eq!(actual, expected);
    assert!(excluded.is_subset(&app));
    assert!(excluded.is_disjoint(&top));
}

#[test]
fn shared_properties_are_the_same_instances() {
    let schema = bare_schema();
    let u = schema.type_util();
    for prop in u.properties(schema.application_type()) {
        if TOPLEVEL_EXCLUDED.contains(&prop.name()) {
            continue;
        }
        let top = u
            .property(schema.top_level_type(), prop.name())
            .unwrap_or_else(|| panic!("top level is missing '{}'", prop.name()));
        assert!(Arc::ptr_eq(&top, &prop), "'{}' was copied", prop.name());
    }
}

#[test]
fn only_name_is_required_on_application() {
    let schema = bare_schema();
    let u = schema.type_util();
    let required: Vec<String> = u
        .required_properties(schema.application_type())
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(required, ["name"]);
    assert!(u.required_properties(schema.top_level_type()).is_empty());
}

#[test]
fn route_property_is_required() {
    let schema = bare_schema();
    let u = schema.type_util();
    let routes = u.property(schema.application_type(), "routes").unwrap();
    let route = u.domain_type(routes.ty()).unwrap();
    assert_eq!(u.kind(route), TypeKind::Bean);
    let inner = u.property(route, "route").unwrap();
    assert!(inner.is_required());
    assert_eq!(u.property_names(route), ["route"]);
}

#[test]
fn health_check_none_is_deprecated_for_process() {
    let schema = bare_schema();
    let u = schema.type_util();
    let prop = u.property(schema.application_type(), "health-check-type").unwrap();
    let members = u.enum_members(prop.ty());

    let values: Vec<&str> = members.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, ["none", "process", "port", "http"]);
    for m in &members {
        if m.value == "none" {
            assert_eq!(m.replacement.as_deref(), Some("process"));
        } else {
            assert!(!m.is_deprecated(), "{} should not be deprecated", m.value);
        }
    }

    let check = u.check_scalar(prop.ty(), "none").expect("deprecated values still parse");
    assert_eq!(check.deprecation.map(|d| d.replacement), Some("process".to_string()));
    assert!(u.check_scalar(prop.ty(), "tcp").is_err());
}

#[test]
fn scalar_properties_parse_as_declared() {
    let schema = bare_schema();
    let u = schema.type_util();
    let app = schema.application_type();
    let check = |prop: &str, raw: &str| {
        let ty = u.property(app, prop).unwrap().ty().clone();
        u.check_scalar(&ty, raw)
    };

    assert_eq!(check("instances", "3").unwrap().value, ParsedValue::Integer(3));
    assert_eq!(check("instances", "0").unwrap_err().kind, ParseErrorKind::BelowMinimum { min: 1 });
    assert_eq!(check("timeout", "sixty").unwrap_err().kind, ParseErrorKind::NotAnInteger);
    assert_eq!(check("memory", "512M").unwrap().value.to_string(), "512M");
    assert!(check("disk_quota", "0M").is_err());
    assert_eq!(check("name", " ").unwrap_err().kind, ParseErrorKind::Empty);
    assert!(check("no-route", "true").is_ok());
    assert!(check("no-route", "yes").is_err());
    assert!(check("health-check-http-endpoint", "").is_err());
    assert!(check("command", "").is_ok());
}

#[test]
fn service_without_source_accepts_any_non_empty_name() {
    let schema = bare_schema();
    let u = schema.type_util();
    let services = u.property(schema.application_type(), "services").unwrap();
    let service = u.domain_type(services.ty()).unwrap();
    assert!(u.check_scalar(service, "whatever-db").is_ok());
}

#[test]
fn service_with_unreachable_source_accepts_any_name() {
    let providers = ManifestHintProviders::none().with_services(Arc::new(Unreachable("services")));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let services = u.property(schema.application_type(), "services").unwrap();
    let service = u.domain_type(services.ty()).unwrap();
    assert!(u.check_scalar(service, "whatever-db").is_ok());
    assert_eq!(u.check_scalar(service, "").unwrap_err().kind, ParseErrorKind::Empty);
}

#[test]
fn service_with_known_names_restricts_values() {
    let providers = ManifestHintProviders::none()
        .with_services(Arc::new(StaticHints::new("services", ["mysql", "redis"])));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let services = u.property(schema.top_level_type(), "services").unwrap();
    let service = u.domain_type(services.ty()).unwrap();
    assert!(u.check_scalar(service, "redis").is_ok());
    assert!(matches!(
        u.check_scalar(service, "oracle").unwrap_err().kind,
        ParseErrorKind::UnknownValue { .. }
    ));
}

#[test]
fn route_domain_is_matched_against_domain_source() {
    let providers = ManifestHintProviders::none()
        .with_domains(Arc::new(StaticHints::new("domains", ["apps.example.com"])));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let routes = u.property(schema.application_type(), "routes").unwrap();
    let route_bean = u.domain_type(routes.ty()).unwrap();
    let route = u.property(route_bean, "route").unwrap();

    match u.check_scalar(route.ty(), "web.apps.example.com/path").unwrap().value {
        ParsedValue::Route(r) => assert_eq!(r.domain.as_deref(), Some("apps.example.com")),
        other => panic!("expected a route, got {other:?}"),
    }
    // Unknown domains are accepted.
    assert!(u.check_scalar(route.ty(), "web.elsewhere.io").is_ok());
}

/// A platform client that can only list its values asynchronously.
#[derive(Debug)]
struct Platform {
    name: &'static str,
    values: &'static [&'static str],
}

#[async_trait]
impl HintProvider for Platform {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> Result<Vec<ValueHint>, HintError> {
        Ok(self.values.iter().copied().map(ValueHint::from).collect())
    }
}

#[tokio::test]
async fn service_names_are_validated_after_platform_fetch() {
    let providers = ManifestHintProviders::none().with_services(Arc::new(Platform {
        name: "services",
        values: &["mysql", "redis"],
    }));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let services = u.property(schema.application_type(), "services").unwrap();
    let service = u.domain_type(services.ty()).unwrap();

    // Nothing fetched yet: any non-empty name passes.
    assert!(u.check_scalar(service, "oracle").is_ok());

    let offered: Vec<String> = u.hints_for(service).await.into_iter().map(|h| h.value).collect();
    assert_eq!(offered, ["mysql", "redis"]);

    assert!(u.check_scalar(service, "redis").is_ok());
    assert!(matches!(
        u.check_scalar(service, "oracle").unwrap_err().kind,
        ParseErrorKind::UnknownValue { .. }
    ));
}

#[tokio::test]
async fn route_domains_match_after_platform_fetch() {
    let providers = ManifestHintProviders::none().with_domains(Arc::new(Platform {
        name: "domains",
        values: &["apps.example.com"],
    }));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let app = schema.application_type();
    let routes = u.property(app, "routes").unwrap();
    let route = u.property(u.domain_type(routes.ty()).unwrap(), "route").unwrap();
    let domain = u.property(app, "domain").unwrap();

    let matched = |raw: &str| match u.check_scalar(route.ty(), raw).unwrap().value {
        ParsedValue::Route(r) => r.domain,
        other => panic!("expected a route, got {other:?}"),
    };
    assert_eq!(matched("web.apps.example.com"), None);

    assert_eq!(u.hints_for(domain.ty()).await.len(), 1);
    assert_eq!(matched("web.apps.example.com").as_deref(), Some("apps.example.com"));
}

#[tokio::test]
async fn hints_come_from_injected_sources() {
    let providers = ManifestHintProviders::none()
        .with_buildpacks(Arc::new(StaticHints::new("buildpacks", ["java_buildpack"])))
        .with_domains(Arc::new(Unreachable("domains")));
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let app = schema.application_type();

    let hints = |prop: &str| u.property(app, prop).unwrap().ty().clone();
    let buildpack = u.hints_for(&hints("buildpack")).await;
    assert_eq!(buildpack, vec![ValueHint::new("java_buildpack")]);

    let domain = u.hints_for(&hints("domain")).await;
    assert!(domain.is_empty(), "failing source must degrade to no hints");

    let memory: Vec<String> = u
        .hints_for(&hints("memory"))
        .await
        .into_iter()
        .map(|h| h.value)
        .collect();
    assert_eq!(memory, ["256M", "512M", "1024M"]);

    let health: Vec<String> = u
        .hints_for(&hints("health-check-type"))
        .await
        .into_iter()
        .map(|h| h.value)
        .collect();
    assert_eq!(health, ["process", "port", "http"]);
}

#[tokio::test]
async fn missing_sources_offer_no_dynamic_hints() {
    let schema = bare_schema();
    let u = schema.type_util();
    let buildpack = u.property(schema.application_type(), "buildpack").unwrap();
    assert!(u.hints_for(buildpack.ty()).await.is_empty());
}

#[tokio::test]
async fn slow_source_is_bounded() {
    #[derive(Debug)]
    struct Slow;

    #[async_trait]
    impl HintProvider for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn fetch(&self) -> Result<Vec<ValueHint>, HintError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![ValueHint::new("too-late")])
        }
    }

    let providers = ManifestHintProviders {
        buildpacks: Some(HintSource::new(Arc::new(Slow)).with_timeout(Duration::from_millis(20))),
        ..Default::default()
    };
    let schema = ManifestSchema::new(&providers, Arc::new(NoDescriptions)).unwrap();
    let u = schema.type_util();
    let buildpack = u.property(schema.top_level_type(), "buildpack").unwrap();
    assert!(u.hints_for(buildpack.ty()).await.is_empty());
}

#[test]
fn descriptions_resolve_by_property_name() {
    let descriptions = StaticDescriptions::new()
        .with("memory", Renderable::Markdown("Memory limit.".into()))
        .with("inherit", Renderable::Markdown("Parent manifest.".into()));
    let schema =
        ManifestSchema::new(&ManifestHintProviders::none(), Arc::new(descriptions)).unwrap();
    let u = schema.type_util();

    assert_eq!(u.describe(schema.application_type(), "memory").text(), Some("Memory limit."));
    assert_eq!(u.describe(schema.top_level_type(), "memory").text(), Some("Memory limit."));
    assert_eq!(u.describe(schema.top_level_type(), "inherit").text(), Some("Parent manifest."));
    assert_eq!(u.describe(schema.application_type(), "stack"), Renderable::NoDescription);
    assert_eq!(u.describe(schema.application_type(), "no-such-prop"), Renderable::NoDescription);
}

#[test]
fn schema_is_readable_from_many_threads() {
    let schema = Arc::new(bare_schema());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                let u = schema.type_util();
                let ty = u.property(schema.application_type(), "memory").unwrap().ty().clone();
                u.check_scalar(&ty, "1G").map(|c| c.value.to_string())
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Ok("1G".to_string()));
    }
}

#[test]
fn document_cardinality_is_exactly_one() {
    let range = bare_schema().expected_number_of_documents();
    assert!(range.check_document_count(1).is_ok());
    assert!(range.check_document_count(0).is_err());
    assert!(range.check_document_count(2).is_err());
}
