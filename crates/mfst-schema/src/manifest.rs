//! # Manifest Schema
//!
//! The concrete grammar for deployment manifest files. A manifest has one
//! top-level bean holding an `applications` list plus defaults that every
//! application inherits, and an `Application` bean describing a single
//! entry of that list.
//!
//! ## Shared properties
//!
//! Both beans are built from one list of property instances. Each
//! [`YPropertyRef`] is built once and attached to both beans, so a change
//! to a property's type or description applies to both. The only
//! difference is [`TOPLEVEL_EXCLUDED`]: `name`, `host` and `hosts` identify
//! a single application and are meaningless as manifest-wide defaults.

use std::sync::Arc;

use mfst_core::parsers::{
    positive_integer, strictly_positive_integer, KnownValuesParser, MemoryParser, NonEmptyString,
    RouteValueParser,
};
use mfst_core::{
    BuildResult, DescriptionSource, IntegerRange, LazyDescription, YPropertyRef, YTypeFactory,
    YTypeRef, YTypeUtil, YamlSchema,
};

use crate::providers::ManifestHintProviders;

/// Properties that only make sense inside an application entry.
pub const TOPLEVEL_EXCLUDED: [&str; 3] = ["name", "host", "hosts"];

/// Display name of the top-level bean.
pub const TOPLEVEL_TYPE_NAME: &str = "Cloudfoundry Manifest";

/// Display name of the application bean.
pub const APPLICATION_TYPE_NAME: &str = "Application";

/// Suggestions offered for memory and disk quotas.
pub const MEMORY_HINTS: [&str; 3] = ["256M", "512M", "1024M"];

/// The manifest type graph.
#[derive(Debug)]
pub struct ManifestSchema {
    toplevel: YTypeRef,
    application: YTypeRef,
    type_util: YTypeUtil,
}

impl ManifestSchema {
    /// Build the schema.
    ///
    /// `providers` supplies the optional dynamic sources for buildpacks,
    /// services and domains; `descriptions` resolves property documentation
    /// by property name.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaBuildError`](mfst_core::SchemaBuildError) if the
    /// definition below is inconsistent (a duplicated property, a bad enum
    /// deprecation).
    pub fn new(
        providers: &ManifestHintProviders,
        descriptions: Arc<dyn DescriptionSource>,
    ) -> BuildResult<Self> {
        let f = YTypeFactory::new();
        let describe = |key: &str| LazyDescription::new(Arc::clone(&descriptions), key);

        let t_path = f.atomic("Path").into_ref();

        let mut t_buildpack = f.atomic("Buildpack");
        if let Some(source) = &providers.buildpacks {
            t_buildpack.add_hint_provider(source.clone());
        }
        let t_buildpack = t_buildpack.into_ref();

        let mut t_domain = f.atomic("Domain");
        if let Some(source) = &providers.domains {
            t_domain.add_hint_provider(source.clone());
        }
        let t_domain = t_domain.into_ref();

        let mut t_service = f.atomic("Service");
        if let Some(source) = &providers.services {
            t_service
                .add_hint_provider(source.clone())
                .parse_with(Arc::new(KnownValuesParser::new("Service", source.clone())));
        }
        let t_service = t_service.into_ref();

        let t_boolean = f.enum_type("boolean", ["true", "false"])?.into_ref();

        let mut t_ne_string = f.atomic("String");
        t_ne_string.parse_with(Arc::new(NonEmptyString));
        let t_ne_string = t_ne_string.into_ref();
        let t_string = f.atomic("String").into_ref();
        let t_strings = f.seq(&t_string);

        // routes:
        // - route: myapp.example.com
        let mut t_route_string = f.atomic("route");
        t_route_string.parse_with(Arc::new(RouteValueParser::new(providers.domains.clone())));
        let t_route_string = t_route_string.into_ref();
        let mut route = f.bean("Route");
        route.add_property(f.prop("route", &t_route_string).required(true).into_ref())?;
        let route = route.into_ref();

        let mut t_memory = f.atomic("Memory");
        t_memory
            .add_hints(MEMORY_HINTS)
            .parse_with(Arc::new(MemoryParser));
        let t_memory = t_memory.into_ref();

        let t_health_check_type = f
            .enum_builder("Health Check Type", ["none", "process", "port", "http"])
            .deprecate_with_replacement("none", "process")
            .build()?
            .into_ref();

        let mut t_strictly_pos_integer = f.atomic("Strictly Positive Integer");
        t_strictly_pos_integer.parse_with(Arc::new(strictly_positive_integer()));
        let t_strictly_pos_integer = t_strictly_pos_integer.into_ref();

        let mut t_pos_integer = f.atomic("Positive Integer");
        t_pos_integer.parse_with(Arc::new(positive_integer()));
        let t_pos_integer = t_pos_integer.into_ref();

        let t_env = f.map(&t_string, &t_string);

        let props: Vec<YPropertyRef> = [
            f.prop("buildpack", &t_buildpack),
            f.prop("command", &t_string),
            f.prop("disk_quota", &t_memory),
            f.prop("domain", &t_domain),
            f.prop("domains", &f.seq(&t_domain)),
            f.prop("env", &t_env),
            f.prop("host", &t_string),
            f.prop("hosts", &t_strings),
            f.prop("instances", &t_strictly_pos_integer),
            f.prop("memory", &t_memory),
            f.prop("name", &t_ne_string).required(true),
            f.prop("no-hostname", &t_boolean),
            f.prop("no-route", &t_boolean),
            f.prop("path", &t_path),
            f.prop("random-route", &t_boolean),
            f.prop("routes", &f.seq(&route)),
            f.prop("services", &f.seq(&t_service)),
            f.prop("stack", &t_string),
            f.prop("timeout", &t_pos_integer),
            f.prop("health-check-type", &t_health_check_type),
            f.prop("health-check-http-endpoint", &t_ne_string),
        ]
        .into_iter()
        .map(|p| {
            let description = describe(p.name());
            p.described_by(description).into_ref()
        })
        .collect();

        let mut application = f.bean(APPLICATION_TYPE_NAME);
        for prop in &props {
            application.add_property(Arc::clone(prop))?;
        }
        let application = application.into_ref();

        let mut toplevel = f.bean(TOPLEVEL_TYPE_NAME);
        toplevel.add_property(f.prop("applications", &f.seq(&application)).into_ref())?;
        toplevel.add_property(
            f.prop("inherit", &t_string)
                .described_by(describe("inherit"))
                .into_ref(),
        )?;
        for prop in props.iter().filter(|p| !TOPLEVEL_EXCLUDED.contains(&p.name())) {
            toplevel.add_property(Arc::clone(prop))?;
        }

        tracing::debug!(
            toplevel_properties = toplevel.len(),
            application_properties = props.len(),
            "manifest schema built"
        );

        Ok(Self {
            toplevel: toplevel.into_ref(),
            application,
            type_util: *f.type_util(),
        })
    }

    /// The bean describing one entry of `applications`.
    pub fn application_type(&self) -> &YTypeRef {
        &self.application
    }
}

impl YamlSchema for ManifestSchema {
    fn top_level_type(&self) -> &YTypeRef {
        &self.toplevel
    }

    fn type_util(&self) -> &YTypeUtil {
        &self.type_util
    }

    /// Manifests are single-document YAML files.
    fn expected_number_of_documents(&self) -> IntegerRange {
        IntegerRange::exactly(1)
    }
}
