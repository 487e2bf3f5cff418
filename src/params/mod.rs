//! Parameter context for template rendering
//!
//! Built once per run from the package configuration and never mutated afterwards.
//! Roots: `project`, `deb`, `runtime`, `unix`, `path`, and the free-form overrides
//! under both `service` and `svc`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{PackageConfig, RuntimeConfig};
use crate::error::{Result, config_invalid};

/// Names of the two aliases the free-form overrides are exposed under
pub const OVERRIDE_ALIASES: [&str; 2] = ["service", "svc"];

/// Immutable name → value environment consumed by the template renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterContext {
    roots: BTreeMap<String, Value>,
}

/// Project identity as seen by templates
#[derive(Serialize)]
struct ProjectView<'a> {
    name: &'a str,
    version: &'a str,
    description: Option<&'a str>,
    url: Option<&'a str>,
    artifact: String,
}

/// Runtime tuning plus the rendered `KEY="value"` environment lines
#[derive(Serialize)]
struct RuntimeView<'a> {
    #[serde(flatten)]
    config: &'a RuntimeConfig,
    environment: String,
}

impl<'a> RuntimeView<'a> {
    fn new(config: &'a RuntimeConfig) -> Self {
        let environment = config
            .env
            .iter()
            .map(|(key, value)| format!("{key}={}", shell_quote(value)))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            config,
            environment,
        }
    }
}

/// Single-quote `value` for a sourced shell file; nothing inside is expanded
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl ParameterContext {
    /// Build the context for a package run
    pub fn from_config(config: &PackageConfig) -> Result<Self> {
        let project = ProjectView {
            name: &config.project.name,
            version: &config.project.version,
            description: config.project.description.as_deref(),
            url: config.project.url.as_deref(),
            artifact: config.artifact_name(),
        };
        let overrides = Value::Object(
            config
                .service
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>(),
        );

        let mut builder = ParameterContextBuilder::default();
        builder
            .insert("project", &project)?
            .insert("deb", &config.deb_metadata()?)?
            .insert("runtime", &RuntimeView::new(&config.runtime))?
            .insert("unix", &config.unix_identity())?
            .insert("path", &config.layout())?;
        for alias in OVERRIDE_ALIASES {
            builder.insert_value(alias, overrides.clone());
        }
        Ok(builder.build())
    }

    /// Look up a dotted name such as `path.config_file`
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut segments = name.split('.');
        let root = self.roots.get(segments.next()?)?;
        segments.try_fold(root, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Render a looked-up value as template text.
    ///
    /// Scalars render bare; lists of scalars render space-separated; null and
    /// nested structures are not renderable.
    pub fn lookup_text(&self, name: &str) -> Option<String> {
        scalar_text(self.lookup(name)?).or_else(|| match self.lookup(name)? {
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.join(" ")),
            _ => None,
        })
    }

    /// Top-level names, sorted
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Collects roots before freezing them into a [`ParameterContext`]
#[derive(Debug, Default)]
pub struct ParameterContextBuilder {
    roots: BTreeMap<String, Value>,
}

impl ParameterContextBuilder {
    pub fn insert<T: Serialize>(&mut self, name: &str, value: &T) -> Result<&mut Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| config_invalid(format!("cannot expose '{name}' to templates: {e}")))?;
        self.roots.insert(name.to_string(), value);
        Ok(self)
    }

    pub fn insert_value(&mut self, name: &str, value: Value) -> &mut Self {
        self.roots.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> ParameterContext {
        ParameterContext { roots: self.roots }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use serde_json::json;

    fn sample_config() -> PackageConfig {
        let mut config = PackageConfig::new(
            ProjectConfig::new("hello", "1.0.0"),
            "/build/libhello.so",
            "/src/hello.yml",
        );
        config
            .service
            .insert("http_port".to_string(), json!(8080));
        config
            .service
            .insert("hosts".to_string(), json!(["a", "b"]));
        config
    }

    #[test]
    fn test_all_roots_present() {
        let context = ParameterContext::from_config(&sample_config()).unwrap();
        let roots: Vec<_> = context.roots().collect();
        assert_eq!(
            roots,
            vec!["deb", "path", "project", "runtime", "service", "svc", "unix"]
        );
    }

    #[test]
    fn test_lookup_nested_values() {
        let context = ParameterContext::from_config(&sample_config()).unwrap();
        assert_eq!(
            context.lookup_text("path.config_file").unwrap(),
            "/etc/hello/hello.yml"
        );
        assert_eq!(context.lookup_text("project.artifact").unwrap(), "libhello.so");
        assert_eq!(context.lookup_text("unix.user").unwrap(), "hello");
        assert_eq!(context.lookup_text("runtime.open_files").unwrap(), "65536");
    }

    #[test]
    fn test_override_aliases_share_values() {
        let context = ParameterContext::from_config(&sample_config()).unwrap();
        assert_eq!(context.lookup_text("service.http_port").unwrap(), "8080");
        assert_eq!(context.lookup_text("svc.http_port").unwrap(), "8080");
        assert_eq!(context.lookup_text("svc.hosts").unwrap(), "a b");
        assert_eq!(context.lookup_text("svc.hosts.1").unwrap(), "b");
    }

    #[test]
    fn test_runtime_environment_lines() {
        let mut config = sample_config();
        config
            .runtime
            .env
            .insert("RUST_LOG".to_string(), "info".to_string());
        config
            .runtime
            .env
            .insert("GREETING".to_string(), "say \"hi\"".to_string());
        let context = ParameterContext::from_config(&config).unwrap();
        assert_eq!(
            context.lookup_text("runtime.environment").unwrap(),
            "GREETING='say \"hi\"'\nRUST_LOG='info'"
        );
        assert_eq!(context.lookup_text("runtime.memory_limit").unwrap(), "256M");
    }

    #[test]
    fn test_runtime_environment_values_are_not_expanded() {
        let mut config = sample_config();
        for (key, value) in [
            ("HOME_DIR", "$HOME"),
            ("STAMP", "`date`"),
            ("WIN_PATH", r"C:\temp"),
            ("QUOTE", "it's"),
        ] {
            config.runtime.env.insert(key.to_string(), value.to_string());
        }
        let context = ParameterContext::from_config(&config).unwrap();
        let lines = context.lookup_text("runtime.environment").unwrap();
        assert!(lines.contains("HOME_DIR='$HOME'"));
        assert!(lines.contains("STAMP='`date`'"));
        assert!(lines.contains(r"WIN_PATH='C:\temp'"));
        assert!(lines.contains(r"QUOTE='it'\''s'"));
    }

    #[test]
    fn test_missing_and_non_scalar_lookups() {
        let context = ParameterContext::from_config(&sample_config()).unwrap();
        assert!(context.lookup("service.missing").is_none());
        assert!(context.lookup("nope").is_none());
        assert!(context.lookup_text("project.description").is_none());
        assert!(context.lookup_text("path").is_none());
    }
}
