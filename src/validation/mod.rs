//! Configuration validator
//!
//! Binds a rendered configuration document to the [`ConfigType`] discovered in the
//! artifact and collects every constraint violation instead of stopping at the first.
//!
//! - [`schema`]: descriptor types exported by the artifact
//! - [`value`]: typed deserialization of the document
//! - [`constraints`]: constraint checking over the bound value

pub mod constraints;
pub mod schema;
pub mod value;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, file_read_failed, validation_failed};
use crate::introspect::{ArtifactOpener, Discovery, Introspector, NativeLoader};
use crate::report::Reporter;

pub use constraints::ConstraintChecker;
pub use schema::{ConfigType, Constraint, Field, FieldType};
pub use value::{ConfigValue, deserialize};

/// One failed constraint at a property path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    /// Dotted property path, with `[i]` for list items and `[key]` for map entries
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// One indented line per violation
pub fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Why validation did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The project does not declare the runtime dependency
    NotDeclared,
    /// The artifact does not export the runtime ABI marker
    DependencyMissing,
    /// Validation is turned off in the package configuration
    Disabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NotDeclared => "runtime dependency not declared by the project",
            SkipReason::DependencyMissing => "artifact does not link the svcdeb runtime",
            SkipReason::Disabled => "validation disabled",
        };
        f.write_str(text)
    }
}

/// State of configuration validation for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationOutcome {
    #[default]
    NotAttempted,
    Skipped(SkipReason),
    Passed,
    Failed(Vec<Violation>),
}

impl ValidationOutcome {
    /// Turn a failed outcome into the terminal error
    pub fn into_result(self) -> Result<Self> {
        match self {
            ValidationOutcome::Failed(violations) => Err(validation_failed(violations)),
            other => Ok(other),
        }
    }

    pub fn is_terminal_success(&self) -> bool {
        matches!(self, ValidationOutcome::Passed | ValidationOutcome::Skipped(_))
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::NotAttempted => f.write_str("not attempted"),
            ValidationOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            ValidationOutcome::Passed => f.write_str("passed"),
            ValidationOutcome::Failed(v) => write!(f, "failed with {} violation(s)", v.len()),
        }
    }
}

/// Validate `document` against `config_type`
///
/// Returns every violation sorted by path, then message; empty means valid.
/// Documents that cannot be bound at all are errors, not violations.
pub fn validate(document: &str, config_type: &ConfigType) -> Result<Vec<Violation>> {
    let checker = ConstraintChecker::new(config_type)?;
    let value = deserialize(document, config_type)?;
    let mut violations = checker.check(&value, config_type);
    violations.sort();
    Ok(violations)
}

/// Discover the configuration type in `artifact` and validate the document at `document`
pub fn check_artifact(
    artifact: &Path,
    document: &Path,
    reporter: &dyn Reporter,
) -> Result<ValidationOutcome> {
    check_artifact_with(&NativeLoader, artifact, document, reporter)
}

/// [`check_artifact`] with artifacts opened through `opener`
pub fn check_artifact_with(
    opener: &dyn ArtifactOpener,
    artifact: &Path,
    document: &Path,
    reporter: &dyn Reporter,
) -> Result<ValidationOutcome> {
    let introspector = Introspector::with_opener(opener, reporter);
    let config_type = match introspector.locate_configuration_type(artifact)? {
        Discovery::Found(config_type) => config_type,
        Discovery::Skipped(reason) => {
            reporter.warn(&format!("Skipping configuration validation: {reason}"));
            return Ok(ValidationOutcome::Skipped(reason));
        }
    };

    let text = std::fs::read_to_string(document).map_err(|e| file_read_failed(document, e))?;
    let violations = validate(&text, &config_type)?;
    if violations.is_empty() {
        reporter.info(&format!(
            "Configuration {} is valid for {}",
            document.display(),
            config_type.name
        ));
        Ok(ValidationOutcome::Passed)
    } else {
        for violation in &violations {
            reporter.warn(&violation.to_string());
        }
        Ok(ValidationOutcome::Failed(violations))
    }
}
