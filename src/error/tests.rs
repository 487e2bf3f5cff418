//! Error type tests
//!
//! Tests for SvcdebError, its constructors and conversions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use miette::Diagnostic;

use super::*;
use crate::validation::Violation;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = SvcdebError::SourceNotFound {
        path: "/src/extra.conf".to_string(),
    };
    assert_eq!(err.to_string(), "Resource source not found: /src/extra.conf");
}

#[test]
fn test_error_code() {
    let err = duplicate_destination("/etc/app/app.yml", "config template", "files[0]");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("svcdeb::config::duplicate_destination".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SvcdebError = io_err.into();
    assert!(matches!(err, SvcdebError::IoError { .. }));
    assert_eq!(err.category(), ErrorCategory::Extraction);
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let err: SvcdebError = parse_result.unwrap_err().into();
    assert!(matches!(err, SvcdebError::ConfigParseFailed { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("invalid json content");
    let err: SvcdebError = parse_result.unwrap_err().into();
    assert!(matches!(err, SvcdebError::ConfigParseFailed { .. }));
}

test_error_contains!(
    test_duplicate_destination_names_both_sources,
    duplicate_destination("/opt/app/bin/start.sh", "embedded start.sh", "files[2]"),
    "/opt/app/bin/start.sh",
    "embedded start.sh",
    "files[2]"
);

test_error_contains!(
    test_nested_destination_names_both_paths,
    nested_destination("/etc/app", "/etc/app/app.yml", "files[0]", "config template"),
    "'/etc/app'",
    "'/etc/app/app.yml'",
    "files[0]",
    "config template"
);

test_error_contains!(
    test_template_render_reports_name_and_line,
    template_render("config/app.yml", "service.port", 7),
    "service.port",
    "line 7",
    "config/app.yml"
);

test_error_contains!(
    test_entry_point_not_found_names_symbol,
    entry_point_not_found(Path::new("/build/libapp.so"), "svcdeb_entry_point"),
    "svcdeb_entry_point",
    "/build/libapp.so"
);

test_error_contains!(
    test_incompatible_runtime_reports_versions,
    incompatible_runtime(Path::new("libapp.so"), 9, 1),
    "ABI 9",
    "expected 1"
);

#[test]
fn test_deserialization_root_path() {
    let err = deserialization("", "expected a mapping");
    assert!(err.to_string().contains("<root>"));
}

#[test]
fn test_validation_failed_lists_every_violation() {
    let err = validation_failed(vec![
        Violation::new("name", "must not be blank"),
        Violation::new("server.port", "must be less than or equal to 65535"),
    ]);
    let message = err.to_string();
    assert!(message.contains("2 violation(s)"));
    assert!(message.contains("name: must not be blank"));
    assert!(message.contains("server.port: must be less than or equal to 65535"));
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_categories() {
    assert_eq!(
        config_not_found("svcdeb.yaml").category(),
        ErrorCategory::Configuration
    );
    assert_eq!(
        source_not_found("missing").category(),
        ErrorCategory::Configuration
    );
    assert_eq!(
        invalid_destination("etc/app", "must be absolute").category(),
        ErrorCategory::Configuration
    );
    assert_eq!(
        file_write_failed(Path::new("/x"), "disk full").category(),
        ErrorCategory::Extraction
    );
    assert_eq!(
        ownership_failed(Path::new("/x"), "unknown user").category(),
        ErrorCategory::Extraction
    );
    assert_eq!(
        artifact_unreadable(Path::new("/x"), "not an ELF").category(),
        ErrorCategory::Introspection
    );
    assert_eq!(
        descriptor_invalid(Path::new("/x"), "bad json").category(),
        ErrorCategory::Introspection
    );
    assert_eq!(
        infrastructure_missing("bad pattern").category(),
        ErrorCategory::Validation
    );
    assert_eq!(
        assembly_failed("archiver exited 2").category(),
        ErrorCategory::Assembly
    );
}
