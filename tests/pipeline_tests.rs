//! Pipeline integration tests

mod common;

use std::path::PathBuf;

use common::TestProject;
use svcdeb::assembler::{AssemblyRequest, BundleAssembler, HandoffAssembler};
use svcdeb::error::{ErrorCategory, Result, SvcdebError, assembly_failed};
use svcdeb::pipeline::{Pipeline, PipelineOptions};
use svcdeb::report::{Level, RecordingReporter};
use svcdeb::validation::{SkipReason, ValidationOutcome};

const RUNTIME_DEPENDENCY: &str = "\
project:
  name: hello
  version: 1.0.0
  dependencies:
    - name: svcdeb-runtime
      version: \"0.4\"
";

/// Assembler that refuses every request
struct FailingAssembler;

impl BundleAssembler for FailingAssembler {
    fn assemble(&self, _request: &AssemblyRequest<'_>) -> Result<PathBuf> {
        Err(assembly_failed("archiver exited with status 2"))
    }
}

/// Declare the runtime dependency by replacing the minimal project section
fn declare_runtime(project: &TestProject) {
    let yaml = project
        .read_file("svcdeb.yaml")
        .replacen("project:\n  name: hello\n  version: 1.0.0\n", RUNTIME_DEPENDENCY, 1);
    project.write_file("svcdeb.yaml", &yaml);
}

#[test]
fn test_undeclared_dependency_skips_validation_and_succeeds() {
    let project = TestProject::new();
    let config = project.load();
    let reporter = RecordingReporter::new();

    let outcome = Pipeline::default()
        .run(&config, &HandoffAssembler, &reporter)
        .unwrap();

    assert_eq!(
        outcome.validation,
        ValidationOutcome::Skipped(SkipReason::NotDeclared)
    );
    assert!(reporter.contains(Level::Warn, "Skipping configuration validation"));
    assert_eq!(
        outcome.output,
        project.path.join("target/hello_1.0.0_amd64.deb.handoff.yaml")
    );
    assert_eq!(outcome.staged.entries.len(), 7);
}

#[test]
fn test_handoff_describes_staged_tree() {
    let project = TestProject::new();
    project.write_config("signing:\n  key: ABCD1234\n");
    let config = project.load();

    let outcome = Pipeline::default()
        .run(&config, &HandoffAssembler, &RecordingReporter::new())
        .unwrap();

    let handoff: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&outcome.output).unwrap()).unwrap();
    assert_eq!(handoff["package"]["name"].as_str(), Some("hello"));
    assert_eq!(handoff["package"]["architecture"].as_str(), Some("amd64"));
    assert_eq!(handoff["signing"]["key"].as_str(), Some("ABCD1234"));
    assert_eq!(
        handoff["staged_root"].as_str(),
        Some(project.work_dir().to_str().unwrap())
    );
    assert_eq!(handoff["resources"].as_sequence().map(Vec::len), Some(7));
}

#[test]
fn test_validation_disabled_by_option_and_config() {
    let project = TestProject::new();
    declare_runtime(&project);
    let config = project.load();

    let pipeline = Pipeline::new(PipelineOptions {
        skip_validation: true,
        ..PipelineOptions::default()
    });
    let outcome = pipeline
        .run(&config, &HandoffAssembler, &RecordingReporter::new())
        .unwrap();
    assert_eq!(
        outcome.validation,
        ValidationOutcome::Skipped(SkipReason::Disabled)
    );

    project.write_config("validate: false\n");
    let config = project.load();
    let outcome = Pipeline::default()
        .run(&config, &HandoffAssembler, &RecordingReporter::new())
        .unwrap();
    assert_eq!(
        outcome.validation,
        ValidationOutcome::Skipped(SkipReason::Disabled)
    );
}

#[test]
fn test_declared_dependency_with_unloadable_artifact_is_hard_error() {
    let project = TestProject::new();
    declare_runtime(&project);
    let config = project.load();
    let reporter = RecordingReporter::new();

    let err = Pipeline::default()
        .run(&config, &HandoffAssembler, &reporter)
        .unwrap_err();

    assert!(matches!(err, SvcdebError::ArtifactUnreadable { .. }));
    assert_eq!(err.category(), ErrorCategory::Introspection);
    assert!(reporter.contains(Level::Info, "Detected svcdeb-runtime 0.4"));
    assert!(!project.path.join("target/hello_1.0.0_amd64.deb.handoff.yaml").exists());
}

#[test]
fn test_missing_artifact_is_configuration_error_before_staging() {
    let project = TestProject::new();
    std::fs::remove_file(project.path.join("target/release/libhello.so")).unwrap();
    let config = project.load();

    let err = Pipeline::default()
        .run(&config, &HandoffAssembler, &RecordingReporter::new())
        .unwrap_err();

    assert!(matches!(err, SvcdebError::SourceNotFound { .. }));
    assert!(!project.work_dir().exists());
}

#[test]
fn test_assembler_failure_passes_through() {
    let project = TestProject::new();
    let config = project.load();

    let err = Pipeline::default()
        .run(&config, &FailingAssembler, &RecordingReporter::new())
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Assembly);
    assert!(err.to_string().contains("status 2"));
    assert!(project.work_dir().join("manifest.yaml").exists());
}

#[test]
fn test_custom_work_dir() {
    let project = TestProject::new();
    let config = project.load();
    let work_dir = project.path.join("scratch/stage");

    let pipeline = Pipeline::new(PipelineOptions {
        work_dir: Some(work_dir.clone()),
        ..PipelineOptions::default()
    });
    let (resources, staged) = pipeline.stage(&config, &RecordingReporter::new()).unwrap();

    assert_eq!(staged.root, work_dir);
    assert_eq!(staged.entries.len(), resources.len());
    assert!(work_dir.join("files/etc/hello/hello.yml").exists());
    assert!(!project.work_dir().exists());
}
