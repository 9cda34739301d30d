//! Shared test helpers for scenario resolution tests.
//!
//! Every test gets its own project directory via `project()`, with no side
//! effects outside the temp dir.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scenarios::mutator::{BuildMutator, DryRunMutators, MutationKind, MutatorProvider};
use scenarios::version::{GradleVersion, VersionError, VersionInspector};
use scenarios::{InvocationSettings, ScenarioDefinition, ScenarioError, ScenarioLoader};
use tempfile::TempDir;

/// Version label that [`FakeVersions`] refuses to resolve.
pub const BAD_VERSION: &str = "not-a-version";

/// Resolves every label to `resolved(<label>)`; the default is `system`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeVersions;

impl VersionInspector for FakeVersions {
    fn resolve(&self, label: &str) -> Result<GradleVersion, VersionError> {
        if label == BAD_VERSION {
            return Err(VersionError::Unrecognized {
                label: label.to_owned(),
            });
        }
        Ok(resolved(label))
    }

    fn default_version(&self) -> Result<GradleVersion, VersionError> {
        Ok(system_default())
    }
}

pub fn resolved(label: &str) -> GradleVersion {
    GradleVersion::release(format!("resolved({label})"))
}

pub fn system_default() -> GradleVersion {
    GradleVersion::release("system")
}

/// Counts constructions; never touches the file system.
#[derive(Debug, Default)]
pub struct CountingMutators {
    pub constructed: AtomicUsize,
}

impl CountingMutators {
    pub fn count(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl MutatorProvider for CountingMutators {
    fn construct(&self, kind: MutationKind, source_file: &Path) -> Box<dyn BuildMutator> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        DryRunMutators.construct(kind, source_file)
    }
}

/// A fresh, empty project directory.
pub fn project() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Write `contents` to `<dir>/<relative>`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dirs");
    }
    std::fs::write(&path, contents).expect("failed to write file");
    path
}

/// Write `scenarios.toml` into the project and return its path.
pub fn scenario_file(dir: &Path, contents: &str) -> PathBuf {
    write_file(dir, "scenarios.toml", contents)
}

/// Resolve with [`FakeVersions`] and the given mutator provider.
pub fn load_with(
    settings: &InvocationSettings,
    mutators: Arc<dyn MutatorProvider>,
) -> Result<Vec<ScenarioDefinition>, ScenarioError> {
    ScenarioLoader::new(FakeVersions, mutators).load_scenarios(settings)
}

/// Resolve with [`FakeVersions`] and dry-run mutators.
pub fn load(settings: &InvocationSettings) -> Result<Vec<ScenarioDefinition>, ScenarioError> {
    load_with(settings, Arc::new(DryRunMutators))
}

pub fn names(scenarios: &[ScenarioDefinition]) -> Vec<&str> {
    scenarios.iter().map(ScenarioDefinition::name).collect()
}

/// Run the binary with the given args in the given directory.
pub fn cli_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_profiler-scenarios"))
        .args(args)
        .current_dir(dir)
        .env_remove("PROFILER_SCENARIO_FILE")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute profiler-scenarios")
}

/// Run the binary and assert it succeeds. Returns stdout as string.
pub fn cli_ok(dir: &Path, args: &[&str]) -> String {
    let out = cli_in(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "profiler-scenarios {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run the binary and assert it fails. Returns stderr as string.
pub fn cli_fails(dir: &Path, args: &[&str]) -> String {
    let out = cli_in(dir, args);
    assert!(
        !out.status.success(),
        "profiler-scenarios {} should have failed:\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
    );
    String::from_utf8_lossy(&out.stderr).to_string()
}
