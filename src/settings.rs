//! Global invocation settings.
//!
//! [`InvocationSettings`] carries the command-line level defaults that every
//! resolved scenario falls back to. It is built once, then only read.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Invoker
// ---------------------------------------------------------------------------

/// How the build tool is invoked for each iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Invoker {
    /// Gradle CLI talking to a long-lived daemon.
    #[default]
    Daemon,
    /// A fresh Gradle process per build, no daemon.
    NoDaemon,
    /// Embedded tooling API connection.
    ToolingApi,
}

impl fmt::Display for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daemon => write!(f, "daemon"),
            Self::NoDaemon => write!(f, "no-daemon"),
            Self::ToolingApi => write!(f, "tooling-api"),
        }
    }
}

// ---------------------------------------------------------------------------
// InvocationSettings
// ---------------------------------------------------------------------------

/// Read-only global defaults for scenario resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationSettings {
    project_dir: PathBuf,
    invoker: Invoker,
    targets: Vec<String>,
    scenario_filter: Vec<String>,
    system_properties: IndexMap<String, String>,
    warm_up_count: u32,
    scenario_file: Option<PathBuf>,
    versions: Vec<String>,
}

impl InvocationSettings {
    /// Start building settings rooted at `project_dir`.
    #[must_use]
    pub fn builder(project_dir: impl Into<PathBuf>) -> InvocationSettingsBuilder {
        InvocationSettingsBuilder {
            settings: Self {
                project_dir: project_dir.into(),
                invoker: Invoker::default(),
                targets: Vec::new(),
                scenario_filter: Vec::new(),
                system_properties: IndexMap::new(),
                warm_up_count: DEFAULT_WARM_UP_COUNT,
                scenario_file: None,
                versions: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub const fn invoker(&self) -> Invoker {
        self.invoker
    }

    /// Default tasks for scenarios that do not declare `tasks`.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Scenario names to keep when loading a scenario file. Empty keeps all.
    #[must_use]
    pub fn scenario_filter(&self) -> &[String] {
        &self.scenario_filter
    }

    #[must_use]
    pub const fn system_properties(&self) -> &IndexMap<String, String> {
        &self.system_properties
    }

    #[must_use]
    pub const fn warm_up_count(&self) -> u32 {
        self.warm_up_count
    }

    #[must_use]
    pub fn scenario_file(&self) -> Option<&Path> {
        self.scenario_file.as_deref()
    }

    /// Unresolved version labels.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }
}

/// Warm-up builds run when nothing else is configured.
pub const DEFAULT_WARM_UP_COUNT: u32 = 2;

/// Builder for [`InvocationSettings`].
#[derive(Clone, Debug)]
pub struct InvocationSettingsBuilder {
    settings: InvocationSettings,
}

impl InvocationSettingsBuilder {
    #[must_use]
    pub const fn invoker(mut self, invoker: Invoker) -> Self {
        self.settings.invoker = invoker;
        self
    }

    #[must_use]
    pub fn targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn scenario_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.scenario_filter = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings
            .system_properties
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn warm_up_count(mut self, count: u32) -> Self {
        self.settings.warm_up_count = count;
        self
    }

    #[must_use]
    pub fn scenario_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.scenario_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn build(self) -> InvocationSettings {
        self.settings
    }
}
