//! Scenario resolution.
//!
//! [`ScenarioLoader::load_scenarios`] turns [`InvocationSettings`] into an
//! ordered list of [`ScenarioDefinition`]s, either from a scenario file or,
//! when none is given, as a single `"default"` scenario.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::coerce;
use crate::config::{ConfigNode, ScenarioFile, Section};
use crate::error::{Result, ScenarioError};
use crate::mutator::{
    BuildMutatorFactory, MutationKind, MutatorProvider, MutatorSupplier, SourceFileSupplier,
};
use crate::scenario::ScenarioDefinition;
use crate::settings::InvocationSettings;
use crate::version::{GradleVersion, VersionInspector};

pub const VERSIONS: &str = "versions";
pub const TASKS: &str = "tasks";
pub const GRADLE_ARGS: &str = "gradle-args";
pub const RUN_USING: &str = "run-using";
pub const SYSTEM_PROPERTIES: &str = "system-properties";
pub const WARM_UP_COUNT: &str = "warm-ups";

/// Name of the scenario synthesized when no scenario file is given.
pub const DEFAULT_SCENARIO: &str = "default";

/// Whether `key` may appear in a scenario section.
#[must_use]
pub fn is_recognized_key(key: &str) -> bool {
    [VERSIONS, TASKS, GRADLE_ARGS, RUN_USING, SYSTEM_PROPERTIES, WARM_UP_COUNT].contains(&key)
        || MutationKind::ALL.iter().any(|k| k.config_key() == key)
}

/// Resolves scenario definitions against a version inspector and a mutator provider.
pub struct ScenarioLoader<V> {
    inspector: V,
    mutators: Arc<dyn MutatorProvider>,
}

impl<V: VersionInspector> ScenarioLoader<V> {
    #[must_use]
    pub const fn new(inspector: V, mutators: Arc<dyn MutatorProvider>) -> Self {
        Self {
            inspector,
            mutators,
        }
    }

    /// Resolve every selected scenario.
    ///
    /// Every returned definition has at least one version: scenarios that
    /// configure none get the inspector's default version.
    ///
    /// # Errors
    /// Fails on the first malformed file, unrecognized key, invalid value,
    /// missing mutator source file, or version resolution failure.
    pub fn load_scenarios(
        &self,
        settings: &InvocationSettings,
    ) -> Result<Vec<ScenarioDefinition>> {
        let mut scenarios = match settings.scenario_file() {
            Some(path) => self.load_file(path, settings)?,
            None => vec![self.default_scenario(settings)?],
        };
        for scenario in &mut scenarios {
            if scenario.versions.is_empty() {
                let version = self.inspector.default_version()?;
                warn!(
                    scenario = %scenario.name,
                    %version,
                    "no Gradle version configured, using default"
                );
                scenario.versions.push(version);
            }
        }
        info!(count = scenarios.len(), "resolved scenarios");
        Ok(scenarios)
    }

    fn default_scenario(&self, settings: &InvocationSettings) -> Result<ScenarioDefinition> {
        Ok(ScenarioDefinition {
            name: DEFAULT_SCENARIO.to_owned(),
            invoker: settings.invoker(),
            versions: self.resolve_versions(settings.versions())?,
            targets: settings.targets().to_vec(),
            gradle_args: Vec::new(),
            system_properties: settings.system_properties().clone(),
            mutator_factory: BuildMutatorFactory::empty(),
            warm_up_count: settings.warm_up_count(),
        })
    }

    fn load_file(
        &self,
        path: &Path,
        settings: &InvocationSettings,
    ) -> Result<Vec<ScenarioDefinition>> {
        let file = ScenarioFile::load(path)?;
        let mut selected: BTreeSet<&str> = file.scenario_names().collect();
        let filter = settings.scenario_filter();
        if !filter.is_empty() {
            selected.retain(|name| filter.iter().any(|f| f == name));
        }
        debug!(file = %path.display(), ?selected, "selected scenarios");

        selected
            .into_iter()
            .map(|name| self.load_scenario(&file.section(name)?, settings))
            .collect()
    }

    fn load_scenario(
        &self,
        section: &Section<'_>,
        settings: &InvocationSettings,
    ) -> Result<ScenarioDefinition> {
        let name = section.name();
        if let Some(key) = section.keys().into_iter().find(|k| !is_recognized_key(k)) {
            return Err(ScenarioError::UnrecognizedKey {
                scenario: name.to_owned(),
                key: key.to_owned(),
                file: section.file().to_owned(),
            });
        }

        let version_labels = coerce::strings(section, VERSIONS, settings.versions());
        let versions = self.resolve_versions(&version_labels)?;
        let targets = coerce::strings(section, TASKS, settings.targets());
        let gradle_args = coerce::strings(section, GRADLE_ARGS, &[]);
        let invoker = coerce::invoker(section, RUN_USING, settings.invoker())?;
        let system_properties =
            coerce::map(section, SYSTEM_PROPERTIES, settings.system_properties())?;
        let warm_up_count = coerce::integer(section, WARM_UP_COUNT, settings.warm_up_count())?;

        let mut suppliers: Vec<Box<dyn MutatorSupplier>> = Vec::new();
        for kind in MutationKind::ALL {
            let file = source_file(section, kind.config_key(), name, settings.project_dir())?;
            if let Some(source_file) = file {
                debug!(scenario = name, %kind, file = %source_file.display(), "bound mutator");
                suppliers.push(Box::new(SourceFileSupplier::new(
                    Arc::clone(&self.mutators),
                    kind,
                    source_file,
                )));
            }
        }

        debug!(scenario = name, %invoker, warm_ups = warm_up_count, "resolved scenario");
        Ok(ScenarioDefinition {
            name: name.to_owned(),
            invoker,
            versions,
            targets,
            gradle_args,
            system_properties,
            mutator_factory: BuildMutatorFactory::new(suppliers),
            warm_up_count,
        })
    }

    fn resolve_versions(&self, labels: &[String]) -> Result<Vec<GradleVersion>> {
        labels
            .iter()
            .map(|label| self.inspector.resolve(label).map_err(ScenarioError::from))
            .collect()
    }
}

/// The file named at `key`, resolved against `project_dir`.
///
/// A leading root is dropped, so `/src/A.java` still names a file inside
/// the project. Returns `None` when the key is absent.
///
/// # Errors
/// Fails when the resolved path is not an existing regular file.
pub fn source_file(
    node: &impl ConfigNode,
    key: &str,
    scenario: &str,
    project_dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(name) = coerce::string(node, key, None)? else {
        return Ok(None);
    };
    let relative: PathBuf = Path::new(&name)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    let path = project_dir.join(relative);
    if !path.is_file() {
        return Err(ScenarioError::MissingSourceFile {
            scenario: scenario.to_owned(),
            path,
        });
    }
    Ok(Some(path))
}
