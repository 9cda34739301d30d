//! Resolved scenario definitions.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::mutator::{BuildMutatorFactory, MutationKind};
use crate::settings::Invoker;
use crate::version::GradleVersion;

/// A fully resolved benchmark invocation plan.
#[derive(Debug, Serialize)]
pub struct ScenarioDefinition {
    pub(crate) name: String,
    pub(crate) invoker: Invoker,
    pub(crate) versions: Vec<GradleVersion>,
    pub(crate) targets: Vec<String>,
    pub(crate) gradle_args: Vec<String>,
    pub(crate) system_properties: IndexMap<String, String>,
    #[serde(rename = "mutators", serialize_with = "serialize_bindings")]
    pub(crate) mutator_factory: BuildMutatorFactory,
    pub(crate) warm_up_count: u32,
}

impl ScenarioDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn invoker(&self) -> Invoker {
        self.invoker
    }

    /// Never empty once returned by the loader.
    #[must_use]
    pub fn versions(&self) -> &[GradleVersion] {
        &self.versions
    }

    /// Tasks to run.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Extra arguments passed to every build.
    #[must_use]
    pub fn gradle_args(&self) -> &[String] {
        &self.gradle_args
    }

    #[must_use]
    pub const fn system_properties(&self) -> &IndexMap<String, String> {
        &self.system_properties
    }

    #[must_use]
    pub const fn mutator_factory(&self) -> &BuildMutatorFactory {
        &self.mutator_factory
    }

    #[must_use]
    pub const fn warm_up_count(&self) -> u32 {
        self.warm_up_count
    }
}

impl fmt::Display for ScenarioDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario: {}", self.name)?;
        writeln!(f, "  run using: {}", self.invoker)?;
        let versions: Vec<String> = self.versions.iter().map(ToString::to_string).collect();
        writeln!(f, "  versions: {}", versions.join(", "))?;
        writeln!(f, "  tasks: {}", self.targets.join(" "))?;
        if !self.gradle_args.is_empty() {
            writeln!(f, "  gradle args: {}", self.gradle_args.join(" "))?;
        }
        for (key, value) in &self.system_properties {
            writeln!(f, "  -D{key}={value}")?;
        }
        for (kind, file) in self.mutator_factory.bindings() {
            writeln!(f, "  {kind}: {}", file.display())?;
        }
        write!(f, "  warm-ups: {}", self.warm_up_count)
    }
}

#[derive(Serialize)]
struct Binding<'a> {
    kind: MutationKind,
    file: &'a Path,
}

fn serialize_bindings<S: Serializer>(
    factory: &BuildMutatorFactory,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let bindings = factory.bindings();
    let mut seq = serializer.serialize_seq(Some(bindings.len()))?;
    for (kind, file) in bindings {
        seq.serialize_element(&Binding { kind, file })?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::mutator::{DryRunMutators, SourceFileSupplier};

    fn sample() -> ScenarioDefinition {
        let mut system_properties = IndexMap::new();
        system_properties.insert("org.gradle.caching".to_owned(), "true".to_owned());
        ScenarioDefinition {
            name: "assemble".to_owned(),
            invoker: Invoker::ToolingApi,
            versions: vec![GradleVersion::release("6.8")],
            targets: vec!["assemble".to_owned()],
            gradle_args: vec!["--parallel".to_owned()],
            system_properties,
            mutator_factory: BuildMutatorFactory::new(vec![Box::new(SourceFileSupplier::new(
                Arc::new(DryRunMutators),
                MutationKind::AbiChange,
                PathBuf::from("/p/A.java"),
            ))]),
            warm_up_count: 3,
        }
    }

    #[test]
    fn display_lists_every_field() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "Scenario: assemble\n  run using: tooling-api\n  versions: 6.8\n  tasks: assemble\n  gradle args: --parallel\n  -Dorg.gradle.caching=true\n  abi-change: /p/A.java\n  warm-ups: 3"
        );
    }

    #[test]
    fn serializes_mutator_bindings() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["name"], "assemble");
        assert_eq!(json["invoker"], "tooling-api");
        assert_eq!(json["versions"][0]["version"], "6.8");
        assert_eq!(json["warm_up_count"], 3);
        assert_eq!(json["system_properties"]["org.gradle.caching"], "true");
        assert_eq!(json["mutators"][0]["kind"], "abi-change");
        assert_eq!(json["mutators"][0]["file"], "/p/A.java");
    }
}
