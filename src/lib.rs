//! Scenario resolution for the Gradle profiler.
//!
//! Turns global invocation settings, plus an optional `scenarios.toml`,
//! into fully resolved [`ScenarioDefinition`]s: which Gradle versions to
//! run, which tasks and arguments to pass, how many warm-ups to do, how to
//! invoke Gradle, and which source files to mutate between builds.
//!
//! The sole entry point is [`ScenarioLoader::load_scenarios`].

pub mod coerce;
pub mod config;
pub mod error;
pub mod loader;
pub mod mutator;
pub mod scenario;
pub mod settings;
pub mod telemetry;
pub mod version;

pub use error::{Result, ScenarioError};
pub use loader::ScenarioLoader;
pub use mutator::{BuildMutator, BuildMutatorFactory, MutationKind, MutatorProvider};
pub use scenario::ScenarioDefinition;
pub use settings::{InvocationSettings, Invoker};
pub use version::{DistributionInspector, GradleVersion, VersionInspector};
