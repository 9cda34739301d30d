//! Build mutators and their deferred construction.
//!
//! A scenario may name source files to change before each measured build.
//! Resolution only validates that those files exist; the mutators themselves
//! are built later, on demand, by whoever runs the benchmark. Each call to
//! [`BuildMutatorFactory::create`] yields fresh instances with no state shared
//! between calls.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

// ---------------------------------------------------------------------------
// MutationKind
// ---------------------------------------------------------------------------

/// The recognized source-mutation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    /// Change the public ABI of a Java source file.
    AbiChange,
    /// Change a value in an Android resource file.
    AndroidResourceChange,
    /// Change an Android manifest.
    AndroidManifestChange,
    /// Change a value in a `.properties` resource file.
    PropertyResourceChange,
}

impl MutationKind {
    /// Every kind, in the order mutators are bound to a scenario.
    pub const ALL: [Self; 4] = [
        Self::AbiChange,
        Self::AndroidResourceChange,
        Self::AndroidManifestChange,
        Self::PropertyResourceChange,
    ];

    /// The scenario file key that enables this mutation.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::AbiChange => "apply-abi-change-to",
            Self::AndroidResourceChange => "apply-android-resource-change-to",
            Self::AndroidManifestChange => "apply-android-manifest-change-to",
            Self::PropertyResourceChange => "apply-property-resource-change-to",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbiChange => write!(f, "abi-change"),
            Self::AndroidResourceChange => write!(f, "android-resource-change"),
            Self::AndroidManifestChange => write!(f, "android-manifest-change"),
            Self::PropertyResourceChange => write!(f, "property-resource-change"),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildMutator
// ---------------------------------------------------------------------------

/// A step that changes the project around benchmark builds.
///
/// All hooks default to doing nothing.
pub trait BuildMutator {
    /// Called once before the first build of a scenario.
    ///
    /// # Errors
    /// Returns the I/O error that stopped the mutation.
    fn before_scenario(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called before every build, warm-ups included.
    ///
    /// # Errors
    /// Returns the I/O error that stopped the mutation.
    fn before_build(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called after every build.
    ///
    /// # Errors
    /// Returns the I/O error that stopped the mutation.
    fn after_build(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once after the last build of a scenario.
    ///
    /// # Errors
    /// Returns the I/O error that stopped the mutation.
    fn after_scenario(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds the concrete mutator for a kind and a validated source file.
pub trait MutatorProvider: Send + Sync {
    fn construct(&self, kind: MutationKind, source_file: &Path) -> Box<dyn BuildMutator>;
}

// ---------------------------------------------------------------------------
// Deferred construction
// ---------------------------------------------------------------------------

/// A deferred constructor for one mutator.
pub trait MutatorSupplier: Send + Sync {
    /// Build a fresh mutator. Every call returns a new instance.
    fn create_mutator(&self) -> Box<dyn BuildMutator>;

    /// The kind and file this supplier is bound to, if it is file-based.
    fn binding(&self) -> Option<(MutationKind, &Path)> {
        None
    }
}

impl<F> MutatorSupplier for F
where
    F: Fn() -> Box<dyn BuildMutator> + Send + Sync,
{
    fn create_mutator(&self) -> Box<dyn BuildMutator> {
        self()
    }
}

/// Binds a provider to one kind and one source file without constructing anything.
#[derive(Clone)]
pub struct SourceFileSupplier {
    provider: Arc<dyn MutatorProvider>,
    kind: MutationKind,
    source_file: PathBuf,
}

impl SourceFileSupplier {
    #[must_use]
    pub const fn new(
        provider: Arc<dyn MutatorProvider>,
        kind: MutationKind,
        source_file: PathBuf,
    ) -> Self {
        Self {
            provider,
            kind,
            source_file,
        }
    }
}

impl MutatorSupplier for SourceFileSupplier {
    fn create_mutator(&self) -> Box<dyn BuildMutator> {
        self.provider.construct(self.kind, &self.source_file)
    }

    fn binding(&self) -> Option<(MutationKind, &Path)> {
        Some((self.kind, &self.source_file))
    }
}

impl fmt::Debug for SourceFileSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFileSupplier")
            .field("kind", &self.kind)
            .field("source_file", &self.source_file)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// BuildMutatorFactory
// ---------------------------------------------------------------------------

/// An ordered list of deferred mutator constructors for one scenario.
#[derive(Default)]
pub struct BuildMutatorFactory {
    suppliers: Vec<Box<dyn MutatorSupplier>>,
}

impl BuildMutatorFactory {
    #[must_use]
    pub fn new(suppliers: Vec<Box<dyn MutatorSupplier>>) -> Self {
        Self { suppliers }
    }

    /// A factory with no mutators.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    /// The (kind, file) pairs of file-based suppliers, in binding order.
    #[must_use]
    pub fn bindings(&self) -> Vec<(MutationKind, &Path)> {
        self.suppliers.iter().filter_map(|s| s.binding()).collect()
    }

    /// Invoke every supplier, in order, and combine the results.
    #[must_use]
    pub fn create(&self) -> CompositeBuildMutator {
        CompositeBuildMutator {
            mutators: self.suppliers.iter().map(|s| s.create_mutator()).collect(),
        }
    }
}

impl fmt::Debug for BuildMutatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildMutatorFactory")
            .field("suppliers", &self.suppliers.len())
            .field("bindings", &self.bindings())
            .finish()
    }
}

/// Runs a list of mutators as one.
///
/// Before-hooks run in order; after-hooks run in reverse so that changes are
/// undone innermost first.
pub struct CompositeBuildMutator {
    mutators: Vec<Box<dyn BuildMutator>>,
}

impl CompositeBuildMutator {
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }
}

impl BuildMutator for CompositeBuildMutator {
    fn before_scenario(&mut self) -> io::Result<()> {
        self.mutators.iter_mut().try_for_each(|m| m.before_scenario())
    }

    fn before_build(&mut self) -> io::Result<()> {
        self.mutators.iter_mut().try_for_each(|m| m.before_build())
    }

    fn after_build(&mut self) -> io::Result<()> {
        self.mutators.iter_mut().rev().try_for_each(|m| m.after_build())
    }

    fn after_scenario(&mut self) -> io::Result<()> {
        self.mutators
            .iter_mut()
            .rev()
            .try_for_each(|m| m.after_scenario())
    }
}

// ---------------------------------------------------------------------------
// DryRunMutators
// ---------------------------------------------------------------------------

/// Provider whose mutators only report what they would change.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunMutators;

impl MutatorProvider for DryRunMutators {
    fn construct(&self, kind: MutationKind, source_file: &Path) -> Box<dyn BuildMutator> {
        Box::new(DryRunMutator {
            kind,
            source_file: source_file.to_owned(),
            builds: 0,
        })
    }
}

#[derive(Debug)]
struct DryRunMutator {
    kind: MutationKind,
    source_file: PathBuf,
    builds: u32,
}

impl BuildMutator for DryRunMutator {
    fn before_build(&mut self) -> io::Result<()> {
        self.builds += 1;
        tracing::info!(
            kind = %self.kind,
            file = %self.source_file.display(),
            build = self.builds,
            "dry run: would apply change"
        );
        Ok(())
    }

    fn after_scenario(&mut self) -> io::Result<()> {
        tracing::info!(
            kind = %self.kind,
            file = %self.source_file.display(),
            "dry run: would revert change"
        );
        Ok(())
    }
}
