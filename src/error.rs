//! Error types for scenario resolution.
//!
//! [`ScenarioError`] is the single error type returned by
//! [`ScenarioLoader::load_scenarios`](crate::loader::ScenarioLoader::load_scenarios).
//! Every variant aborts the whole resolution run; nothing is skipped or
//! defaulted past the first failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::version::VersionError;

/// Result alias for scenario resolution.
pub type Result<T, E = ScenarioError> = std::result::Result<T, E>;

/// Errors raised while resolving scenario definitions.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file is missing, unreadable, malformed, or holds a value
    /// of the wrong shape.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A scenario section uses a key outside the recognized set.
    #[error("Unrecognized key '{scenario}.{key}' found in scenario file {}", file.display())]
    UnrecognizedKey {
        /// The scenario section holding the key.
        scenario: String,
        /// The offending key.
        key: String,
        /// The scenario file being resolved.
        file: PathBuf,
    },

    /// `run-using` holds something other than `no-daemon` or `tooling-api`.
    #[error("Unexpected value for '{key}' provided: {value}")]
    InvalidInvoker {
        /// The configuration key.
        key: String,
        /// The rejected value, stringified.
        value: String,
    },

    /// An integer-valued key holds something that is not a non-negative integer.
    #[error("Invalid integer for '{key}' provided: {value} ({reason})")]
    InvalidInteger {
        /// The configuration key.
        key: String,
        /// The rejected value, stringified.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A mutator references a file that does not exist under the project directory.
    #[error("Source file {} specified for scenario {scenario} does not exist.", path.display())]
    MissingSourceFile {
        /// The scenario that referenced the file.
        scenario: String,
        /// The path after resolving against the project directory.
        path: PathBuf,
    },

    /// The version-resolution service failed.
    #[error(transparent)]
    Version(#[from] VersionError),
}
