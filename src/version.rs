//! Gradle version resolution.
//!
//! Scenarios name Gradle versions by label (`"6.8"`, `"7.0-rc-1"`, or the
//! path of a local installation). A [`VersionInspector`] turns a label into
//! a [`GradleVersion`] handle and supplies the version to fall back to when
//! nothing is configured.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Location of the wrapper properties, relative to the project directory.
pub const WRAPPER_PROPERTIES: &str = "gradle/wrapper/gradle-wrapper.properties";

// ---------------------------------------------------------------------------
// GradleVersion
// ---------------------------------------------------------------------------

/// A resolved Gradle version, optionally bound to a local installation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GradleVersion {
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    home: Option<PathBuf>,
}

impl GradleVersion {
    /// A released distribution identified only by its version number.
    #[must_use]
    pub fn release(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            home: None,
        }
    }

    /// A local installation at `home`.
    #[must_use]
    pub fn installation(version: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            home: Some(home.into()),
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }
}

impl fmt::Display for GradleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.home {
            Some(home) => write!(f, "{} ({})", self.version, home.display()),
            None => write!(f, "{}", self.version),
        }
    }
}

// ---------------------------------------------------------------------------
// VersionError
// ---------------------------------------------------------------------------

/// Errors raised while resolving a version label.
#[derive(Debug, Error)]
pub enum VersionError {
    /// The label is neither a version number nor an installation directory.
    #[error("'{label}' is neither a Gradle version nor a Gradle installation directory")]
    Unrecognized {
        /// The label as written.
        label: String,
    },

    /// A directory was given but holds no recognizable Gradle distribution.
    #[error("could not determine the Gradle version installed at {}", home.display())]
    UnknownInstallation {
        /// The directory that was inspected.
        home: PathBuf,
    },

    /// No version was configured and the project declares no wrapper version.
    #[error("no default Gradle version: {} does not declare a distribution", properties.display())]
    NoDefault {
        /// The wrapper properties file that was consulted.
        properties: PathBuf,
    },

    /// Reading an installation or wrapper file failed.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// VersionInspector
// ---------------------------------------------------------------------------

/// Resolves version labels into [`GradleVersion`] handles.
pub trait VersionInspector {
    /// Resolve a single label.
    ///
    /// # Errors
    /// Returns `VersionError` when the label cannot be resolved.
    fn resolve(&self, label: &str) -> Result<GradleVersion, VersionError>;

    /// The version used by scenarios that configure none.
    ///
    /// # Errors
    /// Returns `VersionError` when no default can be determined.
    fn default_version(&self) -> Result<GradleVersion, VersionError>;
}

/// Resolves labels against local installations and the project's wrapper.
#[derive(Clone, Debug)]
pub struct DistributionInspector {
    project_dir: PathBuf,
}

impl DistributionInspector {
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }
}

impl VersionInspector for DistributionInspector {
    fn resolve(&self, label: &str) -> Result<GradleVersion, VersionError> {
        let home = Path::new(label);
        if home.is_dir() {
            let version = installed_version(home)?;
            return Ok(GradleVersion::installation(version, home));
        }
        if is_version_number(label) {
            return Ok(GradleVersion::release(label));
        }
        Err(VersionError::Unrecognized {
            label: label.to_owned(),
        })
    }

    fn default_version(&self) -> Result<GradleVersion, VersionError> {
        let properties = self.project_dir.join(WRAPPER_PROPERTIES);
        let contents = match std::fs::read_to_string(&properties) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(VersionError::NoDefault { properties });
            }
            Err(source) => {
                return Err(VersionError::Io {
                    path: properties,
                    source,
                });
            }
        };
        wrapper_version(&contents)
            .map(GradleVersion::release)
            .ok_or(VersionError::NoDefault { properties })
    }
}

/// Read the version from `<home>/lib/gradle-launcher-<version>.jar`.
fn installed_version(home: &Path) -> Result<String, VersionError> {
    let lib = home.join("lib");
    let entries = std::fs::read_dir(&lib).map_err(|source| VersionError::Io {
        path: lib.clone(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| VersionError::Io {
            path: lib.clone(),
            source,
        })?;
        let name = entry.file_name();
        if let Some(version) = name
            .to_str()
            .and_then(|n| n.strip_prefix("gradle-launcher-"))
            .and_then(|n| n.strip_suffix(".jar"))
            && is_version_number(version)
        {
            return Ok(version.to_owned());
        }
    }
    Err(VersionError::UnknownInstallation {
        home: home.to_owned(),
    })
}

/// `<major>.<minor>[.<patch>][-<suffix>]`, e.g. `6.8`, `7.0-rc-1`.
fn is_version_number(label: &str) -> bool {
    let (base, suffix) = match label.split_once('-') {
        Some((base, suffix)) => (base, Some(suffix)),
        None => (label, None),
    };
    let parts: Vec<&str> = base.split('.').collect();
    let base_ok = (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    let suffix_ok = suffix.is_none_or(|s| {
        !s.is_empty()
            && s.bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    });
    base_ok && suffix_ok
}

/// Extract the version from a wrapper `distributionUrl`.
fn wrapper_version(properties: &str) -> Option<String> {
    let url = properties
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.starts_with('#') && !line.starts_with('!'))
        .find_map(|line| {
            let (key, value) = line.split_once(['=', ':'])?;
            (key.trim() == "distributionUrl").then(|| value.trim().replace('\\', ""))
        })?;
    let file = url.rsplit('/').next()?;
    let version = file
        .strip_prefix("gradle-")?
        .strip_suffix("-bin.zip")
        .or_else(|| file.strip_prefix("gradle-")?.strip_suffix("-all.zip"))?;
    is_version_number(version).then(|| version.to_owned())
}
