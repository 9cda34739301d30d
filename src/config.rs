//! Scenario file parsing (`scenarios.toml`).
//!
//! A scenario file is a TOML document whose top-level keys name scenarios.
//! Each scenario is a table of settings:
//!
//! ```toml
//! [assemble]
//! versions = ["6.8", "7.0"]
//! tasks = "assemble"
//! run-using = "tooling-api"
//! warm-ups = 3
//!
//! [assemble.system-properties]
//! "org.gradle.caching" = true
//! ```
//!
//! Resolution code reads sections through the narrow [`ConfigNode`]
//! capability so it never depends on the TOML representation directly.

use std::fmt;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error loading or reading a scenario file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl ConfigError {
    fn wrong_type(path: &Path, key: &str, expected: &str, found: &Value) -> Self {
        Self {
            path: Some(path.to_owned()),
            message: format!(
                "'{key}' has type {} rather than {expected}",
                found.type_str()
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// ConfigNode
// ---------------------------------------------------------------------------

/// Read access to one object node of a structured configuration document.
///
/// Keys are single path segments relative to the node.
pub trait ConfigNode {
    /// Whether `key` is present on this node.
    fn has_path(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// The raw value at `key`, if present.
    fn get_value(&self, key: &str) -> Option<&Value>;

    /// The scalar at `key` in string form.
    ///
    /// # Errors
    /// Returns `ConfigError` when the value is an array or a table.
    fn get_string(&self, key: &str) -> Result<Option<String>, ConfigError>;

    /// The object at `key`.
    ///
    /// # Errors
    /// Returns `ConfigError` when the value is not a table.
    fn get_object(&self, key: &str) -> Result<Option<&Table>, ConfigError>;

    /// All keys defined on this node, in document order.
    fn keys(&self) -> Vec<&str>;
}

/// String form of a scalar value, or `None` for arrays and tables.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(x) => Some(x.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

/// String form of any value. Arrays and tables use TOML inline syntax.
#[must_use]
pub fn render(value: &Value) -> String {
    scalar_string(value).unwrap_or_else(|| value.to_string())
}

// ---------------------------------------------------------------------------
// ScenarioFile
// ---------------------------------------------------------------------------

/// A parsed scenario file.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioFile {
    path: PathBuf,
    root: Table,
}

impl ScenarioFile {
    /// Load and parse the scenario file at `path`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is missing, unreadable, or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError {
            path: Some(path.to_owned()),
            message: if e.kind() == std::io::ErrorKind::NotFound {
                "scenario file not found".to_owned()
            } else {
                format!("could not read file: {e}")
            },
        })?;
        let root = Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })?;
        Ok(Self {
            path: path.to_owned(),
            root,
        })
    }

    /// Parse scenario file contents into a TOML table.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML, with the 1-based line number.
    pub fn parse(toml_str: &str) -> Result<Table, ConfigError> {
        toml::from_str::<Table>(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level scenario names, in document order.
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// The section for scenario `name`.
    ///
    /// # Errors
    /// Returns `ConfigError` if `name` is absent or its value is not a table.
    pub fn section<'a>(&'a self, name: &'a str) -> Result<Section<'a>, ConfigError> {
        match self.root.get(name) {
            Some(Value::Table(table)) => Ok(Section {
                name,
                table,
                file: &self.path,
            }),
            Some(other) => Err(ConfigError::wrong_type(&self.path, name, "table", other)),
            None => Err(ConfigError {
                path: Some(self.path.clone()),
                message: format!("no scenario named '{name}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// One scenario table inside a [`ScenarioFile`].
#[derive(Clone, Copy, Debug)]
pub struct Section<'a> {
    name: &'a str,
    table: &'a Table,
    file: &'a Path,
}

impl<'a> Section<'a> {
    /// The scenario name this section is keyed under.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The file this section was read from.
    #[must_use]
    pub const fn file(&self) -> &'a Path {
        self.file
    }

    fn qualified(&self, key: &str) -> String {
        format!("{}.{key}", self.name)
    }
}

impl ConfigNode for Section<'_> {
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let Some(value) = self.table.get(key) else {
            return Ok(None);
        };
        scalar_string(value).map(Some).ok_or_else(|| {
            ConfigError::wrong_type(self.file, &self.qualified(key), "string", value)
        })
    }

    fn get_object(&self, key: &str) -> Result<Option<&Table>, ConfigError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(Value::Table(table)) => Ok(Some(table)),
            Some(other) => Err(ConfigError::wrong_type(
                self.file,
                &self.qualified(key),
                "table",
                other,
            )),
        }
    }

    fn keys(&self) -> Vec<&str> {
        self.table.keys().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file(toml: &str) -> ScenarioFile {
        ScenarioFile {
            path: PathBuf::from("/work/scenarios.toml"),
            root: ScenarioFile::parse(toml).unwrap(),
        }
    }

    #[test]
    fn parse_empty_string() {
        let root = ScenarioFile::parse("").unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn scenario_names_keep_document_order() {
        let f = file("[zeta]\n[alpha]\n[mid]\n");
        let names: Vec<_> = f.scenario_names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn parse_includes_line_number_on_error() {
        let err = ScenarioFile::parse("[a]\ntasks = \"x\"\nwarm-ups = = 3\n").unwrap_err();
        assert!(
            err.message.starts_with("line 3:"),
            "error should include line number: {}",
            err.message
        );
        assert!(err.path.is_none());
    }

    #[test]
    fn section_rejects_scalar_top_level_value() {
        let f = file("stray = 1\n");
        let err = f.section("stray").unwrap_err();
        assert!(
            err.message.contains("'stray' has type integer rather than table"),
            "unexpected message: {}",
            err.message
        );
        assert_eq!(err.path.as_deref(), Some(Path::new("/work/scenarios.toml")));
    }

    #[test]
    fn section_missing_name_is_an_error() {
        let f = file("[a]\n");
        let err = f.section("b").unwrap_err();
        assert!(err.message.contains("no scenario named 'b'"));
    }

    #[test]
    fn section_accessors() {
        let f = file(
            r#"
[a]
tasks = "build"
warm-ups = 4
versions = ["6.8"]

[a.system-properties]
x = "1"
"#,
        );
        let section = f.section("a").unwrap();
        assert_eq!(section.name(), "a");
        assert!(section.has_path("tasks"));
        assert!(!section.has_path("gradle-args"));
        assert_eq!(section.get_string("tasks").unwrap().as_deref(), Some("build"));
        assert_eq!(section.get_string("warm-ups").unwrap().as_deref(), Some("4"));
        assert_eq!(section.get_string("missing").unwrap(), None);
        assert!(section.get_object("system-properties").unwrap().is_some());
        assert_eq!(
            section.keys(),
            ["tasks", "warm-ups", "versions", "system-properties"]
        );
    }

    #[test]
    fn get_string_rejects_array() {
        let f = file("[a]\napply-abi-change-to = [\"A.java\"]\n");
        let err = f
            .section("a")
            .unwrap()
            .get_string("apply-abi-change-to")
            .unwrap_err();
        assert!(
            err.message
                .contains("'a.apply-abi-change-to' has type array rather than string"),
            "unexpected message: {}",
            err.message
        );
    }

    #[test]
    fn get_object_rejects_scalar() {
        let f = file("[a]\nsystem-properties = \"x=1\"\n");
        let err = f
            .section("a")
            .unwrap()
            .get_object("system-properties")
            .unwrap_err();
        assert!(err.message.contains("rather than table"));
    }

    #[test]
    fn render_values() {
        assert_eq!(render(&Value::String("s".into())), "s");
        assert_eq!(render(&Value::Integer(12)), "12");
        assert_eq!(render(&Value::Boolean(true)), "true");
        assert_eq!(render(&Value::Float(1.5)), "1.5");
        assert!(scalar_string(&Value::Array(vec![])).is_none());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = ScenarioFile::load(Path::new("/nonexistent/scenarios.toml")).unwrap_err();
        assert_eq!(
            err.path.as_deref(),
            Some(Path::new("/nonexistent/scenarios.toml"))
        );
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn load_invalid_file_shows_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid [[[toml").unwrap();
        let err = ScenarioFile::load(&path).unwrap_err();
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }

    #[test]
    fn load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.toml");
        std::fs::write(&path, "[clean]\ntasks = \"clean\"\n").unwrap();
        let f = ScenarioFile::load(&path).unwrap();
        assert_eq!(f.path(), path);
        assert_eq!(f.scenario_names().collect::<Vec<_>>(), ["clean"]);
    }
}
