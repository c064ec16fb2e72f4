//! Launch-configuration catalog.
//!
//! The catalog is the project's declared set of named debugger
//! configurations, typically the `configurations` array of a `launch.json`
//! style file. The catalog is read-only from this crate's perspective:
//! entries are looked up by exact name match, first match in declaration
//! order wins.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// An opaque debugger configuration: a mutable JSON object handed to one of
/// the back-ends verbatim. The coordinator only ever touches a handful of
/// well-known keys (`name`, `type`, `stopOnEntry`, `processId`, ...).
pub type ConfigMap = serde_json::Map<String, Value>;

/// Wire shape of a launch-configuration file.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    configurations: Vec<Value>,
}

/// The user's declared set of named launch/attach configurations.
#[derive(Debug, Clone, Default)]
pub struct LaunchCatalog {
    configurations: Vec<ConfigMap>,
}

impl LaunchCatalog {
    /// Create a catalog from an ordered list of configuration objects.
    pub fn new(configurations: Vec<ConfigMap>) -> Self {
        Self { configurations }
    }

    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file with a `configurations` array.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&content)
    }

    /// Parse a catalog from JSON text.
    ///
    /// Non-object entries in the `configurations` array are skipped; the
    /// editor tolerates them and so do we.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text).map_err(CatalogError::Json)?;
        let configurations = file
            .configurations
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Ok(Self { configurations })
    }

    /// Look up a configuration by exact name match.
    ///
    /// Returns the first entry whose `name` property equals `name`, in
    /// declaration order.
    pub fn find(&self, name: &str) -> Option<&ConfigMap> {
        self.configurations
            .iter()
            .find(|conf| conf.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Number of configurations in the catalog.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Whether the catalog has no configurations.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Iterate over the configurations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigMap> {
        self.configurations.iter()
    }
}

/// Catalog loading errors.
#[derive(Debug)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read launch catalog: {}", e),
            Self::Json(e) => write!(f, "failed to parse launch catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_with(names: &[&str]) -> LaunchCatalog {
        let configurations = names
            .iter()
            .map(|name| {
                let mut map = ConfigMap::new();
                map.insert("name".into(), Value::String((*name).into()));
                map
            })
            .collect();
        LaunchCatalog::new(configurations)
    }

    #[test]
    fn test_find_exact_match() {
        let catalog = catalog_with(&["Python: Current File", "(gdb) Attach"]);

        let found = catalog.find("(gdb) Attach").unwrap();
        assert_eq!(
            found.get("name").and_then(Value::as_str),
            Some("(gdb) Attach")
        );
    }

    #[test]
    fn test_find_no_match() {
        let catalog = catalog_with(&["A", "B"]);
        assert!(catalog.find("C").is_none());
        assert!(catalog.find("a").is_none()); // exact, case-sensitive
    }

    #[test]
    fn test_find_first_match_wins() {
        let json = r#"{
            "configurations": [
                { "name": "dup", "marker": 1 },
                { "name": "dup", "marker": 2 }
            ]
        }"#;

        let catalog = LaunchCatalog::from_json(json).unwrap();
        let found = catalog.find("dup").unwrap();
        assert_eq!(found.get("marker").and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn test_from_json_skips_non_objects() {
        let json = r#"{
            "version": "0.2.0",
            "configurations": [
                { "name": "ok" },
                "not a config",
                42
            ]
        }"#;

        let catalog = LaunchCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("ok").is_some());
    }

    #[test]
    fn test_from_json_missing_configurations() {
        let catalog = LaunchCatalog::from_json(r#"{ "version": "0.2.0" }"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        let result = LaunchCatalog::from_json("{not json");
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let json = r#"{
            "configurations": [
                { "name": "Python: Current File", "type": "python" }
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = LaunchCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("Python: Current File").is_some());
    }

    #[test]
    fn test_from_file_missing() {
        let result = LaunchCatalog::from_file(Path::new("/nonexistent/launch.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
