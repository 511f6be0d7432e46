//! Package manifest parsing.
//!
//! A manifest is a JSON document listing the components that make up a
//! package:
//!
//! ```json
//! { "MPF_Components": [ { "path": "HelloWorldComponent" } ] }
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Top-level key holding the component list.
pub const COMPONENTS_KEY: &str = "MPF_Components";

/// Reads the component paths listed in a manifest file.
pub fn read_component_paths(manifest_path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(manifest_path)?;
    parse_component_paths(&content)
}

/// Parses the component paths listed in manifest text.
///
/// Every entry must carry a `path` string; the first entry without one
/// fails the whole manifest.
pub fn parse_component_paths(content: &str) -> Result<Vec<String>> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| Error::ManifestParse(e.to_string()))?;

    let components = match document.get(COMPONENTS_KEY) {
        Some(Value::Null) | None => return Err(Error::ManifestMissingKey(COMPONENTS_KEY)),
        Some(components) => components,
    };

    let entries = components.as_array().ok_or_else(|| {
        Error::ManifestParse(format!("\"{}\" must be a list", COMPONENTS_KEY))
    })?;

    entries
        .iter()
        .map(|entry| {
            entry
                .get("path")
                .and_then(|p| p.as_str())
                .map(|p| p.to_string())
                .ok_or(Error::ManifestEntryMissingPath)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths_in_order() {
        let paths = parse_component_paths(
            r#"{"MPF_Components": [{"path": "compA"}, {"path": "/abs/compB", "name": "B"}]}"#,
        )
        .unwrap();
        assert_eq!(paths, vec!["compA".to_string(), "/abs/compB".to_string()]);
    }

    #[test]
    fn test_missing_key() {
        let err = parse_component_paths(r#"{"components": []}"#).unwrap_err();
        assert!(matches!(err, Error::ManifestMissingKey(COMPONENTS_KEY)));
        assert!(err.to_string().contains("\"MPF_Components\""));
    }

    #[test]
    fn test_entry_without_path() {
        let err =
            parse_component_paths(r#"{"MPF_Components": [{"path": "a"}, {"name": "b"}]}"#)
                .unwrap_err();
        assert!(matches!(err, Error::ManifestEntryMissingPath));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_component_paths("{not json").unwrap_err();
        assert!(matches!(err, Error::ManifestParse(_)));
        assert!(err.to_string().starts_with("Failed to parse JSON file"));
    }

    #[test]
    fn test_empty_component_list() {
        assert!(parse_component_paths(r#"{"MPF_Components": []}"#)
            .unwrap()
            .is_empty());
    }
}
