use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::domain::{FieldConfig, parse_field_configs};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a field document (array of fields or `{ fields: [...] }`).
pub fn load_field_configs(contents: &str, format: DocumentFormat) -> Result<Vec<FieldConfig>> {
    let document = parse_document_str(contents, format)?;
    parse_field_configs(&document)
}

/// Read a field document from disk, picking the format from its extension.
pub fn load_field_configs_from_path(path: &Path) -> Result<Vec<FieldConfig>> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| anyhow!("unsupported field document '{}'", path.display()))?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    load_field_configs(&contents, format)
        .with_context(|| format!("invalid field document {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_documents() {
        let raw = "{\"enabled\":true}";
        let parsed = parse_document_str(raw, DocumentFormat::Json).unwrap();
        assert_eq!(parsed["enabled"], Value::Bool(true));
    }

    #[test]
    fn loads_json_field_list() {
        let raw = r#"[{"id": "zip", "format": [{"type": "numeric", "characterLength": 5}]}]"#;
        let fields = load_field_configs(raw, DocumentFormat::Json).unwrap();
        assert_eq!(fields[0].id, "zip");
        assert_eq!(fields[0].format[0].character_length, 5);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = load_field_configs_from_path(Path::new("fields.ini")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_field_documents() {
        let raw = "fields:\n  - id: name\n    uppercase: true\n";
        let fields = load_field_configs(raw, DocumentFormat::Yaml).unwrap();
        assert!(fields[0].uppercase);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_field_documents() {
        let raw = "[[fields]]\nid = \"name\"\nrequired = true\n";
        let fields = load_field_configs(raw, DocumentFormat::Toml).unwrap();
        assert!(fields[0].required);
        let parsed = parse_document_str("name = \"dev\"", DocumentFormat::Toml).unwrap();
        assert_eq!(parsed, serde_json::json!({"name": "dev"}));
    }
}
