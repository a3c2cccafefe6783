use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::config::FieldConfig;

/// Parse a field document into configs.
///
/// Accepts either an array of field objects or an object with a `fields` array.
pub fn parse_field_configs(value: &Value) -> Result<Vec<FieldConfig>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(items)) => items,
            Some(_) => bail!("`fields` must be an array"),
            None => bail!("document has no `fields` array"),
        },
        _ => bail!("expected an array of fields or an object with `fields`"),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let config: FieldConfig = serde_json::from_value(item.clone())
                .with_context(|| format!("invalid field at index {index}"))?;
            if config.id.trim().is_empty() {
                bail!("field at index {index} has no id");
            }
            Ok(config)
        })
        .collect()
}
