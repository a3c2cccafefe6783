use std::fmt;

use jsonschema::Validator;
use serde_json::{Value, json};

use crate::domain::FieldConfig;

use super::error::FieldError;

/// Presence constraint compiled into a JSON Schema validator.
pub struct FieldValidator {
    validator: Validator,
    blank_message: String,
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("blank_message", &self.blank_message)
            .finish_non_exhaustive()
    }
}

impl FieldValidator {
    pub fn for_field(config: &FieldConfig) -> Result<Self, FieldError> {
        let schema = constraint_schema(config.required);
        let validator =
            jsonschema::validator_for(&schema).map_err(|err| FieldError::InvalidConstraint {
                field: config.id.clone(),
                message: err.to_string(),
            })?;
        let label = if config.label.is_empty() {
            config.id.as_str()
        } else {
            config.label.as_str()
        };
        Ok(Self {
            validator,
            blank_message: format!("{label} can't be blank"),
        })
    }

    /// Errors for `value`; at most one message per field.
    pub fn validate(&self, value: &str) -> Vec<String> {
        let instance = Value::String(value.to_string());
        if self.validator.is_valid(&instance) {
            Vec::new()
        } else {
            vec![self.blank_message.clone()]
        }
    }
}

fn constraint_schema(required: bool) -> Value {
    if required {
        json!({"type": "string", "minLength": 1, "pattern": "\\S"})
    } else {
        json!({"type": "string"})
    }
}
