use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    domain::FieldConfig,
    form::FormState,
    io::{DocumentFormat, load_field_configs},
};

use super::{options::UiOptions, runtime::App};

/// Interactive terminal form over a list of text fields.
#[derive(Debug)]
pub struct FormUI {
    fields: Vec<FieldConfig>,
    values: Value,
    options: UiOptions,
}

impl FormUI {
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        Self {
            fields,
            values: Value::Null,
            options: UiOptions::default(),
        }
    }

    pub fn from_document(contents: &str, format: DocumentFormat) -> Result<Self> {
        Ok(Self::new(load_field_configs(contents, format)?))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Initial values keyed by field id.
    pub fn with_values(mut self, values: Value) -> Self {
        self.values = values;
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Run until the user saves (returning the committed values) or quits.
    pub fn run(self) -> Result<Value> {
        let FormUI {
            fields,
            values,
            options,
        } = self;

        let form_state = FormState::new(fields, &values).context("failed to build form")?;
        let mut app = App::new(form_state, options);
        app.run()
    }
}
