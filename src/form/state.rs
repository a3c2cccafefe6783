use crossterm::event::KeyEvent;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::FieldConfig;

use super::{
    controller::{CommitTrigger, FieldController, FieldObserver},
    error::FieldError,
};

/// Values and validation results owned by the form.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: IndexMap<String, Option<String>>,
    errors: IndexMap<String, Vec<String>>,
    history: IndexMap<String, String>,
    commits: usize,
    dirty: bool,
}

impl FormValues {
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.values.get(field_id).and_then(|value| value.as_deref())
    }

    pub fn errors(&self, field_id: &str) -> &[String] {
        self.errors.get(field_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn history_track(&self, field_id: &str) -> Option<&str> {
        self.history.get(field_id).map(String::as_str)
    }

    /// Number of commits received since the form was built.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl FieldObserver for FormValues {
    fn on_change(&mut self, trigger: CommitTrigger, field_id: &str, value: &str) {
        debug!(field = field_id, ?trigger, "form value committed");
        self.values
            .insert(field_id.to_string(), Some(value.to_string()));
        self.commits += 1;
        self.dirty = true;
    }

    fn on_validate(&mut self, field_id: &str, errors: &[String]) {
        self.errors.insert(field_id.to_string(), errors.to_vec());
    }

    fn on_history_track_change(&mut self, field_id: &str, value: &str) {
        self.history.insert(field_id.to_string(), value.to_string());
        self.dirty = true;
    }
}

/// A list of fields with a single focus cursor.
#[derive(Debug)]
pub struct FormState {
    fields: Vec<FieldController>,
    values: FormValues,
    field_index: usize,
}

impl FormState {
    /// Build controllers for `configs`, seeding values from the JSON object `initial`.
    pub fn new(configs: Vec<FieldConfig>, initial: &Value) -> Result<Self, FieldError> {
        let mut values = FormValues::default();
        let mut fields = Vec::with_capacity(configs.len());
        for config in configs {
            if values.values.contains_key(&config.id) {
                return Err(FieldError::DuplicateField(config.id));
            }
            let value = initial.get(&config.id).and_then(value_to_text);
            values.values.insert(config.id.clone(), value.clone());
            if let Some(tracked) = &config.history_track_value {
                values.history.insert(config.id.clone(), tracked.clone());
            }
            fields.push(FieldController::new(config, value)?);
        }
        Ok(Self {
            fields,
            values,
            field_index: 0,
        })
    }

    pub fn from_fields(fields: Vec<FieldController>) -> Result<Self, FieldError> {
        let mut values = FormValues::default();
        for field in &fields {
            if values.values.contains_key(field.id()) {
                return Err(FieldError::DuplicateField(field.id().to_string()));
            }
            values.values.insert(
                field.id().to_string(),
                field.external_value().map(str::to_string),
            );
            if let Some(tracked) = field.history_track_value() {
                values.history.insert(field.id().to_string(), tracked.to_string());
            }
        }
        Ok(Self {
            fields,
            values,
            field_index: 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldController] {
        &self.fields
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldController> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    pub fn focused_index(&self) -> usize {
        self.field_index
    }

    pub fn focused_field(&self) -> Option<&FieldController> {
        self.fields.get(self.field_index)
    }

    /// Focus the field under the cursor without moving it.
    pub fn focus_current(&mut self) {
        if let Some(field) = self.fields.get_mut(self.field_index) {
            field.focus(&mut self.values);
        }
    }

    /// Commit the focused field and move the cursor forward, wrapping around.
    pub fn focus_next_field(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev_field(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: isize) {
        if self.fields.is_empty() {
            return;
        }
        self.release_focus();
        let len = self.fields.len() as isize;
        self.field_index = (self.field_index as isize + delta).rem_euclid(len) as usize;
        if let Some(field) = self.fields.get_mut(self.field_index) {
            field.focus(&mut self.values);
        }
    }

    /// Blur the focused field; returns `true` when that committed a value.
    pub fn release_focus(&mut self) -> bool {
        match self.fields.get_mut(self.field_index) {
            Some(field) if field.is_focused() => field.blur(&mut self.values),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(field) = self.fields.get_mut(self.field_index) else {
            return false;
        };
        field.handle_key(key, &mut self.values)
    }

    pub fn paste(&mut self, text: &str) -> bool {
        let Some(field) = self.fields.get_mut(self.field_index) else {
            return false;
        };
        field.paste(text, &mut self.values)
    }

    /// Programmatic change from outside the field, e.g. loading a record.
    pub fn set_value(&mut self, field_id: &str, value: Option<String>) -> bool {
        let Some(field) = self.fields.iter_mut().find(|field| field.id() == field_id) else {
            warn!(field = field_id, "set_value for unknown field");
            return false;
        };
        self.values
            .values
            .insert(field_id.to_string(), value.clone());
        field.external_value_changed(value);
        true
    }

    /// Re-supply the configuration of an existing field, matched by id.
    pub fn reconfigure_field(&mut self, config: FieldConfig) -> Result<bool, FieldError> {
        match self.fields.iter_mut().find(|field| field.id() == config.id) {
            Some(field) => {
                field.reconfigure(config)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Date a field's change; see [`FieldController::set_history_track`].
    pub fn set_history_track(&mut self, field_id: &str, value: &str) -> Result<bool, FieldError> {
        match self.fields.iter_mut().find(|field| field.id() == field_id) {
            Some(field) => field.set_history_track(value, &mut self.values),
            None => Ok(false),
        }
    }

    /// Recorded history-track dates keyed by field id.
    pub fn history_tracks(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .history
            .iter()
            .map(|(id, value)| (id.clone(), Value::String(value.clone())))
            .collect();
        Value::Object(map)
    }

    /// Apply a parent-side error message to a field.
    pub fn set_field_error(&mut self, field_id: &str, error: Option<String>) -> bool {
        match self.fields.iter_mut().find(|field| field.id() == field_id) {
            Some(field) => {
                field.set_external_error(error);
                true
            }
            None => false,
        }
    }

    /// Re-run validation on the committed values and return the issue count.
    pub fn validate_all(&mut self) -> usize {
        let mut issues = 0;
        for field in &self.fields {
            let errors: Vec<String> = field
                .error_messages()
                .into_iter()
                .map(str::to_string)
                .collect();
            issues += errors.len();
            self.values.on_validate(field.id(), &errors);
        }
        issues
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.error_messages().len())
            .sum()
    }

    /// Advance asynchronous editor loading for every rich-text field.
    pub fn poll_editors(&mut self) -> Result<(), FieldError> {
        for field in &mut self.fields {
            field.poll_editor()?;
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.values.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.values.dirty = false;
    }

    /// Committed values as a JSON object; fields without a value are omitted.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .values
            .iter()
            .filter_map(|(id, value)| {
                value
                    .as_ref()
                    .map(|text| (id.clone(), Value::String(text.clone())))
            })
            .collect();
        Value::Object(map)
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}
