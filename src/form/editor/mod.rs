mod markup;

use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use crossterm::event::KeyEvent;
use tracing::debug;

use crate::domain::FieldConfig;

use super::error::EditorError;

pub use markup::MarkupEditor;

/// Native editor notification, translated by the controller into the
/// field-level change/blur contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Change(String),
    Focus,
    Blur,
}

/// Settings handed to an editor when it is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub field_id: String,
    pub placeholder: String,
    pub uppercase: bool,
    pub disabled: bool,
}

impl EditorOptions {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            field_id: config.id.clone(),
            placeholder: config.placeholder_text().to_string(),
            uppercase: config.uppercase,
            disabled: config.disabled,
        }
    }
}

/// Adapter seam for rich-text editors.
pub trait RichTextEditor: fmt::Debug {
    fn mount(&mut self, options: &EditorOptions) -> Result<(), EditorError>;

    /// Editors that load asynchronously report `Ok(false)` until usable.
    fn poll_ready(&mut self) -> Result<bool, EditorError> {
        Ok(true)
    }

    fn unmount(&mut self);

    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn set_disabled(&mut self, _disabled: bool) {}

    fn handle_key(&mut self, key: &KeyEvent) -> Option<EditorEvent>;

    fn display_lines(&self) -> Vec<String> {
        self.value().lines().map(str::to_string).collect()
    }
}

/// A mounted editor; dropping the guard unmounts it.
#[derive(Debug)]
pub struct MountedEditor {
    editor: Box<dyn RichTextEditor>,
    field_id: String,
    ready: bool,
}

impl MountedEditor {
    pub fn mount(
        mut editor: Box<dyn RichTextEditor>,
        options: &EditorOptions,
    ) -> Result<Self, EditorError> {
        editor.mount(options)?;
        debug!(field = %options.field_id, "editor mounted");
        Ok(Self {
            editor,
            field_id: options.field_id.clone(),
            ready: false,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Poll the editor and return `true` exactly once, on the tick it became ready.
    pub fn poll(&mut self) -> Result<bool, EditorError> {
        if self.ready {
            return Ok(false);
        }
        self.ready = self.editor.poll_ready()?;
        if self.ready {
            debug!(field = %self.field_id, "editor ready");
        }
        Ok(self.ready)
    }
}

impl Drop for MountedEditor {
    fn drop(&mut self) {
        self.editor.unmount();
        debug!(field = %self.field_id, "editor unmounted");
    }
}

impl Deref for MountedEditor {
    type Target = dyn RichTextEditor;

    fn deref(&self) -> &Self::Target {
        self.editor.as_ref()
    }
}

impl DerefMut for MountedEditor {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.editor.as_mut()
    }
}
