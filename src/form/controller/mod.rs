mod history;
mod input;

use tracing::{debug, trace};

use crate::domain::{FieldConfig, RenderMode};

use super::{
    editor::{EditorOptions, MarkupEditor, MountedEditor, RichTextEditor},
    error::{EditorError, FieldError},
    mask::MaskPattern,
    normalize::normalize_case,
    validation::FieldValidator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused,
    Focused,
}

/// Commit point that pushed a value to the owning form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    Blur,
    Enter,
}

/// Parent-form side of the field contract.
pub trait FieldObserver {
    /// Called only at commit points, never per keystroke.
    fn on_change(&mut self, trigger: CommitTrigger, field_id: &str, value: &str);

    /// Called after every edit with the recomputed errors.
    fn on_validate(&mut self, _field_id: &str, _errors: &[String]) {}

    fn on_focus(&mut self, _field_id: &str) {}

    fn on_blur(&mut self, _field_id: &str) {}

    /// Called when the user records when a tracked change took effect.
    fn on_history_track_change(&mut self, _field_id: &str, _value: &str) {}
}

/// Edit-buffer owner for a single field.
///
/// While unfocused the buffer mirrors the last external value. While focused
/// the buffer is authoritative and external updates wait for the next commit
/// point.
#[derive(Debug)]
pub struct FieldController {
    config: FieldConfig,
    mode: RenderMode,
    mask: Option<MaskPattern>,
    validator: FieldValidator,
    buffer: String,
    external: Option<String>,
    deferred: Option<Option<String>>,
    focus: FocusState,
    has_change: bool,
    errors: Vec<String>,
    external_error: Option<String>,
    history_track_value: Option<String>,
    editor: Option<MountedEditor>,
}

impl FieldController {
    /// Rich-text fields get the built-in [`MarkupEditor`].
    pub fn new(config: FieldConfig, value: Option<String>) -> Result<Self, FieldError> {
        let editor = (config.render_mode() == RenderMode::RichText)
            .then(|| Box::new(MarkupEditor::new()) as Box<dyn RichTextEditor>);
        Self::build(config, value, editor)
    }

    pub fn with_editor(
        config: FieldConfig,
        value: Option<String>,
        editor: Box<dyn RichTextEditor>,
    ) -> Result<Self, FieldError> {
        Self::build(config, value, Some(editor))
    }

    fn build(
        config: FieldConfig,
        value: Option<String>,
        editor: Option<Box<dyn RichTextEditor>>,
    ) -> Result<Self, FieldError> {
        if config.id.trim().is_empty() {
            return Err(FieldError::EmptyId);
        }
        let validator = FieldValidator::for_field(&config)?;
        let mode = config.render_mode();
        let mask = mask_for(&config, mode);
        let buffer = value.clone().unwrap_or_default();
        let errors = validator.validate(&buffer);
        let history_track_value = config.history_track_value.clone();
        let mut controller = Self {
            config,
            mode,
            mask,
            validator,
            buffer,
            external: value,
            deferred: None,
            focus: FocusState::Unfocused,
            has_change: false,
            errors,
            external_error: None,
            history_track_value,
            editor: None,
        };
        if mode == RenderMode::RichText {
            let editor = editor.ok_or_else(|| controller.editor_error(EditorError::NotMounted))?;
            controller.mount_editor(editor)?;
        }
        Ok(controller)
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    pub fn is_focused(&self) -> bool {
        self.focus == FocusState::Focused
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Raw edit buffer, before normalization of externally supplied text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Value that a commit would push upward.
    pub fn value(&self) -> String {
        normalize_case(self.config.uppercase, &self.buffer)
    }

    /// Last value received from, or committed to, the owning form.
    pub fn external_value(&self) -> Option<&str> {
        self.external.as_deref()
    }

    /// What the input shows: the normalized value, masked when a format is set.
    pub fn display_value(&self) -> String {
        let value = self.value();
        match &self.mask {
            Some(mask) => mask.render(&mask.conform(&value)),
            None => value,
        }
    }

    pub fn mask(&self) -> Option<&MaskPattern> {
        self.mask.as_ref()
    }

    pub fn has_change(&self) -> bool {
        self.has_change
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn external_error(&self) -> Option<&str> {
        self.external_error.as_deref()
    }

    /// Validation errors followed by the parent-supplied error, if any.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(String::as_str)
            .chain(self.external_error.as_deref())
            .collect()
    }

    pub fn set_external_error(&mut self, error: Option<String>) {
        self.external_error = error;
    }

    pub fn editor(&self) -> Option<&MountedEditor> {
        self.editor.as_ref()
    }

    pub fn editor_ready(&self) -> bool {
        self.editor.as_ref().is_some_and(MountedEditor::is_ready)
    }

    pub fn focus(&mut self, observer: &mut dyn FieldObserver) {
        self.focus = FocusState::Focused;
        trace!(field = %self.config.id, "focused");
        observer.on_focus(&self.config.id);
    }

    /// Replace the buffer with a new raw value typed by the user.
    ///
    /// Returns `false` when the field does not accept edits (disabled, or an
    /// editor that has not finished loading).
    pub fn edit(&mut self, raw: &str, observer: &mut dyn FieldObserver) -> bool {
        if !self.apply_edit(raw, observer) {
            return false;
        }
        self.sync_editor();
        true
    }

    /// Write the buffer back into a ready editor whose content differs,
    /// e.g. after normalization changed what the editor reported.
    fn sync_editor(&mut self) {
        if let Some(editor) = self.editor.as_mut()
            && editor.is_ready()
            && editor.value() != self.buffer
        {
            editor.set_value(&self.buffer);
        }
    }

    fn apply_edit(&mut self, raw: &str, observer: &mut dyn FieldObserver) -> bool {
        if self.config.disabled {
            return false;
        }
        if self.mode == RenderMode::RichText && !self.editor_ready() {
            return false;
        }
        let mut value = normalize_case(self.config.uppercase, raw);
        if let Some(mask) = &self.mask {
            value = mask.conform(&value);
        }
        self.buffer = value;
        self.has_change = true;
        self.focus = FocusState::Focused;
        self.errors = self.validator.validate(&self.buffer);
        observer.on_validate(&self.config.id, &self.errors);
        true
    }

    /// Commit point: leave the field.
    pub fn blur(&mut self, observer: &mut dyn FieldObserver) -> bool {
        let committed = self.flush(CommitTrigger::Blur, observer);
        self.settle(committed);
        observer.on_blur(&self.config.id);
        committed
    }

    /// Commit point: the commit key (Enter) was pressed.
    pub fn commit_key(&mut self, observer: &mut dyn FieldObserver) -> bool {
        let committed = self.flush(CommitTrigger::Enter, observer);
        self.settle(committed);
        committed
    }

    /// A new value arrived from the owning form.
    pub fn external_value_changed(&mut self, value: Option<String>) {
        if self.is_focused() {
            debug!(field = %self.config.id, "deferring external value while focused");
            self.deferred = Some(value);
            return;
        }
        self.replace_from_external(value);
    }

    /// Apply a new configuration supplied by the owning form.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), FieldError> {
        if config == self.config {
            return Ok(());
        }
        if config.id.trim().is_empty() {
            return Err(FieldError::EmptyId);
        }
        let validator = FieldValidator::for_field(&config)?;
        let mode = config.render_mode();
        let previous = self.mode;
        self.mask = mask_for(&config, mode);
        self.validator = validator;
        if config.history_track_value.is_some() {
            self.history_track_value = config.history_track_value.clone();
        }
        self.config = config;
        self.mode = mode;

        match (previous == RenderMode::RichText, mode == RenderMode::RichText) {
            (true, false) => self.editor = None,
            (false, true) => self.mount_editor(Box::new(MarkupEditor::new()))?,
            _ => {
                let disabled = self.config.disabled;
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_disabled(disabled);
                }
            }
        }
        self.errors = self.validator.validate(&self.buffer);
        Ok(())
    }

    /// Drive asynchronous editor loading; hydrates the editor once it is ready.
    ///
    /// Returns `true` on the tick the editor became usable.
    pub fn poll_editor(&mut self) -> Result<bool, FieldError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(false);
        };
        match editor.poll() {
            Ok(true) => {
                editor.set_value(&self.buffer);
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(source) => {
                self.editor = None;
                Err(self.editor_error(source))
            }
        }
    }

    fn mount_editor(&mut self, editor: Box<dyn RichTextEditor>) -> Result<(), FieldError> {
        let options = EditorOptions::from_config(&self.config);
        let mounted =
            MountedEditor::mount(editor, &options).map_err(|source| self.editor_error(source))?;
        self.editor = Some(mounted);
        self.poll_editor()?;
        Ok(())
    }

    fn flush(&mut self, trigger: CommitTrigger, observer: &mut dyn FieldObserver) -> bool {
        if self.buffer == self.external.as_deref().unwrap_or_default() {
            return false;
        }
        let value = self.value();
        debug!(field = %self.config.id, ?trigger, "committing value");
        observer.on_change(trigger, &self.config.id, &value);
        self.buffer = value.clone();
        self.external = Some(value);
        self.sync_editor();
        true
    }

    fn settle(&mut self, committed: bool) {
        self.focus = FocusState::Unfocused;
        if let Some(deferred) = self.deferred.take() {
            if committed {
                debug!(field = %self.config.id, "dropping deferred external value");
            } else {
                self.replace_from_external(deferred);
            }
        }
    }

    fn replace_from_external(&mut self, value: Option<String>) {
        let next = value.clone().unwrap_or_default();
        if next != self.buffer {
            self.has_change = false;
            self.buffer = next;
            if let Some(editor) = self.editor.as_mut()
                && editor.is_ready()
            {
                editor.set_value(&self.buffer);
            }
        }
        self.external = value;
        self.errors = self.validator.validate(&self.buffer);
    }

    fn editor_error(&self, source: EditorError) -> FieldError {
        FieldError::EditorUnavailable {
            field: self.config.id.clone(),
            source,
        }
    }
}

/// Masks apply to single-line inputs only.
fn mask_for(config: &FieldConfig, mode: RenderMode) -> Option<MaskPattern> {
    if mode == RenderMode::PlainText {
        MaskPattern::from_format(&config.format)
    } else {
        None
    }
}
