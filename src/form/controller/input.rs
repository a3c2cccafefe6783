use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::RenderMode;
use crate::form::{editor::EditorEvent, normalize::normalize_case};

use super::{FieldController, FieldObserver};

impl FieldController {
    /// Route a key press to the widget for the current render mode.
    ///
    /// Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, observer: &mut dyn FieldObserver) -> bool {
        if self.config.disabled {
            return false;
        }
        match self.mode {
            RenderMode::RichText => self.handle_editor_key(key, observer),
            RenderMode::PlainText | RenderMode::MultilineText => {
                self.handle_text_key(key, observer)
            }
        }
    }

    /// Insert pasted text at the end of the value.
    pub fn paste(&mut self, text: &str, observer: &mut dyn FieldObserver) -> bool {
        if self.config.disabled || text.is_empty() {
            return false;
        }
        match self.mode {
            RenderMode::RichText => {
                let mut consumed = false;
                for ch in text.chars() {
                    let code = if ch == '\n' {
                        KeyCode::Enter
                    } else {
                        KeyCode::Char(ch)
                    };
                    consumed |=
                        self.handle_editor_key(&KeyEvent::new(code, KeyModifiers::NONE), observer);
                }
                consumed
            }
            RenderMode::MultilineText => {
                let next = format!("{}{text}", self.buffer);
                self.edit(&next, observer)
            }
            RenderMode::PlainText => {
                let next = format!("{}{}", self.buffer, text.replace(['\r', '\n'], " "));
                self.edit(&next, observer)
            }
        }
    }

    fn handle_text_key(&mut self, key: &KeyEvent, observer: &mut dyn FieldObserver) -> bool {
        match key.code {
            KeyCode::Enter
                if self.mode == RenderMode::MultilineText
                    && key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = self.buffer.clone();
                next.push('\n');
                self.edit(&next, observer)
            }
            KeyCode::Enter => {
                self.commit_key(observer);
                true
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return false;
                }
                let mut next = self.buffer.clone();
                next.push(ch);
                if let Some(mask) = &self.mask {
                    let conformed = mask.conform(&normalize_case(self.config.uppercase, &next));
                    let current = mask.conform(&normalize_case(self.config.uppercase, &self.buffer));
                    if conformed == current {
                        return false;
                    }
                }
                self.edit(&next, observer)
            }
            KeyCode::Backspace => {
                let mut next = self.buffer.clone();
                if next.pop().is_none() {
                    return false;
                }
                self.edit(&next, observer)
            }
            KeyCode::Delete => {
                if self.buffer.is_empty() {
                    return false;
                }
                self.edit("", observer)
            }
            _ => false,
        }
    }

    fn handle_editor_key(&mut self, key: &KeyEvent, observer: &mut dyn FieldObserver) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        if !editor.is_ready() {
            return false;
        }
        match editor.handle_key(key) {
            Some(EditorEvent::Change(content)) => self.edit(&content, observer),
            Some(EditorEvent::Focus) => {
                self.focus(observer);
                true
            }
            Some(EditorEvent::Blur) => {
                self.blur(observer);
                true
            }
            None => false,
        }
    }
}
