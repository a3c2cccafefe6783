use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{form::FieldController, presentation::PromptRender};

pub(crate) enum PromptOutcome {
    Pending,
    Submit(String),
    Cancel,
}

/// Date-time entry for a field's history track.
pub(crate) struct HistoryPrompt {
    field_id: String,
    title: String,
    input: String,
    error: Option<String>,
}

impl HistoryPrompt {
    pub(crate) fn from_field(field: &FieldController) -> Option<Self> {
        if !field.accepts_history_track() {
            return None;
        }
        Some(Self {
            field_id: field.id().to_string(),
            title: format!("History Track: {}", field.config().display_label()),
            input: field.history_track_value().unwrap_or_default().to_string(),
            error: None,
        })
    }

    pub(crate) fn field_id(&self) -> &str {
        &self.field_id
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => PromptOutcome::Cancel,
            KeyCode::Enter => PromptOutcome::Submit(self.input.clone()),
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                PromptOutcome::Pending
            }
            KeyCode::Char(ch)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && (ch.is_ascii_digit() || matches!(ch, '-' | ':' | ' ' | 'T')) =>
            {
                self.input.push(ch);
                self.error = None;
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    pub(crate) fn as_render(&self) -> PromptRender<'_> {
        PromptRender {
            title: &self.title,
            input: &self.input,
            hint: "YYYY-MM-DD HH:MM • Enter save • Esc cancel",
            error: self.error.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::FieldConfig, form::FormValues};

    fn changed_field() -> FieldController {
        let config = FieldConfig::new("price").with_label("Price").history_track(true);
        let mut field = FieldController::new(config, None).unwrap();
        field.edit("12", &mut FormValues::default());
        field
    }

    #[test]
    fn prompt_only_opens_for_changed_tracked_fields() {
        let untouched =
            FieldController::new(FieldConfig::new("price").history_track(true), None).unwrap();
        assert!(HistoryPrompt::from_field(&untouched).is_none());
        let prompt = HistoryPrompt::from_field(&changed_field()).unwrap();
        assert_eq!(prompt.field_id(), "price");
        assert_eq!(prompt.as_render().title, "History Track: Price");
    }

    #[test]
    fn prompt_filters_characters_and_submits() {
        let mut prompt = HistoryPrompt::from_field(&changed_field()).unwrap();
        for ch in "2024-05-01x 09:30".chars() {
            prompt.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        prompt.set_error("bad".into());
        prompt.handle_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert!(prompt.as_render().error.is_none());
        let outcome = prompt.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(outcome, PromptOutcome::Submit(value) if value == "2024-05-01 09:3"));
    }
}
