use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    form::FormState,
    presentation::{self, UiContext},
};

use super::{
    history::{HistoryPrompt, PromptOutcome},
    input::{KeyCommand, classify},
    options::UiOptions,
    status::StatusLine,
    terminal::FormTerminal,
};

const HELP_TEXT: &str = "Tab/Shift+Tab navigate • Enter commit • Alt+Enter new line • Esc leave field • Ctrl+T history track • Ctrl+S save • Ctrl+Q quit";

/// Key under which recorded history-track dates are saved next to the values.
const HISTORY_TRACK_KEY: &str = "historyTrack";

pub(crate) struct App {
    form_state: FormState,
    options: UiOptions,
    status: StatusLine,
    validation_errors: usize,
    history_prompt: Option<HistoryPrompt>,
    blurred_by_window: bool,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
}

impl App {
    pub fn new(mut form_state: FormState, options: UiOptions) -> Self {
        form_state.focus_current();
        Self {
            form_state,
            options,
            status: StatusLine::new(),
            validation_errors: 0,
            history_prompt: None,
            blurred_by_window: false,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<Value> {
        let mut terminal = FormTerminal::enter()?;
        while !self.should_quit {
            self.form_state
                .poll_editors()
                .context("rich-text editor failed")?;
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Paste(text) => self.handle_paste(&text),
                Event::FocusLost => self.on_window_blur(),
                Event::FocusGained => self.on_window_focus(),
                Event::Resize(_, _) | Event::Mouse(_) => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without saving"))
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };

        presentation::draw(
            frame,
            UiContext {
                form_state: &self.form_state,
                title: self.options.title.as_deref(),
                status_message: self.status.message(),
                dirty: self.form_state.is_dirty(),
                error_count: self.validation_errors,
                help,
                prompt: self.history_prompt.as_ref().map(HistoryPrompt::as_render),
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.history_prompt.is_some() {
            self.handle_prompt_key(&key);
            return;
        }

        match classify(&key) {
            KeyCommand::Save => {
                self.exit_armed = false;
                self.on_save();
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => {
                self.exit_armed = false;
                self.form_state.focus_next_field();
                self.refresh_error_count();
            }
            KeyCommand::PrevField => {
                self.exit_armed = false;
                self.form_state.focus_prev_field();
                self.refresh_error_count();
            }
            KeyCommand::Release => {
                self.exit_armed = false;
                if self.form_state.release_focus() {
                    self.announce_commit();
                } else {
                    self.status.ready();
                }
                self.refresh_error_count();
            }
            KeyCommand::Edit(key) => {
                let commits = self.form_state.values().commits();
                if self.form_state.handle_key(&key) {
                    self.exit_armed = false;
                    if self.form_state.values().commits() > commits {
                        self.announce_commit();
                    } else if let Some(field) = self.form_state.focused_field() {
                        self.status.editing(&field.config().display_label());
                    }
                    self.refresh_error_count();
                }
            }
            KeyCommand::TrackHistory => {
                self.exit_armed = false;
                self.history_prompt = self
                    .form_state
                    .focused_field()
                    .and_then(HistoryPrompt::from_field);
                if self.history_prompt.is_none() {
                    self.status.history_unavailable();
                }
            }
            KeyCommand::None => {}
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) {
        let Some(prompt) = self.history_prompt.as_mut() else {
            return;
        };
        match prompt.handle_key(key) {
            PromptOutcome::Pending => {}
            PromptOutcome::Cancel => self.history_prompt = None,
            PromptOutcome::Submit(value) => {
                let field_id = prompt.field_id().to_string();
                match self.form_state.set_history_track(&field_id, &value) {
                    Ok(_) => {
                        self.history_prompt = None;
                        if let Some(field) = self.form_state.field(&field_id) {
                            self.status.history_tracked(&field.config().display_label());
                        }
                    }
                    Err(err) => prompt.set_error(err.to_string()),
                }
            }
        }
    }

    /// Leaving the terminal window blurs the focused field, committing its edit.
    fn on_window_blur(&mut self) {
        let focused = self
            .form_state
            .focused_field()
            .is_some_and(|field| field.is_focused());
        if self.history_prompt.is_some() || !focused {
            return;
        }
        self.blurred_by_window = true;
        if self.form_state.release_focus() {
            self.announce_commit();
        }
        self.refresh_error_count();
    }

    fn on_window_focus(&mut self) {
        if std::mem::take(&mut self.blurred_by_window) {
            self.form_state.focus_current();
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.form_state.paste(text) {
            self.exit_armed = false;
            self.refresh_error_count();
        }
    }

    fn announce_commit(&mut self) {
        if let Some(field) = self.form_state.focused_field() {
            self.status.committed(&field.config().display_label());
        }
    }

    fn refresh_error_count(&mut self) {
        self.validation_errors = self.form_state.error_count();
    }

    fn on_save(&mut self) {
        self.form_state.release_focus();
        let issues = self.form_state.validate_all();
        self.validation_errors = issues;
        if issues > 0 {
            debug!(issues, "save refused");
            self.status.issues_remaining(issues);
            return;
        }
        info!("form saved");
        let mut result = self.form_state.to_value();
        let history = self.form_state.history_tracks();
        if let (Value::Object(map), Value::Object(tracks)) = (&mut result, &history)
            && !tracks.is_empty()
        {
            map.insert(HISTORY_TRACK_KEY.to_string(), history.clone());
        }
        self.result = Some(result);
        self.form_state.clear_dirty();
        self.status.saved();
        self.should_quit = true;
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form_state.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldConfig;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn app(configs: Vec<FieldConfig>, initial: Value) -> App {
        let form_state = FormState::new(configs, &initial).expect("form");
        App::new(form_state, UiOptions::default())
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_key(KeyEvent::new(code, modifiers));
    }

    #[test]
    fn save_is_refused_while_required_field_is_blank() {
        let mut app = app(
            vec![FieldConfig::new("name").with_label("Name").required(true)],
            Value::Null,
        );
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(app.result.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.status.message(), "1 issue(s) remaining");
    }

    #[test]
    fn save_commits_focused_field_first() {
        let mut app = app(
            vec![FieldConfig::new("name").uppercase(true).required(true)],
            Value::Null,
        );
        press(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('b'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.result, Some(json!({"name": "AB"})));
        assert!(app.should_quit);
        assert!(!app.form_state.is_dirty());
    }

    #[test]
    fn quitting_with_unsaved_changes_needs_confirmation() {
        let mut app = app(vec![FieldConfig::new("a"), FieldConfig::new("b")], Value::Null);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(app.form_state.is_dirty());
        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!app.should_quit);
        assert!(app.exit_armed);
        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
        assert!(app.result.is_none());
    }

    #[test]
    fn enter_commits_and_updates_status() {
        let mut app = app(vec![FieldConfig::new("city").with_label("City")], Value::Null);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.status.message(), "Editing City");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.status.message(), "City updated");
        assert_eq!(app.form_state.values().get("city"), Some("x"));
    }

    #[test]
    fn history_track_prompt_records_date_and_is_saved() {
        let mut app = app(
            vec![FieldConfig::new("price").with_label("Price").history_track(true)],
            json!({"price": "10"}),
        );
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(app.history_prompt.is_none());
        assert_eq!(
            app.status.message(),
            "Change a history-tracked field before dating it"
        );

        press(&mut app, KeyCode::Char('5'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(app.history_prompt.is_some());
        for ch in "2024-13-01 09:30".chars() {
            press(&mut app, KeyCode::Char(ch), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.history_prompt.as_ref().unwrap().as_render().error.is_some());
        assert_eq!(app.form_state.values().get("price"), Some("10"));

        for _ in 0.."13-01 09:30".len() {
            press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        }
        for ch in "12-01 09:30".chars() {
            press(&mut app, KeyCode::Char(ch), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.history_prompt.is_none());
        assert_eq!(app.status.message(), "History track recorded for Price");

        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            app.result,
            Some(json!({"price": "105", "historyTrack": {"price": "2024-12-01 09:30"}}))
        );
    }

    #[test]
    fn window_blur_commits_and_refocuses_on_return() {
        let mut app = app(vec![FieldConfig::new("city").with_label("City")], Value::Null);
        press(&mut app, KeyCode::Char('O'), KeyModifiers::NONE);
        app.on_window_blur();
        assert_eq!(app.form_state.values().get("city"), Some("O"));
        assert_eq!(app.status.message(), "City updated");
        assert!(!app.form_state.focused_field().unwrap().is_focused());

        app.on_window_focus();
        assert!(app.form_state.focused_field().unwrap().is_focused());
        app.on_window_focus();
        assert!(app.form_state.focused_field().unwrap().is_focused());
    }
}
