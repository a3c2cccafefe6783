use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    NextField,
    PrevField,
    Release,
    TrackHistory,
    Edit(KeyEvent),
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => KeyCommand::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            KeyCode::Char('t') | KeyCode::Char('T') => KeyCommand::TrackHistory,
            _ => KeyCommand::Edit(*key),
        };
    }

    match key.code {
        KeyCode::Tab => KeyCommand::NextField,
        KeyCode::BackTab => KeyCommand::PrevField,
        KeyCode::Esc => KeyCommand::Release,
        KeyCode::Null => KeyCommand::None,
        _ => KeyCommand::Edit(*key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_shortcuts_map_to_commands() {
        assert_eq!(
            classify(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            KeyCommand::Save
        );
        assert_eq!(
            classify(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyCommand::Quit
        );
        assert_eq!(
            classify(&key(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            KeyCommand::TrackHistory
        );
    }

    #[test]
    fn ctrl_b_reaches_the_field() {
        let ctrl_b = key(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(classify(&ctrl_b), KeyCommand::Edit(ctrl_b));
    }

    #[test]
    fn shift_tab_moves_to_previous_field() {
        let action = classify(&key(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(action, KeyCommand::PrevField);
    }

    #[test]
    fn esc_releases_focus() {
        assert_eq!(
            classify(&key(KeyCode::Esc, KeyModifiers::NONE)),
            KeyCommand::Release
        );
    }
}
