use std::sync::LazyLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;

use super::{EditorError, EditorEvent, EditorOptions, RichTextEditor};

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p>(.*?)</p>").expect("paragraph pattern"));
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?strong>").expect("strong pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(lt|gt|nbsp|amp);").expect("entity pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Paragraph {
    text: String,
    bold: bool,
}

/// Built-in paragraph editor producing `<p>` markup.
///
/// `Enter` starts a paragraph, `Ctrl+B` toggles bold on the current one and
/// `Esc` leaves the editor.
#[derive(Debug, Clone)]
pub struct MarkupEditor {
    paragraphs: Vec<Paragraph>,
    mounted: bool,
    disabled: bool,
    uppercase: bool,
}

impl Default for MarkupEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupEditor {
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            mounted: false,
            disabled: false,
            uppercase: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.text.is_empty())
    }

    fn current(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    fn changed(&self) -> Option<EditorEvent> {
        Some(EditorEvent::Change(self.value()))
    }
}

impl RichTextEditor for MarkupEditor {
    fn mount(&mut self, options: &EditorOptions) -> Result<(), EditorError> {
        self.mounted = true;
        self.disabled = options.disabled;
        self.uppercase = options.uppercase;
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn value(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        self.paragraphs
            .iter()
            .map(|p| {
                let text = escape(&p.text);
                if p.bold {
                    format!("<p><strong>{text}</strong></p>")
                } else {
                    format!("<p>{text}</p>")
                }
            })
            .collect()
    }

    fn set_value(&mut self, value: &str) {
        let mut paragraphs: Vec<Paragraph> = PARAGRAPH
            .captures_iter(value)
            .map(|caps| parse_paragraph(&caps[1]))
            .collect();
        if paragraphs.is_empty() && !value.is_empty() {
            paragraphs = value.lines().map(parse_paragraph).collect();
        }
        if paragraphs.is_empty() {
            paragraphs.push(Paragraph::default());
        }
        self.paragraphs = paragraphs;
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<EditorEvent> {
        if !self.mounted || self.disabled {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(EditorEvent::Blur),
            KeyCode::Char('b') | KeyCode::Char('B')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                let current = self.current();
                current.bold = !current.bold;
                self.changed()
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return None;
                }
                self.current().text.push(ch);
                self.changed()
            }
            KeyCode::Enter => {
                self.paragraphs.push(Paragraph::default());
                self.changed()
            }
            KeyCode::Backspace => {
                if self.current().text.pop().is_none() {
                    if self.paragraphs.len() <= 1 {
                        return None;
                    }
                    self.paragraphs.pop();
                }
                self.changed()
            }
            _ => None,
        }
    }

    fn display_lines(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .map(|p| {
                if self.uppercase {
                    p.text.to_uppercase()
                } else {
                    p.text.clone()
                }
            })
            .collect()
    }
}

fn parse_paragraph(inner: &str) -> Paragraph {
    let bold = STRONG.is_match(inner);
    let text = TAG.replace_all(inner, "");
    Paragraph {
        text: unescape(&text),
        bold,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// Entities may arrive upper-cased once the value went through case normalization.
fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            match caps[1].to_ascii_lowercase().as_str() {
                "lt" => "<",
                "gt" => ">",
                "nbsp" => " ",
                _ => "&",
            }
            .to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldConfig;

    fn mounted() -> MarkupEditor {
        let mut editor = MarkupEditor::new();
        let options = EditorOptions::from_config(&FieldConfig::new("body").multiline(true));
        assert_eq!(options.placeholder, "body");
        editor.mount(&options).unwrap();
        editor
    }

    #[test]
    fn mount_takes_uppercase_and_disabled_from_config() {
        let config = FieldConfig::new("body").uppercase(true).disabled(true);
        let mut editor = MarkupEditor::new();
        editor.mount(&EditorOptions::from_config(&config)).unwrap();
        editor.set_value("<p>quiet</p>");
        assert_eq!(editor.display_lines(), vec!["QUIET"]);
        assert_eq!(press(&mut editor, KeyCode::Char('x')), None);
    }

    fn press(editor: &mut MarkupEditor, code: KeyCode) -> Option<EditorEvent> {
        editor.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_emits_paragraph_markup() {
        let mut editor = mounted();
        press(&mut editor, KeyCode::Char('h'));
        let event = press(&mut editor, KeyCode::Char('i'));
        assert_eq!(event, Some(EditorEvent::Change("<p>hi</p>".to_string())));
        press(&mut editor, KeyCode::Enter);
        editor.handle_key(&KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        press(&mut editor, KeyCode::Char('<'));
        assert_eq!(editor.value(), "<p>hi</p><p><strong>&lt;</strong></p>");
    }

    #[test]
    fn parses_existing_markup_case_insensitively() {
        let mut editor = mounted();
        editor.set_value("<P><STRONG>A &amp; B</STRONG></P><p>two</p>");
        assert_eq!(editor.display_lines(), vec!["A & B", "two"]);
        assert_eq!(editor.value(), "<p><strong>A &amp; B</strong></p><p>two</p>");
        editor.set_value("<P>X &AMP; Y</P>");
        assert_eq!(editor.display_lines(), vec!["X & Y"]);
    }

    #[test]
    fn plain_text_becomes_paragraphs() {
        let mut editor = mounted();
        editor.set_value("first\nsecond");
        assert_eq!(editor.value(), "<p>first</p><p>second</p>");
        editor.set_value("");
        assert_eq!(editor.value(), "");
    }

    #[test]
    fn esc_blurs_and_unmounted_editor_ignores_keys() {
        let mut editor = mounted();
        assert_eq!(press(&mut editor, KeyCode::Esc), Some(EditorEvent::Blur));
        editor.unmount();
        assert_eq!(press(&mut editor, KeyCode::Char('x')), None);
    }

    #[test]
    fn backspace_joins_empty_paragraphs() {
        let mut editor = mounted();
        press(&mut editor, KeyCode::Char('a'));
        press(&mut editor, KeyCode::Enter);
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.value(), "<p>a</p>");
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.value(), "");
        assert_eq!(press(&mut editor, KeyCode::Backspace), None);
    }
}
