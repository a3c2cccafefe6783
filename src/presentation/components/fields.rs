use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    domain::{FieldStyles, RenderMode},
    form::{FieldController, FormState},
};

const MIN_TEXTAREA_ROWS: usize = 2;
const MAX_TEXTAREA_ROWS: usize = 6;

pub fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &FormState,
    title: &str,
    enable_cursor: bool,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if form_state.is_empty() {
        frame.render_widget(Paragraph::new("This form has no fields").block(block), area);
        return;
    }

    let selected_index = form_state.focused_index();
    let content_width = area.width.saturating_sub(6);
    let mut items = Vec::with_capacity(form_state.fields().len());
    let mut cursor_hint: Option<CursorHint> = None;
    let mut line_offset = 0usize;

    for (idx, field) in form_state.fields().iter().enumerate() {
        let render = build_field_render(field, idx == selected_index, content_width);
        if let Some(mut hint) = render.cursor_hint {
            hint.line_offset += line_offset;
            cursor_hint = Some(hint);
        }
        line_offset += render.lines.len();
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    let list = List::new(items).block(block).highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);

    // The cursor is only placed while the list is not scrolled.
    if enable_cursor && list_state.offset() == 0 {
        if let Some(cursor) = cursor_hint {
            let inner_y = area.y.saturating_add(1);
            let inner_x = area.x.saturating_add(1);
            let line = cursor
                .line_offset
                .min(area.height.saturating_sub(2) as usize) as u16;
            let cursor_x = inner_x
                .saturating_add(2)
                .saturating_add(cursor.column_offset)
                .saturating_add(cursor.value_width);
            frame.set_cursor_position((cursor_x, inner_y.saturating_add(line)));
        }
    }
}

pub(crate) struct FieldRender {
    pub(crate) lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

#[derive(Debug, Clone, Copy)]
struct CursorHint {
    line_offset: usize,
    column_offset: u16,
    value_width: u16,
}

pub(crate) fn build_field_render(
    field: &FieldController,
    is_selected: bool,
    max_width: u16,
) -> FieldRender {
    let config = field.config();
    let mut lines = Vec::new();

    let marker = field.accepts_history_track().then(|| {
        let text = match field.history_track_value() {
            Some(tracked) => format!("  • modified {tracked}"),
            None => "  • modified (Ctrl+T to date)".to_string(),
        };
        Span::styled(text, Style::default().fg(Color::Yellow))
    });

    if config.with_label {
        let label_style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![Span::styled(config.display_label(), label_style)];
        spans.extend(marker);
        lines.push(Line::from(spans));
    } else if let Some(marker) = marker {
        lines.push(Line::from(marker));
    }

    let (panel, cursor_hint) = value_panel_lines(field, is_selected, max_width);
    lines.extend(panel);

    if let Some(meta) = meta_line(field) {
        lines.push(meta);
    }
    lines.extend(error_lines(field, max_width));

    FieldRender { lines, cursor_hint }
}

/// Rows of content for the value panel, and whether they are placeholder text.
fn panel_rows(field: &FieldController, width: usize) -> (Vec<String>, bool) {
    let placeholder = field.config().placeholder_text().to_string();
    match field.mode() {
        RenderMode::PlainText => {
            let value = field.display_value();
            if value.is_empty() {
                (vec![placeholder], true)
            } else {
                (vec![value], false)
            }
        }
        RenderMode::MultilineText => {
            let value = field.display_value();
            if value.is_empty() {
                let mut rows = vec![placeholder];
                rows.resize(MIN_TEXTAREA_ROWS, String::new());
                return (rows, true);
            }
            let mut rows: Vec<String> = value
                .split('\n')
                .flat_map(|line| {
                    let wrapped: Vec<String> = wrap(line, width)
                        .into_iter()
                        .map(|segment| segment.into_owned())
                        .collect();
                    if wrapped.is_empty() {
                        vec![String::new()]
                    } else {
                        wrapped
                    }
                })
                .collect();
            if rows.len() > MAX_TEXTAREA_ROWS {
                rows.drain(..rows.len() - MAX_TEXTAREA_ROWS);
            }
            if rows.len() < MIN_TEXTAREA_ROWS {
                rows.resize(MIN_TEXTAREA_ROWS, String::new());
            }
            (rows, false)
        }
        RenderMode::RichText => match field.editor() {
            Some(editor) if editor.is_ready() => {
                let rows: Vec<String> = editor
                    .display_lines()
                    .iter()
                    .flat_map(|line| {
                        wrap(line, width)
                            .into_iter()
                            .map(|segment| segment.into_owned())
                            .collect::<Vec<_>>()
                    })
                    .collect();
                if rows.iter().all(|row| row.is_empty()) {
                    (vec![placeholder], true)
                } else {
                    (rows, false)
                }
            }
            _ => (vec!["loading editor…".to_string()], true),
        },
    }
}

fn value_panel_lines(
    field: &FieldController,
    is_selected: bool,
    max_width: u16,
) -> (Vec<Line<'static>>, Option<CursorHint>) {
    let clamp_width = max_width.max(4) as usize;
    let (rows, is_placeholder) = panel_rows(field, clamp_width);
    let inner_width = rows
        .iter()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .max()
        .unwrap_or(0);
    let value_style = if is_placeholder {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    } else {
        value_style(&field.config().styles, field.is_disabled())
    };

    let mut lines = Vec::new();
    if !is_selected {
        for row in rows {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(row, value_style),
            ]));
        }
        return (lines, None);
    }

    let border_line = "─".repeat(inner_width.saturating_add(2));
    let border_style = Style::default().fg(Color::Yellow);
    lines.push(Line::from(Span::styled(
        format!("┌{border_line}┐"),
        border_style,
    )));
    let first_value_line = lines.len();
    let last_row = rows.len().saturating_sub(1);
    let last_width = if is_placeholder {
        0
    } else {
        rows.last()
            .map(|row| UnicodeWidthStr::width(row.as_str()))
            .unwrap_or(0)
    };
    for row in rows {
        let padding = inner_width.saturating_sub(UnicodeWidthStr::width(row.as_str()));
        lines.push(Line::from(vec![
            Span::styled("│ ", border_style),
            Span::styled(row, value_style),
            Span::raw(" ".repeat(padding)),
            Span::styled(" │", border_style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("└{border_line}┘"),
        border_style,
    )));

    let cursor_hint = (!field.is_disabled()).then_some(CursorHint {
        line_offset: first_value_line + last_row,
        column_offset: 2,
        value_width: last_width as u16,
    });
    (lines, cursor_hint)
}

fn value_style(styles: &FieldStyles, disabled: bool) -> Style {
    let mut style = Style::default().fg(Color::White);
    if let Some(fg) = styles.fg.as_deref().and_then(|raw| raw.parse::<Color>().ok()) {
        style = style.fg(fg);
    }
    if let Some(bg) = styles.bg.as_deref().and_then(|raw| raw.parse::<Color>().ok()) {
        style = style.bg(bg);
    }
    if styles.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if styles.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if disabled {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
    }
    style
}

fn meta_line(field: &FieldController) -> Option<Line<'static>> {
    let mut meta = Vec::new();
    if let Some(mask) = field.mask() {
        let value = field.value();
        if !mask.is_complete(&mask.conform(&value)) {
            meta.push(Span::styled(
                format!("  format: {}", mask.pattern()),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    if let Some(tooltip) = field.config().tooltip.as_deref() {
        meta.push(Span::styled(
            format!("  ⓘ {tooltip}"),
            Style::default().fg(Color::Gray),
        ));
    }
    if field.is_disabled() {
        meta.push(Span::styled(
            "  • disabled",
            Style::default().fg(Color::DarkGray),
        ));
    }
    (!meta.is_empty()).then(|| Line::from(meta))
}

fn error_lines(field: &FieldController, max_width: u16) -> Vec<Line<'static>> {
    let width = max_width.max(4) as usize;
    field
        .error_messages()
        .into_iter()
        .flat_map(|message| {
            wrap(message, width)
                .into_iter()
                .map(|line| {
                    Line::from(Span::styled(
                        format!("  {line}"),
                        Style::default().fg(Color::Red),
                    ))
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldConfig, FormatSegment};

    fn text_of(render: &FieldRender) -> Vec<String> {
        render
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn empty_field_shows_placeholder_and_required_label() {
        let config = FieldConfig::new("name").with_label("Name").required(true);
        let field = FieldController::new(config, None).unwrap();
        let lines = text_of(&build_field_render(&field, false, 40));
        assert_eq!(lines[0], "*Name");
        assert_eq!(lines[1], "  Name");
        assert_eq!(lines[2], "  Name can't be blank");
    }

    #[test]
    fn tracked_field_shows_modified_marker_with_date() {
        let config = FieldConfig::new("price")
            .with_label("Price")
            .history_track(true)
            .with_history_track_value("2024-05-01 09:30");
        let mut field = FieldController::new(config, Some("10".to_string())).unwrap();
        assert_eq!(text_of(&build_field_render(&field, false, 40))[0], "Price");

        field.edit("11", &mut crate::form::FormValues::default());
        let lines = text_of(&build_field_render(&field, false, 40));
        assert_eq!(lines[0], "Price  • modified 2024-05-01 09:30");

        let mut bare =
            FieldController::new(FieldConfig::new("qty").history_track(true), None).unwrap();
        bare.edit("3", &mut crate::form::FormValues::default());
        let lines = text_of(&build_field_render(&bare, false, 40));
        assert_eq!(lines[0], "  • modified (Ctrl+T to date)");
        assert_eq!(lines[1], "  3");
    }

    #[test]
    fn masked_value_renders_with_delimiters() {
        let config = FieldConfig::new("phone")
            .with_format(vec![FormatSegment::numeric(3, "-"), FormatSegment::numeric(4, "")]);
        let field = FieldController::new(config, Some("5551".to_string())).unwrap();
        let lines = text_of(&build_field_render(&field, false, 40));
        assert_eq!(lines[0], "  555-1");
        assert_eq!(lines[1], "  format: 999-9999");
    }

    #[test]
    fn selected_textarea_is_boxed_with_minimum_rows() {
        let config = FieldConfig::new("notes").multiline(true).with_tooltip("Free text");
        let field = FieldController::new(config, Some("hello".to_string())).unwrap();
        let render = build_field_render(&field, true, 40);
        let lines = text_of(&render);
        assert!(lines[0].starts_with('┌'));
        assert_eq!(lines[1], "│ hello │");
        assert_eq!(lines[2], "│       │");
        assert!(lines[3].starts_with('└'));
        assert_eq!(lines[4], "  ⓘ Free text");
        assert!(render.cursor_hint.is_some());
    }

    #[test]
    fn textarea_keeps_last_rows() {
        let value = (1..=8).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let config = FieldConfig::new("notes").multiline(true);
        let field = FieldController::new(config, Some(value)).unwrap();
        let lines = text_of(&build_field_render(&field, false, 40));
        assert_eq!(lines.len(), MAX_TEXTAREA_ROWS);
        assert_eq!(lines[0], "  3");
        assert_eq!(lines[5], "  8");
    }

    #[test]
    fn rich_text_panel_shows_editor_paragraphs() {
        let config = FieldConfig::new("body").multiline(true).rich_text(true);
        let field =
            FieldController::new(config, Some("<p>one</p><p>two</p>".to_string())).unwrap();
        let lines = text_of(&build_field_render(&field, false, 40));
        assert_eq!(lines, vec!["  one", "  two"]);
    }
}
