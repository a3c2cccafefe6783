use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let actions = ctx.help.unwrap_or(" ");
    let actions_widget = Paragraph::new(format!("Keys: {actions}"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(actions_widget, rows[0]);

    let status_widget = Paragraph::new(Line::from(vec![
        Span::raw("Status: "),
        Span::raw(status_text(ctx)),
        Span::raw(" "),
        badge(ctx.error_count),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::NONE));
    frame.render_widget(status_widget, rows[1]);
}

fn status_text(ctx: &UiContext<'_>) -> String {
    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if let Some(field) = ctx.form_state.focused_field()
        && field.has_change()
    {
        status.push_str(" • editing: ");
        status.push_str(&field.config().display_label());
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }
    status
}

fn badge(error_count: usize) -> Span<'static> {
    if error_count > 0 {
        Span::styled(
            format!("[! {error_count}]"),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::Value;

    use super::*;
    use crate::form::FormState;

    fn rendered_rows(ctx: &UiContext<'_>) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, 4)).unwrap();
        terminal
            .draw(|frame| render_footer(frame, frame.area(), ctx))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn status_row_shows_message_and_badge() {
        let form_state = FormState::new(Vec::new(), &Value::Null).unwrap();
        let ctx = UiContext {
            form_state: &form_state,
            title: None,
            status_message: "Form saved",
            dirty: true,
            error_count: 2,
            help: Some("Ctrl+S save"),
            prompt: None,
        };
        let rows = rendered_rows(&ctx);
        assert!(rows[0].starts_with("Keys: Ctrl+S save"));
        assert!(rows[2].starts_with("Status: Form saved • unsaved changes [! 2]"));
    }

    #[test]
    fn empty_status_falls_back_to_ready() {
        let form_state = FormState::new(Vec::new(), &Value::Null).unwrap();
        let ctx = UiContext {
            form_state: &form_state,
            title: None,
            status_message: "",
            dirty: false,
            error_count: 0,
            help: None,
            prompt: None,
        };
        assert!(rendered_rows(&ctx)[2].starts_with("Status: Ready [ok]"));
    }
}
