use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::view::PromptRender;

pub fn render_prompt(frame: &mut Frame<'_>, prompt: &PromptRender<'_>) {
    let widest = [prompt.title, prompt.hint, prompt.error.unwrap_or_default()]
        .iter()
        .map(|text| text.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let width = widest
        .saturating_add(4)
        .min(frame.area().width.saturating_sub(2).max(1));
    let height = if prompt.error.is_some() { 5 } else { 4 };
    let area = centered_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                prompt.input.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            prompt.hint,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(error) = prompt.error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(prompt.title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(widget, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(vertical[1].width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
