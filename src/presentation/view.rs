use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::form::FormState;

use super::components::{render_fields, render_footer, render_prompt};

const DEFAULT_TITLE: &str = "Form";

pub struct UiContext<'a> {
    pub form_state: &'a FormState,
    pub title: Option<&'a str>,
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub prompt: Option<PromptRender<'a>>,
}

pub struct PromptRender<'a> {
    pub title: &'a str,
    pub input: &'a str,
    pub hint: &'a str,
    pub error: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(frame.area());

    let title = ctx.title.unwrap_or(DEFAULT_TITLE);
    render_fields(frame, chunks[0], ctx.form_state, title, ctx.prompt.is_none());
    render_footer(frame, chunks[1], &ctx);

    if let Some(prompt) = &ctx.prompt {
        render_prompt(frame, prompt);
    }
}
