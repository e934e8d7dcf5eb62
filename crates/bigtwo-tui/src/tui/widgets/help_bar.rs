// Bottom rows: last action result and key hints / text input.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{InputMode, ViewState};

const HINTS: &str =
    " ←/→:Move | Space:Select | Enter:Play | x:Pass/Auto-pass | s:Sort | c:Chat | a:Alias | n:New game | Tab:Log | q:Quit";

/// Key hints, or the prompt and text being typed.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match state.input_mode {
        InputMode::Normal => Line::from(Span::styled(
            HINTS,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )),
        InputMode::Chat | InputMode::Alias => Line::from(vec![
            Span::styled(
                prompt(state.input_mode),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(state.input_text.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// The transient action message: red for errors, green for notes.
pub fn render_action_line(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(status) = state.game.as_ref().and_then(|g| g.action_status.as_ref()) else {
        return;
    };
    let color = if status.is_error() { Color::Red } else { Color::Green };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", status.text()),
        Style::default().fg(color),
    )));
    frame.render_widget(paragraph, area);
}

fn prompt(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Chat => " Chat: ",
        InputMode::Alias => " Alias: ",
        InputMode::Normal => "",
    }
}
