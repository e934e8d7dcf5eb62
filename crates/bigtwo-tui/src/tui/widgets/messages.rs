// Messages widget: tabbed chat / game / system / error logs.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::{MessageTab, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = visible_lines(state, area.height.saturating_sub(2) as usize);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Line::from(tab_spans(state.message_tab))),
        );
    frame.render_widget(paragraph, area);
}

/// The newest `height` entries of the active log, oldest first.
fn visible_lines(state: &ViewState, height: usize) -> Vec<Line<'static>> {
    let Some(game) = &state.game else {
        return Vec::new();
    };
    let (entries, color) = match state.message_tab {
        MessageTab::Chat => (&game.chat, Color::White),
        MessageTab::Game => (&game.game_messages, Color::Cyan),
        MessageTab::System => (&game.system, Color::Gray),
        MessageTab::Errors => (&game.errors, Color::Red),
    };
    let skip = entries.len().saturating_sub(height);
    entries
        .iter()
        .skip(skip)
        .map(|text| Line::from(Span::styled(text.clone(), Style::default().fg(color))))
        .collect()
}

/// Tab labels for the panel title with the active one highlighted.
pub fn tab_spans(active: MessageTab) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for tab in MessageTab::ALL {
        let style = if tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", tab.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}
