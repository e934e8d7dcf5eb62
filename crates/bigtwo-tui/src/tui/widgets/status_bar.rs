// Status bar widget: connection status, turn banner, auto-pass indicator.

use bigtwo_core::client::ConnectionStatus;
use bigtwo_core::notify::NotificationKind;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [connection indicator] [title] [auto-pass] [notification flash]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let connection = state
        .game
        .as_ref()
        .map(|g| g.connection)
        .unwrap_or_default();
    let (dot, dot_color) = connection_indicator(connection);
    spans.push(Span::styled(format!(" {dot} "), Style::default().fg(dot_color)));

    match &state.game {
        Some(game) => {
            let title_style = if game.is_your_turn && !game.is_round_over && !game.is_match_over {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(game.title.clone(), title_style));

            if let Some(name) = game.current_player_name.as_deref().filter(|_| !game.is_your_turn) {
                spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
                spans.push(Span::styled(
                    format!("Waiting for {name}"),
                    Style::default().fg(Color::Gray),
                ));
            }

            if game.auto_pass {
                spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
                spans.push(Span::styled(
                    "AUTO-PASS",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }
        None => spans.push(Span::styled(
            "Connecting...",
            Style::default().fg(Color::Gray),
        )),
    }

    if let Some(kind) = state.flash {
        spans.push(Span::raw("  "));
        spans.push(flash_span(kind));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the connection dot character and its color.
pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Disconnected => ("●", Color::Red),
    }
}

fn flash_span(kind: NotificationKind) -> Span<'static> {
    match kind {
        NotificationKind::SelfTurn => Span::styled(
            "Your turn!",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        NotificationKind::OpponentTurn => {
            Span::styled("Turn changed", Style::default().fg(Color::Cyan))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_state;

    #[test]
    fn connection_indicator_colors() {
        assert_eq!(connection_indicator(ConnectionStatus::Connected).1, Color::Green);
        assert_eq!(connection_indicator(ConnectionStatus::Disconnected).1, Color::Red);
    }

    #[test]
    fn flash_text() {
        assert_eq!(flash_span(NotificationKind::SelfTurn).content, "Your turn!");
        assert_eq!(flash_span(NotificationKind::OpponentTurn).content, "Turn changed");
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_shows_turn_banner() {
        let mut state = sample_state();
        state.flash = Some(NotificationKind::SelfTurn);
        let backend = ratatui::backend::TestBackend::new(100, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(text.contains("YOUR TURN! - Alice - Big Two (R1)"));
        assert!(text.contains("Your turn!"));
    }
}
