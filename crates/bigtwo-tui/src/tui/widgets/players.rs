// Players widget: seats, card counts, pass markers.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::PlayerRow;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines: Vec<Line> = match &state.game {
        Some(game) if !game.players.is_empty() => game.players.iter().map(player_line).collect(),
        _ => vec![Line::from(Span::styled(
            "No players yet",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Players "));
    frame.render_widget(paragraph, area);
}

fn player_line(player: &PlayerRow) -> Line<'static> {
    let marker = if player.is_current { "▶ " } else { "  " };
    let mut name_style = Style::default();
    if player.is_you {
        name_style = name_style.fg(Color::Cyan);
    }
    if player.is_current {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(player.name.clone(), name_style),
    ];
    if player.is_you {
        spans.push(Span::styled(" (you)", Style::default().fg(Color::Cyan)));
    }
    spans.push(Span::raw(format!("  {} cards", player.card_count)));
    if player.has_passed {
        spans.push(Span::styled("  passed", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_snapshot;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn current_player_is_marked() {
        let game = sample_snapshot();
        let me = text(&player_line(&game.players[0]));
        assert_eq!(me, "▶ Alice (you)  3 cards");
        let bob = text(&player_line(&game.players[1]));
        assert_eq!(bob, "  Bob  5 cards  passed");
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(40, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
