// Table widget: the hand to beat, or the round/match result.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::hand::card_span;
use crate::protocol::ViewSnapshot;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match &state.game {
        Some(game) => table_lines(game),
        None => vec![Line::from("Waiting for the server...")],
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Table "));
    frame.render_widget(paragraph, area);
}

fn table_lines(game: &ViewSnapshot) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    if game.is_match_over {
        let winner = game.match_winner.as_deref().unwrap_or("?");
        return vec![
            Line::from(Span::styled(
                format!("Match over! {winner} wins."),
                bold.fg(Color::Green),
            )),
            Line::from("Press n for a new game."),
        ];
    }
    if game.is_round_over {
        let winner = game.round_winner.as_deref().unwrap_or("?");
        return vec![
            Line::from(Span::styled(
                format!("Round {} over! {winner} wins the round.", game.round_number),
                bold.fg(Color::Green),
            )),
            Line::from("Waiting for the next round..."),
        ];
    }

    match &game.table {
        Some(play) => {
            let mut cards: Vec<Span<'static>> = Vec::new();
            for card in &play.cards {
                cards.push(card_span(card));
                cards.push(Span::raw(" "));
            }
            vec![
                Line::from(cards),
                Line::from(vec![
                    Span::styled(play.label.clone(), bold),
                    Span::raw(format!(" by {}", play.played_by)),
                    Span::styled(
                        format!("  ({} passed)", game.pass_count),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Empty table: lead any hand.",
            Style::default().fg(Color::Gray),
        ))],
    }
}
