// Hand widget: the local player's cards with cursor and selection.

use bigtwo_core::card::Card;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Foreground colour for a card: red suits red, black suits white.
pub fn card_color(card: &Card) -> Color {
    if card.suit.is_red() {
        Color::Red
    } else {
        Color::White
    }
}

/// A single card as a styled span, e.g. `[10♥]`.
pub fn card_span(card: &Card) -> Span<'static> {
    Span::styled(format!("[{card}]"), Style::default().fg(card_color(card)))
}

/// Render the hand into the given area.
///
/// Selected cards are raised onto the first line; the cursor is reversed.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let hand = state.hand();
    let sort = state
        .game
        .as_ref()
        .map(|g| g.sort_preference.as_str())
        .unwrap_or("rank");
    let title = format!(
        " Hand ({} cards, by {}, {} selected) ",
        hand.len(),
        sort,
        state.selected.len()
    );

    let mut raised = Vec::new();
    let mut lowered = Vec::new();
    for (i, card) in hand.iter().enumerate() {
        let mut span = card_span(card);
        if i == state.cursor {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        let width = span.content.chars().count();
        let blank = Span::raw(" ".repeat(width));
        if state.is_selected(card) {
            span.style = span.style.add_modifier(Modifier::BOLD);
            raised.push(span);
            lowered.push(blank);
        } else {
            raised.push(blank);
            lowered.push(span);
        }
        raised.push(Span::raw(" "));
        lowered.push(Span::raw(" "));
    }

    let lines = if hand.is_empty() {
        vec![Line::from(Span::styled(
            "No cards",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        vec![Line::from(raised), Line::from(lowered)]
    };

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}
