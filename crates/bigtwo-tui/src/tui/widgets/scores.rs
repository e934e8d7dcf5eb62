// Scores widget: per-round history table with totals.

use bigtwo_core::scores::{ScoreRow, ScoreTable};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

/// Placeholder for a round with no score yet.
const PLACEHOLDER: &str = "-";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(game) = &state.game else {
        let paragraph = Paragraph::new("No scores yet")
            .block(Block::default().borders(Borders::ALL).title(" Scores "));
        frame.render_widget(paragraph, area);
        return;
    };
    let table = &game.scores;

    let header = Row::new(
        std::iter::once(Cell::from("Player"))
            .chain(table.columns.iter().map(|c| Cell::from(c.clone()))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(row.name.clone())];
            cells.extend(round_cells(row).into_iter().map(Cell::from));
            cells.push(Cell::from(row.total.to_string()).style(total_style(row, table)));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(8)];
    widths.extend(std::iter::repeat(Constraint::Length(4)).take(table.round_columns()));
    widths.push(Constraint::Length(6));

    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(format!(" {} ", table.caption))),
    );
    frame.render_widget(widget, area);
}

/// Text for each round cell of a row.
pub fn round_cells(row: &ScoreRow) -> Vec<String> {
    row.rounds
        .iter()
        .map(|cell| match cell {
            Some(score) => score.to_string(),
            None => PLACEHOLDER.to_string(),
        })
        .collect()
}

/// Totals at or past the target are highlighted.
fn total_style(row: &ScoreRow, table: &ScoreTable) -> Style {
    if row.total >= table.target_score {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}
