// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Table (5 rows)           | Players (40%)          |
// | Hand (5 rows)            |                        |
// | Messages (fill)          | Scores (60%)           |
// +-------------------------+------------------------+
// | Action line (1 row)                               |
// | Help Bar / input (1 row)                          |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: connection, turn banner, round.
    pub status_bar: Rect,
    /// The hand currently on the table, or the round result.
    pub table: Rect,
    /// The local hand with the selection cursor.
    pub hand: Rect,
    /// Chat / game / system / error logs.
    pub messages: Rect,
    pub players: Rect,
    pub scores: Rect,
    /// Last action result.
    pub action_line: Rect,
    /// Key hints, or the text being typed.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | action(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(14),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let action_line = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: game column (65%) | sidebar (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    let game = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(4),
        ])
        .split(horizontal[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        table: game[0],
        hand: game[1],
        messages: game[2],
        players: sidebar[0],
        scores: sidebar[1],
        action_line,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("table", layout.table),
            ("hand", layout.hand),
            ("messages", layout.messages),
            ("players", layout.players),
            ("scores", layout.scores),
            ("action_line", layout.action_line),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in rects {
            assert!(rect.width > 0 && rect.height > 0, "{name} has zero size: {rect:?}");
        }
    }

    #[test]
    fn fixed_rows_have_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.action_line.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.table.height, 5);
        assert_eq!(layout.hand.height, 5);
    }

    #[test]
    fn sidebar_is_right_of_game_column() {
        let layout = build_layout(test_area());
        assert!(layout.players.x > layout.hand.x);
        assert_eq!(layout.players.x, layout.scores.x);
        assert!(layout.scores.y > layout.players.y);
    }

    #[test]
    fn help_bar_is_last_row() {
        let area = test_area();
        let layout = build_layout(area);
        assert_eq!(layout.help_bar.y, area.height - 1);
    }
}
