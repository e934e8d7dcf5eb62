// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (cursor, selection, typing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{InputMode, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits regardless of mode.
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.input_mode != InputMode::Normal {
        return handle_text_input(key_event, view_state);
    }

    match key_event.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.cursor = view_state.cursor.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let len = view_state.hand().len();
            if view_state.cursor + 1 < len {
                view_state.cursor += 1;
            }
            None
        }
        KeyCode::Home => {
            view_state.cursor = 0;
            None
        }
        KeyCode::End => {
            view_state.cursor = view_state.hand().len().saturating_sub(1);
            None
        }

        // Selection
        KeyCode::Char(' ') => {
            toggle_selected(view_state);
            None
        }
        KeyCode::Esc => {
            view_state.selected.clear();
            None
        }

        // Game actions
        KeyCode::Enter | KeyCode::Char('p') => {
            let cards = view_state.selection_in_hand_order();
            view_state.selected.clear();
            Some(UserCommand::PlayCards(cards))
        }
        KeyCode::Char('x') => Some(UserCommand::Pass),
        KeyCode::Char('s') => Some(UserCommand::ToggleSort),
        KeyCode::Char('n') => Some(UserCommand::NewGame),

        // Text entry
        KeyCode::Char('c') => {
            view_state.input_mode = InputMode::Chat;
            view_state.input_text.clear();
            None
        }
        KeyCode::Char('a') => {
            view_state.input_mode = InputMode::Alias;
            view_state.input_text = view_state
                .game
                .as_ref()
                .and_then(|g| g.alias.clone())
                .unwrap_or_default();
            None
        }

        KeyCode::Tab => {
            view_state.message_tab = view_state.message_tab.next();
            None
        }

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Handle key events while typing a chat line or alias.
///
/// Enter submits, Esc cancels, Backspace deletes.
fn handle_text_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_text.clear();
            None
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut view_state.input_text);
            let mode = std::mem::take(&mut view_state.input_mode);
            match mode {
                InputMode::Chat => Some(UserCommand::SendChat(text)),
                InputMode::Alias => Some(UserCommand::SetAlias(text)),
                InputMode::Normal => None,
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.input_text.push(c);
            None
        }
        _ => None,
    }
}

fn toggle_selected(view_state: &mut ViewState) {
    let Some(card) = view_state.hand().get(view_state.cursor).copied() else {
        return;
    };
    if let Some(pos) = view_state.selected.iter().position(|c| *c == card) {
        view_state.selected.remove(pos);
    } else {
        view_state.selected.push(card);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_state;
    use crate::tui::MessageTab;
    use bigtwo_core::card::{Card, Rank, Suit};
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(key(KeyCode::Char(c)), state).is_none());
        }
    }

    // -- Cursor and selection --

    #[test]
    fn cursor_stays_within_hand() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(state.cursor, 0);
        for _ in 0..5 {
            handle_key(key(KeyCode::Right), &mut state);
        }
        assert_eq!(state.cursor, 2);
        handle_key(key(KeyCode::Home), &mut state);
        assert_eq!(state.cursor, 0);
        handle_key(key(KeyCode::End), &mut state);
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn space_toggles_card_under_cursor() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(state.selected, vec![Card::new(Rank::Three, Suit::Diamonds)]);
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert!(state.selected.is_empty());
    }

    #[test]
    fn space_on_empty_hand_is_noop() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert!(state.selected.is_empty());
    }

    #[test]
    fn esc_clears_selection() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char(' ')), &mut state);
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.selected.is_empty());
    }

    // -- Actions --

    #[test]
    fn enter_plays_selection_in_hand_order_and_clears_it() {
        let mut state = sample_state();
        handle_key(key(KeyCode::End), &mut state);
        handle_key(key(KeyCode::Char(' ')), &mut state);
        handle_key(key(KeyCode::Home), &mut state);
        handle_key(key(KeyCode::Char(' ')), &mut state);

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::PlayCards(vec![
                Card::new(Rank::Three, Suit::Diamonds),
                Card::new(Rank::Two, Suit::Spades),
            ]))
        );
        assert!(state.selected.is_empty());
    }

    #[test]
    fn play_with_nothing_selected_still_goes_to_the_client() {
        let mut state = sample_state();
        assert_eq!(
            handle_key(key(KeyCode::Char('p')), &mut state),
            Some(UserCommand::PlayCards(vec![]))
        );
    }

    #[test]
    fn action_keys() {
        let mut state = sample_state();
        assert_eq!(handle_key(key(KeyCode::Char('x')), &mut state), Some(UserCommand::Pass));
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut state),
            Some(UserCommand::ToggleSort)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::NewGame)
        );
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn tab_cycles_message_panel() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.message_tab, MessageTab::Game);
    }

    // -- Text entry --

    #[test]
    fn chat_line_is_typed_and_sent() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('c')), &mut state);
        assert_eq!(state.input_mode, InputMode::Chat);

        type_text(&mut state, "gg wp");
        handle_key(key(KeyCode::Backspace), &mut state);
        // 'q' is text here, not quit.
        type_text(&mut state, "q");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::SendChat("gg wq".into())));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn alias_entry_is_sent() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.input_mode, InputMode::Alias);
        type_text(&mut state, "Zed");
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::SetAlias("Zed".into()))
        );
    }

    #[test]
    fn esc_cancels_text_entry() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('c')), &mut state);
        type_text(&mut state, "hello");
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut state = sample_state();
        handle_key(key(KeyCode::Char('c')), &mut state);
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = sample_state();
        let mut event = key(KeyCode::Char('x'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
    }
}
