// Session: the canonical client-side game model and the reconciler that
// merges server snapshots into it.
//
// The server owns everything it sends; the session owns what it does not
// send every time (the local hand and its order, the auto-pass flag, the
// sort preference, the previous turn owner). A snapshot field that is absent
// never resets the session's value.

use tracing::{debug, info, warn};

use crate::card::Card;
use crate::protocol::{GameStatePayload, PlayedHand, PlayerInfo};
use crate::scores::ScoreHistory;
use crate::sort::{sort_hand, SortPreference};

/// Round number before the server has sent one.
pub const DEFAULT_ROUND_NUMBER: u32 = 1;

/// Target score before the server has sent one.
pub const DEFAULT_TARGET_SCORE: i64 = 100;

/// Coarse lifecycle of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No identity assigned yet.
    Loading,
    /// A round is in progress.
    Playing,
    /// The round or the match has finished.
    Ended,
}

/// The local player's seat: public info plus the private hand.
#[derive(Debug, Clone, Copy)]
pub struct LocalPlayer<'a> {
    pub info: &'a PlayerInfo,
    pub hand: &'a [Card],
}

/// What a single reconciliation changed, for logging and intent derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The local hand was replaced by the snapshot.
    pub hand_replaced: bool,
    /// The round ended with this snapshot.
    pub round_closed: bool,
    /// A finished match was cleared and history restarted.
    pub match_reset: bool,
    /// Phase before and after, when it changed.
    pub phase_change: Option<(GamePhase, GamePhase)>,
}

/// The client-side game model.
#[derive(Debug, Clone)]
pub struct Session {
    players: Vec<PlayerInfo>,
    hand: Vec<Card>,
    your_player_id: Option<String>,
    current_player_id: Option<String>,
    current_player_name: Option<String>,
    previous_current_player_id: Option<String>,
    last_played_hand: Option<PlayedHand>,
    pass_count: u32,
    is_round_over: bool,
    is_match_over: bool,
    round_number: u32,
    target_score: i64,
    scores: ScoreHistory,
    round_winner_id: Option<String>,
    match_winner_id: Option<String>,
    auto_pass_enabled: bool,
    sort_preference: SortPreference,
    phase: GamePhase,
    snapshots_applied: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SortPreference::default())
    }
}

impl Session {
    /// Create an empty session. `sort_preference` is the durable value the
    /// preference store holds at session start.
    pub fn new(sort_preference: SortPreference) -> Self {
        Session {
            players: Vec::new(),
            hand: Vec::new(),
            your_player_id: None,
            current_player_id: None,
            current_player_name: None,
            previous_current_player_id: None,
            last_played_hand: None,
            pass_count: 0,
            is_round_over: false,
            is_match_over: false,
            round_number: DEFAULT_ROUND_NUMBER,
            target_score: DEFAULT_TARGET_SCORE,
            scores: ScoreHistory::new(),
            round_winner_id: None,
            match_winner_id: None,
            auto_pass_enabled: false,
            sort_preference,
            phase: GamePhase::Loading,
            snapshots_applied: 0,
        }
    }

    // --- Read access ---

    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Display name for a player id, falling back to the id itself.
    pub fn player_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.player(id)
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(id)
    }

    pub fn local_player(&self) -> Option<LocalPlayer<'_>> {
        let id = self.your_player_id.as_deref()?;
        self.player(id).map(|info| LocalPlayer {
            info,
            hand: &self.hand,
        })
    }

    /// The local hand, always in `sort_preference` order.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn your_player_id(&self) -> Option<&str> {
        self.your_player_id.as_deref()
    }

    pub fn current_player_id(&self) -> Option<&str> {
        self.current_player_id.as_deref()
    }

    pub fn current_player_name(&self) -> Option<&str> {
        self.current_player_name.as_deref()
    }

    pub fn previous_current_player_id(&self) -> Option<&str> {
        self.previous_current_player_id.as_deref()
    }

    pub fn last_played_hand(&self) -> Option<&PlayedHand> {
        self.last_played_hand.as_ref()
    }

    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    pub fn is_round_over(&self) -> bool {
        self.is_round_over
    }

    pub fn is_match_over(&self) -> bool {
        self.is_match_over
    }

    /// True when either the round or the match has ended.
    pub fn is_over(&self) -> bool {
        self.is_round_over || self.is_match_over
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn target_score(&self) -> i64 {
        self.target_score
    }

    pub fn scores(&self) -> &ScoreHistory {
        &self.scores
    }

    pub fn round_winner_id(&self) -> Option<&str> {
        self.round_winner_id.as_deref()
    }

    pub fn match_winner_id(&self) -> Option<&str> {
        self.match_winner_id.as_deref()
    }

    pub fn auto_pass_enabled(&self) -> bool {
        self.auto_pass_enabled
    }

    pub fn sort_preference(&self) -> SortPreference {
        self.sort_preference
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether any snapshot has been applied to this session.
    pub fn has_snapshot(&self) -> bool {
        self.snapshots_applied > 0
    }

    pub fn is_your_turn(&self) -> bool {
        match (&self.your_player_id, &self.current_player_id) {
            (Some(you), Some(current)) => you == current,
            _ => false,
        }
    }

    // --- Mutation ---

    /// Change the sort preference and re-sort the hand immediately.
    pub fn set_sort_preference(&mut self, preference: SortPreference) {
        self.sort_preference = preference;
        sort_hand(&mut self.hand, preference);
    }

    pub(crate) fn set_auto_pass(&mut self, enabled: bool) {
        self.auto_pass_enabled = enabled;
    }

    /// Record the current turn owner as the one the next snapshot is
    /// compared against.
    pub(crate) fn observe_turn(&mut self) {
        self.previous_current_player_id = self.current_player_id.clone();
    }

    /// Merge a `gameState` snapshot into the session.
    pub fn reconcile(&mut self, payload: GameStatePayload) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let phase_before = self.phase;

        // A finished match cleared by the server starts a new one, and so
        // does a round counter that goes backwards (new game mid-match).
        let match_cleared = self.is_match_over && payload.is_match_over == Some(false);
        let round_rewound = payload
            .round_number
            .is_some_and(|round| round.max(1) < self.round_number);
        if match_cleared || round_rewound {
            info!("New match started, clearing score history");
            self.scores.reset();
            self.match_winner_id = None;
            outcome.match_reset = true;
        }

        // 1. Identity first: everything below compares against it.
        if let Some(id) = non_empty(payload.your_player_id) {
            if self.your_player_id.as_deref().is_some_and(|old| old != id) {
                warn!(
                    "Player identity changed from {:?} to {}, dropping local hand",
                    self.your_player_id, id
                );
                self.hand.clear();
            }
            self.your_player_id = Some(id);
        }

        // 2. Player views are replaced wholesale when present.
        if let Some(players) = payload.players_info {
            self.players = players;
        }

        // 3. An explicit hand replaces the local one.
        if let Some(hand) = payload.hand {
            self.hand = hand;
            outcome.hand_replaced = true;
        }

        // 4. Remaining fields, only when provided.
        if let Some(current) = non_empty(payload.current_player_id) {
            self.current_player_id = Some(current);
        }
        if let Some(name) = non_empty(payload.current_player_name) {
            self.current_player_name = Some(name);
        }
        if let Some(pass_count) = payload.pass_count {
            self.pass_count = pass_count;
        }
        match payload.last_played_hand {
            None => {}
            Some(Some(played)) if !played.cards.is_empty() => {
                self.last_played_hand = Some(played);
            }
            Some(_) => self.last_played_hand = None,
        }
        if let Some(round) = payload.round_number {
            self.round_number = round.max(1);
        }
        if let Some(target) = payload.target_score {
            self.target_score = target;
        }
        if let Some(totals) = payload.scores {
            self.scores.set_totals(totals);
        }
        let history_supplied = payload.round_scores_history.is_some();
        if let Some(history) = payload.round_scores_history {
            self.scores.replace_from_server(history);
        }

        let was_round_over = self.is_round_over;
        if let Some(over) = payload.is_game_over {
            self.is_round_over = over;
        }
        if let Some(over) = payload.is_match_over {
            self.is_match_over = over;
        }

        if let Some(winner) = non_empty(payload.winner_id) {
            self.round_winner_id = Some(winner);
        } else if !self.is_round_over {
            self.round_winner_id = None;
        }
        if let Some(winner) = non_empty(payload.overall_winner_id) {
            self.match_winner_id = Some(winner);
        } else if !self.is_match_over {
            self.match_winner_id = None;
        }

        self.enforce_current_player_known();

        // 5. Hand order follows the preference after every snapshot.
        sort_hand(&mut self.hand, self.sort_preference);

        // 6. Round boundary.
        if !was_round_over && self.is_round_over {
            outcome.round_closed = true;
            if !history_supplied {
                self.scores.close_round();
            }
            info!(
                "Round {} over (winner: {:?})",
                self.round_number, self.round_winner_id
            );
        }

        // 7. Phase.
        self.phase = self.derive_phase();
        if self.phase != phase_before {
            info!("Phase {:?} -> {:?}", phase_before, self.phase);
            outcome.phase_change = Some((phase_before, self.phase));
        }

        self.snapshots_applied += 1;
        debug!(
            "Snapshot applied: current={:?} pass_count={} hand={} cards",
            self.current_player_id,
            self.pass_count,
            self.hand.len()
        );
        outcome
    }

    fn derive_phase(&self) -> GamePhase {
        if self.is_over() {
            GamePhase::Ended
        } else if self.your_player_id.is_some() {
            GamePhase::Playing
        } else {
            GamePhase::Loading
        }
    }

    /// The turn owner must be one of the listed players.
    fn enforce_current_player_known(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if let Some(current) = self.current_player_id.as_deref() {
            if self.player(current).is_none() {
                warn!("Current player {} is not at the table, clearing", current);
                self.current_player_id = None;
            }
        }
    }
}

/// The server sends empty strings for unset ids.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
