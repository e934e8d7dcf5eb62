// Score history: append-only per-round records, running totals, and the
// table projection used by the score panel.

use tracing::{info, warn};

use crate::protocol::ScoreRecord;

/// Per-round score records plus the server's running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreHistory {
    records: Vec<ScoreRecord>,
    totals: ScoreRecord,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed rounds in order; index `i` is round `i + 1`.
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn totals(&self) -> &ScoreRecord {
        &self.totals
    }

    pub fn rounds_completed(&self) -> usize {
        self.records.len()
    }

    /// Running total for a player; players the server has not scored yet
    /// count as zero.
    pub fn total_for(&self, player_id: &str) -> i64 {
        self.totals.get(player_id).copied().unwrap_or(0)
    }

    /// Replace the running totals with the server's values.
    pub fn set_totals(&mut self, totals: ScoreRecord) {
        self.totals = totals;
    }

    /// Adopt a server-supplied history.
    ///
    /// The server is authoritative, but history never shrinks within a
    /// match: a shorter list is ignored and `false` is returned.
    pub fn replace_from_server(&mut self, history: Vec<ScoreRecord>) -> bool {
        if history.len() < self.records.len() {
            warn!(
                "Ignoring server score history with {} rounds (have {})",
                history.len(),
                self.records.len()
            );
            return false;
        }
        self.records = history;
        true
    }

    /// Close the current round locally: append the difference between the
    /// running totals and everything already recorded.
    ///
    /// Used only when the server ends a round without sending its history.
    pub fn close_round(&mut self) -> &ScoreRecord {
        let recorded = self.recorded_sums();
        let round: ScoreRecord = self
            .totals
            .iter()
            .map(|(id, total)| {
                let before = recorded.get(id).copied().unwrap_or(0);
                (id.clone(), total.saturating_sub(before))
            })
            .collect();
        self.records.push(round);
        info!("Round {} closed from running totals", self.records.len());
        &self.records[self.records.len() - 1]
    }

    /// Clear everything for a new match.
    pub fn reset(&mut self) {
        self.records.clear();
        self.totals.clear();
    }

    fn recorded_sums(&self) -> ScoreRecord {
        let mut sums = ScoreRecord::new();
        for record in &self.records {
            for (id, score) in record {
                let sum = sums.entry(id.clone()).or_insert(0);
                *sum = sum.saturating_add(*score);
            }
        }
        sums
    }

    /// Project the history into a display table.
    ///
    /// The table always has `max(rounds, 1)` round columns plus a Total
    /// column. With no completed rounds the single round column holds
    /// placeholders (`None`) so the table shape is stable from the start.
    pub fn project<'a, I>(&self, players: I, target_score: i64, is_final: bool) -> ScoreTable
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let round_columns = self.records.len().max(1);

        let mut columns: Vec<String> = (1..=round_columns).map(|i| format!("R{i}")).collect();
        columns.push("Total".to_string());

        let rows = players
            .into_iter()
            .map(|(id, name)| {
                let rounds = if self.records.is_empty() {
                    vec![None]
                } else {
                    self.records
                        .iter()
                        .map(|record| Some(record.get(id).copied().unwrap_or(0)))
                        .collect()
                };
                ScoreRow {
                    player_id: id.to_string(),
                    name: name.to_string(),
                    rounds,
                    total: self.total_for(id),
                }
            })
            .collect();

        let caption = if is_final {
            format!("Final Scores (Target: {target_score})")
        } else {
            format!(
                "Scores After Round {} (Target: {target_score})",
                self.records.len()
            )
        };

        ScoreTable {
            caption,
            columns,
            rows,
            target_score,
        }
    }
}

/// Display projection of the score history.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub caption: String,
    /// Round headers (`R1`, `R2`, ...) followed by `Total`.
    pub columns: Vec<String>,
    pub rows: Vec<ScoreRow>,
    pub target_score: i64,
}

impl ScoreTable {
    pub fn round_columns(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub player_id: String,
    pub name: String,
    /// One cell per round column; `None` is a placeholder.
    pub rounds: Vec<Option<i64>>,
    pub total: i64,
}
