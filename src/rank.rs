//! Cumulative leaderboard over the monthly top-N table.

use std::collections::HashMap;

use crate::models::{LeaderboardEntry, MonthlySenderCount, YearMonth};

/// Score awarded to the top sender of a month; each lower rank gets one less
pub const TOP_RANK_SCORE: i64 = 5;

#[derive(Default)]
struct ScoreFold<'a> {
    period: Option<YearMonth>,
    rank: i64,
    index: HashMap<&'a str, usize>,
    totals: Vec<LeaderboardEntry>,
}

impl<'a> ScoreFold<'a> {
    fn step(mut self, row: &'a MonthlySenderCount) -> Self {
        if self.period != Some(row.year_month) {
            self.period = Some(row.year_month);
            self.rank = 0;
        }
        let score = TOP_RANK_SCORE - self.rank;
        match self.index.get(row.sender.as_str()) {
            Some(&i) => self.totals[i].score += score,
            None => {
                self.index.insert(row.sender.as_str(), self.totals.len());
                self.totals.push(LeaderboardEntry { sender: row.sender.clone(), score });
            },
        }
        self.rank += 1;
        self
    }
}

/// Fold the monthly table into per-sender totals.
///
/// `ranked` must be period-major and rank-minor, as produced by
/// [`crate::aggregate::top_senders_by_month`]. The rank resets whenever the
/// period changes; each row scores `TOP_RANK_SCORE - rank`, which goes to zero
/// and below from sixth place on. Entries come out in first-appearance order.
#[must_use]
pub fn accumulate_scores(ranked: &[MonthlySenderCount]) -> Vec<LeaderboardEntry> {
    ranked.iter().fold(ScoreFold::default(), ScoreFold::step).totals
}

/// Senders ordered by descending total score; ties keep first-appearance order
#[must_use]
pub fn leaderboard(ranked: &[MonthlySenderCount]) -> Vec<LeaderboardEntry> {
    let mut entries = accumulate_scores(ranked);
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// Leaderboard formatted as `name: score` lines
#[must_use]
pub fn compute_sender_scores(ranked: &[MonthlySenderCount]) -> Vec<String> {
    leaderboard(ranked).iter().map(ToString::to_string).collect()
}
