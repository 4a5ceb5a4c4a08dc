//! # Leaderboard
//!
//! Final scores of finished runs.
//!
//! A [`Run`](crate::Run) reports its `(name, gold)` pair to a [`ScoreSink`] exactly
//! once, on victory or defeat. [`Leaderboard`] is the in-memory sink used by the
//! terminal binary; it keeps the best score per player name.

use crate::DelveResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A final score: the gold a named player held when the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub name: String,
    pub score: u32,
}

impl Score {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Receives the score of every finished run.
pub trait ScoreSink {
    fn record(&mut self, score: Score);
}

/// Keeps every reported score in arrival order.
impl ScoreSink for Vec<Score> {
    fn record(&mut self, score: Score) {
        self.push(score);
    }
}

/// Best score per name, highest first.
///
/// # Examples
///
/// ```
/// use delve::{Leaderboard, Score, ScoreSink};
///
/// let mut board = Leaderboard::new();
/// board.record(Score::new("ada", 40));
/// board.record(Score::new("bob", 90));
/// board.record(Score::new("ada", 10));
///
/// assert_eq!(board.best("ada"), Some(40));
/// assert_eq!(board.scores()[0].name, "bob");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    scores: Vec<Score>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries sorted by descending score, ties by name.
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn best(&self, name: &str) -> Option<u32> {
        self.scores
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn to_json(&self) -> DelveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a leaderboard, merging duplicate names to their best score.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        let loaded: Leaderboard = serde_json::from_str(json)?;
        let mut board = Leaderboard::new();
        for score in loaded.scores {
            board.record(score);
        }
        Ok(board)
    }
}

impl ScoreSink for Leaderboard {
    fn record(&mut self, score: Score) {
        match self.scores.iter_mut().find(|entry| entry.name == score.name) {
            Some(entry) if entry.score >= score.score => return,
            Some(entry) => entry.score = score.score,
            None => self.scores.push(score),
        }
        self.scores
            .sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, entry) in self.scores.iter().enumerate() {
            writeln!(f, "{:>3}. {:<20} {:>6}", rank + 1, entry.name, entry.score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_score_replaces_lower() {
        let mut board = Leaderboard::new();
        board.record(Score::new("ada", 10));
        board.record(Score::new("ada", 30));
        assert_eq!(board.best("ada"), Some(30));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_sorted_descending_with_name_ties() {
        let mut board = Leaderboard::new();
        board.record(Score::new("cy", 5));
        board.record(Score::new("bo", 50));
        board.record(Score::new("al", 50));

        let names: Vec<_> = board.scores().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["al", "bo", "cy"]);
    }

    #[test]
    fn test_json_round_trip_merges_duplicates() {
        let json = r#"{"scores":[{"name":"ada","score":3},{"name":"ada","score":9},{"name":"bob","score":4}]}"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.best("ada"), Some(9));
        assert_eq!(board.len(), 2);

        let restored = Leaderboard::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_malformed_json_is_serde_error() {
        assert!(matches!(
            Leaderboard::from_json("not json"),
            Err(crate::DelveError::Serde(_))
        ));
    }

    #[test]
    fn test_display_ranks() {
        let mut board = Leaderboard::new();
        board.record(Score::new("ada", 12));
        assert!(board.to_string().starts_with("  1. ada"));
    }
}
