//! High score leaderboard
//!
//! In-memory results reporter that keeps the top 10 finished runs and can
//! render them as a small text fragment for the end-of-game panel.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::session::{GameOutcome, GameResult, ReportError, ResultsReporter};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Displayed play time when the run ended
    pub elapsed_seconds: u64,
    /// Whether the run cleared the level
    pub outcome: GameOutcome,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_result(&mut self, result: &GameResult) -> Option<usize> {
        if !self.qualifies(result.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: result.score,
            elapsed_seconds: result.elapsed_seconds,
            outcome: result.outcome,
        };

        // Find insertion point (sorted descending by score, ties keep older first)
        let pos = self.entries.iter().position(|e| result.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Plain-text leaderboard, one line per entry
    pub fn fragment(&self) -> String {
        if self.entries.is_empty() {
            return "No high scores yet".to_string();
        }
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let outcome = match entry.outcome {
                GameOutcome::Won => "cleared",
                GameOutcome::Lost => "missed",
            };
            let _ = writeln!(
                out,
                "{:>2}. {:>6}  {}  {}",
                i + 1,
                entry.score,
                crate::panel::format_clock(entry.elapsed_seconds),
                outcome
            );
        }
        out
    }
}

impl ResultsReporter for HighScores {
    fn report(&mut self, result: &GameResult) -> Result<(), ReportError> {
        match self.add_result(result) {
            Some(rank) => log::info!("New high score #{}: {}", rank, result.score),
            None => log::debug!("Score {} did not make the leaderboard", result.score),
        }
        Ok(())
    }
}

/// Shares one leaderboard between the session and its owner
impl ResultsReporter for std::rc::Rc<std::cell::RefCell<HighScores>> {
    fn report(&mut self, result: &GameResult) -> Result<(), ReportError> {
        let mut scores = self
            .try_borrow_mut()
            .map_err(|err| ReportError(err.to_string()))?;
        scores.report(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn won(score: u64) -> GameResult {
        GameResult {
            outcome: GameOutcome::Won,
            score,
            elapsed_seconds: 42,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.top_score(), None);
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_result(&won(10)), Some(1));
        assert_eq!(scores.add_result(&won(30)), Some(1));
        assert_eq!(scores.add_result(&won(20)), Some(2));
        let listed: Vec<_> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(listed, vec![30, 20, 10]);
        assert_eq!(scores.top_score(), Some(30));
    }

    #[test]
    fn test_ties_keep_older_entry_first() {
        let mut scores = HighScores::new();
        scores.add_result(&won(10));
        let later = GameResult {
            outcome: GameOutcome::Lost,
            score: 10,
            elapsed_seconds: 5,
        };
        assert_eq!(scores.add_result(&later), Some(2));
        assert_eq!(scores.entries[0].outcome, GameOutcome::Won);
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for score in 1..=(MAX_HIGH_SCORES as u64 + 5) {
            scores.add_result(&won(score));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(5));
        assert_eq!(scores.add_result(&won(100)), Some(1));
        assert_eq!(scores.add_result(&won(1)), None);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_fragment() {
        let mut scores = HighScores::new();
        assert_eq!(scores.fragment(), "No high scores yet");
        scores.report(&won(15)).unwrap();
        let text = scores.fragment();
        assert!(text.contains("15"));
        assert!(text.contains("00:42"));
        assert!(text.contains("cleared"));
    }

    #[test]
    fn test_shared_reporter() {
        let shared = std::rc::Rc::new(std::cell::RefCell::new(HighScores::new()));
        let mut handle = shared.clone();
        handle.report(&won(7)).unwrap();
        assert_eq!(shared.borrow().top_score(), Some(7));
    }
}
