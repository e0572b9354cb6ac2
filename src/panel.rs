//! HUD panel text

use crate::sim::{GameState, GameStatus};

/// Formatted strings for the score panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelText {
    pub score: String,
    pub rate: String,
    pub time: String,
    pub status: String,
}

impl PanelText {
    pub fn from_state(state: &GameState) -> Self {
        let status = match state.status {
            GameStatus::InProgress if state.paused => "Paused",
            GameStatus::InProgress => "",
            GameStatus::Won => "You win!",
            GameStatus::Lost => "Game over",
        };
        Self {
            score: state.score.to_string(),
            rate: format!("x{}", state.score_rate),
            time: format_clock(state.elapsed_seconds()),
            status: status.to_string(),
        }
    }
}

/// `MM:SS`, minutes keep counting past 59
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
