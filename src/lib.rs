//! Brick Pong - A paddle-and-blocks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `session`: Session control surface and fixed-rate frame driver
//! - `settings`: Data-driven game configuration
//! - `highscores`: Results reporter / leaderboard
//! - `input`: Keyboard state read once per frame
//! - `panel`: HUD text formatting

pub mod highscores;
pub mod input;
pub mod panel;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use input::{InputState, Key};
pub use panel::PanelText;
pub use session::{GameResult, RenderSink, ResultsReporter, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second of displayed time
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_SPEED: f32 = 20.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_SPEED: f32 = 5.0;
    /// Horizontal velocity re-roll range on a randomized bounce
    pub const BALL_MAX_SPIN: f32 = 5.0;

    /// Block defaults
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;
    pub const LEVEL_ROWS: i32 = 4;
    pub const LEVEL_GAP: f32 = 10.0;
}
