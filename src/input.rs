//! Keyboard state
//!
//! The front end writes key transitions here at any time; the session reads a
//! `TickInput` snapshot once per frame. Held keys stay set until released,
//! one-shot actions stay set until consumed by a tick.

use crate::sim::{MovementFlags, TickInput};

/// Logical keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Pause,
    Cheat,
    Restart,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Escape" | "KeyP" => Some(Key::Pause),
            "KeyK" => Some(Key::Cheat),
            "KeyR" => Some(Key::Restart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    movement: MovementFlags,
    pause: bool,
    cheat_clear: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart is a session action and leaves the tick input alone
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.movement.left = true,
            Key::Right => self.movement.right = true,
            Key::Pause => self.pause = true,
            Key::Cheat => self.cheat_clear = true,
            Key::Restart => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.movement.left = false,
            Key::Right => self.movement.right = false,
            Key::Pause | Key::Cheat | Key::Restart => {}
        }
    }

    /// Forget held keys (focus loss swallows their key-up)
    pub fn release_all(&mut self) {
        self.movement = MovementFlags::default();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            movement: self.movement,
            pause: self.pause,
            cheat_clear: self.cheat_clear,
        }
    }

    /// Clear one-shot actions after a tick has seen them
    pub fn consume_one_shots(&mut self) {
        self.pause = false;
        self.cheat_clear = false;
    }
}
