//! Fixed-rate simulation tick
//!
//! Core game loop step: update every entity, then apply the collected events,
//! then evaluate the win condition and advance the timer.

use serde::{Deserialize, Serialize};

use super::entity::MovementFlags;
use super::event::CollisionEvent;
use super::state::GameState;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held paddle movement keys
    pub movement: MovementFlags,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Remove every block without scoring (debug, one-shot)
    pub cheat_clear: bool,
}

/// Advance the game state by one tick.
///
/// Returns the events applied this tick, in emission order.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<CollisionEvent> {
    // Handle pause toggle
    if input.pause && !state.is_terminal() {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }

    // Don't tick if paused or game over
    if state.paused || state.is_terminal() {
        return Vec::new();
    }

    if input.cheat_clear {
        state.clear_blocks();
    }

    state.set_movement(input.movement);

    // Update in registration order; removals are deferred until the events are applied
    let events = state.update_entities().drain();

    // Apply
    state.apply_events(events.iter().copied());
    state.check_win();

    state.elapsed_ticks += 1;
    events
}
