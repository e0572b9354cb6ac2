//! Same-tick collision events
//!
//! Entities push events while updating; the game state drains the queue once
//! after the full update pass and applies them in emission order.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Semantic outcome of a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Ball touched a block; the block must be removed and scored
    BlockDestroyed { block_id: EntityId },
    /// Ball bounced off the paddle
    PaddleHit,
    /// Ball crossed the bottom boundary
    BallMissed,
}

/// Events raised during one tick's update pass
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<CollisionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        self.events.extend(events);
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
