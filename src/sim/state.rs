//! Game state and per-tick bookkeeping
//!
//! Owns the live entity list, score/timer counters and win/loss status.
//! Everything here is determined by the session settings (including the RNG
//! seed), so two states built from the same settings evolve identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, MovementFlags, RenderCommand, UpdateContext};
use super::event::{CollisionEvent, EventQueue};
use super::geom::PlayField;
use super::level::generate_blocks;
use crate::consts::TICKS_PER_SECOND;
use crate::settings::Settings;

/// Win/loss status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Active gameplay (possibly paused)
    InProgress,
    /// Every block destroyed
    Won,
    /// Ball fell past the bottom edge
    Lost,
}

/// Terminal outcome reported to the results collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Result payload surfaced when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub score: u64,
    pub elapsed_seconds: u64,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Level bounds
    pub field: PlayField,
    /// Live entities in registration order (paddle, ball, blocks)
    pub entities: Vec<Entity>,
    /// Score
    pub score: u64,
    /// Points for the next block; grows per consecutive block, resets on paddle contact
    pub score_rate: u64,
    /// Simulation ticks elapsed while unpaused
    pub elapsed_ticks: u64,
    /// Pause flag (suspends entity updates and the tick counter)
    pub paused: bool,
    /// Current status
    pub status: GameStatus,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a fresh session: paddle, ball, then the block grid
    pub fn new(settings: &Settings) -> Self {
        let field = settings.field;
        let mut state = Self {
            seed: settings.seed,
            field,
            entities: Vec::new(),
            score: 0,
            score_rate: 1,
            elapsed_ticks: 0,
            paused: false,
            status: GameStatus::InProgress,
            rng: Pcg32::seed_from_u64(settings.seed),
            next_id: 1,
        };

        let paddle_id = state.next_entity_id();
        let paddle = Entity::paddle(paddle_id, &field, settings.paddle_size, settings.paddle_speed);

        // Ball starts centered, one ball-height above the paddle
        let ball_pos = Vec2::new(
            field.width / 2.0 - settings.ball_size.w / 2.0,
            paddle.pos.y - settings.ball_size.h * 2.0,
        );
        let ball_id = state.next_entity_id();
        let ball = Entity::ball(
            ball_id,
            ball_pos,
            settings.ball_size,
            settings.ball_speed,
            settings.ball_velocity,
        );

        state.entities.push(paddle);
        state.entities.push(ball);

        let mut next_id = state.next_id;
        let blocks = generate_blocks(&settings.level, &field, settings.block_size, || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        });
        state.next_id = next_id;
        state.entities.extend(blocks);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn paddle(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_paddle())
    }

    pub fn ball(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_ball())
    }

    pub fn ball_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_ball())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_block())
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Displayed time: 60 ticks per second regardless of real frame rate
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ticks / TICKS_PER_SECOND
    }

    /// Result payload once the session has ended
    pub fn result(&self) -> Option<GameResult> {
        let outcome = match self.status {
            GameStatus::InProgress => return None,
            GameStatus::Won => GameOutcome::Won,
            GameStatus::Lost => GameOutcome::Lost,
        };
        Some(GameResult {
            outcome,
            score: self.score,
            elapsed_seconds: self.elapsed_seconds(),
        })
    }

    /// Push the held movement keys into the paddle
    pub fn set_movement(&mut self, flags: MovementFlags) {
        for entity in self.entities.iter_mut().filter(|e| e.is_paddle()) {
            entity.set_movement(flags);
        }
    }

    /// Run every live entity's update in registration order.
    ///
    /// Nothing is removed here; removals wait for `apply_events` so a block
    /// destroyed this tick still takes part in later entities' tests.
    pub fn update_entities(&mut self) -> EventQueue {
        let mut queue = EventQueue::new();
        let mut ctx = UpdateContext {
            field: &self.field,
            rng: &mut self.rng,
        };
        for i in 0..self.entities.len() {
            let mut entity = self.entities[i].clone();
            queue.extend(entity.update(&mut ctx, &self.entities));
            self.entities[i] = entity;
        }
        queue
    }

    /// Apply collision events in emission order
    pub fn apply_events(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        for event in events {
            match event {
                CollisionEvent::BlockDestroyed { block_id } => {
                    // Already gone: double removal is a no-op
                    if self.remove_entity(block_id) {
                        self.score += self.score_rate;
                        self.score_rate += 1;
                        log::debug!(
                            "Block {:?} destroyed, score={} next_rate={}",
                            block_id,
                            self.score,
                            self.score_rate
                        );
                    }
                }
                CollisionEvent::PaddleHit => {
                    self.score_rate = 1;
                }
                CollisionEvent::BallMissed => {
                    if self.status == GameStatus::InProgress {
                        self.status = GameStatus::Lost;
                        log::info!("Ball missed: game lost with score {}", self.score);
                    }
                }
            }
        }
    }

    /// Transition to Won once no blocks remain
    pub fn check_win(&mut self) {
        if self.status == GameStatus::InProgress && self.block_count() == 0 {
            self.status = GameStatus::Won;
            log::info!("All blocks cleared: game won with score {}", self.score);
        }
    }

    /// Remove an entity by id. Returns false if it was not live.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| e.id != id);
        self.entities.len() != before
    }

    /// Remove every block without scoring (debug cheat)
    pub fn clear_blocks(&mut self) {
        let removed = self.block_count();
        self.entities.retain(|e| !e.is_block());
        log::info!("Cheat: cleared {} blocks", removed);
    }

    /// Render descriptions for all live entities, in registration order
    pub fn draw(&self) -> Vec<RenderCommand> {
        self.entities.iter().map(Entity::draw).collect()
    }
}
