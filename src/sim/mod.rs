//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies

pub mod entity;
pub mod event;
pub mod geom;
pub mod level;
pub mod state;
pub mod tick;

pub use entity::{Entity, EntityId, EntityKind, MovementFlags, RenderCommand, UpdateContext};
pub use event::{CollisionEvent, EventQueue};
pub use geom::{Aabb, PlayField, Size};
pub use level::{LevelError, LevelParams, generate_blocks};
pub use state::{GameOutcome, GameResult, GameState, GameStatus};
pub use tick::{TickInput, tick};
