//! Level layout: the initial block grid

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Entity, EntityId};
use super::geom::{PlayField, Size};
use crate::consts::{LEVEL_GAP, LEVEL_ROWS};

/// Grid parameters for a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Number of block rows
    pub rows: i32,
    /// Spacing between blocks and around the grid (pixels)
    pub gap: f32,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            rows: LEVEL_ROWS,
            gap: LEVEL_GAP,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("row count must not be negative (got {0})")]
    NegativeRows(i32),
    #[error("gap must be a non-negative number (got {0})")]
    InvalidGap(f32),
}

impl LevelParams {
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.rows < 0 {
            return Err(LevelError::NegativeRows(self.rows));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(LevelError::InvalidGap(self.gap));
        }
        Ok(())
    }
}

/// Lay out the block grid.
///
/// Rows start one row-pitch below the top edge; each row is filled left to
/// right from `gap` while a whole block still fits. Invalid parameters yield
/// an empty grid, which makes the level an immediate win.
pub fn generate_blocks(
    params: &LevelParams,
    field: &PlayField,
    block_size: Size,
    mut next_id: impl FnMut() -> EntityId,
) -> Vec<Entity> {
    if let Err(err) = params.validate() {
        log::warn!("Invalid level parameters, generating no blocks: {}", err);
        return Vec::new();
    }

    let pitch_x = block_size.w + params.gap;
    let pitch_y = block_size.h + params.gap;
    let max_x = field.width - block_size.w;
    if pitch_x <= 0.0 {
        // Zero-width blocks with no gap would never advance
        log::warn!("Degenerate block pitch, generating no blocks");
        return Vec::new();
    }

    let mut blocks = Vec::new();
    for row in 1..=params.rows {
        let y = row as f32 * pitch_y;
        let mut x = params.gap;
        while x < max_x {
            blocks.push(Entity::block(next_id(), Vec2::new(x, y), block_size));
            x += pitch_x;
        }
    }

    log::debug!(
        "Generated {} blocks ({} rows, gap {})",
        blocks.len(),
        params.rows,
        params.gap
    );
    blocks
}
