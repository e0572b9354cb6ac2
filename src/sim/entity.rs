//! Game entities: paddle, ball and blocks
//!
//! Every entity shares one data envelope (position, size, velocity, speed)
//! and a kind tag that selects its per-tick behavior.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::CollisionEvent;
use super::geom::{Aabb, PlayField, Size};
use crate::consts::BALL_MAX_SPIN;

/// Stable entity identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Held horizontal movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementFlags {
    pub left: bool,
    pub right: bool,
}

/// Entity kind, with per-kind data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player paddle, pinned to the bottom of the field
    Paddle { movement: MovementFlags },
    /// The ball
    Ball,
    /// Static target, destroyed on contact with the ball
    Block,
}

impl EntityKind {
    /// Lowercase name, used as the render class
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Paddle { .. } => "paddle",
            EntityKind::Ball => "ball",
            EntityKind::Block => "block",
        }
    }
}

/// Pure description of where and how big to draw an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    pub id: EntityId,
    pub label: &'static str,
    pub pos: Vec2,
    pub size: Size,
}

/// Per-tick context handed to every entity update
pub struct UpdateContext<'a> {
    pub field: &'a PlayField,
    pub rng: &'a mut Pcg32,
}

/// A game entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Size,
    /// Displacement applied per tick
    pub vel: Vec2,
    /// Nominal movement per tick; also the lookahead used for boundary tests
    pub speed: f32,
    /// Cleared when the entity has been hit and awaits removal
    pub alive: bool,
}

impl Entity {
    /// Paddle centered horizontally on the bottom edge of the field
    pub fn paddle(id: EntityId, field: &PlayField, size: Size, speed: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Paddle {
                movement: MovementFlags::default(),
            },
            pos: Vec2::new(field.width / 2.0 - size.w / 2.0, field.height - size.h),
            size,
            vel: Vec2::ZERO,
            speed,
            alive: true,
        }
    }

    pub fn ball(id: EntityId, pos: Vec2, size: Size, speed: f32, vel: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Ball,
            pos,
            size,
            vel,
            speed,
            alive: true,
        }
    }

    pub fn block(id: EntityId, pos: Vec2, size: Size) -> Self {
        Self {
            id,
            kind: EntityKind::Block,
            pos,
            size,
            vel: Vec2::ZERO,
            speed: 0.0,
            alive: true,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn is_paddle(&self) -> bool {
        matches!(self.kind, EntityKind::Paddle { .. })
    }

    pub fn is_ball(&self) -> bool {
        self.kind == EntityKind::Ball
    }

    pub fn is_block(&self) -> bool {
        self.kind == EntityKind::Block
    }

    /// Replace the paddle's held movement keys (no-op for other kinds)
    pub fn set_movement(&mut self, flags: MovementFlags) {
        if let EntityKind::Paddle { movement } = &mut self.kind {
            *movement = flags;
        }
    }

    /// Advance one tick.
    ///
    /// `peers` is the live entity list as seen by this entity; it may contain a
    /// stale copy of `self`, which kind filters skip.
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>, peers: &[Entity]) -> Vec<CollisionEvent> {
        if !self.alive {
            return Vec::new();
        }
        match self.kind {
            EntityKind::Paddle { movement } => {
                self.update_paddle(movement, ctx.field);
                Vec::new()
            }
            EntityKind::Ball => self.update_ball(ctx, peers),
            EntityKind::Block => self.update_block(peers),
        }
    }

    pub fn draw(&self) -> RenderCommand {
        RenderCommand {
            id: self.id,
            label: self.kind.label(),
            pos: self.pos,
            size: self.size,
        }
    }

    fn update_paddle(&mut self, movement: MovementFlags, field: &PlayField) {
        let max_x = (field.width - self.size.w).max(0.0);

        // Snap to the wall instead of overshooting it
        if movement.left && self.pos.x < self.speed {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
            return;
        }
        if movement.right && self.pos.x > max_x - self.speed {
            self.pos.x = max_x;
            self.vel.x = 0.0;
            return;
        }

        self.vel.x = if movement.left {
            -self.speed
        } else if movement.right {
            self.speed
        } else {
            0.0
        };
        self.pos.x += self.vel.x;
    }

    /// All tests run against the pre-move position, then velocity is applied.
    fn update_ball(&mut self, ctx: &mut UpdateContext<'_>, peers: &[Entity]) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let bounds = self.aabb();
        let field = ctx.field;

        let hit_paddle = self.vel.y > 0.0
            && peers
                .iter()
                .any(|p| p.alive && p.is_paddle() && p.aabb().overlaps(&bounds));

        if hit_paddle {
            events.push(CollisionEvent::PaddleHit);
            self.change_direction(ctx.rng);
        } else if self.vel.y < 0.0 && self.pos.y < self.speed {
            // Top wall
            self.change_direction(ctx.rng);
        }

        let left_breach = self.vel.x < 0.0 && self.pos.x < self.speed;
        let right_breach = self.vel.x > 0.0 && self.pos.x + self.size.w + self.speed > field.width;
        if left_breach || right_breach {
            self.vel.x = -self.vel.x;
        }

        if self.pos.y + self.speed >= field.height {
            events.push(CollisionEvent::BallMissed);
        }

        self.pos += self.vel;
        events
    }

    /// Always flips vertical travel; half the time also re-rolls horizontal travel
    fn change_direction(&mut self, rng: &mut Pcg32) {
        self.vel.y = -self.vel.y;
        if !rng.random_bool(0.5) {
            self.vel.x = rng.random_range(-BALL_MAX_SPIN..=BALL_MAX_SPIN);
        }
    }

    fn update_block(&mut self, peers: &[Entity]) -> Vec<CollisionEvent> {
        let bounds = self.aabb();
        let touched = peers
            .iter()
            .any(|p| p.alive && p.is_ball() && p.aabb().overlaps(&bounds));
        if touched {
            self.alive = false;
            vec![CollisionEvent::BlockDestroyed { block_id: self.id }]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const FIELD: PlayField = PlayField {
        width: 800.0,
        height: 600.0,
    };

    fn paddle_at(x: f32) -> Entity {
        let mut paddle = Entity::paddle(EntityId(1), &FIELD, Size::new(100.0, 20.0), 20.0);
        paddle.pos.x = x;
        paddle
    }

    fn ball_at(x: f32, y: f32, vel: Vec2) -> Entity {
        Entity::ball(EntityId(2), Vec2::new(x, y), Size::new(20.0, 20.0), 5.0, vel)
    }

    fn step(entity: &mut Entity, peers: &[Entity]) -> Vec<CollisionEvent> {
        step_seeded(entity, peers, 1)
    }

    fn step_seeded(entity: &mut Entity, peers: &[Entity], seed: u64) -> Vec<CollisionEvent> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ctx = UpdateContext {
            field: &FIELD,
            rng: &mut rng,
        };
        entity.update(&mut ctx, peers)
    }

    fn drive(paddle: &mut Entity, left: bool, right: bool) {
        paddle.set_movement(MovementFlags { left, right });
        step(paddle, &[]);
    }

    #[test]
    fn test_paddle_spawns_on_bottom_edge() {
        let paddle = Entity::paddle(EntityId(1), &FIELD, Size::new(100.0, 20.0), 20.0);
        assert_eq!(paddle.pos, Vec2::new(350.0, 580.0));
    }

    #[test]
    fn test_paddle_moves_by_speed() {
        let mut paddle = paddle_at(300.0);
        drive(&mut paddle, true, false);
        assert_eq!(paddle.pos.x, 280.0);
        drive(&mut paddle, false, true);
        assert_eq!(paddle.pos.x, 300.0);
        drive(&mut paddle, false, false);
        assert_eq!(paddle.pos.x, 300.0);
        assert_eq!(paddle.pos.y, 580.0);
    }

    #[test]
    fn test_paddle_left_wins_when_both_held() {
        let mut paddle = paddle_at(300.0);
        drive(&mut paddle, true, true);
        assert_eq!(paddle.pos.x, 280.0);
    }

    #[test]
    fn test_paddle_snaps_to_walls() {
        let mut paddle = paddle_at(15.0);
        drive(&mut paddle, true, false);
        assert_eq!(paddle.pos.x, 0.0);

        let mut paddle = paddle_at(690.0);
        drive(&mut paddle, false, true);
        assert_eq!(paddle.pos.x, 700.0);
    }

    #[test]
    fn test_ball_moves_by_velocity() {
        let mut ball = ball_at(300.0, 300.0, Vec2::new(3.0, -5.0));
        let events = step(&mut ball, &[]);
        assert!(events.is_empty());
        assert_eq!(ball.pos, Vec2::new(303.0, 295.0));
    }

    #[test]
    fn test_ball_bounces_off_top() {
        let mut ball = ball_at(300.0, 2.0, Vec2::new(0.0, -5.0));
        let events = step(&mut ball, &[]);
        assert!(events.is_empty());
        assert_eq!(ball.vel.y, 5.0);
        assert_eq!(ball.pos.y, 7.0);
    }

    #[test]
    fn test_ball_bounces_off_side_walls() {
        let mut ball = ball_at(2.0, 300.0, Vec2::new(-3.0, 5.0));
        step(&mut ball, &[]);
        assert_eq!(ball.vel, Vec2::new(3.0, 5.0));

        let mut ball = ball_at(778.0, 300.0, Vec2::new(3.0, 5.0));
        step(&mut ball, &[]);
        assert_eq!(ball.vel, Vec2::new(-3.0, 5.0));
    }

    #[test]
    fn test_ball_paddle_hit_flips_vertical() {
        let paddle = paddle_at(300.0);
        let mut ball = ball_at(340.0, 565.0, Vec2::new(0.0, 5.0));
        let events = step(&mut ball, &[paddle]);
        assert_eq!(events, vec![CollisionEvent::PaddleHit]);
        assert_eq!(ball.vel.y, -5.0);
        assert!(ball.vel.x.abs() <= BALL_MAX_SPIN);
    }

    #[test]
    fn test_ball_paddle_hit_keeps_vertical_speed() {
        let paddle = paddle_at(300.0);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let mut ball = ball_at(340.0, 565.0, Vec2::new(2.0, 5.0));
            let mut ctx = UpdateContext {
                field: &FIELD,
                rng: &mut rng,
            };
            ball.update(&mut ctx, std::slice::from_ref(&paddle));
            assert_eq!(ball.vel.y, -5.0);
        }
    }

    /// Count (kept, re-rolled) horizontal velocities over many seeded bounces
    fn bounce_outcomes(start: Vec2, y: f32, peers: &[Entity]) -> (u32, u32) {
        let (mut kept, mut rerolled) = (0, 0);
        for seed in 0..200 {
            let mut ball = ball_at(340.0, y, start);
            step_seeded(&mut ball, peers, seed);
            assert_eq!(ball.vel.y, -start.y);
            if ball.vel.x == start.x {
                kept += 1;
            } else {
                assert!(ball.vel.x.abs() <= BALL_MAX_SPIN);
                rerolled += 1;
            }
        }
        (kept, rerolled)
    }

    #[test]
    fn test_paddle_bounce_rerolls_horizontal_some_of_the_time() {
        let paddle = paddle_at(300.0);
        let (kept, rerolled) = bounce_outcomes(Vec2::new(2.5, 5.0), 565.0, &[paddle]);
        assert!(kept > 20, "kept {kept}");
        assert!(rerolled > 20, "rerolled {rerolled}");
    }

    #[test]
    fn test_top_bounce_rerolls_horizontal_some_of_the_time() {
        let (kept, rerolled) = bounce_outcomes(Vec2::new(2.5, -5.0), 2.0, &[]);
        assert!(kept > 20, "kept {kept}");
        assert!(rerolled > 20, "rerolled {rerolled}");
    }

    #[test]
    fn test_rising_ball_passes_through_paddle() {
        // Only a descending ball counts as a paddle hit
        let paddle = paddle_at(300.0);
        let mut ball = ball_at(340.0, 565.0, Vec2::new(0.0, -5.0));
        let events = step(&mut ball, &[paddle]);
        assert!(events.is_empty());
        assert_eq!(ball.vel, Vec2::new(0.0, -5.0));
        assert_eq!(ball.pos, Vec2::new(340.0, 560.0));
    }

    #[test]
    fn test_ball_miss_at_bottom() {
        let mut ball = ball_at(100.0, 596.0, Vec2::new(0.0, 5.0));
        let events = step(&mut ball, &[]);
        assert_eq!(events, vec![CollisionEvent::BallMissed]);
        // Missing does not alter velocity
        assert_eq!(ball.vel, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_block_destroyed_by_ball() {
        let mut block = Entity::block(EntityId(9), Vec2::new(100.0, 100.0), Size::new(150.0, 50.0));
        let ball = ball_at(150.0, 120.0, Vec2::new(0.0, 5.0));
        let events = step(&mut block, &[ball]);
        assert_eq!(
            events,
            vec![CollisionEvent::BlockDestroyed {
                block_id: EntityId(9)
            }]
        );
        assert!(!block.alive);

        // A removed block stays silent
        assert!(step(&mut block, &[ball_at(150.0, 120.0, Vec2::ZERO)]).is_empty());
    }

    #[test]
    fn test_block_ignores_edge_touch_and_paddle() {
        let mut block = Entity::block(EntityId(9), Vec2::new(100.0, 100.0), Size::new(150.0, 50.0));
        // Ball sitting exactly on the block's bottom edge
        let ball = ball_at(150.0, 150.0, Vec2::ZERO);
        let mut paddle = paddle_at(120.0);
        paddle.pos.y = 120.0;
        assert!(step(&mut block, &[ball, paddle]).is_empty());
        assert!(block.alive);
    }

    #[test]
    fn test_draw_describes_box() {
        let block = Entity::block(EntityId(3), Vec2::new(10.0, 40.0), Size::new(80.0, 30.0));
        let cmd = block.draw();
        assert_eq!(cmd.id, EntityId(3));
        assert_eq!(cmd.label, "block");
        assert_eq!(cmd.pos, Vec2::new(10.0, 40.0));
        assert_eq!(cmd.size, Size::new(80.0, 30.0));
    }

    proptest! {
        #[test]
        fn prop_paddle_never_leaves_field(
            start in 0.0f32..700.0,
            moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
        ) {
            let mut paddle = paddle_at(start);
            for (left, right) in moves {
                drive(&mut paddle, left, right);
                prop_assert!(paddle.pos.x >= 0.0);
                prop_assert!(paddle.pos.x + paddle.size.w <= FIELD.width);
            }
        }
    }
}
