//! Box geometry for entities and the play field
//!
//! Positions are the top-left corner in screen space (y grows downward).
//! An entity's box spans `pos .. pos + size` on both axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height of an entity, never negative
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawExtent")]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    /// Negative extents are clamped to zero
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }
}

/// Wire form of a `Size`; deserialized values go through the clamping constructor
#[derive(Deserialize)]
struct RawExtent {
    w: f32,
    h: f32,
}

impl From<RawExtent> for Size {
    fn from(raw: RawExtent) -> Self {
        Size::new(raw.w, raw.h)
    }
}

/// Axis-aligned bounding box given by its min (x1, y1) and max (x2, y2) corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self {
            min: pos,
            max: pos + size.as_vec2(),
        }
    }

    /// Open-interval overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Visible bounds of the game, fixed for the lifetime of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawField")]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

#[derive(Deserialize)]
struct RawField {
    width: f32,
    height: f32,
}

impl From<RawField> for PlayField {
    fn from(raw: RawField) -> Self {
        PlayField::new(raw.width, raw.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_pos_size(Vec2::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_size_clamps_negative() {
        let size = Size::new(-3.0, 4.0);
        assert_eq!(size.w, 0.0);
        assert_eq!(size.h, 4.0);
    }

    #[test]
    fn test_overlap_basic() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));

        let far = boxed(50.0, 50.0, 10.0, 10.0);
        assert!(!a.overlaps(&far));
    }

    #[test]
    fn test_edge_touching_is_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        // Shares a vertical edge (a.x2 == b.x1)
        let right = boxed(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        // Shares a horizontal edge (a.y2 == b.y1)
        let below = boxed(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&below));
        // Corner touch
        let corner = boxed(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = boxed(0.0, 0.0, 100.0, 100.0);
        let inner = boxed(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_deserialize_clamps_negative() {
        let size: Size = serde_json::from_str(r#"{ "w": -5.0, "h": 30.0 }"#).unwrap();
        assert_eq!(size, Size::new(0.0, 30.0));

        let field: PlayField = serde_json::from_str(r#"{ "width": 800.0, "height": -1.0 }"#).unwrap();
        assert_eq!(field, PlayField::new(800.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = boxed(ax, ay, aw, ah);
            let b = boxed(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_shared_vertical_edge_never_overlaps(
            x in -500i32..500, y in -500i32..500,
            aw in 1i32..200, ah in 1i32..200,
            bw in 1i32..200, bh in 1i32..200,
            dy in -100i32..100,
        ) {
            // Integer-valued coordinates keep a.x2 == b.x1 exact in f32
            let a = boxed(x as f32, y as f32, aw as f32, ah as f32);
            let b = boxed((x + aw) as f32, (y + dy) as f32, bw as f32, bh as f32);
            prop_assert!(!a.overlaps(&b));
            prop_assert!(!b.overlaps(&a));
        }
    }
}
