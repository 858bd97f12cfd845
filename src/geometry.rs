/// Geometry helpers shared by the simulation.  Positions are world units,
/// y grows downward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle (radians) of the ray from `from` to `to`.
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector pointing along `angle`.
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Strict axis-aligned overlap: `point` lies inside the open box of
/// half-extent `half` around `center`.
pub fn overlaps(point: Vec2, center: Vec2, half: f32) -> bool {
    point.x > center.x - half
        && point.x < center.x + half
        && point.y > center.y - half
        && point.y < center.y + half
}

/// The playfield rectangle `[0, width] × [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Edges count as inside; anything past them has left the arena.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Clamp into `[margin, width - margin] × [margin, height - margin]`.
    pub fn clamp_inset(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.max(margin).min(self.width - margin),
            p.y.max(margin).min(self.height - margin),
        )
    }

    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen::<f32>() * self.width,
            rng.gen::<f32>() * self.height,
        )
    }

    /// Uniform point at least `margin` away from every edge.
    pub fn random_point_inset(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        Vec2::new(
            rng.gen::<f32>() * (self.width - 2.0 * margin) + margin,
            rng.gen::<f32>() * (self.height - 2.0 * margin) + margin,
        )
    }
}
