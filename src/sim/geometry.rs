//! World bounds and shape overlap tests
//!
//! Every circle-vs-square test in the game goes through [`circle_aabb_overlap`]
//! (nearest-point clamp), so players, enemies, vehicles and projectiles all
//! agree on what "touching an obstacle" means.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed-size play field; every entity lives inside `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if a disc at `pos` sticks out past any world edge
    #[inline]
    pub fn disc_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius < 0.0
            || pos.x + radius > self.width
            || pos.y - radius < 0.0
            || pos.y + radius > self.height
    }

    /// True if the point itself has left the world
    #[inline]
    pub fn point_outside(&self, pos: Vec2) -> bool {
        pos.x < 0.0 || pos.x > self.width || pos.y < 0.0 || pos.y > self.height
    }

    /// Clamp a disc center so the disc stays inside the world
    pub fn clamp_disc(&self, pos: Vec2, radius: f32) -> Vec2 {
        let mut out = pos;
        if out.x - radius < 0.0 {
            out.x = radius;
        }
        if out.x + radius > self.width {
            out.x = self.width - radius;
        }
        if out.y - radius < 0.0 {
            out.y = radius;
        }
        if out.y + radius > self.height {
            out.y = self.height - radius;
        }
        out
    }
}

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn square(corner: Vec2, size: f32) -> Self {
        Self {
            min: corner,
            max: corner + Vec2::splat(size),
        }
    }

    /// Closest point of the box to `p`
    #[inline]
    pub fn nearest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Circle vs. AABB: true if the disc strictly overlaps the box
#[inline]
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let nearest = aabb.nearest_point(center);
    center.distance_squared(nearest) < radius * radius
}

/// Circle vs. circle: true if the discs strictly overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Push-out needed to separate disc `b` from disc `a`
///
/// Returns `None` when the discs do not overlap, otherwise the displacement
/// to add to `b` (along the a→b normal, length = overlap). Coincident
/// centers separate along +x.
pub fn separation(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Vec2> {
    let delta = b - a;
    let dist = delta.length();
    let min_dist = ra + rb;
    if dist >= min_dist {
        return None;
    }
    let normal = if dist > 0.0 { delta / dist } else { Vec2::X };
    Some(normal * (min_dist - dist))
}
