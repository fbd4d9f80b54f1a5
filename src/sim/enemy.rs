//! Enemy AI
//!
//! Steering with fallback:
//! 1. Head for the target, or for a flank point beside it
//! 2. Add a repulsion field around nearby obstacles
//! 3. If that step is blocked, try headings rotated by up to ±90°
//! 4. If every heading is blocked, try one random heading and accept the result

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameState, Obstacle};
use crate::consts::*;
use crate::heading_vector;

/// Heading offsets tried when the direct step is blocked, in order
pub const FALLBACK_OFFSETS: [f32; 10] = [
    PI / 12.0,
    -PI / 12.0,
    PI / 6.0,
    -PI / 6.0,
    PI / 4.0,
    -PI / 4.0,
    PI / 3.0,
    -PI / 3.0,
    PI / 2.0,
    -PI / 2.0,
];

/// Vector from the enemy to where it wants to go
///
/// Flankers aim at a point `ENEMY_FLANK_OFFSET` to the side of the target,
/// perpendicular to the chase line.
pub fn desired_vector(enemy: &Enemy, target: Vec2) -> Vec2 {
    let chase = target - enemy.pos;
    let dist = chase.length();
    if enemy.flank && dist > 0.0 {
        let side = (chase / dist).perp();
        let flank_point = target + side * (enemy.flank_direction * ENEMY_FLANK_OFFSET);
        flank_point - enemy.pos
    } else {
        chase
    }
}

/// Sum of pushes away from obstacles the enemy is close to
///
/// Each obstacle within `size/2 + radius + margin` of its center pushes with
/// strength growing linearly from 0 at the threshold to 1 at the center.
pub fn obstacle_repulsion(enemy: &Enemy, obstacles: &[Obstacle]) -> Vec2 {
    obstacles.iter().fold(Vec2::ZERO, |acc, obstacle| {
        let away = enemy.pos - obstacle.center();
        let dist = away.length();
        let threshold = obstacle.size / 2.0 + enemy.radius + ENEMY_REPULSION_MARGIN;
        if dist < threshold && dist > 0.0 {
            acc + away / dist * ((threshold - dist) / threshold)
        } else {
            acc
        }
    })
}

/// Heading (radians) the enemy will try first this tick
pub fn steering_angle(enemy: &Enemy, target: Vec2, obstacles: &[Obstacle]) -> f32 {
    let combined =
        desired_vector(enemy, target) + obstacle_repulsion(enemy, obstacles) * ENEMY_REPULSION_WEIGHT;
    let heading = combined / combined.length().max(STEER_EPSILON);
    heading.y.atan2(heading.x)
}

/// Step enemy `slot` along `angle` at its speed if nothing is in the way
pub fn try_move(state: &mut GameState, slot: usize, angle: f32) -> bool {
    let enemy = &state.enemies[slot];
    let candidate = enemy.pos + heading_vector(angle) * enemy.speed;
    if state.enemy_move_blocked(slot, candidate) {
        return false;
    }
    state.enemies[slot].pos = candidate;
    true
}

/// Move along `base_angle`, falling back to rotated headings, then a random one
pub fn move_with_fallback(state: &mut GameState, slot: usize, base_angle: f32) {
    if try_move(state, slot, base_angle) {
        return;
    }
    for offset in FALLBACK_OFFSETS {
        if try_move(state, slot, base_angle + offset) {
            return;
        }
    }
    // Last resort; staying put for a tick is fine
    let escape = state.rng.random_range(0.0..TAU);
    try_move(state, slot, escape);
}

/// Run the AI for every enemy, in pool order
pub fn update_enemies(state: &mut GameState) {
    let target = state.focus_position();
    for slot in 0..state.enemies.len() {
        let angle = steering_angle(&state.enemies[slot], target, &state.obstacles);
        move_with_fallback(state, slot, angle);
    }
}
