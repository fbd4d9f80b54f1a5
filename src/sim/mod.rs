//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per rendered frame, speeds in units per tick
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod geometry;
pub mod interaction;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use geometry::{Aabb, World, circle_aabb_overlap, circles_overlap, separation};
pub use state::{
    Camera, Enemy, GameEvent, GamePhase, GameState, Obstacle, Player, Projectile, Vehicle,
};
pub use tick::{Controls, TickInput, tick};
