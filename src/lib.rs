//! Drift Siege - A top-down drive-and-shoot arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (vehicle physics, enemy AI, collisions, game state)
//! - `config`: Data-driven world layout and vehicle tuning
//! - `web`: Browser binding for the simulation (wasm32 only)

pub mod config;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GameConfig, VehicleTuning};

/// Game configuration constants
///
/// Speeds are in world units per tick; the simulation advances one step per
/// rendered frame. Only timers use elapsed milliseconds.
pub mod consts {
    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 2400.0;
    pub const WORLD_HEIGHT: f32 = 1600.0;
    /// Default viewport dimensions (camera size)
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Player (on foot)
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: u8 = 4;
    /// Invincibility window after contact damage (ms)
    pub const INVINCIBILITY_MS: f32 = 3000.0;
    /// Maximum distance from a vehicle center to climb in
    pub const VEHICLE_ENTER_RANGE: f32 = 50.0;

    /// Obstacles
    pub const OBSTACLE_COUNT: usize = 50;
    pub const OBSTACLE_MIN_SIZE: f32 = 30.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 70.0;

    /// Vehicle defaults
    pub const VEHICLE_COUNT: usize = 3;
    pub const VEHICLE_WIDTH: f32 = 60.0;
    pub const VEHICLE_HEIGHT: f32 = 30.0;
    pub const VEHICLE_MAX_SPEED: f32 = 7.0;
    pub const VEHICLE_TURN_SPEED: f32 = 0.04; // radians per tick
    pub const VEHICLE_FORWARD_ACCEL: f32 = 0.2;
    pub const VEHICLE_BACKWARD_ACCEL: f32 = 0.15;
    /// Friction along the facing direction
    pub const VEHICLE_FORWARD_FRICTION: f32 = 0.98;
    /// Friction on sideways velocity (lower = more damping)
    pub const VEHICLE_DRIFT_FRICTION: f32 = 0.9;
    /// Front wheel angle shown while steering
    pub const VEHICLE_STEER_ANGLE: f32 = 0.5;
    /// Below this speed a vehicle no longer shoves enemies
    pub const VEHICLE_PUSH_MIN_SPEED: f32 = 0.1;
    /// Ram damage per unit of vehicle speed
    pub const VEHICLE_RAM_DAMAGE: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 3;
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_MAX_HP: f32 = 100.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.5;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;
    /// Lateral offset of the flank point from the target
    pub const ENEMY_FLANK_OFFSET: f32 = 150.0;
    /// Extra clearance around obstacles before repulsion kicks in
    pub const ENEMY_REPULSION_MARGIN: f32 = 10.0;
    /// Weight of obstacle repulsion relative to the chase vector
    pub const ENEMY_REPULSION_WEIGHT: f32 = 100.0;
    /// Minimum spawn clearance from the player, beyond touching
    pub const ENEMY_SPAWN_CLEARANCE: f32 = 20.0;
    /// Substitute magnitude for a zero steering vector
    pub const STEER_EPSILON: f32 = 0.0001;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 7.0;
    pub const PROJECTILE_DAMAGE: f32 = 25.0;

    /// Cap on random placement attempts per constraint round
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 256;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
