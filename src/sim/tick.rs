//! Per-frame simulation tick
//!
//! Core game loop: one call per rendered frame advances every subsystem in a
//! fixed order. Speeds are per tick; only the invincibility timer uses the
//! elapsed milliseconds.

use glam::Vec2;

use super::enemy::update_enemies;
use super::interaction::{
    check_game_over, resolve_player_enemies, resolve_vehicle_enemies, update_projectiles,
};
use super::state::{GameEvent, GameState, Projectile};
use super::vehicle::update_vehicles;
use crate::consts::*;

/// Movement keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    /// Up on foot, throttle in a vehicle
    pub forward: bool,
    /// Down on foot, brake/reverse in a vehicle
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub controls: Controls,
    /// Enter/exit vehicle (edge-triggered)
    pub toggle_vehicle: bool,
    /// Fire at this screen-space point
    pub fire: Option<Vec2>,
}

impl GameState {
    /// Climb into the nearest vehicle in range, or get out of the current one
    ///
    /// Entering picks the first vehicle (pool order) whose center is within
    /// `VEHICLE_ENTER_RANGE`. Exiting drops the player at the vehicle center.
    pub fn toggle_vehicle(&mut self) {
        match self.occupied_vehicle.take() {
            Some(slot) => {
                if let Some(vehicle) = self.vehicles.get(slot) {
                    self.player.pos = vehicle.pos;
                }
                log::debug!("Exited vehicle {}", slot);
                self.events.push(GameEvent::VehicleExited { vehicle: slot });
            }
            None => {
                let player = self.player.pos;
                let in_range = self
                    .vehicles
                    .iter()
                    .position(|v| v.pos.distance(player) < VEHICLE_ENTER_RANGE);
                if let Some(slot) = in_range {
                    self.occupied_vehicle = Some(slot);
                    log::debug!("Entered vehicle {}", slot);
                    self.events.push(GameEvent::VehicleEntered { vehicle: slot });
                }
            }
        }
    }

    /// Fire toward a screen-space point (converted through the camera)
    pub fn fire(&mut self, screen_target: Vec2) {
        let target = self.camera.to_world(screen_target);
        self.fire_at(target);
    }

    /// Fire toward a world-space point
    ///
    /// Shots leave from the player on foot, or from the front bumper when
    /// driving.
    pub fn fire_at(&mut self, target: Vec2) {
        let origin = self.player_vehicle().map_or(self.player.pos, |v| v.front());
        let delta = target - origin;
        let angle = delta.y.atan2(delta.x);
        self.projectiles.push(Projectile {
            pos: origin,
            radius: PROJECTILE_RADIUS,
            vel: Vec2::new(angle.cos(), angle.sin()) * PROJECTILE_SPEED,
        });
        self.events.push(GameEvent::ProjectileFired);
    }
}

/// On-foot movement: axes are tested separately so the player slides along walls
fn move_player(state: &mut GameState, controls: &Controls) {
    if state.in_vehicle() {
        return;
    }
    let player = &state.player;
    let mut next = player.pos;
    if controls.forward {
        next.y -= player.speed;
    }
    if controls.back {
        next.y += player.speed;
    }
    if controls.left {
        next.x -= player.speed;
    }
    if controls.right {
        next.x += player.speed;
    }

    let radius = player.radius;
    let mut pos = player.pos;
    if !state.blocked_by_obstacle(Vec2::new(next.x, pos.y), radius) {
        pos.x = next.x;
    }
    if !state.blocked_by_obstacle(Vec2::new(pos.x, next.y), radius) {
        pos.y = next.y;
    }
    state.player.pos = state.world.clamp_disc(pos, radius);
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    if state.is_game_over() {
        return;
    }
    state.events.clear();
    state.time_ticks += 1;

    // One-shot actions arrive between frames
    if input.toggle_vehicle {
        state.toggle_vehicle();
    }
    if let Some(screen_target) = input.fire {
        state.fire(screen_target);
    }

    move_player(state, &input.controls);
    update_vehicles(state, &input.controls);
    resolve_vehicle_enemies(state);
    update_enemies(state);
    resolve_player_enemies(state);
    update_projectiles(state);
    state.player.tick_invincibility(elapsed_ms);

    let focus = state.focus_position();
    state.camera.follow(focus, &state.world);

    check_game_over(state);
}
