//! Vehicle physics
//!
//! Arcade car model: acceleration along the heading, separate friction for
//! the forward and sideways velocity components (sideways is damped harder,
//! which leaves a slide after sharp turns), a hard speed cap, and a
//! stop-dead response when the next position would hit something.

use glam::Vec2;

use super::state::{GameState, Vehicle};
use super::tick::Controls;
use crate::consts::VEHICLE_STEER_ANGLE;
use crate::normalize_angle;

impl Vehicle {
    /// Throttle and steering from the held keys (player-controlled only)
    pub fn apply_controls(&mut self, controls: &Controls) {
        let mut throttle = 0.0;
        if controls.forward {
            throttle += self.forward_accel;
        }
        if controls.back {
            throttle -= self.backward_accel;
        }
        self.vel += self.forward() * throttle;

        // Steering flips while reversing; with no throttle the car still
        // turns as if rolling forward
        let turn_sign = if throttle == 0.0 { 1.0 } else { throttle.signum() };
        self.steer = 0.0;
        if controls.left {
            self.angle -= self.turn_speed * turn_sign;
            self.steer = -VEHICLE_STEER_ANGLE;
        }
        if controls.right {
            self.angle += self.turn_speed * turn_sign;
            self.steer = VEHICLE_STEER_ANGLE;
        }
        self.angle = normalize_angle(self.angle);
    }

    /// Damp forward and sideways velocity separately
    pub fn apply_friction(&mut self) {
        let forward = self.forward();
        let side = forward.perp();

        let forward_speed = self.vel.dot(forward) * self.forward_friction;
        let side_speed = self.vel.dot(side) * self.drift_friction;

        self.vel = forward * forward_speed + side * side_speed;
    }

    /// Scale velocity down uniformly to at most `max_speed`
    pub fn cap_speed(&mut self) {
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }
    }

    /// Position after this tick's velocity
    #[inline]
    pub fn next_position(&self) -> Vec2 {
        self.pos + self.vel
    }
}

/// Advance every vehicle one tick
///
/// Only the occupied vehicle reads `controls`; the rest coast to a stop.
pub fn update_vehicles(state: &mut GameState, controls: &Controls) {
    for slot in 0..state.vehicles.len() {
        let controlled = state.occupied_vehicle == Some(slot);

        let vehicle = &mut state.vehicles[slot];
        if controlled {
            vehicle.apply_controls(controls);
        } else {
            vehicle.steer = 0.0;
        }
        vehicle.apply_friction();
        vehicle.cap_speed();
        let candidate = vehicle.next_position();
        let radius = vehicle.radius;

        let blocked = state.vehicle_blocked(candidate, radius);
        let vehicle = &mut state.vehicles[slot];
        if blocked {
            // Hard stop, no sliding along the obstacle
            vehicle.vel = Vec2::ZERO;
        } else {
            vehicle.pos = candidate;
        }
    }
}
