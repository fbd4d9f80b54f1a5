//! Contact resolution between entities
//!
//! Vehicles ram enemies, enemies bump the on-foot player, projectiles hit
//! obstacles or enemies. Overlaps are fixed by moving the enemy out along the
//! separation normal by exactly the overlap; there is no impulse. A shove
//! never carries an enemy past the world edge.

use super::geometry::{circles_overlap, separation};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Moving vehicles shove overlapping enemies aside and damage them
///
/// Damage scales with vehicle speed; parked or crawling vehicles (below
/// `VEHICLE_PUSH_MIN_SPEED`) do nothing.
pub fn resolve_vehicle_enemies(state: &mut GameState) {
    for v in 0..state.vehicles.len() {
        let vehicle = &state.vehicles[v];
        let speed = vehicle.speed();
        if speed < VEHICLE_PUSH_MIN_SPEED {
            continue;
        }
        let (vehicle_pos, vehicle_radius) = (vehicle.pos, vehicle.radius);

        for slot in 0..state.enemies.len() {
            let enemy = &mut state.enemies[slot];
            if let Some(push) = separation(vehicle_pos, vehicle_radius, enemy.pos, enemy.radius) {
                enemy.pos = state.world.clamp_disc(enemy.pos + push, enemy.radius);
                state.damage_enemy(slot, speed * VEHICLE_RAM_DAMAGE);
            }
        }
    }
}

/// Enemies touching the on-foot player hurt them (unless invincible) and get
/// pushed back out either way
pub fn resolve_player_enemies(state: &mut GameState) {
    if state.in_vehicle() {
        return;
    }
    let (player_pos, player_radius) = (state.player.pos, state.player.radius);

    for slot in 0..state.enemies.len() {
        let enemy = &state.enemies[slot];
        let Some(push) = separation(player_pos, player_radius, enemy.pos, enemy.radius) else {
            continue;
        };

        if !state.player.invincible {
            state.player.health = state.player.health.saturating_sub(1);
            state.player.grant_invincibility();
            log::debug!("Player hit, health {}", state.player.health);
            state.events.push(GameEvent::PlayerHit {
                health: state.player.health,
            });
        }
        let enemy = &mut state.enemies[slot];
        enemy.pos = state.world.clamp_disc(enemy.pos + push, enemy.radius);
    }
}

/// Advance projectiles and resolve what they hit
///
/// Per projectile, at most one outcome: stopped by an obstacle (checked on
/// the next position, before moving), left the world, or hit the first
/// overlapping enemy in pool order.
pub fn update_projectiles(state: &mut GameState) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut kept = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        let next = projectile.pos + projectile.vel;
        if state.blocked_by_obstacle(next, projectile.radius) {
            continue;
        }
        projectile.pos = next;

        if state.world.point_outside(projectile.pos) {
            continue;
        }

        let hit = state.enemies.iter().position(|enemy| {
            circles_overlap(projectile.pos, projectile.radius, enemy.pos, enemy.radius)
        });
        if let Some(slot) = hit {
            state.damage_enemy(slot, PROJECTILE_DAMAGE);
            continue;
        }

        kept.push(projectile);
    }

    state.projectiles = kept;
}

/// Enter the terminal phase once the player is out of health
pub fn check_game_over(state: &mut GameState) {
    if state.player.health == 0 && state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over after {} ticks", state.time_ticks);
    }
}
