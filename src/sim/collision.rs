//! Collision queries
//!
//! "Would a disc at this position be blocked?" answered against obstacles,
//! the enemy pool and the world edges. Pure functions: nothing here mutates,
//! callers test a candidate position and only then commit the move.

use glam::Vec2;

use super::geometry::{World, circle_aabb_overlap, circles_overlap};
use super::state::{Enemy, GameState, Obstacle};

/// True if the disc intersects any obstacle
pub fn blocked_by_obstacle(obstacles: &[Obstacle], pos: Vec2, radius: f32) -> bool {
    obstacles
        .iter()
        .any(|obstacle| circle_aabb_overlap(pos, radius, &obstacle.aabb()))
}

/// True if the disc overlaps any enemy other than slot `excluding`
pub fn blocked_by_enemy(
    enemies: &[Enemy],
    pos: Vec2,
    radius: f32,
    excluding: Option<usize>,
) -> bool {
    enemies
        .iter()
        .enumerate()
        .filter(|(slot, _)| Some(*slot) != excluding)
        .any(|(_, enemy)| circles_overlap(pos, radius, enemy.pos, enemy.radius))
}

/// True if the disc extends past the world edges
#[inline]
pub fn blocked_by_world_bounds(world: &World, pos: Vec2, radius: f32) -> bool {
    world.disc_outside(pos, radius)
}

impl GameState {
    pub fn blocked_by_obstacle(&self, pos: Vec2, radius: f32) -> bool {
        blocked_by_obstacle(&self.obstacles, pos, radius)
    }

    pub fn blocked_by_enemy(&self, pos: Vec2, radius: f32, excluding: Option<usize>) -> bool {
        blocked_by_enemy(&self.enemies, pos, radius, excluding)
    }

    pub fn blocked_by_world_bounds(&self, pos: Vec2, radius: f32) -> bool {
        blocked_by_world_bounds(&self.world, pos, radius)
    }

    /// Vehicles stop at obstacles and world edges
    pub fn vehicle_blocked(&self, pos: Vec2, radius: f32) -> bool {
        self.blocked_by_obstacle(pos, radius) || self.blocked_by_world_bounds(pos, radius)
    }

    /// Enemy `slot` may not leave the world, enter obstacles or overlap
    /// another enemy
    pub fn enemy_move_blocked(&self, slot: usize, pos: Vec2) -> bool {
        let Some(enemy) = self.enemies.get(slot) else {
            return true;
        };
        self.blocked_by_world_bounds(pos, enemy.radius)
            || self.blocked_by_obstacle(pos, enemy.radius)
            || self.blocked_by_enemy(pos, enemy.radius, Some(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, y),
            radius: ENEMY_RADIUS,
            hp: ENEMY_MAX_HP,
            speed: 2.0,
            flank: false,
            flank_direction: 1.0,
        }
    }

    #[test]
    fn test_blocked_by_obstacle() {
        let obstacles = vec![Obstacle::new(Vec2::new(100.0, 100.0), 40.0)];
        assert!(blocked_by_obstacle(&obstacles, Vec2::new(90.0, 120.0), 20.0));
        assert!(!blocked_by_obstacle(&obstacles, Vec2::new(70.0, 120.0), 20.0));
        assert!(!blocked_by_obstacle(&[], Vec2::new(120.0, 120.0), 20.0));
    }

    #[test]
    fn test_blocked_by_enemy_excludes_self() {
        let enemies = vec![enemy_at(100.0, 100.0), enemy_at(300.0, 100.0)];

        // Slot 0 testing its own position is not blocked by itself
        assert!(!blocked_by_enemy(&enemies, Vec2::new(100.0, 100.0), ENEMY_RADIUS, Some(0)));
        // ...but is blocked when moving next to slot 1
        assert!(blocked_by_enemy(&enemies, Vec2::new(270.0, 100.0), ENEMY_RADIUS, Some(0)));
        // No exclusion: everyone counts
        assert!(blocked_by_enemy(&enemies, Vec2::new(110.0, 100.0), ENEMY_RADIUS, None));
    }

    #[test]
    fn test_blocked_by_world_bounds() {
        let world = World::new(500.0, 400.0);
        assert!(blocked_by_world_bounds(&world, Vec2::new(10.0, 200.0), 20.0));
        assert!(blocked_by_world_bounds(&world, Vec2::new(250.0, 390.0), 20.0));
        assert!(!blocked_by_world_bounds(&world, Vec2::new(250.0, 200.0), 20.0));
    }
}
