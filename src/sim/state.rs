//! Game state and core simulation types
//!
//! `GameState` is the single context object every subsystem works on. Entity
//! pools are plain data; behavior lives in the sibling modules.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, World, circle_aabb_overlap};
use crate::config::{GameConfig, VehicleTuning};
use crate::consts::*;
use crate::heading_vector;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player health ran out; nothing advances until reset
    GameOver,
}

/// Static square obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// A drivable car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Heading (radians)
    pub angle: f32,
    pub vel: Vec2,
    pub max_speed: f32,
    pub turn_speed: f32,
    pub forward_accel: f32,
    pub backward_accel: f32,
    pub forward_friction: f32,
    pub drift_friction: f32,
    /// Bounding circle radius (half the diagonal)
    pub radius: f32,
    /// Front wheel angle relative to the body, for rendering
    pub steer: f32,
}

impl Vehicle {
    pub fn new(pos: Vec2, tuning: &VehicleTuning) -> Self {
        Self {
            pos,
            width: tuning.width,
            height: tuning.height,
            angle: 0.0,
            vel: Vec2::ZERO,
            max_speed: tuning.max_speed,
            turn_speed: tuning.turn_speed,
            forward_accel: tuning.forward_accel,
            backward_accel: tuning.backward_accel,
            forward_friction: tuning.forward_friction,
            drift_friction: tuning.drift_friction,
            radius: (tuning.width / 2.0).hypot(tuning.height / 2.0),
            steer: 0.0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Unit vector along the heading
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.angle)
    }

    /// Center of the front bumper
    pub fn front(&self) -> Vec2 {
        self.pos + self.forward() * (self.width * 0.5)
    }
}

/// The on-foot player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: u8,
    pub invincible: bool,
    /// Remaining invincibility (ms)
    pub invincible_timer: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            invincible: false,
            invincible_timer: 0.0,
        }
    }

    /// Start the post-hit invincibility window
    pub fn grant_invincibility(&mut self) {
        self.invincible = true;
        self.invincible_timer = INVINCIBILITY_MS;
    }

    /// Count the invincibility window down by `elapsed_ms`
    pub fn tick_invincibility(&mut self, elapsed_ms: f32) {
        if self.invincible {
            self.invincible_timer -= elapsed_ms;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }
    }
}

/// A chasing enemy. Slots are reused on death, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    /// Approach from the side instead of head-on
    pub flank: bool,
    /// Which side to flank on (+1 or -1)
    pub flank_direction: f32,
}

impl Enemy {
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub radius: f32,
    /// Displacement per tick
    pub vel: Vec2,
}

/// Viewport into the world, top-left corner + size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Center on `focus` without showing anything outside the world
    pub fn follow(&mut self, focus: Vec2, world: &World) {
        self.pos.x = (focus.x - self.width / 2.0)
            .min(world.width - self.width)
            .max(0.0);
        self.pos.y = (focus.y - self.height / 2.0)
            .min(world.height - self.height)
            .max(0.0);
    }

    /// Screen coordinate to world coordinate
    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }
}

/// Notifications for the presentation layer, cleared every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    VehicleEntered { vehicle: usize },
    VehicleExited { vehicle: usize },
    ProjectileFired,
    EnemyDamaged { enemy: usize, amount: f32 },
    EnemyRespawned { enemy: usize },
    PlayerHit { health: u8 },
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    /// Seed the run was started with
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Slot of the vehicle the player is driving, if any
    pub occupied_vehicle: Option<usize>,
    pub obstacles: Vec<Obstacle>,
    pub vehicles: Vec<Vehicle>,
    /// Fixed-size pool, indexed by slot
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub camera: Camera,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let world = World::new(config.world_width, config.world_height);
        let mut state = Self {
            world,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(world.center()),
            occupied_vehicle: None,
            obstacles: Vec::new(),
            vehicles: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            events: Vec::new(),
            config,
        };

        state.generate_obstacles();
        state.populate();
        log::info!(
            "New game: seed={}, world={}x{}, {} obstacles",
            seed,
            world.width,
            world.height,
            state.obstacles.len()
        );
        state
    }

    /// Back to the canonical starting state. Obstacles persist.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.player = Player::new(self.world.center());
        self.occupied_vehicle = None;
        self.projectiles.clear();
        self.events.clear();
        self.populate();
        log::info!("Game reset");
    }

    /// Place player-relative entities: enemies, vehicles, camera
    fn populate(&mut self) {
        self.enemies.clear();
        for slot in 0..self.config.enemy_count {
            let pos = self.find_enemy_spawn(slot);
            let enemy = Enemy {
                pos,
                radius: ENEMY_RADIUS,
                hp: ENEMY_MAX_HP,
                speed: random_between(&mut self.rng, ENEMY_MIN_SPEED, ENEMY_MAX_SPEED),
                flank: self.rng.random_bool(0.5),
                flank_direction: self.random_side(),
            };
            self.enemies.push(enemy);
        }

        self.vehicles.clear();
        let tuning = self.config.vehicle;
        for _ in 0..self.config.vehicle_count {
            let pos = self.find_vehicle_spawn(&tuning);
            self.vehicles.push(Vehicle::new(pos, &tuning));
        }

        let focus = self.focus_position();
        self.camera.follow(focus, &self.world);
    }

    fn generate_obstacles(&mut self) {
        let start = self.player.pos;
        let (min_size, max_size) = (self.config.obstacle_min_size, self.config.obstacle_max_size);
        self.obstacles.clear();
        for _ in 0..self.config.obstacle_count {
            let mut obstacle = Obstacle::new(Vec2::ZERO, min_size);
            let mut covers_start = true;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let pos = Vec2::new(
                    random_between(&mut self.rng, 0.0, self.world.width),
                    random_between(&mut self.rng, 0.0, self.world.height),
                );
                obstacle = Obstacle::new(pos, random_between(&mut self.rng, min_size, max_size));
                // Keep the player's start position walkable
                covers_start = circle_aabb_overlap(start, PLAYER_RADIUS, &obstacle.aabb());
                if !covers_start {
                    break;
                }
            }
            if covers_start {
                log::warn!("Obstacle placement: {:?} covers the player start", obstacle);
            }
            self.obstacles.push(obstacle);
        }
    }

    /// Random position for a disc of `radius` fully inside the world
    fn random_disc_position(&mut self, radius: f32) -> Vec2 {
        Vec2::new(
            random_between(&mut self.rng, radius, self.world.width - radius),
            random_between(&mut self.rng, radius, self.world.height - radius),
        )
    }

    fn random_side(&mut self) -> f32 {
        if self.rng.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    /// Find a free spot for enemy `slot`
    ///
    /// First round also keeps the spot away from the player. If that round
    /// runs out of attempts, the distance rule is dropped; if the second round
    /// also fails, the last candidate is used as-is.
    fn find_enemy_spawn(&mut self, slot: usize) -> Vec2 {
        let radius = ENEMY_RADIUS;
        let player_pos = self.focus_position();
        let min_gap = self.player.radius + radius + ENEMY_SPAWN_CLEARANCE;
        let mut candidate = self.world.center();

        for keep_distance in [true, false] {
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                candidate = self.random_disc_position(radius);
                let clear = !self.blocked_by_obstacle(candidate, radius)
                    && !self.blocked_by_enemy(candidate, radius, Some(slot));
                let far = !keep_distance || candidate.distance(player_pos) >= min_gap;
                if clear && far {
                    return candidate;
                }
            }
            if keep_distance {
                log::debug!("Enemy {} spawn: relaxing player distance", slot);
            }
        }

        log::warn!("Enemy {} spawn: no free position found, using {:?}", slot, candidate);
        candidate
    }

    fn find_vehicle_spawn(&mut self, tuning: &VehicleTuning) -> Vec2 {
        let radius = (tuning.width / 2.0).hypot(tuning.height / 2.0);
        let mut candidate = self.world.center();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = self.random_disc_position(radius);
            if !self.vehicle_blocked(candidate, radius) {
                return candidate;
            }
        }
        log::warn!("Vehicle spawn: no free position found, using {:?}", candidate);
        candidate
    }

    /// Reinitialize a defeated enemy in place (same slot)
    pub fn respawn_enemy(&mut self, slot: usize) {
        if slot >= self.enemies.len() {
            return;
        }
        let pos = self.find_enemy_spawn(slot);
        let flank = self.rng.random_bool(0.5);
        let flank_direction = self.random_side();

        let enemy = &mut self.enemies[slot];
        enemy.pos = pos;
        enemy.hp = ENEMY_MAX_HP;
        enemy.flank = flank;
        enemy.flank_direction = flank_direction;

        log::debug!("Enemy {} respawned at ({:.0}, {:.0})", slot, pos.x, pos.y);
        self.events.push(GameEvent::EnemyRespawned { enemy: slot });
    }

    /// Subtract hp from an enemy, respawning it when defeated
    pub fn damage_enemy(&mut self, slot: usize, amount: f32) {
        let Some(enemy) = self.enemies.get_mut(slot) else {
            return;
        };
        enemy.hp -= amount;
        let dead = enemy.is_dead();
        self.events.push(GameEvent::EnemyDamaged { enemy: slot, amount });
        if dead {
            self.respawn_enemy(slot);
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn in_vehicle(&self) -> bool {
        self.occupied_vehicle.is_some()
    }

    /// The vehicle the player is driving
    pub fn player_vehicle(&self) -> Option<&Vehicle> {
        self.occupied_vehicle.and_then(|i| self.vehicles.get(i))
    }

    /// Where the player currently is: the driven vehicle, or on foot
    pub fn focus_position(&self) -> Vec2 {
        self.player_vehicle().map_or(self.player.pos, |v| v.pos)
    }

    /// Take this tick's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// JSON snapshot for the presentation layer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Uniform sample in `[lo, hi)`; degenerate ranges return `lo`
pub(crate) fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::circles_overlap;

    /// Config for a world too cramped to keep enemies away from the player
    fn cramped_config(enemy_count: usize) -> GameConfig {
        GameConfig {
            world_width: 120.0,
            world_height: 120.0,
            obstacle_count: 0,
            vehicle_count: 1,
            enemy_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_game_pools() {
        let state = GameState::new(GameConfig::default(), 12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles.len(), OBSTACLE_COUNT);
        assert_eq!(state.vehicles.len(), VEHICLE_COUNT);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.player.pos, state.world.center());
        assert!(state.occupied_vehicle.is_none());
    }

    #[test]
    fn test_spawned_enemies_are_valid() {
        let state = GameState::new(GameConfig::default(), 777);
        let min_gap = PLAYER_RADIUS + ENEMY_RADIUS + ENEMY_SPAWN_CLEARANCE;
        for (slot, enemy) in state.enemies.iter().enumerate() {
            assert_eq!(enemy.hp, ENEMY_MAX_HP);
            assert!(enemy.speed >= ENEMY_MIN_SPEED && enemy.speed < ENEMY_MAX_SPEED);
            assert!(enemy.flank_direction == 1.0 || enemy.flank_direction == -1.0);
            assert!(!state.world.disc_outside(enemy.pos, enemy.radius));
            assert!(!state.blocked_by_obstacle(enemy.pos, enemy.radius));
            assert!(!state.blocked_by_enemy(enemy.pos, enemy.radius, Some(slot)));
            assert!(enemy.pos.distance(state.player.pos) >= min_gap);
        }
    }

    #[test]
    fn test_vehicles_spawn_clear() {
        let state = GameState::new(GameConfig::default(), 4242);
        for vehicle in &state.vehicles {
            assert!(!state.vehicle_blocked(vehicle.pos, vehicle.radius));
            assert_eq!(vehicle.vel, Vec2::ZERO);
            assert!((vehicle.radius - 30.0_f32.hypot(15.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_player_start_is_walkable() {
        let state = GameState::new(GameConfig::default(), 99);
        for obstacle in &state.obstacles {
            assert!(!circle_aabb_overlap(state.player.pos, PLAYER_RADIUS, &obstacle.aabb()));
        }
    }

    #[test]
    fn test_spawn_relaxes_player_distance_in_cramped_world() {
        // Every in-world spot is closer than the required gap
        let state = GameState::new(cramped_config(3), 21);
        let min_gap = PLAYER_RADIUS + ENEMY_RADIUS + ENEMY_SPAWN_CLEARANCE;

        assert_eq!(state.enemies.len(), 3);
        for (slot, enemy) in state.enemies.iter().enumerate() {
            assert!(!state.world.disc_outside(enemy.pos, enemy.radius));
            assert!(enemy.pos.distance(state.player.pos) < min_gap);
            for other in &state.enemies[slot + 1..] {
                assert!(!circles_overlap(enemy.pos, enemy.radius, other.pos, other.radius));
            }
        }
    }

    #[test]
    fn test_spawn_falls_back_when_pool_cannot_fit() {
        // Ten enemies cannot fit without overlapping; placement still terminates
        let state = GameState::new(cramped_config(10), 22);
        assert_eq!(state.enemies.len(), 10);
        for enemy in &state.enemies {
            assert!(!state.world.disc_outside(enemy.pos, enemy.radius));
        }
    }

    #[test]
    fn test_vehicle_spawn_falls_back_when_nothing_fits() {
        // Vehicle bounding circle is wider than the world
        let config = GameConfig {
            world_width: 50.0,
            world_height: 50.0,
            obstacle_count: 0,
            vehicle_count: 2,
            enemy_count: 0,
            ..Default::default()
        };
        let state = GameState::new(config, 23);
        assert_eq!(state.vehicles.len(), 2);
        for vehicle in &state.vehicles {
            assert!(vehicle.pos.is_finite());
        }
    }

    #[test]
    fn test_obstacle_placement_gives_up_on_tiny_world() {
        // Obstacles bigger than the world mostly cover the start; placement
        // still keeps the requested count
        let config = GameConfig {
            world_width: 40.0,
            world_height: 40.0,
            obstacle_count: 5,
            obstacle_min_size: 50.0,
            obstacle_max_size: 60.0,
            vehicle_count: 0,
            enemy_count: 0,
            ..Default::default()
        };
        let state = GameState::new(config, 24);
        assert_eq!(state.obstacles.len(), 5);
        for obstacle in &state.obstacles {
            assert!(obstacle.size >= 50.0 && obstacle.size < 60.0);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(GameConfig::default(), 31337);
        let b = GameState::new(GameConfig::default(), 31337);
        assert_eq!(a.obstacles, b.obstacles);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.speed, eb.speed);
        }
    }

    #[test]
    fn test_reset_is_canonical() {
        let mut state = GameState::new(GameConfig::default(), 5);
        let obstacles = state.obstacles.clone();

        state.player.health = 1;
        state.player.grant_invincibility();
        state.projectiles.push(Projectile {
            pos: Vec2::new(10.0, 10.0),
            radius: PROJECTILE_RADIUS,
            vel: Vec2::X,
        });
        state.phase = GamePhase::GameOver;
        state.occupied_vehicle = Some(0);

        for _ in 0..2 {
            state.reset();
            assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
            assert!(!state.player.invincible);
            assert_eq!(state.player.invincible_timer, 0.0);
            assert!(state.projectiles.is_empty());
            assert!(!state.is_game_over());
            assert!(state.occupied_vehicle.is_none());
            assert_eq!(state.enemies.len(), ENEMY_COUNT);
            assert_eq!(state.vehicles.len(), VEHICLE_COUNT);
            assert_eq!(state.obstacles, obstacles);
        }
    }

    #[test]
    fn test_respawn_keeps_slot_and_speed() {
        let mut state = GameState::new(GameConfig::default(), 8);
        let speed = state.enemies[1].speed;
        state.enemies[1].hp = -10.0;
        state.respawn_enemy(1);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert_eq!(state.enemies[1].hp, ENEMY_MAX_HP);
        assert_eq!(state.enemies[1].speed, speed);
        assert!(state.events.contains(&GameEvent::EnemyRespawned { enemy: 1 }));
    }

    #[test]
    fn test_invincibility_countdown() {
        let mut player = Player::new(Vec2::ZERO);
        player.grant_invincibility();
        player.tick_invincibility(2999.0);
        assert!(player.invincible);
        player.tick_invincibility(1.0);
        assert!(!player.invincible);
        assert_eq!(player.invincible_timer, 0.0);
    }

    #[test]
    fn test_camera_follow_clamps() {
        let world = World::new(2000.0, 1000.0);
        let mut camera = Camera::new(800.0, 600.0);

        camera.follow(Vec2::new(1000.0, 500.0), &world);
        assert_eq!(camera.pos, Vec2::new(600.0, 200.0));

        camera.follow(Vec2::new(10.0, 10.0), &world);
        assert_eq!(camera.pos, Vec2::ZERO);

        camera.follow(Vec2::new(1990.0, 990.0), &world);
        assert_eq!(camera.pos, Vec2::new(1200.0, 400.0));

        // Viewport larger than the world pins to the origin
        let small = World::new(400.0, 300.0);
        camera.follow(Vec2::new(200.0, 150.0), &small);
        assert_eq!(camera.pos, Vec2::ZERO);
    }

    #[test]
    fn test_snapshot_json() {
        let state = GameState::new(GameConfig::default(), 1);
        let json = state.to_json().expect("serialize");
        assert!(json.contains("\"enemies\""));
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
