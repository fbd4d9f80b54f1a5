//! Drift Siege headless runner
//!
//! Runs the simulation without a renderer: a scripted player walks to the
//! nearest car, drives toward the enemies and shoots at whatever is closest.
//! Useful for soak-testing the simulation and for reproducing a seed.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use drift_siege::GameConfig;
    use drift_siege::sim::{Controls, GameEvent, GameState, TickInput, tick};
    use glam::Vec2;

    /// One rendered frame at 60 Hz
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Fire every this many ticks
    const FIRE_INTERVAL: u64 = 20;

    #[derive(Parser)]
    #[command(name = "drift-siege")]
    #[command(about = "Run the Drift Siege simulation headless with a scripted player")]
    struct Args {
        /// RNG seed for the world layout and enemy behavior
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of ticks to simulate (stops early on game over)
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// Path to a JSON game config
        #[arg(long)]
        config: Option<PathBuf>,
    }

    /// Hold the keys that walk or steer toward `target`
    fn steer_toward(state: &GameState, target: Vec2) -> Controls {
        match state.player_vehicle() {
            Some(vehicle) => {
                let to_target = target - vehicle.pos;
                let side = vehicle.forward().perp_dot(to_target);
                Controls {
                    forward: true,
                    back: false,
                    left: side < 0.0,
                    right: side > 0.0,
                }
            }
            None => {
                let delta = target - state.player.pos;
                Controls {
                    forward: delta.y < -1.0,
                    back: delta.y > 1.0,
                    left: delta.x < -1.0,
                    right: delta.x > 1.0,
                }
            }
        }
    }

    fn nearest_enemy(state: &GameState) -> Option<Vec2> {
        let focus = state.focus_position();
        state
            .enemies
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| a.distance_squared(focus).total_cmp(&b.distance_squared(focus)))
    }

    /// Scripted input for the current state
    fn autopilot(state: &GameState) -> TickInput {
        let mut input = TickInput::default();

        if !state.in_vehicle() {
            let nearest_car = state
                .vehicles
                .iter()
                .map(|v| v.pos)
                .min_by(|a, b| {
                    a.distance_squared(state.player.pos)
                        .total_cmp(&b.distance_squared(state.player.pos))
                });
            if let Some(car) = nearest_car {
                input.controls = steer_toward(state, car);
                input.toggle_vehicle =
                    car.distance(state.player.pos) < drift_siege::consts::VEHICLE_ENTER_RANGE;
            }
        } else if let Some(enemy) = nearest_enemy(state) {
            input.controls = steer_toward(state, enemy);
        }

        if state.time_ticks % FIRE_INTERVAL == 0 {
            // Screen-space target, same as a mouse click would deliver
            input.fire = nearest_enemy(state).map(|enemy| enemy - state.camera.pos);
        }
        input
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => GameConfig::load(path),
            None => GameConfig::default(),
        };

        log::info!("Drift Siege (headless) starting, seed {}", args.seed);
        let mut state = GameState::new(config, args.seed);

        let mut shots = 0u32;
        let mut enemy_hits = 0u32;
        let mut respawns = 0u32;
        let mut player_hits = 0u32;

        for _ in 0..args.ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::ProjectileFired => shots += 1,
                    GameEvent::EnemyDamaged { .. } => enemy_hits += 1,
                    GameEvent::EnemyRespawned { .. } => respawns += 1,
                    GameEvent::PlayerHit { health } => {
                        player_hits += 1;
                        log::info!("Player hit at tick {}, health {}", state.time_ticks, health);
                    }
                    GameEvent::VehicleEntered { vehicle } => {
                        log::info!("Entered vehicle {} at tick {}", vehicle, state.time_ticks)
                    }
                    GameEvent::VehicleExited { .. } | GameEvent::GameOver => {}
                }
            }

            if state.is_game_over() {
                break;
            }
        }

        log::info!(
            "Finished after {} ticks: shots={}, enemy hits={}, kills={}, player hits={}, health={}{}",
            state.time_ticks,
            shots,
            enemy_hits,
            respawns,
            player_hits,
            state.player.health,
            if state.is_game_over() { " (game over)" } else { "" }
        );
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is drift_siege::web::start, this is just to satisfy the compiler
}
