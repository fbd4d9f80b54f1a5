//! Browser binding
//!
//! The page owns the canvas, the key state and the animation frame loop; it
//! calls into [`WebGame`] once per frame and draws from the JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::sim::{Controls, GameState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
    log::info!("Drift Siege starting...");
}

/// Game instance held by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    /// One-shot inputs queued between frames
    pending: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// New game with default config, seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Self::with_state(GameState::new(GameConfig::default(), seed))
    }

    /// New game from a JSON config and an explicit seed
    pub fn with_config(config_json: &str, seed: u64) -> Result<WebGame, JsValue> {
        let config =
            GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_state(GameState::new(config, seed)))
    }

    /// Advance one frame with the currently held keys
    pub fn tick(&mut self, elapsed_ms: f32, forward: bool, back: bool, left: bool, right: bool) {
        let mut input = std::mem::take(&mut self.pending);
        input.controls = Controls {
            forward,
            back,
            left,
            right,
        };
        tick(&mut self.state, &input, elapsed_ms);
    }

    /// Queue an enter/exit for the next frame
    pub fn toggle_vehicle(&mut self) {
        self.pending.toggle_vehicle = true;
    }

    /// Queue a shot at a canvas point for the next frame
    pub fn fire(&mut self, x: f32, y: f32) {
        self.pending.fire = Some(Vec2::new(x, y));
    }

    pub fn reset(&mut self) {
        self.pending = TickInput::default();
        self.state.reset();
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn health(&self) -> u8 {
        self.state.player.health
    }

    /// Full state (entities, camera, this frame's events) as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.state
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebGame {
    fn with_state(state: GameState) -> WebGame {
        WebGame {
            state,
            pending: TickInput::default(),
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
