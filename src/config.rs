//! Game configuration
//!
//! World layout, pool sizes and vehicle handling. Loaded from JSON when a
//! path is given, otherwise the built-in defaults from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Handling parameters shared by every vehicle in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub width: f32,
    pub height: f32,
    pub max_speed: f32,
    /// Radians per tick
    pub turn_speed: f32,
    pub forward_accel: f32,
    pub backward_accel: f32,
    /// Multiplier applied to the velocity component along the heading
    pub forward_friction: f32,
    /// Multiplier applied to the sideways velocity component
    pub drift_friction: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            width: VEHICLE_WIDTH,
            height: VEHICLE_HEIGHT,
            max_speed: VEHICLE_MAX_SPEED,
            turn_speed: VEHICLE_TURN_SPEED,
            forward_accel: VEHICLE_FORWARD_ACCEL,
            backward_accel: VEHICLE_BACKWARD_ACCEL,
            forward_friction: VEHICLE_FORWARD_FRICTION,
            drift_friction: VEHICLE_DRIFT_FRICTION,
        }
    }
}

impl VehicleTuning {
    /// Replace non-positive or non-finite values with defaults and keep the
    /// friction multipliers in `[0, 1]`
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            (&mut self.width, defaults.width),
            (&mut self.height, defaults.height),
            (&mut self.max_speed, defaults.max_speed),
            (&mut self.turn_speed, defaults.turn_speed),
            (&mut self.forward_accel, defaults.forward_accel),
            (&mut self.backward_accel, defaults.backward_accel),
        ];
        for (value, default) in fields {
            if !positive(*value) {
                log::warn!("Invalid vehicle tuning value {}, using {}", value, default);
                *value = default;
            }
        }
        for (value, default) in [
            (&mut self.forward_friction, defaults.forward_friction),
            (&mut self.drift_friction, defaults.drift_friction),
        ] {
            *value = if value.is_finite() { (*value).clamp(0.0, 1.0) } else { default };
        }
        self
    }
}

/// Finite and strictly greater than zero
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Camera viewport size (what the renderer shows)
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Pools ===
    pub obstacle_count: usize,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub vehicle_count: usize,
    pub enemy_count: usize,

    // === Handling ===
    pub vehicle: VehicleTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            obstacle_count: OBSTACLE_COUNT,
            obstacle_min_size: OBSTACLE_MIN_SIZE,
            obstacle_max_size: OBSTACLE_MAX_SIZE,
            vehicle_count: VEHICLE_COUNT,
            enemy_count: ENEMY_COUNT,

            vehicle: VehicleTuning::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load config from a JSON file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Invalid config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read config {}: {}", path.display(), e),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Repair values the simulation cannot work with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(positive(self.world_width) && positive(self.world_height)) {
            log::warn!("World size must be positive, using defaults");
            self.world_width = defaults.world_width;
            self.world_height = defaults.world_height;
        }
        if !(positive(self.viewport_width) && positive(self.viewport_height)) {
            self.viewport_width = defaults.viewport_width;
            self.viewport_height = defaults.viewport_height;
        }
        if !(self.obstacle_min_size.is_finite() && self.obstacle_max_size.is_finite()) {
            log::warn!("Obstacle sizes must be finite, using defaults");
            self.obstacle_min_size = defaults.obstacle_min_size;
            self.obstacle_max_size = defaults.obstacle_max_size;
        }
        if self.obstacle_min_size > self.obstacle_max_size {
            std::mem::swap(&mut self.obstacle_min_size, &mut self.obstacle_max_size);
        }
        self.obstacle_min_size = self.obstacle_min_size.max(1.0);
        self.obstacle_max_size = self.obstacle_max_size.max(self.obstacle_min_size);
        self.vehicle = self.vehicle.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let config = GameConfig::default();
        assert_eq!(config.enemy_count, 3);
        assert_eq!(config.vehicle_count, 3);
        assert_eq!(config.obstacle_count, 50);
        assert_eq!(config.vehicle.max_speed, 7.0);
        assert_eq!(config.vehicle.drift_friction, 0.9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "world_width": 800, "enemy_count": 5 }"#)
            .expect("valid json");
        assert_eq!(config.world_width, 800.0);
        assert_eq!(config.enemy_count, 5);
        assert_eq!(config.world_height, WORLD_HEIGHT);
        assert_eq!(config.vehicle, VehicleTuning::default());
    }

    #[test]
    fn test_nested_vehicle_tuning() {
        let config = GameConfig::from_json(r#"{ "vehicle": { "max_speed": 9.5 } }"#)
            .expect("valid json");
        assert_eq!(config.vehicle.max_speed, 9.5);
        assert_eq!(config.vehicle.turn_speed, VEHICLE_TURN_SPEED);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(GameConfig::from_json("{ world_width: }").is_err());
    }

    #[test]
    fn test_sanitized_repairs_values() {
        let config = GameConfig {
            world_width: -5.0,
            obstacle_min_size: 80.0,
            obstacle_max_size: 20.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.world_width, WORLD_WIDTH);
        assert_eq!(config.obstacle_min_size, 20.0);
        assert_eq!(config.obstacle_max_size, 80.0);
    }

    #[test]
    fn test_sanitized_rejects_non_finite() {
        // 1e39 overflows f32 and parses as infinity
        let config = GameConfig::from_json(
            r#"{ "world_width": 1e39, "viewport_height": 1e39, "obstacle_max_size": 1e39 }"#,
        )
        .expect("valid json");
        assert_eq!(config.world_width, WORLD_WIDTH);
        assert_eq!(config.world_height, WORLD_HEIGHT);
        assert_eq!(config.viewport_height, VIEWPORT_HEIGHT);
        assert_eq!(config.obstacle_min_size, OBSTACLE_MIN_SIZE);
        assert_eq!(config.obstacle_max_size, OBSTACLE_MAX_SIZE);
    }

    #[test]
    fn test_sanitized_repairs_vehicle_tuning() {
        let config = GameConfig::from_json(
            r#"{ "vehicle": { "max_speed": -3, "width": 1e39, "turn_speed": 0.08,
                 "drift_friction": 1.5, "forward_friction": -0.2 } }"#,
        )
        .expect("valid json");
        assert_eq!(config.vehicle.max_speed, VEHICLE_MAX_SPEED);
        assert_eq!(config.vehicle.width, VEHICLE_WIDTH);
        assert_eq!(config.vehicle.turn_speed, 0.08);
        assert_eq!(config.vehicle.drift_friction, 1.0);
        assert_eq!(config.vehicle.forward_friction, 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = config.to_json().expect("serialize");
        assert_eq!(GameConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = GameConfig::load("/nonexistent/drift-siege.json");
        assert_eq!(config, GameConfig::default());
    }
}
