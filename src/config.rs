//! Runtime flight configuration loaded from `assets/lander.toml`.
//!
//! [`LanderConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`] plus the level layout.  At startup,
//! [`load_lander_config`] reads `assets/lander.toml` and replaces the defaults
//! with the parsed file.  Missing keys fall back to the compile-time defaults,
//! so a minimal TOML can override just the values you care about.
//!
//! Unlike the tuning values, a landing pad's `score_multiplier` has no default:
//! a pad entry without one is a parse error, reported once at load time.

use crate::constants::*;
use crate::error::{
    validate_finite, validate_non_negative, validate_pad_multiplier, validate_positive,
    validate_unit_interval, LanderError, LanderResult,
};
use crate::lander::{BurstRecharge, FlightTuning, LandingRules};
use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "assets/lander.toml";

/// A landing pad placed in the level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PadConfig {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_pad_half_width")]
    pub half_width: f32,
    /// Multiplies the landing score.  Required.
    pub score_multiplier: f32,
}

fn default_pad_half_width() -> f32 {
    1.5
}

/// A fuel pickup or coin position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PickupConfig {
    pub x: f32,
    pub y: f32,
}

/// A static terrain block; touching one is a crash.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TerrainConfig {
    pub x: f32,
    pub y: f32,
    pub half_width: f32,
    pub half_height: f32,
}

/// Runtime-tunable flight, landing and level configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    // ── Fuel ─────────────────────────────────────────────────────────────────
    pub fuel_max: f32,
    pub fuel_consumption_per_second: f32,
    pub fuel_pickup_amount: f32,

    // ── Thrust ───────────────────────────────────────────────────────────────
    pub up_force: f32,
    pub turn_torque: f32,
    pub gravity_normal: f32,

    // ── Burst ────────────────────────────────────────────────────────────────
    pub burst_force: f32,
    pub burst_fuel_cost: f32,
    pub burst_cooldown: f32,
    pub burst_recharge: BurstRecharge,
    pub burst_flame_duration: f32,
    pub burst_flame_shake_degrees: f32,

    // ── Landing ──────────────────────────────────────────────────────────────
    pub soft_landing_speed: f32,
    pub min_landing_dot: f32,
    pub max_angle_score: f32,
    pub angle_score_dot_multiplier: f32,
    pub speed_score_per_unit: f32,

    // ── Session ──────────────────────────────────────────────────────────────
    pub coin_score: i32,

    // ── Lander Body ──────────────────────────────────────────────────────────
    pub lander_half_width: f32,
    pub lander_half_height: f32,
    pub lander_linear_damping: f32,
    pub lander_angular_damping: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub pickup_radius: f32,
    pub camera_scale: f32,

    // ── Level Layout ─────────────────────────────────────────────────────────
    pub pads: Vec<PadConfig>,
    pub terrain: Vec<TerrainConfig>,
    pub fuel_pickups: Vec<PickupConfig>,
    pub coins: Vec<PickupConfig>,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            // Fuel
            fuel_max: FUEL_MAX,
            fuel_consumption_per_second: FUEL_CONSUMPTION_PER_SECOND,
            fuel_pickup_amount: FUEL_PICKUP_AMOUNT,
            // Thrust
            up_force: UP_FORCE,
            turn_torque: TURN_TORQUE,
            gravity_normal: GRAVITY_NORMAL,
            // Burst
            burst_force: BURST_FORCE,
            burst_fuel_cost: BURST_FUEL_COST,
            burst_cooldown: BURST_COOLDOWN,
            burst_recharge: BurstRecharge::default(),
            burst_flame_duration: BURST_FLAME_DURATION,
            burst_flame_shake_degrees: BURST_FLAME_SHAKE_DEGREES,
            // Landing
            soft_landing_speed: SOFT_LANDING_SPEED,
            min_landing_dot: MIN_LANDING_DOT,
            max_angle_score: MAX_ANGLE_SCORE,
            angle_score_dot_multiplier: ANGLE_SCORE_DOT_MULTIPLIER,
            speed_score_per_unit: SPEED_SCORE_PER_UNIT,
            // Session
            coin_score: COIN_SCORE,
            // Lander Body
            lander_half_width: LANDER_HALF_WIDTH,
            lander_half_height: LANDER_HALF_HEIGHT,
            lander_linear_damping: LANDER_LINEAR_DAMPING,
            lander_angular_damping: LANDER_ANGULAR_DAMPING,
            spawn_x: LANDER_SPAWN_X,
            spawn_y: LANDER_SPAWN_Y,
            pickup_radius: PICKUP_RADIUS,
            camera_scale: CAMERA_SCALE,
            // Level Layout: one pad on a flat floor, one of each pickup.
            pads: vec![PadConfig {
                x: 8.0,
                y: 0.75,
                half_width: default_pad_half_width(),
                score_multiplier: 2.0,
            }],
            terrain: vec![TerrainConfig {
                x: 0.0,
                y: 0.0,
                half_width: 40.0,
                half_height: 0.5,
            }],
            fuel_pickups: vec![PickupConfig { x: -6.0, y: 12.0 }],
            coins: vec![PickupConfig { x: 4.0, y: 14.0 }],
        }
    }
}

impl LanderConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> LanderResult<Self> {
        let config: LanderConfig =
            toml::from_str(contents).map_err(|e| LanderError::ConfigParse {
                path: CONFIG_PATH.to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the flight model would otherwise have to clamp or
    /// misinterpret during play.
    pub fn validate(&self) -> LanderResult<()> {
        validate_positive("fuel_max", self.fuel_max)?;
        validate_non_negative("fuel_consumption_per_second", self.fuel_consumption_per_second)?;
        validate_non_negative("fuel_pickup_amount", self.fuel_pickup_amount)?;
        validate_non_negative("up_force", self.up_force)?;
        validate_non_negative("turn_torque", self.turn_torque)?;
        validate_non_negative("gravity_normal", self.gravity_normal)?;
        validate_non_negative("burst_force", self.burst_force)?;
        validate_non_negative("burst_fuel_cost", self.burst_fuel_cost)?;
        validate_positive("burst_cooldown", self.burst_cooldown)?;
        validate_positive("burst_flame_duration", self.burst_flame_duration)?;
        validate_non_negative("burst_flame_shake_degrees", self.burst_flame_shake_degrees)?;
        validate_positive("soft_landing_speed", self.soft_landing_speed)?;
        validate_unit_interval("min_landing_dot", self.min_landing_dot)?;
        validate_non_negative("max_angle_score", self.max_angle_score)?;
        validate_non_negative("angle_score_dot_multiplier", self.angle_score_dot_multiplier)?;
        validate_non_negative("speed_score_per_unit", self.speed_score_per_unit)?;
        validate_positive("lander_half_width", self.lander_half_width)?;
        validate_positive("lander_half_height", self.lander_half_height)?;
        validate_non_negative("lander_linear_damping", self.lander_linear_damping)?;
        validate_non_negative("lander_angular_damping", self.lander_angular_damping)?;
        validate_finite("spawn_x", self.spawn_x)?;
        validate_finite("spawn_y", self.spawn_y)?;
        validate_positive("pickup_radius", self.pickup_radius)?;
        validate_positive("camera_scale", self.camera_scale)?;
        for (index, pad) in self.pads.iter().enumerate() {
            validate_pad_multiplier(index, pad.score_multiplier)?;
            validate_finite("pads.x", pad.x)?;
            validate_finite("pads.y", pad.y)?;
            validate_positive("pads.half_width", pad.half_width)?;
        }
        for block in &self.terrain {
            validate_finite("terrain.x", block.x)?;
            validate_finite("terrain.y", block.y)?;
            validate_positive("terrain.half_width", block.half_width)?;
            validate_positive("terrain.half_height", block.half_height)?;
        }
        for pickup in self.fuel_pickups.iter().chain(&self.coins) {
            validate_finite("pickup.x", pickup.x)?;
            validate_finite("pickup.y", pickup.y)?;
        }
        Ok(())
    }

    /// Force, torque and fuel costs consumed by the flight controller.
    pub fn flight_tuning(&self) -> FlightTuning {
        FlightTuning {
            up_force: self.up_force,
            turn_torque: self.turn_torque,
            gravity_normal: self.gravity_normal,
            fuel_consumption_per_second: self.fuel_consumption_per_second,
            fuel_pickup_amount: self.fuel_pickup_amount,
            burst_force: self.burst_force,
            burst_fuel_cost: self.burst_fuel_cost,
            landing: self.landing_rules(),
        }
    }

    /// Touchdown thresholds and score weights.
    pub fn landing_rules(&self) -> LandingRules {
        LandingRules {
            soft_landing_speed: self.soft_landing_speed,
            min_landing_dot: self.min_landing_dot,
            max_angle_score: self.max_angle_score,
            angle_score_dot_multiplier: self.angle_score_dot_multiplier,
            speed_score_per_unit: self.speed_score_per_unit,
        }
    }

    pub fn spawn_position(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }
}

/// Startup system: attempt to load `assets/lander.toml` and replace the
/// `LanderConfig` resource with the parsed and validated file.
///
/// A missing file is not an error (defaults are already in place from
/// `insert_resource`).  A malformed file or one that fails validation is
/// reported and rejected as a whole; the compiled defaults stay active.
pub fn load_lander_config(mut config: ResMut<LanderConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match LanderConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded lander config from {CONFIG_PATH}");
            }
            Err(e) => {
                error!("Rejected {CONFIG_PATH}: {e}; using compiled defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}
