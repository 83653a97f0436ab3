//! Centralised flight, landing and scoring constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::LanderConfig::default`] reads every
//! value from this file; `assets/lander.toml` may override any subset at startup.

// ── Fuel ──────────────────────────────────────────────────────────────────────

/// Fuel capacity of a freshly spawned lander.
pub const FUEL_MAX: f32 = 10.0;

/// Fuel burned per second while any directional thruster is held.
///
/// At 1.0 a full tank gives ten seconds of continuous thrust.
pub const FUEL_CONSUMPTION_PER_SECOND: f32 = 1.0;

/// Fuel restored by a single fuel pickup (clamped to `FUEL_MAX`).
pub const FUEL_PICKUP_AMOUNT: f32 = 10.0;

// ── Thrust ────────────────────────────────────────────────────────────────────

/// Main engine force, multiplied by the tick duration before it is applied.
pub const UP_FORCE: f32 = 700.0;

/// Rotation torque, multiplied by the tick duration before it is applied.
/// Left applies `+TURN_TORQUE`, right applies `−TURN_TORQUE`.
pub const TURN_TORQUE: f32 = 100.0;

/// Gravity scale switched on when the first directional input arrives.
/// The lander floats (scale 0) while waiting to start.
pub const GRAVITY_NORMAL: f32 = 0.7;

// ── Burst ─────────────────────────────────────────────────────────────────────

/// Magnitude of the instantaneous burst impulse along the lander's up-axis.
pub const BURST_FORCE: f32 = 10.0;

/// Flat fuel cost of one burst.
pub const BURST_FUEL_COST: f32 = 3.0;

/// Seconds between burst availability refreshes.
pub const BURST_COOLDOWN: f32 = 5.0;

/// Length of the burst flame decay once a burst fires.
pub const BURST_FLAME_DURATION: f32 = 0.4;

/// Maximum shake (degrees) of the burst flame at full scale.
pub const BURST_FLAME_SHAKE_DEGREES: f32 = 5.0;

// ── Landing ───────────────────────────────────────────────────────────────────

/// Impact speeds above this are a crash (`TooFastLanding`).
pub const SOFT_LANDING_SPEED: f32 = 4.0;

/// Minimum `dot(world_up, lander_up)` for a landing to count.
/// 0.90 is roughly 25° of tilt.
pub const MIN_LANDING_DOT: f32 = 0.90;

/// Angle score for a perfectly upright landing.
pub const MAX_ANGLE_SCORE: f32 = 100.0;

/// Penalty multiplier applied to `|dot − 1|` in the angle score.
pub const ANGLE_SCORE_DOT_MULTIPLIER: f32 = 10.0;

/// Points per unit of speed below `SOFT_LANDING_SPEED`.
pub const SPEED_SCORE_PER_UNIT: f32 = 100.0;

// ── Session ───────────────────────────────────────────────────────────────────

/// Points awarded for each coin pickup.
pub const COIN_SCORE: i32 = 500;

// ── Lander Body ───────────────────────────────────────────────────────────────

/// Half extents of the lander's cuboid collider (world units).
pub const LANDER_HALF_WIDTH: f32 = 0.5;
pub const LANDER_HALF_HEIGHT: f32 = 0.5;

pub const LANDER_LINEAR_DAMPING: f32 = 0.0;

/// Angular damping keeps torque taps from spinning the lander indefinitely.
pub const LANDER_ANGULAR_DAMPING: f32 = 2.0;

/// World-space spawn point.
pub const LANDER_SPAWN_X: f32 = 0.0;
pub const LANDER_SPAWN_Y: f32 = 20.0;

/// Radius of pickup sensors.
pub const PICKUP_RADIUS: f32 = 0.5;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Orthographic scale of the debug camera; world units are metres.
pub const CAMERA_SCALE: f32 = 0.05;
