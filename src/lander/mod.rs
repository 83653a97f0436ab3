//! Lander module: flight core, its physics seam, and the Bevy systems that drive it.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`resource_pool`] | `ResourcePool`: bounded fuel with rate and fixed consumption |
//! | [`ability_gate`] | `AbilityGate`: periodic burst availability |
//! | [`events`] | `LanderState`, `LanderEvent`, and the `EventBus` observer list |
//! | [`landing`] | Touchdown classification and scoring |
//! | [`body`] | `PhysicsBody` trait, Rapier adapter, headless stand-in |
//! | [`flight`] | `FlightController`: state machine, thrust, collisions, pickups |
//! | [`systems`] | ECS systems: input, fixed-step flight, collision routing, relay, telemetry |
//!
//! All public items are re-exported at this level so the rest of the crate
//! can use flat `crate::lander::*` imports.

pub mod ability_gate;
pub mod body;
pub mod events;
pub mod flight;
pub mod landing;
pub mod resource_pool;
pub mod systems;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use ability_gate::{AbilityGate, BurstRecharge};
pub use body::{BodyPose, HeadlessBody, PhysicsBody, RapierBody, RapierPose};
pub use events::{EventBus, LanderEvent, LanderObserver, LanderState, SubscriptionId};
pub use flight::{FlightController, FlightTuning, LanderInput, OverlapTags};
pub use landing::{evaluate_landing, Contact, LandingOutcome, LandingRules, LandingType};
pub use resource_pool::ResourcePool;
pub use systems::{
    keyboard_to_input_system, lander_collision_system, lander_flight_system,
    lander_overlap_system, lander_telemetry_system, relay_lander_events_system,
    LanderTelemetry,
};

use crate::config::LanderConfig;
use crate::error::{validate_pad_multiplier, LanderResult};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the lander entity.
#[derive(Component)]
pub struct Lander;

/// Lander velocity captured before the physics step.
///
/// Rapier resolves the contact before reporting it, so the post-step
/// velocity of a lander that just hit the ground is already near zero.
/// Impact speed is measured from this value instead.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PreStepVelocity(pub Vec2);

/// A surface the lander may land on.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LandingPad {
    score_multiplier: f32,
}

impl LandingPad {
    /// `pad_index` is only used to label the error.
    pub fn new(pad_index: usize, score_multiplier: f32) -> LanderResult<Self> {
        validate_pad_multiplier(pad_index, score_multiplier)?;
        Ok(Self { score_multiplier })
    }

    #[inline]
    pub fn score_multiplier(&self) -> f32 {
        self.score_multiplier
    }
}

/// Sensor that refills fuel on overlap.
#[derive(Component)]
pub struct FuelPickup;

/// Sensor that awards a coin on overlap.
#[derive(Component)]
pub struct CoinPickup;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the lander resources, messages and systems.
///
/// The flight tick runs in `FixedUpdate`; collision routing runs in
/// `FixedPostUpdate` after Rapier's writeback, so the physics plugin must be
/// stepped on the fixed schedule as well.
pub struct LanderPlugin;

impl Plugin for LanderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(EventBus::with_message_relay())
            .init_resource::<LanderInput>()
            .init_resource::<LanderTelemetry>()
            .add_message::<LanderEvent>()
            .add_systems(Update, keyboard_to_input_system)
            .add_systems(FixedUpdate, lander_flight_system)
            .add_systems(
                FixedPostUpdate,
                (
                    lander_collision_system,
                    lander_overlap_system,
                    relay_lander_events_system,
                    lander_telemetry_system,
                )
                    .chain()
                    .after(PhysicsSet::Writeback),
            );
    }
}

// ── Lander spawn ──────────────────────────────────────────────────────────────

/// Spawn the lander at the configured start point, floating with gravity off.
///
/// Collision events are enabled so pad, terrain and pickup contacts reach
/// [`lander_collision_system`] and [`lander_overlap_system`].
pub fn spawn_lander(mut commands: Commands, config: Res<LanderConfig>) {
    let controller = match FlightController::from_config(&config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Lander not spawned: {e}");
            return;
        }
    };

    commands.spawn((
        Lander,
        controller,
        PreStepVelocity::default(),
        crate::visuals::ThrusterVisuals::default(),
        crate::visuals::BurstFlame::new(
            config.burst_flame_duration,
            config.burst_flame_shake_degrees,
        ),
        // Physics
        RigidBody::Dynamic,
        Collider::cuboid(config.lander_half_width, config.lander_half_height),
        Velocity::zero(),
        ExternalForce::default(),
        ExternalImpulse::default(),
        GravityScale(0.0),
        Damping {
            linear_damping: config.lander_linear_damping,
            angular_damping: config.lander_angular_damping,
        },
        ActiveEvents::COLLISION_EVENTS,
        // Transform / visibility
        Transform::from_translation(config.spawn_position().extend(0.0)),
        Visibility::default(),
    ));

    info!("Lander spawned at {:?}", config.spawn_position());
}
