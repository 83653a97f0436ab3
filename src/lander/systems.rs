//! Lander ECS systems.
//!
//! ## Pipeline
//!
//! | Schedule | System | Job |
//! |----------|--------|-----|
//! | `Update` | [`keyboard_to_input_system`] | arrows + space → `LanderInput` |
//! | `FixedUpdate` | [`lander_flight_system`] | clear forces, record velocity, run the controller tick |
//! | `FixedPostUpdate` | [`lander_collision_system`] | solid contacts → landing outcome |
//! | `FixedPostUpdate` | [`lander_overlap_system`] | sensor contacts → pickups |
//! | `FixedPostUpdate` | [`relay_lander_events_system`] | bus queue → `LanderEvent` messages |
//! | `FixedPostUpdate` | [`lander_telemetry_system`] | refresh `LanderTelemetry` |
//!
//! Tests populate `LanderInput` directly and write `CollisionEvent`
//! messages by hand, so every system here runs without Rapier or a window.

use super::body::{RapierBody, RapierPose};
use super::events::{EventBus, LanderEvent, LanderState};
use super::flight::{FlightController, LanderInput, OverlapTags};
use super::landing::Contact;
use super::{CoinPickup, FuelPickup, Lander, LandingPad, PreStepVelocity};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use std::collections::HashSet;

/// Snapshot of the lander for HUDs and other readers.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct LanderTelemetry {
    pub fuel: f32,
    pub fuel_normalized: f32,
    pub state: LanderState,
    pub speed_x: f32,
    pub speed_y: f32,
    pub burst_available: bool,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Sample the keyboard into [`LanderInput`].
///
/// - **↑** → `up`
/// - **←** → `left` (counter-clockwise torque)
/// - **→** → `right` (clockwise torque)
/// - **Space** → `burst`
pub fn keyboard_to_input_system(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<LanderInput>) {
    *input = LanderInput {
        up: keys.pressed(KeyCode::ArrowUp),
        left: keys.pressed(KeyCode::ArrowLeft),
        right: keys.pressed(KeyCode::ArrowRight),
        burst: keys.pressed(KeyCode::Space),
    };
}

// ── Flight tick ───────────────────────────────────────────────────────────────

/// Run one controller tick against the lander's Rapier components.
///
/// `ExternalForce` is zeroed first so thrust from the previous step does not
/// linger, and the current velocity is stored in [`PreStepVelocity`] for
/// impact measurement.
#[allow(clippy::type_complexity)]
pub fn lander_flight_system(
    time: Res<Time>,
    input: Res<LanderInput>,
    mut bus: ResMut<EventBus>,
    mut q: Query<
        (
            &mut FlightController,
            &Transform,
            &Velocity,
            &mut ExternalForce,
            &mut ExternalImpulse,
            &mut GravityScale,
            &mut PreStepVelocity,
        ),
        With<Lander>,
    >,
) {
    let Ok((mut controller, transform, velocity, mut force, mut impulse, mut gravity, mut pre_step)) =
        q.single_mut()
    else {
        return;
    };

    force.force = Vec2::ZERO;
    force.torque = 0.0;
    pre_step.0 = velocity.linvel;

    let mut body = RapierBody {
        pose: RapierPose {
            transform,
            velocity,
        },
        force: &mut *force,
        impulse: &mut *impulse,
        gravity: &mut *gravity,
    };
    controller.tick(*input, time.delta_secs(), &mut body, &mut bus);
}

// ── Contacts ──────────────────────────────────────────────────────────────────

/// Resolve solid contacts between the lander and anything else.
///
/// Sensor contacts (pickups) are left to [`lander_overlap_system`].  The
/// impact speed is the lander's pre-step velocity relative to the other
/// body; bodies without a `Velocity` (static terrain, pads) count as still.
#[allow(clippy::type_complexity)]
pub fn lander_collision_system(
    mut collision_events: MessageReader<CollisionEvent>,
    mut q_lander: Query<
        (
            Entity,
            &mut FlightController,
            &Transform,
            &Velocity,
            &PreStepVelocity,
        ),
        With<Lander>,
    >,
    q_pads: Query<&LandingPad>,
    q_velocity: Query<&Velocity, Without<Lander>>,
    q_pickups: Query<(), Or<(With<FuelPickup>, With<CoinPickup>)>>,
    mut bus: ResMut<EventBus>,
) {
    let Ok((lander, mut controller, transform, velocity, pre_step)) = q_lander.single_mut() else {
        return;
    };

    for event in collision_events.read() {
        let (e1, e2, flags) = match event {
            CollisionEvent::Started(e1, e2, flags) => (*e1, *e2, *flags),
            CollisionEvent::Stopped(..) => continue,
        };
        if flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }

        let other = if e1 == lander {
            e2
        } else if e2 == lander {
            e1
        } else {
            continue;
        };
        if q_pickups.contains(other) {
            continue;
        }

        let other_velocity = q_velocity
            .get(other)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO);
        let contact = Contact {
            pad_multiplier: q_pads.get(other).ok().map(LandingPad::score_multiplier),
            impact_speed: (pre_step.0 - other_velocity).length(),
        };
        let pose = RapierPose {
            transform,
            velocity,
        };
        controller.handle_collision(contact, &pose, &mut bus);
    }
}

/// Collect fuel and coin pickups the lander overlaps, despawning each once.
pub fn lander_overlap_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut q_lander: Query<(Entity, &mut FlightController), With<Lander>>,
    q_fuel: Query<(), With<FuelPickup>>,
    q_coin: Query<(), With<CoinPickup>>,
    mut bus: ResMut<EventBus>,
) {
    let Ok((lander, mut controller)) = q_lander.single_mut() else {
        return;
    };
    let mut collected: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };
        let other = if e1 == lander {
            e2
        } else if e2 == lander {
            e1
        } else {
            continue;
        };
        if collected.contains(&other) {
            continue;
        }

        let tags = OverlapTags {
            fuel_pickup: q_fuel.contains(other),
            coin_pickup: q_coin.contains(other),
        };
        if !(tags.fuel_pickup || tags.coin_pickup) {
            continue;
        }
        collected.insert(other);

        controller.handle_overlap(
            tags,
            || {
                commands.entity(other).despawn();
            },
            &mut bus,
        );
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// Forward everything published on the bus this step as Bevy messages.
pub fn relay_lander_events_system(
    mut bus: ResMut<EventBus>,
    mut writer: MessageWriter<LanderEvent>,
) {
    for event in bus.drain_relay() {
        writer.write(event);
    }
}

pub fn lander_telemetry_system(
    q: Query<(&FlightController, &Transform, &Velocity), With<Lander>>,
    mut telemetry: ResMut<LanderTelemetry>,
) {
    let Ok((controller, transform, velocity)) = q.single() else {
        return;
    };
    let pose = RapierPose {
        transform,
        velocity,
    };
    *telemetry = LanderTelemetry {
        fuel: controller.fuel(),
        fuel_normalized: controller.fuel_normalized(),
        state: controller.state(),
        speed_x: controller.speed_x(&pose),
        speed_y: controller.speed_y(&pose),
        burst_available: controller.burst_available(),
    };
}

// ── Unit tests ────────────────────────────────────────────────────────────────
