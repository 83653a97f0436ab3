//! Session bookkeeping: score, flight timer, level number and restarts.
//!
//! ## Systems
//!
//! | System | Schedule | Job |
//! |--------|----------|-----|
//! | [`session_event_system`] | `Update` | fold `LanderEvent`s into [`Session`] |
//! | [`session_timer_system`] | `Update` | advance the flight timer while it runs |
//! | [`session_keyboard_system`] | `Update` | **R** → retry, **Enter** → next level |
//! | [`session_restart_system`] | `Update` | apply [`SessionRequest`]s to the lander and level |

use crate::config::LanderConfig;
use crate::lander::{
    FlightController, Lander, LanderEvent, LanderState, LandingType, PreStepVelocity,
};
use crate::level::{rebuild_level, LevelEntity};
use crate::visuals::{BurstFlame, ThrusterVisuals};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Running totals for the current attempt.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Session {
    pub score: i32,
    /// Seconds spent in `Normal` flight.
    pub time: f32,
    pub timer_active: bool,
    pub level_number: u32,
    /// Type of the last touchdown, if any, since the last restart.
    pub last_landing: Option<LandingType>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            time: 0.0,
            timer_active: false,
            level_number: 1,
            last_landing: None,
        }
    }
}

impl Session {
    /// Apply one lander event.  `coin_score` is the bonus per coin.
    pub fn apply(&mut self, event: &LanderEvent, coin_score: i32) {
        match event {
            LanderEvent::Landed(outcome) => {
                self.last_landing = Some(outcome.landing_type);
                self.add_score(outcome.score);
            }
            LanderEvent::CoinPickup => self.add_score(coin_score),
            LanderEvent::StateChanged { state } => {
                self.timer_active = *state == LanderState::Normal;
            }
            _ => {}
        }
    }

    pub fn add_score(&mut self, amount: i32) {
        self.score += amount;
        info!("Score: {}", self.score);
    }

    pub fn advance_timer(&mut self, elapsed: f32) {
        if self.timer_active {
            self.time += elapsed;
        }
    }

    /// Clear score and timer, moving to the next level if asked.
    pub fn restart(&mut self, request: SessionRequest) {
        self.score = 0;
        self.time = 0.0;
        self.timer_active = false;
        self.last_landing = None;
        if request == SessionRequest::NextLevel {
            self.level_number += 1;
        }
    }

    /// True once the lander has come down on a pad in one piece.
    pub fn landed_successfully(&self) -> bool {
        self.last_landing == Some(LandingType::Success)
    }
}

/// Restart request from the player or a UI layer.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    Retry,
    NextLevel,
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .add_message::<SessionRequest>()
            .add_systems(
                Update,
                (
                    session_event_system,
                    session_timer_system,
                    session_keyboard_system,
                    session_restart_system,
                )
                    .chain(),
            );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

pub fn session_event_system(
    mut events: MessageReader<LanderEvent>,
    mut session: ResMut<Session>,
    config: Res<LanderConfig>,
) {
    for event in events.read() {
        session.apply(event, config.coin_score);
    }
}

pub fn session_timer_system(time: Res<Time>, mut session: ResMut<Session>) {
    session.advance_timer(time.delta_secs());
}

/// **R** retries at any time; **Enter** moves on after a successful landing.
pub fn session_keyboard_system(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<Session>,
    mut requests: MessageWriter<SessionRequest>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        requests.write(SessionRequest::Retry);
    } else if keys.just_pressed(KeyCode::Enter) && session.landed_successfully() {
        requests.write(SessionRequest::NextLevel);
    }
}

/// Put the lander back on its spawn point and rebuild the level.
///
/// Only the last request of a frame is applied.
#[allow(clippy::type_complexity)]
pub fn session_restart_system(
    mut commands: Commands,
    mut requests: MessageReader<SessionRequest>,
    mut session: ResMut<Session>,
    config: Res<LanderConfig>,
    mut q_lander: Query<
        (
            Entity,
            &mut FlightController,
            &mut Transform,
            &mut Velocity,
            &mut ExternalForce,
            &mut ExternalImpulse,
            &mut GravityScale,
            &mut PreStepVelocity,
            &mut Visibility,
            Option<&mut ThrusterVisuals>,
            Option<&mut BurstFlame>,
        ),
        With<Lander>,
    >,
    q_level: Query<Entity, With<LevelEntity>>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    session.restart(request);
    info!("{request:?}: level {}", session.level_number);

    if let Ok((
        entity,
        mut controller,
        mut transform,
        mut velocity,
        mut force,
        mut impulse,
        mut gravity,
        mut pre_step,
        mut visibility,
        thrusters,
        flame,
    )) = q_lander.single_mut()
    {
        controller.reset();
        *transform = Transform::from_translation(config.spawn_position().extend(0.0));
        *velocity = Velocity::zero();
        *force = ExternalForce::default();
        *impulse = ExternalImpulse::default();
        gravity.0 = 0.0;
        pre_step.0 = Vec2::ZERO;
        *visibility = Visibility::Inherited;
        commands.entity(entity).remove::<RigidBodyDisabled>();
        if let Some(mut thrusters) = thrusters {
            *thrusters = ThrusterVisuals::default();
        }
        if let Some(mut flame) = flame {
            flame.reset();
        }
    }

    rebuild_level(&mut commands, &config, q_level.iter());
}
