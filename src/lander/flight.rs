//! Flight controller: the lander's state machine, thrust, and touchdown logic.
//!
//! ## Tick protocol
//!
//! [`FlightController::tick`] runs once per fixed physics step:
//!
//! 1. Publish [`LanderEvent::BeforeForce`] (always, in every state).
//! 2. Advance the burst cooldown unless the game is over.
//! 3. Dispatch on [`LanderState`]:
//!    - `WaitingToStart`: any directional input switches gravity on and starts the flight.
//!    - `Normal`: with fuel left: burn fuel, fire the burst if allowed, apply thrust/torque.
//!    - `GameOver`: nothing.
//!
//! Collisions and sensor overlaps arrive separately, after the physics step,
//! through [`FlightController::handle_collision`] and
//! [`FlightController::handle_overlap`].

use super::ability_gate::AbilityGate;
use super::body::{BodyPose, PhysicsBody};
use super::events::{EventBus, LanderEvent, LanderState};
use super::landing::{evaluate_landing, Contact, LandingOutcome, LandingRules};
use super::resource_pool::ResourcePool;
use crate::config::LanderConfig;
use crate::constants::{
    BURST_FORCE, BURST_FUEL_COST, FUEL_CONSUMPTION_PER_SECOND, FUEL_PICKUP_AMOUNT,
    GRAVITY_NORMAL, TURN_TORQUE, UP_FORCE,
};
use crate::error::LanderResult;
use bevy::prelude::*;

/// The four control signals, sampled once per tick.
///
/// Input systems write this resource; tests can populate it directly.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanderInput {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    /// The burst action.
    pub burst: bool,
}

impl LanderInput {
    #[inline]
    pub fn any_directional(&self) -> bool {
        self.up || self.left || self.right
    }
}

/// Forces, torque and fuel costs applied by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightTuning {
    /// Main engine force per second of thrust.
    pub up_force: f32,
    /// Rotation torque per second of input.
    pub turn_torque: f32,
    /// Gravity scale once the flight starts.
    pub gravity_normal: f32,
    pub fuel_consumption_per_second: f32,
    pub fuel_pickup_amount: f32,
    pub burst_force: f32,
    pub burst_fuel_cost: f32,
    pub landing: LandingRules,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            up_force: UP_FORCE,
            turn_torque: TURN_TORQUE,
            gravity_normal: GRAVITY_NORMAL,
            fuel_consumption_per_second: FUEL_CONSUMPTION_PER_SECOND,
            fuel_pickup_amount: FUEL_PICKUP_AMOUNT,
            burst_force: BURST_FORCE,
            burst_fuel_cost: BURST_FUEL_COST,
            landing: LandingRules::default(),
        }
    }
}

/// What a sensor overlap carries.  One pickup may be both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapTags {
    pub fuel_pickup: bool,
    pub coin_pickup: bool,
}

/// Per-lander flight state.  Owns its fuel pool and burst gate; the body and
/// the event bus are lent to it for each call.
#[derive(Component, Debug, Clone)]
pub struct FlightController {
    state: LanderState,
    fuel: ResourcePool,
    burst: AbilityGate,
    tuning: FlightTuning,
}

impl FlightController {
    pub fn new(tuning: FlightTuning, fuel: ResourcePool, burst: AbilityGate) -> Self {
        Self {
            state: LanderState::WaitingToStart,
            fuel,
            burst,
            tuning,
        }
    }

    /// Build a controller from validated configuration.
    pub fn from_config(config: &LanderConfig) -> LanderResult<Self> {
        Ok(Self::new(
            config.flight_tuning(),
            ResourcePool::new(config.fuel_max)?,
            AbilityGate::new(config.burst_cooldown, config.burst_recharge)?,
        ))
    }

    /// Advance one fixed step of `elapsed` seconds.
    pub fn tick(
        &mut self,
        input: LanderInput,
        elapsed: f32,
        body: &mut impl PhysicsBody,
        bus: &mut EventBus,
    ) {
        bus.publish(LanderEvent::BeforeForce);

        if self.state != LanderState::GameOver {
            self.burst.tick(elapsed);
        }

        match self.state {
            LanderState::WaitingToStart => {
                if input.any_directional() {
                    body.set_gravity_scale(self.tuning.gravity_normal);
                    self.set_state(LanderState::Normal, bus);
                }
            }
            LanderState::Normal => self.fly(input, elapsed, body, bus),
            LanderState::GameOver => {}
        }
    }

    fn fly(
        &mut self,
        input: LanderInput,
        elapsed: f32,
        body: &mut impl PhysicsBody,
        bus: &mut EventBus,
    ) {
        if self.fuel.is_empty() {
            return;
        }

        if input.any_directional() {
            self.fuel
                .consume_rate(self.tuning.fuel_consumption_per_second, elapsed);
        }

        if input.burst
            && self.burst.is_available()
            && self.fuel.amount() >= self.tuning.burst_fuel_cost
        {
            body.add_impulse(body.up() * self.tuning.burst_force);
            self.fuel.consume_fixed(self.tuning.burst_fuel_cost);
            self.burst.consume_availability();
            bus.publish(LanderEvent::BurstForce);
            bus.publish(LanderEvent::BurstFlameForce);
            debug!("Burst fired; fuel left {:.2}", self.fuel.amount());
        }

        if input.up {
            body.add_force(body.up() * self.tuning.up_force * elapsed);
            bus.publish(LanderEvent::UpForce);
        }
        if input.left {
            body.add_torque(self.tuning.turn_torque * elapsed);
            bus.publish(LanderEvent::LeftForce);
        }
        if input.right {
            body.add_torque(-self.tuning.turn_torque * elapsed);
            bus.publish(LanderEvent::RightForce);
        }
    }

    /// Resolve a touchdown.
    ///
    /// Publishes [`LanderEvent::Landed`] followed by the `GameOver` state change,
    /// and returns the outcome.  Returns `None` without publishing anything
    /// once the game is already over.
    pub fn handle_collision(
        &mut self,
        contact: Contact,
        body: &impl BodyPose,
        bus: &mut EventBus,
    ) -> Option<LandingOutcome> {
        if self.state == LanderState::GameOver {
            return None;
        }

        let dot_vector = Vec2::Y.dot(body.up());
        let outcome = evaluate_landing(&self.tuning.landing, contact, dot_vector);
        info!(
            "Touchdown: {:?} (score {}, speed {:.2}, dot {:.3}, x{})",
            outcome.landing_type,
            outcome.score,
            outcome.landing_speed,
            outcome.dot_vector,
            outcome.score_multiplier
        );

        bus.publish(LanderEvent::Landed(outcome));
        self.set_state(LanderState::GameOver, bus);
        Some(outcome)
    }

    /// Collect a pickup.  `destroy` is called once if the overlap carried
    /// anything collectible.  Nothing is collected once the game is over.
    pub fn handle_overlap(&mut self, tags: OverlapTags, destroy: impl FnOnce(), bus: &mut EventBus) {
        if self.state == LanderState::GameOver {
            return;
        }
        if tags.fuel_pickup {
            self.fuel.refill(self.tuning.fuel_pickup_amount);
            debug!("Fuel pickup; fuel now {:.2}", self.fuel.amount());
        }
        if tags.coin_pickup {
            bus.publish(LanderEvent::CoinPickup);
        }
        if tags.fuel_pickup || tags.coin_pickup {
            destroy();
        }
    }

    /// Restore fuel, burst gate and state to their spawn values.
    pub fn reset(&mut self) {
        self.state = LanderState::WaitingToStart;
        self.fuel.reset();
        self.burst.reset();
    }

    fn set_state(&mut self, state: LanderState, bus: &mut EventBus) {
        info!("Lander state {:?} → {:?}", self.state, state);
        self.state = state;
        bus.publish(LanderEvent::StateChanged { state });
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> LanderState {
        self.state
    }

    #[inline]
    pub fn fuel(&self) -> f32 {
        self.fuel.amount()
    }

    #[inline]
    pub fn fuel_normalized(&self) -> f32 {
        self.fuel.normalized()
    }

    #[inline]
    pub fn burst_available(&self) -> bool {
        self.burst.is_available()
    }

    #[inline]
    pub fn speed_x(&self, body: &impl BodyPose) -> f32 {
        body.linear_velocity().x
    }

    #[inline]
    pub fn speed_y(&self, body: &impl BodyPose) -> f32 {
        body.linear_velocity().y
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lander::ability_gate::BurstRecharge;
    use crate::lander::body::HeadlessBody;
    use crate::lander::landing::LandingType;
    use std::sync::{Arc, Mutex};

    const DT: f32 = 0.02;

    // ── helpers ───────────────────────────────────────────────────────────────

    fn controller() -> FlightController {
        FlightController::from_config(&LanderConfig::default()).unwrap()
    }

    fn recording_bus() -> (EventBus, Arc<Mutex<Vec<LanderEvent>>>) {
        let mut bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        bus.attach(move |e: &LanderEvent| sink.lock().unwrap().push(*e));
        (bus, log)
    }

    fn take(log: &Arc<Mutex<Vec<LanderEvent>>>) -> Vec<LanderEvent> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    const UP: LanderInput = LanderInput {
        up: true,
        left: false,
        right: false,
        burst: false,
    };

    /// A controller already in flight.
    fn flying() -> (FlightController, HeadlessBody, EventBus, Arc<Mutex<Vec<LanderEvent>>>) {
        let mut ctl = controller();
        let mut body = HeadlessBody::default();
        let (mut bus, log) = recording_bus();
        ctl.tick(UP, DT, &mut body, &mut bus);
        assert_eq!(ctl.state(), LanderState::Normal);
        take(&log);
        (ctl, HeadlessBody::default(), bus, log)
    }

    fn pad_contact(multiplier: f32, speed: f32) -> Contact {
        Contact {
            pad_multiplier: Some(multiplier),
            impact_speed: speed,
        }
    }

    // ── WaitingToStart ────────────────────────────────────────────────────────

    #[test]
    fn waiting_without_input_stays_waiting() {
        let mut ctl = controller();
        let mut body = HeadlessBody::default();
        let (mut bus, log) = recording_bus();

        for _ in 0..50 {
            ctl.tick(LanderInput::default(), DT, &mut body, &mut bus);
        }

        assert_eq!(ctl.state(), LanderState::WaitingToStart);
        assert_eq!(body.gravity_scale, 0.0);
        assert!(take(&log).iter().all(|e| *e == LanderEvent::BeforeForce));
    }

    #[test]
    fn burst_alone_does_not_start_the_flight() {
        let mut ctl = controller();
        let mut body = HeadlessBody::default();
        let (mut bus, _log) = recording_bus();
        let input = LanderInput {
            burst: true,
            ..Default::default()
        };

        ctl.tick(input, DT, &mut body, &mut bus);

        assert_eq!(ctl.state(), LanderState::WaitingToStart);
        assert!(body.untouched());
    }

    #[test]
    fn directional_input_starts_flight_and_enables_gravity() {
        let mut ctl = controller();
        let mut body = HeadlessBody::default();
        let (mut bus, log) = recording_bus();
        let input = LanderInput {
            left: true,
            ..Default::default()
        };

        ctl.tick(input, DT, &mut body, &mut bus);

        assert_eq!(ctl.state(), LanderState::Normal);
        assert_eq!(body.gravity_scale, GRAVITY_NORMAL);
        assert_eq!(
            take(&log),
            vec![
                LanderEvent::BeforeForce,
                LanderEvent::StateChanged {
                    state: LanderState::Normal
                }
            ]
        );
        // The starting tick only transitions; no thrust yet.
        assert!(body.untouched());
        assert_eq!(ctl.fuel(), LanderConfig::default().fuel_max);
    }

    // ── Normal ────────────────────────────────────────────────────────────────

    #[test]
    fn up_thrust_pushes_along_body_up_and_burns_fuel() {
        let (mut ctl, mut body, mut bus, log) = flying();
        body.rotation = -std::f32::consts::FRAC_PI_2; // nose toward +X

        ctl.tick(UP, DT, &mut body, &mut bus);

        let expected = UP_FORCE * DT;
        assert!((body.force - Vec2::new(expected, 0.0)).length() < 1e-3);
        assert!((ctl.fuel() - (10.0 - FUEL_CONSUMPTION_PER_SECOND * DT)).abs() < 1e-6);
        assert_eq!(take(&log), vec![LanderEvent::BeforeForce, LanderEvent::UpForce]);
    }

    #[test]
    fn left_and_right_apply_opposite_torque_and_combine_with_up() {
        let (mut ctl, mut body, mut bus, log) = flying();

        let left = LanderInput {
            up: true,
            left: true,
            ..Default::default()
        };
        ctl.tick(left, DT, &mut body, &mut bus);
        assert!((body.torque - TURN_TORQUE * DT).abs() < 1e-6);
        assert!(body.force.y > 0.0);
        assert_eq!(
            take(&log),
            vec![
                LanderEvent::BeforeForce,
                LanderEvent::UpForce,
                LanderEvent::LeftForce
            ]
        );

        let mut body = HeadlessBody::default();
        let right = LanderInput {
            right: true,
            ..Default::default()
        };
        ctl.tick(right, DT, &mut body, &mut bus);
        assert!((body.torque + TURN_TORQUE * DT).abs() < 1e-6);
        assert_eq!(
            take(&log),
            vec![LanderEvent::BeforeForce, LanderEvent::RightForce]
        );
    }

    #[test]
    fn empty_tank_skips_all_forces() {
        let (mut ctl, mut body, mut bus, log) = flying();
        ctl.fuel.consume_fixed(100.0);

        let all = LanderInput {
            up: true,
            left: true,
            right: true,
            burst: true,
        };
        ctl.tick(all, DT, &mut body, &mut bus);

        assert!(body.untouched());
        assert_eq!(ctl.state(), LanderState::Normal);
        assert_eq!(take(&log), vec![LanderEvent::BeforeForce]);
    }

    #[test]
    fn burst_fires_once_then_gate_closes() {
        let (mut ctl, mut body, mut bus, log) = flying();
        let burst = LanderInput {
            burst: true,
            ..Default::default()
        };
        let before = ctl.fuel();

        ctl.tick(burst, DT, &mut body, &mut bus);

        assert!((body.impulse - Vec2::Y * BURST_FORCE).length() < 1e-5);
        assert!((ctl.fuel() - (before - BURST_FUEL_COST)).abs() < 1e-6);
        assert!(!ctl.burst_available());
        assert_eq!(
            take(&log),
            vec![
                LanderEvent::BeforeForce,
                LanderEvent::BurstForce,
                LanderEvent::BurstFlameForce
            ]
        );

        // Held down on the next tick: nothing more.
        let mut body = HeadlessBody::default();
        ctl.tick(burst, DT, &mut body, &mut bus);
        assert!(body.untouched());
        assert!((ctl.fuel() - (before - BURST_FUEL_COST)).abs() < 1e-6);
    }

    #[test]
    fn burst_needs_enough_fuel() {
        let (mut ctl, mut body, mut bus, log) = flying();
        let excess = ctl.fuel() - (BURST_FUEL_COST - 0.5);
        ctl.fuel.consume_fixed(excess);
        let fuel = ctl.fuel();
        let burst = LanderInput {
            burst: true,
            ..Default::default()
        };

        ctl.tick(burst, DT, &mut body, &mut bus);

        assert!(body.untouched());
        assert_eq!(ctl.fuel(), fuel);
        assert!(ctl.burst_available());
        assert_eq!(take(&log), vec![LanderEvent::BeforeForce]);
    }

    #[test]
    fn burst_becomes_available_again_after_cooldown() {
        let mut config = LanderConfig::default();
        config.burst_cooldown = 0.1;
        config.burst_recharge = BurstRecharge::WhileUnavailable;
        let mut ctl = FlightController::from_config(&config).unwrap();
        let mut body = HeadlessBody::default();
        let mut bus = EventBus::new();
        ctl.tick(UP, DT, &mut body, &mut bus);

        let burst = LanderInput {
            burst: true,
            ..Default::default()
        };
        ctl.tick(burst, DT, &mut body, &mut bus);
        assert!(!ctl.burst_available());

        for _ in 0..6 {
            ctl.tick(LanderInput::default(), DT, &mut body, &mut bus);
        }
        assert!(ctl.burst_available());
    }

    // ── Collisions ────────────────────────────────────────────────────────────

    #[test]
    fn perfect_touchdown_publishes_landed_then_game_over() {
        let (mut ctl, body, mut bus, log) = flying();

        let outcome = ctl
            .handle_collision(pad_contact(2.0, 0.0), &body, &mut bus)
            .unwrap();

        assert_eq!(outcome.landing_type, LandingType::Success);
        assert_eq!(outcome.score, 1000);
        assert_eq!(ctl.state(), LanderState::GameOver);
        assert_eq!(
            take(&log),
            vec![
                LanderEvent::Landed(outcome),
                LanderEvent::StateChanged {
                    state: LanderState::GameOver
                }
            ]
        );
    }

    #[test]
    fn tilted_touchdown_uses_body_up_for_dot() {
        let (mut ctl, mut body, mut bus, _log) = flying();
        body.rotation = 60.0_f32.to_radians(); // cos 60° = 0.5

        let outcome = ctl
            .handle_collision(pad_contact(2.0, 1.0), &body, &mut bus)
            .unwrap();

        assert_eq!(outcome.landing_type, LandingType::TooSteepAngle);
        assert!((outcome.dot_vector - 0.5).abs() < 1e-5);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn terrain_crash_is_wrong_landing_area() {
        let (mut ctl, body, mut bus, _log) = flying();
        let contact = Contact {
            pad_multiplier: None,
            impact_speed: 3.0,
        };

        let outcome = ctl.handle_collision(contact, &body, &mut bus).unwrap();

        assert_eq!(outcome.landing_type, LandingType::WrongLandingArea);
        assert_eq!(outcome.landing_speed, 0.0);
        assert_eq!(outcome.dot_vector, 0.0);
    }

    #[test]
    fn only_the_first_collision_is_scored() {
        let (mut ctl, body, mut bus, log) = flying();
        ctl.handle_collision(pad_contact(2.0, 5.0), &body, &mut bus);
        take(&log);

        let second = ctl.handle_collision(pad_contact(2.0, 0.0), &body, &mut bus);

        assert!(second.is_none());
        assert!(take(&log).is_empty());
    }

    #[test]
    fn game_over_freezes_forces_and_fuel() {
        let (mut ctl, mut body, mut bus, log) = flying();
        ctl.handle_collision(pad_contact(1.0, 0.5), &body, &mut bus);
        take(&log);
        let fuel = ctl.fuel();
        let all = LanderInput {
            up: true,
            left: true,
            right: true,
            burst: true,
        };

        for _ in 0..20 {
            ctl.tick(all, DT, &mut body, &mut bus);
        }

        assert!(body.untouched());
        assert_eq!(ctl.fuel(), fuel);
        assert_eq!(ctl.state(), LanderState::GameOver);
        assert!(take(&log).iter().all(|e| *e == LanderEvent::BeforeForce));
    }

    // ── Overlaps ──────────────────────────────────────────────────────────────

    #[test]
    fn fuel_pickup_refills_clamped_and_destroys() {
        let (mut ctl, _body, mut bus, log) = flying();
        ctl.fuel.consume_fixed(4.0);
        let mut destroyed = 0;

        ctl.handle_overlap(
            OverlapTags {
                fuel_pickup: true,
                coin_pickup: false,
            },
            || destroyed += 1,
            &mut bus,
        );

        assert_eq!(ctl.fuel(), 10.0);
        assert_eq!(destroyed, 1);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn coin_pickup_publishes_and_destroys() {
        let (mut ctl, _body, mut bus, log) = flying();
        let mut destroyed = 0;

        ctl.handle_overlap(
            OverlapTags {
                fuel_pickup: false,
                coin_pickup: true,
            },
            || destroyed += 1,
            &mut bus,
        );

        assert_eq!(destroyed, 1);
        assert_eq!(take(&log), vec![LanderEvent::CoinPickup]);
    }

    #[test]
    fn pickups_are_ignored_after_a_crash() {
        let (mut ctl, body, mut bus, log) = flying();
        ctl.fuel.consume_fixed(4.0);
        let terrain = Contact {
            pad_multiplier: None,
            impact_speed: 2.0,
        };
        ctl.handle_collision(terrain, &body, &mut bus);
        take(&log);
        let mut destroyed = false;

        ctl.handle_overlap(
            OverlapTags {
                fuel_pickup: true,
                coin_pickup: true,
            },
            || destroyed = true,
            &mut bus,
        );

        assert!(!destroyed);
        assert_eq!(ctl.fuel(), 6.0);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn untagged_overlap_is_ignored() {
        let (mut ctl, _body, mut bus, _log) = flying();
        let mut destroyed = false;
        ctl.handle_overlap(OverlapTags::default(), || destroyed = true, &mut bus);
        assert!(!destroyed);
    }

    // ── Restart ───────────────────────────────────────────────────────────────

    #[test]
    fn reset_restores_spawn_values() {
        let (mut ctl, mut body, mut bus, _log) = flying();
        let burst = LanderInput {
            burst: true,
            ..Default::default()
        };
        ctl.tick(burst, DT, &mut body, &mut bus);
        ctl.handle_collision(pad_contact(1.0, 9.0), &body, &mut bus);

        ctl.reset();

        assert_eq!(ctl.state(), LanderState::WaitingToStart);
        assert_eq!(ctl.fuel_normalized(), 1.0);
        assert!(ctl.burst_available());
    }

    #[test]
    fn speed_accessors_read_body_velocity() {
        let ctl = controller();
        let mut body = HeadlessBody::default();
        body.velocity = Vec2::new(1.5, -3.0);
        assert_eq!(ctl.speed_x(&body), 1.5);
        assert_eq!(ctl.speed_y(&body), -3.0);
    }
}
