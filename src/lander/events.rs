//! Lander notifications and the observer list that fans them out.
//!
//! The flight controller publishes every [`LanderEvent`] through an
//! [`EventBus`].  Observers subscribe explicitly with [`EventBus::attach`]
//! and unsubscribe with [`EventBus::detach`]; nothing is broadcast to code
//! that did not ask for it.
//!
//! Inside the Bevy app the bus is a resource created with
//! [`EventBus::with_message_relay`].  Published events are then also queued
//! for [`super::systems::relay_lander_events_system`], which forwards them as
//! Bevy messages so ECS collaborators can read them with
//! `MessageReader<LanderEvent>`.

use super::landing::LandingOutcome;
use bevy::prelude::*;

/// Lifecycle state of the lander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanderState {
    /// Floating at the spawn point with gravity off, waiting for input.
    #[default]
    WaitingToStart,
    /// In flight.
    Normal,
    /// Touched down or crashed.  Terminal until a restart.
    GameOver,
}

/// Everything the flight controller announces.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum LanderEvent {
    /// Start of every tick, before any force is applied.
    BeforeForce,
    UpForce,
    LeftForce,
    RightForce,
    BurstForce,
    BurstFlameForce,
    CoinPickup,
    StateChanged { state: LanderState },
    Landed(LandingOutcome),
}

/// Handle returned by [`EventBus::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receives lander events.  Implemented for any `FnMut(&LanderEvent)`.
pub trait LanderObserver: Send + Sync + 'static {
    fn on_event(&mut self, event: &LanderEvent);
}

impl<F> LanderObserver for F
where
    F: FnMut(&LanderEvent) + Send + Sync + 'static,
{
    fn on_event(&mut self, event: &LanderEvent) {
        self(event)
    }
}

/// Typed observer list.
#[derive(Resource, Default)]
pub struct EventBus {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn LanderObserver>)>,
    /// `Some` when events should also be relayed as Bevy messages.
    relay: Option<Vec<LanderEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that additionally queues every published event for the
    /// message relay system.
    pub fn with_message_relay() -> Self {
        Self {
            relay: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn attach(&mut self, observer: impl LanderObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscription.  Returns `false` if `id` was not attached.
    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Deliver `event` to every observer in attach order.
    pub fn publish(&mut self, event: LanderEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(&event);
        }
        if let Some(queue) = self.relay.as_mut() {
            queue.push(event);
        }
    }

    /// Take every event queued for the message relay since the last drain.
    pub fn drain_relay(&mut self) -> Vec<LanderEvent> {
        self.relay.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
