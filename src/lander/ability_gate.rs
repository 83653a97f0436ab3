//! Periodic availability gate for the burst ability.

use crate::error::{validate_positive, LanderResult};
use serde::Deserialize;

/// When the cooldown timer is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstRecharge {
    /// The timer always runs.  Every period the gate is re-opened, whether or
    /// not the burst was used in between, so a burst fired late in a period
    /// is available again at the next period boundary.
    #[default]
    Continuous,
    /// The timer only runs while the gate is closed, giving a full cooldown
    /// after every burst.
    WhileUnavailable,
}

/// Cooldown gate: open at start, closed by [`Self::consume_availability`],
/// re-opened by [`Self::tick`] at each period boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityGate {
    available: bool,
    timer: f32,
    period: f32,
    recharge: BurstRecharge,
}

impl AbilityGate {
    pub fn new(period: f32, recharge: BurstRecharge) -> LanderResult<Self> {
        validate_positive("burst_cooldown", period)?;
        Ok(Self {
            available: true,
            timer: period,
            period,
            recharge,
        })
    }

    /// Advance the cooldown by `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32) {
        let running = match self.recharge {
            BurstRecharge::Continuous => true,
            BurstRecharge::WhileUnavailable => !self.available,
        };
        if !running {
            return;
        }
        if self.timer > 0.0 {
            self.timer -= elapsed;
        }
        if self.timer <= 0.0 {
            self.timer = self.period;
            self.available = true;
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Close the gate.  Calling this while already closed changes nothing.
    pub fn consume_availability(&mut self) {
        self.available = false;
    }

    /// Seconds until the next period boundary.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.available = true;
        self.timer = self.period;
    }
}
