//! Bounded, depletable fuel store.

use crate::error::{validate_positive, LanderResult};

/// Fuel tank with a fixed capacity.
///
/// The stored amount always stays inside `[0, max]`: consumption floors at
/// zero and refills clamp at the capacity.  Neither is an error; running dry
/// is normal play.
///
/// Continuous thrust and the burst drain fuel through different entry points
/// ([`Self::consume_rate`] and [`Self::consume_fixed`]) so the caller states
/// which kind of cost it is paying.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePool {
    amount: f32,
    max: f32,
}

impl ResourcePool {
    /// A full pool holding `max` units.  `max` must be finite and positive.
    pub fn new(max: f32) -> LanderResult<Self> {
        validate_positive("fuel_max", max)?;
        Ok(Self { amount: max, max })
    }

    /// Drain `per_second × elapsed` units (continuous thrust).
    pub fn consume_rate(&mut self, per_second: f32, elapsed: f32) {
        self.consume_fixed(per_second * elapsed);
    }

    /// Drain a flat `amount` (one-off costs such as the burst).
    ///
    /// Negative or NaN amounts drain nothing.
    pub fn consume_fixed(&mut self, amount: f32) {
        self.amount = (self.amount - amount.max(0.0)).clamp(0.0, self.max);
    }

    /// Add `amount`, clamped to the capacity.  Negative or NaN amounts add nothing.
    pub fn refill(&mut self, amount: f32) {
        self.amount = (self.amount + amount.max(0.0)).clamp(0.0, self.max);
    }

    /// Back to a full pool.
    pub fn reset(&mut self) {
        self.amount = self.max;
    }

    #[inline]
    pub fn amount(&self) -> f32 {
        self.amount
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fill level in `[0, 1]`.
    #[inline]
    pub fn normalized(&self) -> f32 {
        self.amount / self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amount <= 0.0
    }
}
