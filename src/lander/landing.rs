//! Touchdown classification and scoring.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Not a landing pad → [`LandingType::WrongLandingArea`]
//! 2. Impact speed above `soft_landing_speed` → [`LandingType::TooFastLanding`]
//! 3. `dot(world_up, lander_up)` below `min_landing_dot` → [`LandingType::TooSteepAngle`]
//! 4. Otherwise → [`LandingType::Success`]
//!
//! A successful landing scores
//! `round((angle_score + speed_score) × pad_multiplier)` where
//!
//! | Term          | Formula                                              |
//! |---------------|------------------------------------------------------|
//! | `angle_score` | `max_angle_score − abs(dot − 1) × dot_multiplier × max_angle_score` |
//! | `speed_score` | `(soft_landing_speed − speed) × speed_score_per_unit` |
//!
//! Rounding sends exact halves to the even neighbour.

use crate::constants::{
    ANGLE_SCORE_DOT_MULTIPLIER, MAX_ANGLE_SCORE, MIN_LANDING_DOT, SOFT_LANDING_SPEED,
    SPEED_SCORE_PER_UNIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandingType {
    Success,
    WrongLandingArea,
    TooSteepAngle,
    TooFastLanding,
}

impl LandingType {
    #[inline]
    pub fn is_crash(self) -> bool {
        self != LandingType::Success
    }
}

/// Result of a single touchdown, published with [`super::LanderEvent::Landed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingOutcome {
    pub landing_type: LandingType,
    pub score: i32,
    /// Cosine of the tilt at touchdown.  0 when the check never got that far.
    pub dot_vector: f32,
    /// Impact speed.  0 for a terrain crash.
    pub landing_speed: f32,
    /// The pad's multiplier on success, 0 otherwise.
    pub score_multiplier: f32,
}

/// Thresholds and weights for [`evaluate_landing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingRules {
    pub soft_landing_speed: f32,
    pub min_landing_dot: f32,
    pub max_angle_score: f32,
    pub angle_score_dot_multiplier: f32,
    pub speed_score_per_unit: f32,
}

impl Default for LandingRules {
    fn default() -> Self {
        Self {
            soft_landing_speed: SOFT_LANDING_SPEED,
            min_landing_dot: MIN_LANDING_DOT,
            max_angle_score: MAX_ANGLE_SCORE,
            angle_score_dot_multiplier: ANGLE_SCORE_DOT_MULTIPLIER,
            speed_score_per_unit: SPEED_SCORE_PER_UNIT,
        }
    }
}

/// What the lander touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// `Some(score_multiplier)` when the other body is a landing pad.
    pub pad_multiplier: Option<f32>,
    /// Relative speed of the two bodies at impact.
    pub impact_speed: f32,
}

impl LandingRules {
    pub fn angle_score(&self, dot_vector: f32) -> f32 {
        self.max_angle_score
            - (dot_vector - 1.0).abs() * self.angle_score_dot_multiplier * self.max_angle_score
    }

    pub fn speed_score(&self, impact_speed: f32) -> f32 {
        (self.soft_landing_speed - impact_speed) * self.speed_score_per_unit
    }
}

/// Classify a touchdown.  `dot_vector` is `dot(world_up, lander_up)`.
pub fn evaluate_landing(rules: &LandingRules, contact: Contact, dot_vector: f32) -> LandingOutcome {
    let Some(multiplier) = contact.pad_multiplier else {
        return LandingOutcome {
            landing_type: LandingType::WrongLandingArea,
            score: 0,
            dot_vector: 0.0,
            landing_speed: 0.0,
            score_multiplier: 0.0,
        };
    };

    let speed = contact.impact_speed;
    if speed > rules.soft_landing_speed {
        return LandingOutcome {
            landing_type: LandingType::TooFastLanding,
            score: 0,
            dot_vector: 0.0,
            landing_speed: speed,
            score_multiplier: 0.0,
        };
    }

    if dot_vector < rules.min_landing_dot {
        return LandingOutcome {
            landing_type: LandingType::TooSteepAngle,
            score: 0,
            dot_vector,
            landing_speed: speed,
            score_multiplier: 0.0,
        };
    }

    let raw = (rules.angle_score(dot_vector) + rules.speed_score(speed)) * multiplier;
    LandingOutcome {
        landing_type: LandingType::Success,
        score: raw.round_ties_even() as i32,
        dot_vector,
        landing_speed: speed,
        score_multiplier: multiplier,
    }
}
