//! Lander game library
//!
//! A fuel-limited 2D landing game: thrust and a cooldown-gated burst steer a
//! rigid body onto a landing pad, scored by approach angle and speed.

pub mod config;
pub mod constants;
pub mod error;
pub mod lander;
pub mod level;
pub mod session;
pub mod visuals;
