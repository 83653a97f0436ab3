//! The narrow physics surface the flight controller drives.
//!
//! [`RapierBody`] adapts the lander's Rapier components for the live game.
//! [`HeadlessBody`] integrates nothing; it records what was applied so flight
//! logic can be exercised without a physics pipeline.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Read-only view of a body's pose and motion.
pub trait BodyPose {
    fn position(&self) -> Vec2;
    /// Rotation about +Z in radians.
    fn rotation(&self) -> f32;
    fn linear_velocity(&self) -> Vec2;
    /// Radians per second, counter-clockwise positive.
    fn angular_velocity(&self) -> f32;

    /// Local +Y expressed in world space.
    fn up(&self) -> Vec2 {
        let (sin, cos) = self.rotation().sin_cos();
        Vec2::new(-sin, cos)
    }
}

/// A body the flight controller may push.
pub trait PhysicsBody: BodyPose {
    fn add_force(&mut self, force: Vec2);
    fn add_impulse(&mut self, impulse: Vec2);
    fn add_torque(&mut self, torque: f32);
    fn set_gravity_scale(&mut self, scale: f32);
}

// ── Rapier adapter ────────────────────────────────────────────────────────────

/// Pose read straight from the ECS components.
#[derive(Clone, Copy)]
pub struct RapierPose<'a> {
    pub transform: &'a Transform,
    pub velocity: &'a Velocity,
}

impl BodyPose for RapierPose<'_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn rotation(&self) -> f32 {
        self.transform.rotation.to_euler(EulerRot::ZYX).0
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity.linvel
    }

    fn angular_velocity(&self) -> f32 {
        self.velocity.angvel
    }

    fn up(&self) -> Vec2 {
        self.transform.rotation.mul_vec3(Vec3::Y).truncate()
    }
}

/// Borrowed view over one lander entity's physics components.
///
/// Forces and torque accumulate into `ExternalForce`, which the flight system
/// clears at the start of each tick.  Impulses go to `ExternalImpulse`, which
/// Rapier consumes on the next step.
pub struct RapierBody<'a> {
    pub pose: RapierPose<'a>,
    pub force: &'a mut ExternalForce,
    pub impulse: &'a mut ExternalImpulse,
    pub gravity: &'a mut GravityScale,
}

impl BodyPose for RapierBody<'_> {
    fn position(&self) -> Vec2 {
        self.pose.position()
    }

    fn rotation(&self) -> f32 {
        self.pose.rotation()
    }

    fn linear_velocity(&self) -> Vec2 {
        self.pose.linear_velocity()
    }

    fn angular_velocity(&self) -> f32 {
        self.pose.angular_velocity()
    }

    fn up(&self) -> Vec2 {
        self.pose.up()
    }
}

impl PhysicsBody for RapierBody<'_> {
    fn add_force(&mut self, force: Vec2) {
        self.force.force += force;
    }

    fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse.impulse += impulse;
    }

    fn add_torque(&mut self, torque: f32) {
        self.force.torque += torque;
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity.0 = scale;
    }
}

// ── Headless stand-in ─────────────────────────────────────────────────────────

/// Physics double: holds a pose and velocity, and sums everything applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessBody {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub gravity_scale: f32,
    pub force: Vec2,
    pub impulse: Vec2,
    pub torque: f32,
}

impl HeadlessBody {
    /// True when no force, impulse or torque has been applied.
    pub fn untouched(&self) -> bool {
        self.force == Vec2::ZERO && self.impulse == Vec2::ZERO && self.torque == 0.0
    }
}

impl BodyPose for HeadlessBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }
}

impl PhysicsBody for HeadlessBody {
    fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    fn add_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }
}
