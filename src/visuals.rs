//! Presentation state driven by lander events.
//!
//! Nothing here applies forces.  [`ThrusterVisuals`] and [`BurstFlame`] live
//! on the lander entity and are drawn with gizmos.  A crash hides the lander
//! and takes its body out of the simulation until the next restart.

use crate::lander::{Lander, LanderEvent};
use bevy::prelude::*;
use bevy_rapier2d::prelude::RigidBodyDisabled;
use rand::Rng;

/// Burst flame size at full strength, in lander-local units.
const BURST_FLAME_TARGET_SCALE: Vec2 = Vec2::new(1.5, 4.0);

/// Which thruster plumes are lit this step.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThrusterVisuals {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ThrusterVisuals {
    pub fn apply(&mut self, event: &LanderEvent) {
        match event {
            LanderEvent::BeforeForce => *self = Self::default(),
            LanderEvent::UpForce => {
                *self = Self {
                    left: true,
                    middle: true,
                    right: true,
                }
            }
            // Turning left fires the right-hand thruster and vice versa.
            LanderEvent::LeftForce => self.right = true,
            LanderEvent::RightForce => self.left = true,
            _ => {}
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.middle || self.right
    }
}

/// Decaying flame shown after a burst.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BurstFlame {
    timer: f32,
    duration: f32,
    shake_degrees: f32,
    /// Current size; zero when inactive.
    pub scale: Vec2,
    /// Current wobble around the downward axis, in degrees.
    pub shake: f32,
}

impl BurstFlame {
    pub fn new(duration: f32, shake_degrees: f32) -> Self {
        Self {
            timer: 0.0,
            duration,
            shake_degrees,
            scale: Vec2::ZERO,
            shake: 0.0,
        }
    }

    /// Light the flame at full size.
    pub fn arm(&mut self) {
        self.timer = self.duration;
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Shrink the flame by `elapsed` seconds and pick a new wobble.
    pub fn advance(&mut self, elapsed: f32, rng: &mut impl Rng) {
        self.timer -= elapsed;
        if self.timer > 0.0 {
            let ratio = self.timer / self.duration;
            self.scale = BURST_FLAME_TARGET_SCALE * ratio;
            let amount = self.shake_degrees * ratio;
            self.shake = rng.gen_range(-amount..=amount);
        } else {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.scale = Vec2::ZERO;
        self.shake = 0.0;
    }
}

pub struct VisualsPlugin;

impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                lander_visuals_event_system,
                burst_flame_system,
                draw_lander_visuals_system,
            )
                .chain(),
        );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Update thruster flags, arm the flame and hide the lander on a crash.
pub fn lander_visuals_event_system(
    mut commands: Commands,
    mut events: MessageReader<LanderEvent>,
    mut q: Query<
        (Entity, &mut ThrusterVisuals, &mut BurstFlame, &mut Visibility),
        With<Lander>,
    >,
) {
    let Ok((entity, mut thrusters, mut flame, mut visibility)) = q.single_mut() else {
        return;
    };
    for event in events.read() {
        thrusters.apply(event);
        match event {
            LanderEvent::BurstFlameForce => flame.arm(),
            LanderEvent::Landed(outcome) if outcome.landing_type.is_crash() => {
                *visibility = Visibility::Hidden;
                commands.entity(entity).insert(RigidBodyDisabled);
                info!("Lander destroyed: {:?}", outcome.landing_type);
            }
            _ => {}
        }
    }
}

pub fn burst_flame_system(time: Res<Time>, mut q: Query<&mut BurstFlame>) {
    let mut rng = rand::thread_rng();
    for mut flame in q.iter_mut() {
        if flame.is_active() {
            flame.advance(time.delta_secs(), &mut rng);
        }
    }
}

/// Outline the thruster plumes and burst flame under the lander.
pub fn draw_lander_visuals_system(
    mut gizmos: Gizmos,
    q: Query<(&Transform, &ThrusterVisuals, &BurstFlame, &Visibility), With<Lander>>,
) {
    let Ok((transform, thrusters, flame, visibility)) = q.single() else {
        return;
    };
    if *visibility == Visibility::Hidden {
        return;
    }

    let origin = transform.translation.truncate();
    let rotation = transform.rotation;
    let local = |p: Vec2| origin + rotation.mul_vec3(p.extend(0.0)).truncate();
    let plume = Color::srgb(1.0, 0.6, 0.1);

    for (lit, x) in [
        (thrusters.left, -0.35),
        (thrusters.middle, 0.0),
        (thrusters.right, 0.35),
    ] {
        if lit {
            gizmos.line_2d(local(Vec2::new(x, -0.5)), local(Vec2::new(x, -1.1)), plume);
        }
    }

    if flame.is_active() {
        let length = Vec2::from_angle(flame.shake.to_radians()).rotate(Vec2::new(0.0, -flame.scale.y));
        let half = flame.scale.x * 0.5;
        let base_left = local(Vec2::new(-half, -0.5));
        let base_right = local(Vec2::new(half, -0.5));
        let tip = local(Vec2::new(0.0, -0.5) + length);
        let blue = Color::srgb(0.2, 0.8, 1.0);
        gizmos.line_2d(base_left, tip, blue);
        gizmos.line_2d(base_right, tip, blue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lander::{LandingOutcome, LandingType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn before_force_clears_and_up_lights_all() {
        let mut thrusters = ThrusterVisuals {
            left: true,
            middle: false,
            right: true,
        };
        thrusters.apply(&LanderEvent::BeforeForce);
        assert!(!thrusters.any());

        thrusters.apply(&LanderEvent::UpForce);
        assert!(thrusters.left && thrusters.middle && thrusters.right);
    }

    #[test]
    fn turning_lights_the_opposite_side() {
        let mut thrusters = ThrusterVisuals::default();
        thrusters.apply(&LanderEvent::LeftForce);
        assert_eq!(
            thrusters,
            ThrusterVisuals {
                left: false,
                middle: false,
                right: true
            }
        );

        thrusters.apply(&LanderEvent::BeforeForce);
        thrusters.apply(&LanderEvent::RightForce);
        assert_eq!(
            thrusters,
            ThrusterVisuals {
                left: true,
                middle: false,
                right: false
            }
        );
    }

    #[test]
    fn flame_shrinks_with_bounded_shake_then_goes_out() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut flame = BurstFlame::new(0.4, 5.0);
        flame.arm();

        flame.advance(0.1, &mut rng);
        assert!(flame.is_active());
        assert!((flame.scale - BURST_FLAME_TARGET_SCALE * 0.75).length() < 1e-5);
        assert!(flame.shake.abs() <= 5.0 * 0.75 + 1e-5);

        flame.advance(0.3, &mut rng);
        assert!(!flame.is_active());
        assert_eq!(flame.scale, Vec2::ZERO);
        assert_eq!(flame.shake, 0.0);
    }

    #[test]
    fn crash_hides_and_disables_lander_success_does_not() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<LanderEvent>();
        app.add_systems(Update, lander_visuals_event_system);
        let lander = app
            .world_mut()
            .spawn((
                Lander,
                ThrusterVisuals::default(),
                BurstFlame::new(0.4, 5.0),
                Visibility::default(),
            ))
            .id();

        let landed = |landing_type| {
            LanderEvent::Landed(LandingOutcome {
                landing_type,
                score: 0,
                dot_vector: 1.0,
                landing_speed: 0.0,
                score_multiplier: 0.0,
            })
        };

        app.world_mut().write_message(landed(LandingType::Success));
        app.update();
        assert_eq!(
            *app.world().get::<Visibility>(lander).unwrap(),
            Visibility::Inherited
        );
        assert!(app.world().get::<RigidBodyDisabled>(lander).is_none());

        app.world_mut()
            .write_message(landed(LandingType::TooSteepAngle));
        app.update();
        assert_eq!(
            *app.world().get::<Visibility>(lander).unwrap(),
            Visibility::Hidden
        );
        assert!(app.world().get::<RigidBodyDisabled>(lander).is_some());
    }

    #[test]
    fn burst_flame_force_arms_the_flame() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<LanderEvent>();
        app.add_systems(Update, lander_visuals_event_system);
        let lander = app
            .world_mut()
            .spawn((
                Lander,
                ThrusterVisuals::default(),
                BurstFlame::new(0.4, 5.0),
                Visibility::default(),
            ))
            .id();

        app.world_mut().write_message(LanderEvent::BurstFlameForce);
        app.update();

        assert!(app.world().get::<BurstFlame>(lander).unwrap().is_active());
    }
}
