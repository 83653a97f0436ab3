use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use lander::config::{self, LanderConfig};
use lander::lander::{spawn_lander, LanderPlugin};
use lander::level::spawn_level;
use lander::session::SessionPlugin;
use lander::visuals::VisualsPlugin;

/// Orthographic camera zoomed so a few dozen world units fill the window.
fn setup_camera(mut commands: Commands, config: Res<LanderConfig>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: config.camera_scale,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 10.0, 0.0),
    ));
    info!("Camera spawned");
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Lander".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_lander_config overwrites them from
        // assets/lander.toml (if present) in the Startup schedule.
        .insert_resource(LanderConfig::default())
        // World units are metres.  Forces and torques in the config assume it.
        .add_plugins(
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule(),
        )
        .add_plugins(RapierDebugRenderPlugin::default())
        .add_plugins((LanderPlugin, SessionPlugin, VisualsPlugin))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                config::load_lander_config,
                setup_camera.after(config::load_lander_config),
                spawn_level.after(config::load_lander_config),
                spawn_lander.after(config::load_lander_config),
            ),
        )
        .run();
}
