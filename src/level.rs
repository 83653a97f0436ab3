//! Level layout: terrain, landing pads and pickups built from [`LanderConfig`].
//!
//! Every entity spawned here carries [`LevelEntity`] so a restart can clear
//! the level and rebuild it, bringing collected pickups back.  Shapes are
//! drawn by Rapier's debug renderer.

use crate::config::LanderConfig;
use crate::lander::{CoinPickup, FuelPickup, LandingPad};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Tag for everything [`spawn_level`] creates.
#[derive(Component)]
pub struct LevelEntity;

/// Startup system wrapper around [`build_level`].
pub fn spawn_level(mut commands: Commands, config: Res<LanderConfig>) {
    build_level(&mut commands, &config);
}

/// Spawn terrain, pads and pickups.  A pad with an invalid multiplier is
/// reported and skipped.
pub fn build_level(commands: &mut Commands, config: &LanderConfig) {
    for block in &config.terrain {
        commands.spawn((
            LevelEntity,
            RigidBody::Fixed,
            Collider::cuboid(block.half_width, block.half_height),
            Transform::from_xyz(block.x, block.y, 0.0),
        ));
    }

    for (index, pad) in config.pads.iter().enumerate() {
        let landing_pad = match LandingPad::new(index, pad.score_multiplier) {
            Ok(landing_pad) => landing_pad,
            Err(e) => {
                error!("Skipping pad: {e}");
                continue;
            }
        };
        commands.spawn((
            LevelEntity,
            landing_pad,
            RigidBody::Fixed,
            Collider::cuboid(pad.half_width, 0.25),
            Transform::from_xyz(pad.x, pad.y, 0.0),
        ));
    }

    for pickup in &config.fuel_pickups {
        commands.spawn((
            LevelEntity,
            FuelPickup,
            Sensor,
            Collider::ball(config.pickup_radius),
            Transform::from_xyz(pickup.x, pickup.y, 0.0),
        ));
    }

    for coin in &config.coins {
        commands.spawn((
            LevelEntity,
            CoinPickup,
            Sensor,
            Collider::ball(config.pickup_radius),
            Transform::from_xyz(coin.x, coin.y, 0.0),
        ));
    }

    debug!(
        "Level built: {} terrain, {} pads, {} fuel, {} coins",
        config.terrain.len(),
        config.pads.len(),
        config.fuel_pickups.len(),
        config.coins.len()
    );
}

/// Despawn every [`LevelEntity`] and build the layout again.
pub fn rebuild_level(
    commands: &mut Commands,
    config: &LanderConfig,
    existing: impl IntoIterator<Item = Entity>,
) {
    for entity in existing {
        commands.entity(entity).despawn();
    }
    build_level(commands, config);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_app(config: LanderConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_systems(Startup, spawn_level);
        app.update();
        app
    }

    fn count<T: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<T>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn default_layout_spawns_every_piece() {
        let mut app = build_app(LanderConfig::default());
        assert_eq!(count::<LandingPad>(&mut app), 1);
        assert_eq!(count::<FuelPickup>(&mut app), 1);
        assert_eq!(count::<CoinPickup>(&mut app), 1);
        // terrain + pad + fuel + coin
        assert_eq!(count::<LevelEntity>(&mut app), 4);
    }

    #[test]
    fn pad_carries_configured_multiplier() {
        let mut app = build_app(LanderConfig::default());
        let pad = app
            .world_mut()
            .query::<&LandingPad>()
            .single(app.world())
            .unwrap();
        assert_eq!(pad.score_multiplier(), 2.0);
    }

    #[test]
    fn invalid_pad_is_skipped() {
        let mut config = LanderConfig::default();
        config.pads[0].score_multiplier = -1.0;
        let mut app = build_app(config);
        assert_eq!(count::<LandingPad>(&mut app), 0);
        assert_eq!(count::<LevelEntity>(&mut app), 3);
    }

    #[test]
    fn rebuild_restores_collected_pickups() {
        let mut app = build_app(LanderConfig::default());
        let coin = app
            .world_mut()
            .query_filtered::<Entity, With<CoinPickup>>()
            .single(app.world())
            .unwrap();
        app.world_mut().despawn(coin);
        assert_eq!(count::<CoinPickup>(&mut app), 0);

        app.add_systems(
            Update,
            |mut commands: Commands, config: Res<LanderConfig>, q: Query<Entity, With<LevelEntity>>| {
                rebuild_level(&mut commands, &config, q.iter());
            },
        );
        app.update();

        assert_eq!(count::<CoinPickup>(&mut app), 1);
        assert_eq!(count::<LevelEntity>(&mut app), 4);
    }
}
