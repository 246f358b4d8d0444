use std::f32::consts::{FRAC_PI_2, PI};

use avian3d::prelude::*;
use bevy::light::CascadeShadowConfigBuilder;
use bevy::post_process::bloom::Bloom;
use bevy::{math::Affine2, prelude::*};
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use bevy_kira_audio::prelude::*;

use crate::assets::*;
use crate::camera::{CameraPresets, CameraRig, CameraRigPlugin};
use crate::follower::FollowerPlugin;
use crate::hud::HudPlugin;
use crate::shoot::{ClickableTarget, ShootPlugin, TracerLight};
use crate::targeting::TargetingPlugin;
use crate::turret::{Turret, TurretPlugin};

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(avian3d::prelude::PhysicsPlugins::default());
        //app.add_plugins(avian3d::prelude::PhysicsDebugPlugin::default());
        app.add_plugins(EguiPlugin::default());

        #[cfg(not(target_arch = "wasm32"))]
        app.add_plugins(WorldInspectorPlugin::new());

        app.add_plugins(AudioPlugin);
        app.add_plugins(crate::assets::AssetPlugin);
        app.add_plugins(CameraRigPlugin);
        app.add_plugins(FollowerPlugin);
        app.add_plugins(TurretPlugin);
        app.add_plugins(TargetingPlugin);
        app.add_plugins(ShootPlugin);
        app.add_plugins(HudPlugin);
        app.insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)));
        app.add_systems(OnEnter(MyStates::Next), setup);
    }
}

/// Set up the firing range: floor, turret hierarchy, targets, camera.
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ambient_light: ResMut<AmbientLight>,
    assets: Res<GameAssets>,
) {
    ambient_light.brightness = 90.0;

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 2.0, 0.0),
            rotation: Quat::from_rotation_x(-PI / 4.),
            ..default()
        },
        // The default cascade config is designed to handle large scenes.
        // The range is small, so tighten the shadow bounds for quality.
        CascadeShadowConfigBuilder {
            first_cascade_far_bound: 4.0,
            maximum_distance: 100.0,
            ..default()
        }
        .build(),
    ));

    // range floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.1, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(assets.paving_stones.clone()),
            uv_transform: Affine2::from_scale(Vec2::new(8.0, 8.0)),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Name::new("Floor"),
        RigidBody::Static,
        Collider::cuboid(40.0, 0.1, 40.0),
    ));

    spawn_turret(&mut commands, meshes.as_mut(), materials.as_mut());
    spawn_targets(&mut commands, meshes.as_mut(), materials.as_mut());

    // a named non-target behind the targets, so stray clicks have something
    // to be rejected against
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(24.0, 5.0, 0.6))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.35, 0.38),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, 2.5, -16.0),
        Name::new("Backstop"),
        RigidBody::Static,
        Collider::cuboid(24.0, 5.0, 0.6),
    ));

    // Parked below the floor until a shot attaches it to a cannonball.
    commands.spawn((
        PointLight {
            intensity: light_consts::lumens::LUMENS_PER_LED_WATTS * 80.0,
            color: Color::srgb(1.0, 0.8, 0.4),
            shadows_enabled: false,
            ..default()
        },
        TracerLight,
        Name::new("Tracer Light"),
        Transform::from_xyz(0.0, -10.0, 0.0),
    ));

    let presets = vec![
        // home: behind the turret, looking down range
        Transform::from_xyz(0.0, 4.5, 20.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
        // aim view: over the targets
        Transform::from_xyz(7.0, 6.0, -4.0).looking_at(Vec3::new(0.0, 1.5, -11.0), Vec3::Y),
        // side overview
        Transform::from_xyz(-16.0, 9.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ];

    commands.spawn((
        Camera3d::default(),
        CameraRig::default(),
        presets[0],
        Bloom::NATURAL,
        Name::new("Game Camera"),
    ));
    commands.insert_resource(CameraPresets(presets));
}

fn spawn_turret(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let metal = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.27, 0.3),
        perceptual_roughness: 0.6,
        metallic: 0.8,
        ..default()
    });

    let base = commands
        .spawn((
            Mesh3d(meshes.add(Cylinder::new(0.8, 0.5))),
            MeshMaterial3d(metal.clone()),
            Transform::from_xyz(0.0, 0.3, 12.0),
            Name::new("Turret Base"),
            RigidBody::Static,
            Collider::cylinder(0.8, 0.5),
        ))
        .id();

    // Authored facing down range (-Z is heading -90) with the barrel tilted
    // 10 degrees up; the turret state picks these angles up on spawn.
    let yaw_node = commands
        .spawn((
            Transform::from_xyz(0.0, 0.4, 0.0)
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            InheritedVisibility::default(),
            Name::new("Yaw Pivot"),
            ChildOf(base),
        ))
        .id();

    // The pivot's local +X is the firing direction; pitching is a roll
    // around Z. It sits on the yaw axis so its world position is fixed.
    let pitch_node = commands
        .spawn((
            Transform::from_xyz(0.0, 0.3, 0.0)
                .with_rotation(Quat::from_rotation_z(10f32.to_radians())),
            InheritedVisibility::default(),
            Name::new("Pitch Pivot"),
            ChildOf(yaw_node),
        ))
        .id();

    // Cylinder mesh runs along +Y; lay it along the pivot's +X.
    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(0.15, 1.8))),
        MeshMaterial3d(metal),
        Transform::from_xyz(0.7, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_z(-FRAC_PI_2)),
        Name::new("Barrel"),
        ChildOf(pitch_node),
    ));

    commands.spawn((Turret::new(yaw_node, pitch_node), Name::new("Turret")));
}

fn spawn_targets(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    for i in 0..4 {
        let jitter = rand::random::<f32>() * 1.5;
        let x = -6.0 + 4.0 * i as f32;
        let z = -9.0 - jitter * 2.0;

        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(1.2, 2.4, 1.2))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.2, 0.15),
                perceptual_roughness: 0.8,
                ..default()
            })),
            Transform::from_xyz(x, 1.2 + jitter, z),
            Name::new("Target"),
            ClickableTarget,
            RigidBody::Static,
            Collider::cuboid(1.2, 2.4, 1.2),
        ));
    }
}
