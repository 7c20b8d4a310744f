//! A small grappling course.
//!
//! - WASD to move, Shift to run, C to crouch, Space to jump
//! - E fires the hook at the orange pillars, E again or Space lets go
//! - Click to capture the mouse, Escape to release it and disable the controller
//!
//! Pass a JSON file as the first argument to override the controller tuning.

use std::f32::consts::TAU;

use avian3d::prelude::*;
use bevy::{prelude::*, render::camera::Exposure, window::CursorGrabMode};
use bevy_framepace::{FramepacePlugin, FramepaceSettings, Limiter};

use grapple_fps::*;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            PhysicsPlugins::default(),
            FramepacePlugin,
            GrappleControllerPlugin,
        ))
        .insert_resource(FramepaceSettings {
            limiter: Limiter::from_framerate(FPS),
        })
        .add_systems(Startup, setup)
        .add_systems(Update, manage_cursor)
        .run();
}

fn load_config() -> ControllerConfig {
    let Some(path) = std::env::args().nth(1) else {
        return ControllerConfig::default();
    };
    match ControllerConfig::load(&path) {
        Ok(config) => {
            info!(%path, "loaded controller config");
            config
        }
        Err(err) => {
            error!(%path, %err, "falling back to default controller config");
            ControllerConfig::default()
        }
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 7.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // The logical player collides and owns the controller; the camera and the
    // rope only follow it.
    let player = match player_bundle(load_config(), Vec3::new(0.0, 0.5, 0.0)) {
        Ok(player) => player,
        Err(err) => {
            error!(%err, "could not spawn the player");
            return;
        }
    };
    let logical_entity = commands.spawn(player).id();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: TAU / 5.0,
            ..default()
        }),
        Exposure::SUNLIGHT,
        RenderPlayer { logical_entity },
    ));

    commands
        .spawn((
            GrapplingHook { logical_entity },
            Transform::default(),
            Visibility::Hidden,
        ))
        .with_children(|hook| {
            hook.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.05, 0.05, 1.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.2, 0.2, 0.2))),
                Transform::from_xyz(0.0, 0.0, -0.5),
            ));
        });

    // floor
    commands.spawn((
        RigidBody::Static,
        Collider::cuboid(100.0, 1.0, 100.0),
        Mesh3d(meshes.add(Cuboid::new(100.0, 1.0, 100.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.7, 0.6))),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    // a low ceiling to crouch under
    commands.spawn((
        RigidBody::Static,
        Collider::cuboid(4.0, 0.5, 4.0),
        Mesh3d(meshes.add(Cuboid::new(4.0, 0.5, 4.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.5, 0.5, 0.55))),
        Transform::from_xyz(6.0, 1.75, 0.0),
    ));

    let hookable = materials.add(Color::srgb(0.9, 0.45, 0.1));
    for (x, z, height) in [(0.0, -20.0, 12.0), (15.0, -12.0, 8.0), (-14.0, 8.0, 16.0)] {
        commands.spawn((
            RigidBody::Static,
            Collider::cuboid(2.0, height, 2.0),
            CollisionLayers::new(GameLayer::Hookable, LayerMask::ALL),
            Mesh3d(meshes.add(Cuboid::new(2.0, height, 2.0))),
            MeshMaterial3d(hookable.clone()),
            Transform::from_xyz(x, height / 2.0, z),
        ));
    }

    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 50.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 15.0, 0.0),
    ));
}

fn manage_cursor(
    btn: Res<ButtonInput<MouseButton>>,
    key: Res<ButtonInput<KeyCode>>,
    mut window_query: Query<&mut Window>,
    mut controller_query: Query<(&mut GrappleController, &mut HookVisualState)>,
) {
    for mut window in &mut window_query {
        if btn.just_pressed(MouseButton::Left) {
            window.cursor_options.grab_mode = CursorGrabMode::Locked;
            window.cursor_options.visible = false;
            for (mut controller, mut visual) in &mut controller_query {
                controller.set_enabled(true, &mut *visual);
            }
        }
        if key.just_pressed(KeyCode::Escape) {
            window.cursor_options.grab_mode = CursorGrabMode::None;
            window.cursor_options.visible = true;
            for (mut controller, mut visual) in &mut controller_query {
                controller.set_enabled(false, &mut *visual);
            }
        }
    }
}
