//! Checks `AvianPhysics` against a real avian spatial query pipeline.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use grapple_fps::{AvianPhysics, GameLayer, PhysicsQuery, RayFilter, player_collider};

const GROUNDED_DISTANCE: f32 = 0.125;
const TRACTION_NORMAL_CUTOFF: f32 = 0.7;

fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        bevy::asset::AssetPlugin::default(),
        bevy::scene::ScenePlugin,
        PhysicsPlugins::default(),
    ));
    app.init_asset::<Mesh>();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));

    app.finish();
    app.cleanup();
    app
}

fn spawn_static(app: &mut App, transform: Transform, collider: Collider) -> Entity {
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Static,
            collider,
        ))
        .id()
}

/// Standing capsule, feet at `feet`.
fn spawn_player(app: &mut App, feet: Vec3) -> (Entity, Transform, Collider) {
    let transform = Transform::from_translation(feet);
    let collider = player_collider(0.5, 2.0, 1.0);
    let entity = app
        .world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Kinematic,
            collider.clone(),
        ))
        .id();
    (entity, transform, collider)
}

/// Lets avian pick up the spawned colliders and rebuild its query pipeline.
fn settle(app: &mut App) {
    for _ in 0..5 {
        app.update();
    }
}

fn physics<'a>(
    app: &'a App,
    entity: Entity,
    transform: &'a mut Transform,
    collider: &'a Collider,
) -> AvianPhysics<'a> {
    AvianPhysics::new(
        app.world().resource::<SpatialQueryPipeline>(),
        entity,
        transform,
        collider,
        GROUNDED_DISTANCE,
        TRACTION_NORMAL_CUTOFF,
    )
}

#[test]
fn hookable_ray_passes_plain_walls_and_never_hits_the_player() {
    let mut app = create_test_app();
    let (player, mut transform, collider) = spawn_player(&mut app, Vec3::ZERO);
    spawn_static(
        &mut app,
        Transform::from_xyz(0.0, 2.0, -5.0),
        Collider::cuboid(4.0, 4.0, 0.5),
    );
    let pillar = Transform::from_xyz(0.0, 3.0, -10.0);
    app.world_mut().spawn((
        pillar,
        GlobalTransform::from(pillar),
        RigidBody::Static,
        Collider::cuboid(2.0, 6.0, 2.0),
        CollisionLayers::new(GameLayer::Hookable, LayerMask::ALL),
    ));
    settle(&mut app);

    let physics = physics(&app, player, &mut transform, &collider);
    let eye = Vec3::new(0.0, 1.5, 0.0);

    let wall = physics
        .raycast(eye, Vec3::NEG_Z, 30.0, RayFilter::Any)
        .expect("the wall is in the way");
    assert!((wall.distance - 4.75).abs() < 1e-3, "{}", wall.distance);

    let hook = physics
        .raycast(eye, Vec3::NEG_Z, 30.0, RayFilter::Hookable)
        .expect("the pillar is hookable");
    assert!((hook.distance - 9.0).abs() < 1e-3, "{}", hook.distance);
    assert!((hook.point - Vec3::new(0.0, 1.5, -9.0)).length() < 1e-3);
    assert!((hook.normal - Vec3::Z).length() < 1e-3, "{}", hook.normal);

    assert!(
        physics
            .raycast(eye, Vec3::NEG_Z, 8.0, RayFilter::Hookable)
            .is_none()
    );
}

#[test]
fn moving_into_a_wall_slides_along_it() {
    let mut app = create_test_app();
    let (player, mut transform, collider) = spawn_player(&mut app, Vec3::ZERO);
    // face at x = 1.5
    spawn_static(
        &mut app,
        Transform::from_xyz(2.0, 1.0, 0.0),
        Collider::cuboid(1.0, 6.0, 20.0),
    );
    settle(&mut app);

    let mut physics = physics(&app, player, &mut transform, &collider);
    let grounded = physics.move_capsule(Vec3::new(2.0, 0.0, -2.0));
    let end = physics.position();

    assert!(!grounded);
    assert!(end.x <= 1.0 + 1e-3, "penetrated the wall: {end}");
    assert!(end.x > 0.9, "stopped short of the wall: {end}");
    assert!(end.z < -1.9, "did not slide: {end}");
    assert!(end.y.abs() < 1e-3, "{end}");
}

#[test]
fn flat_floor_is_ground_and_open_air_is_not() {
    let mut app = create_test_app();
    let (player, _, collider) = spawn_player(&mut app, Vec3::new(0.0, 0.05, 0.0));
    spawn_static(
        &mut app,
        Transform::from_xyz(0.0, -0.5, 0.0),
        Collider::cuboid(20.0, 1.0, 20.0),
    );
    settle(&mut app);

    let mut standing = Transform::from_xyz(0.0, 0.05, 0.0);
    assert!(physics(&app, player, &mut standing, &collider).probe_ground());
    assert!(physics(&app, player, &mut standing, &collider).move_capsule(Vec3::ZERO));

    let mut falling = Transform::from_xyz(0.0, 2.0, 0.0);
    assert!(!physics(&app, player, &mut falling, &collider).probe_ground());
}

/// Feet placed so the bottom sphere hovers 0.05 above a slab tilted by
/// `angle` around Z.
fn hovering_above_slope(angle: f32) -> (App, Entity, Transform, Collider) {
    let mut app = create_test_app();
    let rotation = Quat::from_rotation_z(angle);
    spawn_static(
        &mut app,
        Transform::from_rotation(rotation),
        Collider::cuboid(20.0, 1.0, 20.0),
    );
    let normal = rotation * Vec3::Y;
    let feet = normal * (0.5 + 0.5 + 0.05) - Vec3::Y * 0.5;
    let (player, transform, collider) = spawn_player(&mut app, feet);
    settle(&mut app);
    (app, player, transform, collider)
}

#[test]
fn slopes_past_the_traction_cutoff_are_not_ground() {
    let (app, player, mut transform, collider) = hovering_above_slope(60f32.to_radians());
    assert!(!physics(&app, player, &mut transform, &collider).probe_ground());

    let (app, player, mut transform, collider) = hovering_above_slope(20f32.to_radians());
    assert!(physics(&app, player, &mut transform, &collider).probe_ground());
}
