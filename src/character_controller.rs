use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    AvianPhysics, ConfigError, ControllerConfig, ControllerInput, ControllerKeys, GrappleController,
    HookVisual, InputPlugin, player_collider,
};

/// Runs the grapple controllers. Input is sampled in `PreUpdate`, the
/// controller ticks in `FixedUpdate` and the camera and hook follow in `Update`.
///
/// If you need a system to observe the controller after it moved, order it
/// after [`grapple_controller_tick`]:
///
/// ```
/// # use bevy::prelude::*;
///
/// struct MyPlugin;
/// impl Plugin for MyPlugin {
///     fn build(&self, app: &mut App) {
///         app.add_systems(
///             FixedUpdate,
///             my_system.after(grapple_fps::grapple_controller_tick),
///         );
///     }
/// }
///
/// fn my_system() { }
/// ```
pub struct GrappleControllerPlugin;

pub static FPS: f64 = 96.0;

impl Plugin for GrappleControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputPlugin)
            .insert_resource(Time::<Fixed>::from_hz(FPS))
            .add_systems(FixedUpdate, grapple_controller_tick)
            .add_systems(Update, grapple_controller_render);
    }
}

/// The entity that owns the controller and collides with the world.
#[derive(Component)]
pub struct LogicalPlayer;

/// Camera that follows a [`LogicalPlayer`].
#[derive(Component)]
pub struct RenderPlayer {
    pub logical_entity: Entity,
}

/// Rope renderable of a [`LogicalPlayer`]. Its local -Z axis spans one unit
/// of rope, so the entity is stretched along Z by the rope extent.
#[derive(Component)]
pub struct GrapplingHook {
    pub logical_entity: Entity,
}

/// Last hook visual written by the controller, applied by the render system.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct HookVisualState {
    pub active: bool,
    pub scale: Vec3,
    pub look_at: Vec3,
}

impl HookVisual for HookVisualState {
    fn set_hook_visual(&mut self, active: bool, scale: Vec3, look_at: Vec3) {
        self.active = active;
        self.scale = scale;
        self.look_at = look_at;
    }
}

/// Everything a logical player needs, standing with its feet at `position`.
pub fn player_bundle(config: ControllerConfig, position: Vec3) -> Result<impl Bundle, ConfigError> {
    let controller = GrappleController::new(config)?;
    let stance = *controller.stance();
    Ok((
        LogicalPlayer,
        RigidBody::Kinematic,
        player_collider(
            controller.config().capsule_radius,
            stance.height(),
            stance.center(),
        ),
        Transform::from_translation(position),
        controller,
        ControllerInput::default(),
        ControllerKeys::default(),
        HookVisualState::default(),
    ))
}

// Smallest scale handed to the renderer, a zero scale breaks normal matrices.
const MIN_HOOK_SCALE: f32 = 1e-3;

// The rope leaves slightly below the eye.
const ROPE_DROP: f32 = 0.3;

pub fn grapple_controller_tick(
    time: Res<Time>,
    spatial_query_pipeline: Res<SpatialQueryPipeline>,
    mut query: Query<
        (
            Entity,
            &mut GrappleController,
            &mut ControllerInput,
            &mut HookVisualState,
            &mut Collider,
            &mut Transform,
        ),
        With<LogicalPlayer>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, mut controller, mut input, mut visual, mut collider, mut transform) in
        query.iter_mut()
    {
        let height_before = controller.stance().height();
        let grounded_distance = controller.config().grounded_distance;
        let traction_normal_cutoff = controller.config().traction_normal_cutoff;

        {
            let mut physics = AvianPhysics::new(
                &spatial_query_pipeline,
                entity,
                &mut transform,
                &collider,
                grounded_distance,
                traction_normal_cutoff,
            );
            controller.tick(dt, &*input, &mut physics, &mut *visual);
        }
        input.consume();

        transform.rotation = controller.body_rotation();

        let stance = *controller.stance();
        if stance.height() != height_before {
            *collider = player_collider(
                controller.config().capsule_radius,
                stance.height(),
                stance.center(),
            );
        }
    }
}

pub fn grapple_controller_render(
    logical_query: Query<
        (&Transform, &GrappleController, &HookVisualState),
        (With<LogicalPlayer>, Without<RenderPlayer>, Without<GrapplingHook>),
    >,
    mut render_query: Query<(&mut Transform, &RenderPlayer), Without<GrapplingHook>>,
    mut hook_query: Query<(&mut Transform, &mut Visibility, &GrapplingHook), Without<RenderPlayer>>,
) {
    for (mut render_transform, render_player) in render_query.iter_mut() {
        if let Ok((logical_transform, controller, _)) =
            logical_query.get(render_player.logical_entity)
        {
            render_transform.translation = controller.camera_position(logical_transform.translation);
            render_transform.rotation = controller.body_rotation() * controller.camera_tilt();
        }
    }

    for (mut hook_transform, mut visibility, hook) in hook_query.iter_mut() {
        let Ok((logical_transform, controller, visual)) = logical_query.get(hook.logical_entity)
        else {
            continue;
        };
        if !visual.active {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Inherited;
        hook_transform.translation =
            controller.camera_position(logical_transform.translation) - Vec3::Y * ROPE_DROP;
        hook_transform.look_at(visual.look_at, Dir3::Y);
        hook_transform.scale = visual.scale.max(Vec3::splat(MIN_HOOK_SCALE));
    }
}
