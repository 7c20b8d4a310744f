use bevy::log::{debug, info};
use bevy::math::{Quat, Vec2, Vec3};
use bevy::prelude::Component;

use crate::{
    Action, CameraOrientation, ConfigError, ControllerConfig, CrouchController,
    GravityIntegrator, HookVisual, InputAxis, InputSource, MoveBasis, MovementSolver,
    PhysicsQuery, RayFilter, select_speed,
};

/// Anchor and rope length of an active hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grapple {
    pub anchor: Vec3,
    pub rope_extent: f32,
}

/// Top-level state of the player. The grapple only exists while a hook is out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PlayerState {
    #[default]
    Normal,
    /// The rope is flying toward the anchor while the player moves freely.
    HookThrown(Grapple),
    /// The rope reels the player in; normal movement is suspended.
    HookFlyingPlayer(Grapple),
}

impl PlayerState {
    pub fn grapple(&self) -> Option<&Grapple> {
        match self {
            PlayerState::Normal => None,
            PlayerState::HookThrown(grapple) | PlayerState::HookFlyingPlayer(grapple) => {
                Some(grapple)
            }
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, PlayerState::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Arrived,
    Manual,
    Jump,
}

/// First-person controller with a grappling hook.
///
/// All player state lives here and only [`GrappleController::tick`] and the
/// reset path mutate it.
#[derive(Component, Debug, Clone)]
pub struct GrappleController {
    config: ControllerConfig,
    state: PlayerState,
    camera: CameraOrientation,
    movement: MovementSolver,
    gravity: GravityIntegrator,
    stance: CrouchController,
    grounded: bool,
    sprinting: bool,
    jumping: bool,
    enabled: bool,
}

impl Default for GrappleController {
    fn default() -> Self {
        Self::with_valid_config(ControllerConfig::default())
    }
}

impl GrappleController {
    /// Rejects configs that [`ControllerConfig::validate`] refuses, so a
    /// running controller never sees a limit it cannot honour.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ControllerConfig) -> Self {
        let stance = CrouchController::new(&config);
        Self {
            config,
            state: PlayerState::Normal,
            camera: CameraOrientation::default(),
            movement: MovementSolver::default(),
            gravity: GravityIntegrator::default(),
            stance,
            grounded: false,
            sprinting: false,
            jumping: false,
            enabled: true,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn camera(&self) -> &CameraOrientation {
        &self.camera
    }

    pub fn stance(&self) -> &CrouchController {
        &self.stance
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.gravity.velocity()
    }

    pub fn momentum(&self) -> Vec3 {
        self.movement.momentum()
    }

    pub fn current_dir(&self) -> Vec2 {
        self.movement.current_dir()
    }

    /// Result of the most recent capsule move.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// True only on the tick a ground jump fired.
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_crouching(&self) -> bool {
        self.stance.is_crouching()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn body_rotation(&self) -> Quat {
        self.camera.body_rotation()
    }

    pub fn camera_tilt(&self) -> Quat {
        self.camera.camera_tilt()
    }

    pub fn camera_offset(&self) -> f32 {
        self.stance.camera_offset()
    }

    pub fn camera_forward(&self) -> Vec3 {
        self.camera.camera_forward()
    }

    pub fn camera_position(&self, body_position: Vec3) -> Vec3 {
        body_position + Vec3::Y * self.stance.camera_offset()
    }

    /// Disabling forces the player back to a neutral state. A disabled
    /// controller ignores ticks until it is enabled again.
    pub fn set_enabled(&mut self, enabled: bool, visual: &mut impl HookVisual) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        info!(enabled, "grapple controller toggled");
        if !enabled {
            self.force_reset(visual);
        }
    }

    /// Drops any hook, hides the visual and clears all carried velocity.
    pub fn force_reset(&mut self, visual: &mut impl HookVisual) {
        debug!(state = ?self.state, "forced reset");
        self.state = PlayerState::Normal;
        hide_hook(visual);
        self.gravity.reset();
        self.movement.reset();
        self.sprinting = false;
        self.jumping = false;
    }

    pub fn tick(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        physics: &mut impl PhysicsQuery,
        visual: &mut impl HookVisual,
    ) {
        if !self.enabled || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.look(input, dt);
        match self.state {
            PlayerState::Normal => {
                self.locomotion(input, physics, dt);
                self.fire_hook(input, &*physics, visual);
            }
            PlayerState::HookThrown(grapple) => {
                self.locomotion(input, physics, dt);
                self.extend_rope(grapple, &*physics, visual, dt);
            }
            PlayerState::HookFlyingPlayer(grapple) => {
                self.jumping = false;
                self.reel_in(grapple, input, physics, visual, dt);
            }
        }
    }

    fn look(&mut self, input: &impl InputSource, dt: f32) {
        let delta = Vec2::new(input.axis(InputAxis::LookX), input.axis(InputAxis::LookY));
        self.camera.tick(
            delta,
            dt,
            self.config.mouse_sensitivity,
            self.config.pitch_limit,
        );
    }

    /// Speed selection, crouch, move, gravity and jump, in that order.
    fn locomotion(&mut self, input: &impl InputSource, physics: &mut impl PhysicsQuery, dt: f32) {
        let crouch_held = input.is_held(Action::Crouch);
        let camera_position = self.camera_position(physics.position());
        let overhead_blocked = physics
            .raycast(
                camera_position,
                Vec3::Y,
                self.config.ceiling_probe_distance,
                RayFilter::Any,
            )
            .is_some();
        let crouching = self
            .stance
            .tick(crouch_held, overhead_blocked, dt, &self.config);

        let (speed, sprinting) = select_speed(
            &self.config,
            input.is_held(Action::Sprint),
            crouching,
            self.grounded,
        );
        self.sprinting = sprinting;

        let raw = Vec2::new(
            input.axis(InputAxis::Horizontal),
            input.axis(InputAxis::Vertical),
        );
        let basis = MoveBasis {
            forward: self.camera.body_forward(),
            right: self.camera.body_right(),
        };
        let displacement = self.movement.step(
            raw,
            basis,
            speed,
            self.gravity.velocity(),
            self.grounded,
            dt,
            &self.config,
        );
        self.grounded = physics.move_capsule(displacement);

        self.gravity.tick(
            self.grounded,
            dt,
            self.config.gravity,
            self.config.grounded_bias,
        );

        self.jumping = input.just_pressed(Action::Jump) && self.grounded;
        if self.jumping {
            self.gravity.set_velocity(self.config.jump_height);
        }
    }

    fn fire_hook(
        &mut self,
        input: &impl InputSource,
        physics: &impl PhysicsQuery,
        visual: &mut impl HookVisual,
    ) {
        if !input.just_pressed(Action::FireHook) {
            return;
        }
        let origin = self.camera_position(physics.position());
        let Some(hit) = physics.raycast(
            origin,
            self.camera.camera_forward(),
            self.config.hook_max_distance,
            RayFilter::Hookable,
        ) else {
            debug!("hook missed");
            return;
        };

        debug!(
            anchor = ?hit.point,
            normal = ?hit.normal,
            distance = hit.distance,
            "hook thrown"
        );
        visual.set_hook_visual(true, Vec3::ZERO, hit.point);
        self.state = PlayerState::HookThrown(Grapple {
            anchor: hit.point,
            rope_extent: 0.0,
        });
    }

    fn extend_rope(
        &mut self,
        mut grapple: Grapple,
        physics: &impl PhysicsQuery,
        visual: &mut impl HookVisual,
        dt: f32,
    ) {
        grapple.rope_extent += self.config.hook_throw_speed * dt;
        let distance = physics.position().distance(grapple.anchor);

        if grapple.rope_extent >= distance {
            grapple.rope_extent = distance;
            debug!(anchor = ?grapple.anchor, "hook attached");
            self.gravity.reset();
            self.state = PlayerState::HookFlyingPlayer(grapple);
        } else {
            self.state = PlayerState::HookThrown(grapple);
        }
        show_rope(visual, &grapple);
    }

    fn reel_in(
        &mut self,
        mut grapple: Grapple,
        input: &impl InputSource,
        physics: &mut impl PhysicsQuery,
        visual: &mut impl HookVisual,
        dt: f32,
    ) {
        let pull_speed = self.config.hook_pull_speed;
        let direction = (grapple.anchor - physics.position()).normalize_or_zero();

        self.grounded = physics.move_capsule(direction * pull_speed * dt);
        grapple.rope_extent = (grapple.rope_extent - pull_speed * dt).max(0.0);
        self.state = PlayerState::HookFlyingPlayer(grapple);
        show_rope(visual, &grapple);

        let arrived =
            physics.position().distance(grapple.anchor) <= self.config.hook_release_distance;
        let release = if arrived {
            Some(Release::Arrived)
        } else if input.just_pressed(Action::FireHook) {
            Some(Release::Manual)
        } else if input.just_pressed(Action::Jump) {
            Some(Release::Jump)
        } else {
            None
        };
        let Some(release) = release else {
            return;
        };

        self.release(visual, release);
        let mut momentum = direction * pull_speed;
        if release == Release::Jump {
            momentum += Vec3::Y * self.config.hook_jump_launch_speed;
        }
        self.movement.set_momentum(momentum);
    }

    fn release(&mut self, visual: &mut impl HookVisual, reason: Release) {
        debug!(?reason, "hook released");
        self.state = PlayerState::Normal;
        hide_hook(visual);
        self.gravity.reset();
    }
}

fn show_rope(visual: &mut impl HookVisual, grapple: &Grapple) {
    visual.set_hook_visual(true, Vec3::new(1.0, 1.0, grapple.rope_extent), grapple.anchor);
}

fn hide_hook(visual: &mut impl HookVisual) {
    visual.set_hook_visual(false, Vec3::ZERO, Vec3::ZERO);
}
