//! Capabilities the controller consumes from the engine around it.
//!
//! The controller never reads global input or physics state: a tick is handed
//! an [`InputSource`], a [`PhysicsQuery`] and a [`HookVisual`], which lets the
//! whole state machine run against scripted input and a fake world in tests.

use bevy::math::Vec3;

/// Continuous input axes, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAxis {
    LookX,
    LookY,
    /// Strafe, right is positive.
    Horizontal,
    /// Walk, forward is positive.
    Vertical,
}

/// Discrete actions with a held level and a pressed-this-tick edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Sprint,
    Crouch,
    Jump,
    FireHook,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Sprint, Action::Crouch, Action::Jump, Action::FireHook];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

pub trait InputSource {
    fn axis(&self, axis: InputAxis) -> f32;
    fn is_held(&self, action: Action) -> bool;
    /// Rising edge, already debounced for the current tick.
    fn just_pressed(&self, action: Action) -> bool;
}

/// Surface categories a ray may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayFilter {
    Any,
    Hookable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

pub trait PhysicsQuery {
    /// Feet position of the body.
    fn position(&self) -> Vec3;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit>;

    /// Collision-resolved move of the body capsule. Returns whether the body
    /// is grounded afterwards.
    fn move_capsule(&mut self, displacement: Vec3) -> bool;
}

/// Write-only sink for the rendered hook.
pub trait HookVisual {
    fn set_hook_visual(&mut self, active: bool, scale: Vec3, look_at: Vec3);
}
