use bevy::input::{keyboard, mouse, mouse::MouseMotion};
use bevy::prelude::*;

use crate::{Action, GrappleController, InputAxis, InputSource};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            grapple_controller_input
                .after(mouse::mouse_button_input_system)
                .after(keyboard::keyboard_input_system),
        );
    }
}

#[derive(Component, Clone, Debug)]
pub struct ControllerKeys {
    pub key_forward: KeyCode,
    pub key_back: KeyCode,
    pub key_left: KeyCode,
    pub key_right: KeyCode,
    pub key_sprint: KeyCode,
    pub key_crouch: KeyCode,
    pub key_jump: KeyCode,
    pub key_fire_hook: KeyCode,
    /// Converts raw mouse motion (pixels) into look-axis units.
    pub mouse_scale: f32,
}

impl Default for ControllerKeys {
    fn default() -> Self {
        Self {
            key_forward: KeyCode::KeyW,
            key_back: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_sprint: KeyCode::ShiftLeft,
            key_crouch: KeyCode::KeyC,
            key_jump: KeyCode::Space,
            key_fire_hook: KeyCode::KeyE,
            mouse_scale: 0.1,
        }
    }
}

impl ControllerKeys {
    fn key(&self, action: Action) -> KeyCode {
        match action {
            Action::Sprint => self.key_sprint,
            Action::Crouch => self.key_crouch,
            Action::Jump => self.key_jump,
            Action::FireHook => self.key_fire_hook,
        }
    }
}

/// Input gathered between two controller ticks.
///
/// Frames and fixed ticks do not line up, so look deltas and key edges
/// accumulate here until a tick calls [`ControllerInput::consume`]. Held
/// levels and the move axes always reflect the latest frame.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct ControllerInput {
    pub look: Vec2,
    pub movement: Vec2,
    held: [bool; 4],
    pressed: [bool; 4],
}

impl ControllerInput {
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }

    pub fn holding(mut self, action: Action) -> Self {
        self.held[action.index()] = true;
        self
    }

    /// Press edge plus held level, as on the first frame of a key press.
    pub fn pressing(mut self, action: Action) -> Self {
        self.held[action.index()] = true;
        self.pressed[action.index()] = true;
        self
    }

    pub fn set_held(&mut self, action: Action, held: bool) {
        self.held[action.index()] = held;
    }

    pub fn press(&mut self, action: Action) {
        self.pressed[action.index()] = true;
    }

    /// Clears the per-tick accumulators after a controller tick.
    pub fn consume(&mut self) {
        self.look = Vec2::ZERO;
        self.pressed = [false; 4];
    }
}

impl InputSource for ControllerInput {
    fn axis(&self, axis: InputAxis) -> f32 {
        match axis {
            InputAxis::LookX => self.look.x,
            InputAxis::LookY => self.look.y,
            InputAxis::Horizontal => self.movement.x,
            InputAxis::Vertical => self.movement.y,
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }
}

pub fn grapple_controller_input(
    key_input: Res<ButtonInput<KeyCode>>,
    mut mouse_events: EventReader<MouseMotion>,
    mut query: Query<(&GrappleController, &ControllerKeys, &mut ControllerInput)>,
) {
    let mut mouse_delta = Vec2::ZERO;
    for mouse_event in mouse_events.read() {
        mouse_delta += mouse_event.delta;
    }

    for (controller, keys, mut input) in query
        .iter_mut()
        .filter(|(controller, _, _)| controller.is_enabled())
    {
        // Screen y grows downward, the look axis grows upward.
        input.look += Vec2::new(mouse_delta.x, -mouse_delta.y) * keys.mouse_scale;
        input.movement = Vec2::new(
            get_axis(&key_input, keys.key_right, keys.key_left),
            get_axis(&key_input, keys.key_forward, keys.key_back),
        );
        for action in Action::ALL {
            let key = keys.key(action);
            input.set_held(action, key_input.pressed(key));
            if key_input.just_pressed(key) {
                input.press(action);
            }
        }
    }
}

fn get_pressed(key_input: &ButtonInput<KeyCode>, key: KeyCode) -> f32 {
    if key_input.pressed(key) { 1.0 } else { 0.0 }
}

fn get_axis(key_input: &ButtonInput<KeyCode>, key_pos: KeyCode, key_neg: KeyCode) -> f32 {
    get_pressed(key_input, key_pos) - get_pressed(key_input, key_neg)
}
