use crate::{ControllerConfig, exp_approach};

/// Height differences below this snap onto the target stance.
const HEIGHT_SNAP: f32 = 1e-4;

/// Capsule height and center, interpolated toward one of the two stances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrouchController {
    height: f32,
    center: f32,
    camera_offset: f32,
    is_crouching: bool,
}

impl CrouchController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            height: config.stand_height,
            center: config.stand_height / 2.0,
            camera_offset: config.stand_height - config.camera_eye_drop,
            is_crouching: false,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Vertical offset of the capsule center above the feet.
    pub fn center(&self) -> f32 {
        self.center
    }

    /// Local height of the camera above the feet.
    pub fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    /// Always one of the two configured stance heights.
    pub fn target_height(&self, config: &ControllerConfig) -> f32 {
        if self.is_crouching {
            config.crouch_height
        } else {
            config.stand_height
        }
    }

    /// Resolves the stance for this tick and returns whether the body crouches.
    ///
    /// An obstructed probe forces a crouch and freezes the height, so the
    /// capsule never grows into a ceiling.
    pub fn tick(
        &mut self,
        crouch_held: bool,
        overhead_blocked: bool,
        dt: f32,
        config: &ControllerConfig,
    ) -> bool {
        self.is_crouching = crouch_held || overhead_blocked;
        if overhead_blocked {
            return self.is_crouching;
        }

        let target = self.target_height(config);
        if self.height != target {
            self.height = exp_approach(self.height, target, config.crouch_smoothing, dt);
            self.center = exp_approach(self.center, target / 2.0, config.crouch_smoothing, dt);
            if (self.height - target).abs() < HEIGHT_SNAP {
                self.height = target;
                self.center = target / 2.0;
            }
            self.camera_offset = self.height - config.camera_eye_drop;
        }
        self.is_crouching
    }
}
