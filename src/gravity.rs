/// Vertical velocity of the body, negative is falling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GravityIntegrator {
    velocity: f32,
}

impl GravityIntegrator {
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub(crate) fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// While grounded the velocity is pinned to `grounded_bias` so the body
    /// keeps pressing into the floor and ground contact stays stable.
    pub fn tick(&mut self, grounded: bool, dt: f32, gravity: f32, grounded_bias: f32) {
        if grounded {
            self.velocity = grounded_bias;
        } else {
            self.velocity += gravity * dt;
        }
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }
}
