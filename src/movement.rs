use bevy::math::{Vec2, Vec3};

use crate::{ControllerConfig, smooth_damp};

/// Horizontal basis of the body in world space.
#[derive(Debug, Clone, Copy)]
pub struct MoveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

/// Smoothed directional input plus the residual grapple momentum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementSolver {
    current_dir: Vec2,
    current_dir_velocity: Vec2,
    momentum: Vec3,
}

impl MovementSolver {
    pub fn current_dir(&self) -> Vec2 {
        self.current_dir
    }

    pub fn momentum(&self) -> Vec3 {
        self.momentum
    }

    pub(crate) fn set_momentum(&mut self, momentum: Vec3) {
        self.momentum = momentum;
    }

    /// Zeroes the smoothed direction and the momentum.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the solver by `dt` and returns the displacement to hand to the
    /// physics collaborator.
    ///
    /// Momentum only contributes while airborne, but it decays every tick.
    pub fn step(
        &mut self,
        raw_input: Vec2,
        basis: MoveBasis,
        speed: f32,
        vertical_velocity: f32,
        grounded: bool,
        dt: f32,
        config: &ControllerConfig,
    ) -> Vec3 {
        let target_dir = raw_input.normalize_or_zero();
        self.current_dir = smooth_damp(
            self.current_dir,
            target_dir,
            &mut self.current_dir_velocity,
            config.move_smoothing,
            dt,
        );

        let mut velocity = (basis.forward * self.current_dir.y + basis.right * self.current_dir.x)
            * speed
            + Vec3::Y * vertical_velocity;
        if !grounded {
            velocity += self.momentum;
        }

        self.decay_momentum(dt, config.momentum_drag, config.momentum_epsilon);

        velocity * dt
    }

    /// `momentum -= momentum * drag * dt`, with the factor capped at one so a
    /// long frame lands on zero instead of reversing the vector.
    fn decay_momentum(&mut self, dt: f32, drag: f32, epsilon: f32) {
        if self.momentum == Vec3::ZERO {
            return;
        }
        let factor = (drag * dt).min(1.0);
        self.momentum -= self.momentum * factor;
        if self.momentum.length() < epsilon {
            self.momentum = Vec3::ZERO;
        }
    }
}

/// Ground speed for the tick and whether the body is sprinting.
///
/// Crouching on the ground beats sprinting, which beats walking. A crouch
/// also cancels the sprint flag, even in the air.
pub fn select_speed(
    config: &ControllerConfig,
    sprint_held: bool,
    crouching: bool,
    grounded: bool,
) -> (f32, bool) {
    let sprinting = sprint_held && !crouching;
    let speed = if grounded && crouching {
        config.crouch_speed
    } else if sprinting {
        config.run_speed
    } else {
        config.walk_speed
    };
    (speed, sprinting)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIS: MoveBasis = MoveBasis {
        forward: Vec3::NEG_Z,
        right: Vec3::X,
    };

    #[test]
    fn diagonal_input_is_normalized() {
        let config = ControllerConfig::default();
        let mut solver = MovementSolver::default();
        for _ in 0..200 {
            solver.step(Vec2::ONE, BASIS, 3.0, 0.0, true, 0.02, &config);
        }
        assert!((solver.current_dir().length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn no_input_and_no_velocity_is_still() {
        let config = ControllerConfig::default();
        let mut solver = MovementSolver::default();
        let step = solver.step(Vec2::ZERO, BASIS, 3.0, 0.0, true, 0.02, &config);
        assert_eq!(step, Vec3::ZERO);
    }

    #[test]
    fn momentum_only_applies_in_the_air() {
        let config = ControllerConfig::default();
        let mut grounded = MovementSolver::default();
        grounded.set_momentum(Vec3::new(10.0, 0.0, 0.0));
        let mut airborne = grounded;

        let on_ground = grounded.step(Vec2::ZERO, BASIS, 3.0, 0.0, true, 0.1, &config);
        let in_air = airborne.step(Vec2::ZERO, BASIS, 3.0, 0.0, false, 0.1, &config);
        assert_eq!(on_ground, Vec3::ZERO);
        assert!((in_air - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(grounded.momentum(), airborne.momentum());
    }

    #[test]
    fn momentum_decays_monotonically_to_exact_zero() {
        let config = ControllerConfig::default();
        let mut solver = MovementSolver::default();
        solver.set_momentum(Vec3::new(0.0, 10.0, -20.0));
        let mut last = solver.momentum().length();
        let mut ticks = 0;
        while solver.momentum() != Vec3::ZERO {
            solver.step(Vec2::ZERO, BASIS, 3.0, 0.0, false, 1.0 / 60.0, &config);
            let now = solver.momentum().length();
            assert!(now <= last);
            last = now;
            ticks += 1;
            assert!(ticks < 1_000, "momentum never reached zero");
        }
    }

    #[test]
    fn long_frame_cannot_reverse_momentum() {
        let config = ControllerConfig::default();
        let mut solver = MovementSolver::default();
        solver.set_momentum(Vec3::new(5.0, 0.0, 0.0));
        solver.step(Vec2::ZERO, BASIS, 3.0, 0.0, false, 2.0, &config);
        assert_eq!(solver.momentum(), Vec3::ZERO);
    }

    #[test]
    fn speed_precedence() {
        let config = ControllerConfig::default();
        assert_eq!(select_speed(&config, true, true, true), (2.0, false));
        assert_eq!(select_speed(&config, true, false, true), (6.0, true));
        assert_eq!(select_speed(&config, false, false, true), (3.0, false));
        // crouched in the air: no sprint, no crouch speed
        assert_eq!(select_speed(&config, true, true, false), (3.0, false));
    }
}
