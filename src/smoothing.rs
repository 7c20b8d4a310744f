use bevy::math::Vec2;

/// Lower bound on the damping time constant, avoids dividing by zero.
const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Critically damped spring from `current` toward `target`.
///
/// `velocity` carries the spring state between calls. The polynomial is a
/// Padé-style approximation of `e^-x` that stays in (0, 1] for any `dt >= 0`,
/// and the result is clamped so it never passes the target.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Passed the target: land on it and stop.
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec2::ZERO;
    }
    output
}

/// Exponential approach of `current` toward `target` at `rate` per second.
///
/// The blend factor is `1 - e^(-rate * dt)`, which stays in [0, 1) so the
/// result is always between `current` and `target`.
pub fn exp_approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let t = 1.0 - (-rate * dt).exp();
    current + (target - current) * t
}
