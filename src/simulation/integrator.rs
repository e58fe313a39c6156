//! Fixed-step position/velocity update
//!
//! Applied to every body only after every body's acceleration for the step
//! is final (compute-all, then integrate-all).

use super::states::Body;
use super::vector::Vector3;

/// Advance one body by `dt` using its current acceleration:
/// - x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
/// - v_n+1 = v_n + a_n dt
#[inline]
pub fn advance_body(b: &mut Body, dt: f64) {
    let a = b.acceleration;
    b.position += dt * b.velocity + (0.5 * dt * dt) * a;
    b.velocity += dt * a;
}

/// Store the finished accelerations and advance every body by `dt`.
///
/// `accels[i]` belongs to `bodies[i]`.
pub fn integrate(bodies: &mut [Body], accels: &[Vector3], dt: f64) {
    debug_assert_eq!(bodies.len(), accels.len());

    // record a_n on each body first
    for (b, a) in bodies.iter_mut().zip(accels.iter()) {
        b.acceleration = *a;
    }

    // then move everyone
    for b in bodies.iter_mut() {
        advance_body(b, dt);
    }
}
