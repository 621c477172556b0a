//! Position update primitives
//!
//! Every scene integrates with explicit Euler: `x += v * dt`. Velocity is only
//! ever changed by collisions, walls and scripted impulses, so there is no
//! acceleration term here.

use glam::DVec2;

/// Advance a 2D position by one step
#[inline]
pub fn drift(position: DVec2, velocity: DVec2, dt: f64) -> DVec2 {
    position + velocity * dt
}

/// Linear momentum of a point mass
#[inline]
pub fn momentum(mass: f64, velocity: DVec2) -> DVec2 {
    velocity * mass
}

/// Kinetic energy of a point mass, `0.5 m |v|²`
#[inline]
pub fn kinetic_energy(mass: f64, velocity: DVec2) -> f64 {
    0.5 * mass * velocity.length_squared()
}
