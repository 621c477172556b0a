//! Wall containment
//!
//! Walls are perfectly reflective: the velocity component flips sign towards
//! the inside of the domain and the body is clamped flush against the wall.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::settings::Domain;

/// Axes a scene moves and collides on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axes {
    /// Horizontal track only
    X,
    /// Full plane
    XY,
}

/// Which wall was hit on an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Low,
    High,
}

/// Reflect a single axis
///
/// `position` is the body position, `lower`/`upper` the offsets from it to the
/// body's edges and `far` the domain size on this axis. Returns the new
/// position and velocity and which wall (if any) was hit.
pub fn reflect_axis(
    position: f64,
    velocity: f64,
    lower: f64,
    upper: f64,
    far: f64,
) -> (f64, f64, Option<Wall>) {
    if position - lower <= 0.0 {
        (lower, velocity.abs(), Some(Wall::Low))
    } else if position + upper >= far {
        (far - upper, -velocity.abs(), Some(Wall::High))
    } else {
        (position, velocity, None)
    }
}

/// Keep a body inside the domain on the given axes. Returns true on any bounce.
pub fn contain(body: &mut Body, domain: &Domain, axes: Axes) -> bool {
    let lower = body.extent.lower();
    let upper = body.extent.upper();

    let (x, vx, hit_x) = reflect_axis(
        body.position.x,
        body.velocity.x,
        lower.x,
        upper.x,
        domain.width,
    );
    let (y, vy, hit_y) = match axes {
        Axes::X => (body.position.y, body.velocity.y, None),
        Axes::XY => reflect_axis(
            body.position.y,
            body.velocity.y,
            lower.y,
            upper.y,
            domain.height,
        ),
    };

    body.position = DVec2::new(x, y);
    body.velocity = DVec2::new(vx, vy);
    hit_x.is_some() || hit_y.is_some()
}
