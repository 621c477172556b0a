//! Collision detection and response for pairs of bodies
//!
//! Response functions are pure: they take masses and velocities and return
//! new velocities. Moving overlapping bodies apart is a separate step
//! (`separate`) that the scene applies after resolving.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::Axes;
use super::state::{Body, Extent};
use crate::consts::{DEGENERATE_NORMAL_EPSILON, ENERGY_ANOMALY_TOLERANCE};
use crate::error::{Result, SimError};

/// How a contact is resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionKind {
    Elastic,
    /// The pair sticks together and becomes one body
    PerfectlyInelastic,
    PartiallyInelastic { restitution: f64 },
}

/// Geometry of an overlap between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector pointing from the second body towards the first.
    /// Zero when the centres coincide in 2D.
    pub normal: DVec2,
    /// Penetration depth along the normal (>= 0)
    pub overlap: f64,
}

impl Contact {
    pub fn is_degenerate(&self) -> bool {
        self.normal == DVec2::ZERO
    }
}

/// Result of a perfectly inelastic collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub mass: f64,
    pub velocity: DVec2,
    /// Mass-weighted average of the two positions
    pub position: DVec2,
}

/// 1D elastic collision
///
/// `v1' = ((m1-m2)v1 + 2 m2 v2) / (m1+m2)`, `v2' = ((m2-m1)v2 + 2 m1 v1) / (m1+m2)`
#[inline]
pub fn resolve_elastic(m1: f64, v1: f64, m2: f64, v2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let new_v1 = ((m1 - m2) * v1 + 2.0 * m2 * v2) / total;
    let new_v2 = ((m2 - m1) * v2 + 2.0 * m1 * v1) / total;
    (new_v1, new_v2)
}

/// Perfectly inelastic collision: the pair merges into one body
pub fn resolve_inelastic(
    m1: f64,
    v1: DVec2,
    x1: DVec2,
    m2: f64,
    v2: DVec2,
    x2: DVec2,
) -> Merge {
    let mass = m1 + m2;
    Merge {
        mass,
        velocity: (v1 * m1 + v2 * m2) / mass,
        position: (x1 * m1 + x2 * m2) / mass,
    }
}

/// Partially inelastic collision as used by the car crash vignette
///
/// `v1' = (m1 v1 + m2 (2 v2 - e v1)) / (m1+m2)`,
/// `v2' = (m2 v2 + m1 (2 v1 - e v2)) / (m1+m2)`.
///
/// This is not the textbook coefficient-of-restitution model and does not
/// conserve momentum in general. Kept exactly as the car crash scene defines it.
#[inline]
pub fn resolve_partially_inelastic(m1: f64, v1: f64, m2: f64, v2: f64, e: f64) -> (f64, f64) {
    let total = m1 + m2;
    let new_v1 = (m1 * v1 + m2 * (2.0 * v2 - e * v1)) / total;
    let new_v2 = (m2 * v2 + m1 * (2.0 * v1 - e * v2)) / total;
    (new_v1, new_v2)
}

/// 2D elastic collision between two circles
///
/// Velocities are rotated into the frame of the line between centres, the 1D
/// formula is applied to the normal components, tangential components are kept
/// and the result is rotated back.
pub fn resolve_elastic_2d(
    m1: f64,
    x1: DVec2,
    v1: DVec2,
    m2: f64,
    x2: DVec2,
    v2: DVec2,
) -> Result<(DVec2, DVec2)> {
    let delta = x1 - x2;
    let dist = delta.length();
    if dist < DEGENERATE_NORMAL_EPSILON {
        return Err(SimError::DegenerateCollisionNormal);
    }
    let normal = delta / dist;
    let tangent = normal.perp();

    let (n1, t1) = (v1.dot(normal), v1.dot(tangent));
    let (n2, t2) = (v2.dot(normal), v2.dot(tangent));

    let (new_n1, new_n2) = resolve_elastic(m1, n1, m2, n2);

    Ok((
        normal * new_n1 + tangent * t1,
        normal * new_n2 + tangent * t2,
    ))
}

/// Overlap test between two bodies
///
/// Two circles on `Axes::XY` use centre distance. On `Axes::X` only the x
/// coordinates are compared, for circles and rectangles alike.
pub fn detect_contact(a: &Body, b: &Body, axes: Axes) -> Option<Contact> {
    match (a.extent, b.extent, axes) {
        (Extent::Circle { radius: ra }, Extent::Circle { radius: rb }, Axes::XY) => {
            let delta = a.position - b.position;
            let dist = delta.length();
            if dist > ra + rb {
                return None;
            }
            let normal = if dist < DEGENERATE_NORMAL_EPSILON {
                DVec2::ZERO
            } else {
                delta / dist
            };
            Some(Contact {
                normal,
                overlap: ra + rb - dist,
            })
        }
        _ => {
            let overlap = a.max_edge().x.min(b.max_edge().x) - a.min_edge().x.max(b.min_edge().x);
            if overlap < 0.0 {
                return None;
            }
            let direction = if a.center().x < b.center().x { -1.0 } else { 1.0 };
            Some(Contact {
                normal: DVec2::new(direction, 0.0),
                overlap,
            })
        }
    }
}

/// Push an overlapping pair apart, half the overlap each
pub fn separate(a: &mut Body, b: &mut Body, contact: &Contact) {
    let push = contact.normal * (contact.overlap / 2.0);
    a.position += push;
    b.position -= push;
}

/// Flag a collision that produced kinetic energy
pub fn check_energy(before: f64, after: f64) -> Option<SimError> {
    let slack = ENERGY_ANOMALY_TOLERANCE * before.abs().max(1.0);
    if after > before + slack {
        Some(SimError::NegativeEnergyAnomaly { before, after })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ke(m: f64, v: f64) -> f64 {
        0.5 * m * v * v
    }

    #[test]
    fn test_equal_mass_head_on_swaps_velocities() {
        let (v1, v2) = resolve_elastic(5.0, 5.0, 5.0, -5.0);
        assert_eq!(v1, -5.0);
        assert_eq!(v2, 5.0);
        assert_eq!(5.0 * v1 + 5.0 * v2, 0.0);
    }

    #[test]
    fn test_heavy_hits_light() {
        let (v1, v2) = resolve_elastic(10.0, 4.0, 2.0, 0.0);
        assert!((v1 - 8.0 / 3.0).abs() < 1e-12);
        assert!((v2 - 20.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_inelastic_merge() {
        let merge = resolve_inelastic(
            5.0,
            DVec2::new(5.0, 0.0),
            DVec2::new(100.0, 180.0),
            5.0,
            DVec2::ZERO,
            DVec2::new(140.0, 180.0),
        );
        assert_eq!(merge.mass, 10.0);
        assert_eq!(merge.velocity, DVec2::new(2.5, 0.0));
        assert_eq!(merge.position, DVec2::new(120.0, 180.0));
        assert_eq!(merge.velocity.x * merge.mass, 25.0);
    }

    #[test]
    fn test_merge_position_is_mass_weighted() {
        let merge = resolve_inelastic(
            3.0,
            DVec2::ZERO,
            DVec2::new(0.0, 0.0),
            1.0,
            DVec2::ZERO,
            DVec2::new(40.0, 0.0),
        );
        assert_eq!(merge.position, DVec2::new(10.0, 0.0));
    }

    #[test]
    fn test_partially_inelastic_car_crash_numbers() {
        let (v1, v2) = resolve_partially_inelastic(1500.0, 5.0, 1000.0, -2.0, 0.2);
        assert!((v1 - 1.0).abs() < 1e-12);
        assert!((v2 - 5.44).abs() < 1e-12);
    }

    #[test]
    fn test_elastic_2d_head_on_matches_1d() {
        let (v1, v2) = resolve_elastic_2d(
            1.0,
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            1.0,
            DVec2::new(30.0, 0.0),
            DVec2::ZERO,
        )
        .unwrap();
        assert!(v1.length() < 1e-12);
        assert!((v2 - DVec2::new(10.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_elastic_2d_keeps_tangential_component() {
        // Contact along x, velocity has a y component that must survive
        let (v1, v2) = resolve_elastic_2d(
            1.0,
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 3.0),
            1.0,
            DVec2::new(30.0, 0.0),
            DVec2::ZERO,
        )
        .unwrap();
        assert!((v1 - DVec2::new(0.0, 3.0)).length() < 1e-12);
        assert!((v2 - DVec2::new(4.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_elastic_2d_coincident_centres() {
        let p = DVec2::new(50.0, 50.0);
        let result = resolve_elastic_2d(1.0, p, DVec2::X, 1.0, p, DVec2::ZERO);
        assert_eq!(result, Err(SimError::DegenerateCollisionNormal));
    }

    #[test]
    fn test_detect_contact_circles_on_x() {
        let a = Body::circle(1, DVec2::new(100.0, 200.0), DVec2::ZERO, 1.0, 20.0);
        let b = Body::circle(2, DVec2::new(130.0, 200.0), DVec2::ZERO, 1.0, 20.0);
        let contact = detect_contact(&a, &b, Axes::X).unwrap();
        assert_eq!(contact.normal, DVec2::new(-1.0, 0.0));
        assert_eq!(contact.overlap, 10.0);

        let far = Body::circle(3, DVec2::new(141.0, 200.0), DVec2::ZERO, 1.0, 20.0);
        assert!(detect_contact(&a, &far, Axes::X).is_none());
    }

    #[test]
    fn test_detect_contact_touching_counts() {
        let a = Body::circle(1, DVec2::new(100.0, 0.0), DVec2::ZERO, 1.0, 20.0);
        let b = Body::circle(2, DVec2::new(140.0, 0.0), DVec2::ZERO, 1.0, 20.0);
        let contact = detect_contact(&a, &b, Axes::X).unwrap();
        assert_eq!(contact.overlap, 0.0);
    }

    #[test]
    fn test_detect_contact_blocks() {
        let size = DVec2::splat(40.0);
        let a = Body::rect(1, DVec2::new(100.0, 0.0), DVec2::ZERO, 1.0, size);
        let b = Body::rect(2, DVec2::new(135.0, 0.0), DVec2::ZERO, 1.0, size);
        let contact = detect_contact(&a, &b, Axes::X).unwrap();
        assert_eq!(contact.overlap, 5.0);
        assert_eq!(contact.normal, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_detect_contact_2d_degenerate() {
        let a = Body::circle(1, DVec2::splat(50.0), DVec2::ZERO, 1.0, 15.0);
        let b = Body::circle(2, DVec2::splat(50.0), DVec2::ZERO, 1.0, 15.0);
        let contact = detect_contact(&a, &b, Axes::XY).unwrap();
        assert!(contact.is_degenerate());
        assert_eq!(contact.overlap, 30.0);
    }

    #[test]
    fn test_separate_removes_overlap() {
        let mut a = Body::circle(1, DVec2::new(100.0, 0.0), DVec2::ZERO, 1.0, 20.0);
        let mut b = Body::circle(2, DVec2::new(130.0, 0.0), DVec2::ZERO, 1.0, 20.0);
        let contact = detect_contact(&a, &b, Axes::X).unwrap();
        separate(&mut a, &mut b, &contact);
        assert_eq!(a.position.x, 95.0);
        assert_eq!(b.position.x, 135.0);
    }

    #[test]
    fn test_check_energy() {
        assert!(check_energy(100.0, 100.0).is_none());
        assert!(check_energy(100.0, 80.0).is_none());
        assert_eq!(
            check_energy(100.0, 120.0),
            Some(SimError::NegativeEnergyAnomaly {
                before: 100.0,
                after: 120.0
            })
        );
    }

    proptest! {
        #[test]
        fn prop_elastic_conserves_momentum_and_energy(
            m1 in 0.1f64..100.0,
            v1 in -50.0f64..50.0,
            m2 in 0.1f64..100.0,
            v2 in -50.0f64..50.0,
        ) {
            let (n1, n2) = resolve_elastic(m1, v1, m2, v2);
            let p_before = m1 * v1 + m2 * v2;
            let p_after = m1 * n1 + m2 * n2;
            prop_assert!((p_before - p_after).abs() <= 1e-9 * p_before.abs().max(1.0));
            let e_before = ke(m1, v1) + ke(m2, v2);
            let e_after = ke(m1, n1) + ke(m2, n2);
            prop_assert!((e_before - e_after).abs() <= 1e-6 * e_before.max(1.0));
        }

        #[test]
        fn prop_inelastic_conserves_momentum_never_gains_energy(
            m1 in 0.1f64..100.0,
            v1 in -50.0f64..50.0,
            m2 in 0.1f64..100.0,
            v2 in -50.0f64..50.0,
        ) {
            let merge = resolve_inelastic(
                m1, DVec2::new(v1, 0.0), DVec2::ZERO,
                m2, DVec2::new(v2, 0.0), DVec2::ZERO,
            );
            let p_before = m1 * v1 + m2 * v2;
            let p_after = merge.mass * merge.velocity.x;
            prop_assert!((p_before - p_after).abs() <= 1e-9 * p_before.abs().max(1.0));
            let e_before = ke(m1, v1) + ke(m2, v2);
            let e_after = ke(merge.mass, merge.velocity.x);
            prop_assert!(e_after <= e_before + 1e-9 * e_before.max(1.0));
            prop_assert!(check_energy(e_before, e_after).is_none());
        }

        #[test]
        fn prop_elastic_2d_conserves_momentum_and_energy(
            m1 in 0.1f64..100.0,
            m2 in 0.1f64..100.0,
            angle in 0.0f64..std::f64::consts::TAU,
            vx1 in -20.0f64..20.0, vy1 in -20.0f64..20.0,
            vx2 in -20.0f64..20.0, vy2 in -20.0f64..20.0,
        ) {
            let x1 = DVec2::ZERO;
            let x2 = DVec2::from_angle(angle) * 30.0;
            let v1 = DVec2::new(vx1, vy1);
            let v2 = DVec2::new(vx2, vy2);
            let (n1, n2) = resolve_elastic_2d(m1, x1, v1, m2, x2, v2).unwrap();
            let p_before = v1 * m1 + v2 * m2;
            let p_after = n1 * m1 + n2 * m2;
            prop_assert!((p_before - p_after).length() <= 1e-9 * p_before.length().max(1.0));
            let e_before = 0.5 * m1 * v1.length_squared() + 0.5 * m2 * v2.length_squared();
            let e_after = 0.5 * m1 * n1.length_squared() + 0.5 * m2 * n2.length_squared();
            prop_assert!((e_before - e_after).abs() <= 1e-6 * e_before.max(1.0));
        }
    }
}
