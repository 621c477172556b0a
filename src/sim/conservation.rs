//! Momentum and energy bookkeeping
//!
//! A baseline is captured when a scene is built. Every snapshot compares the
//! live totals against it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::consts::CONSERVATION_TOLERANCE;

/// Aggregate momentum and kinetic energy of a set of bodies
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub momentum: DVec2,
    pub kinetic_energy: f64,
}

impl Totals {
    pub fn of<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Self {
        bodies.into_iter().fold(Totals::default(), |acc, body| Totals {
            momentum: acc.momentum + body.momentum(),
            kinetic_energy: acc.kinetic_energy + body.kinetic_energy(),
        })
    }
}

/// Totals captured at the start of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub momentum: DVec2,
    pub energy: f64,
}

impl Baseline {
    pub fn capture<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Self {
        let totals = Totals::of(bodies);
        Self {
            momentum: totals.momentum,
            energy: totals.kinetic_energy,
        }
    }
}

/// Live comparison against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConservationReport {
    pub current: Totals,
    pub baseline: Baseline,
    /// Whether the scene shows energy at all (the basic scene does not)
    pub tracks_energy: bool,
    pub momentum_conserved: bool,
    pub energy_conserved: bool,
    /// `baseline.energy - current.kinetic_energy`; positive means energy went
    /// into heat, sound and deformation
    pub energy_lost: f64,
}

impl ConservationReport {
    pub fn new(baseline: Baseline, current: Totals, tracks_energy: bool) -> Self {
        let energy_lost = baseline.energy - current.kinetic_energy;
        Self {
            current,
            baseline,
            tracks_energy,
            momentum_conserved: (current.momentum - baseline.momentum).abs().max_element()
                < CONSERVATION_TOLERANCE,
            energy_conserved: energy_lost.abs() < CONSERVATION_TOLERANCE,
            energy_lost,
        }
    }

    pub fn momentum_drift(&self) -> DVec2 {
        self.current.momentum - self.baseline.momentum
    }
}
