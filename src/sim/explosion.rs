//! Explosion scene
//!
//! A body rests at the centre of the domain for a fixed number of ticks, then
//! breaks into fragments flying out along evenly spaced directions. The
//! fragments share the parent's mass and carry its (zero) momentum between
//! them.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use super::boundary::{Axes, contain};
use super::conservation::{Baseline, ConservationReport, Totals};
use super::state::{Body, EventFlags, Phase, RngState, ScenarioKind, Snapshot};
use crate::consts::{EXPLOSION_BODY_SIZE, FRAGMENT_MASS_MAX, FRAGMENT_MASS_MIN, MAX_FRAGMENTS};
use crate::error::{Result, SimError};
use crate::settings::{Domain, ExplosionParams};

/// Draw fragment masses, uniform in `[FRAGMENT_MASS_MIN, FRAGMENT_MASS_MAX)`
pub fn draw_masses<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<f64> {
    (0..count)
        .map(|_| rng.random_range(FRAGMENT_MASS_MIN..FRAGMENT_MASS_MAX))
        .collect()
}

/// Square side of a fragment of the given mass
#[inline]
pub fn fragment_size(mass: f64) -> f64 {
    10.0 + mass * 5.0
}

/// Break a body at rest into fragments centred on `center`
///
/// Fragment `i` of `n` starts with velocity `force * (cos θ, sin θ)`,
/// `θ = 2πi/n`. With unequal masses those momenta do not cancel, so the
/// common centre-of-mass velocity is then subtracted from every fragment,
/// which leaves the total momentum at zero for any `n` (a lone fragment stays
/// at rest).
pub fn scatter(masses: &[f64], force: f64, center: DVec2) -> Vec<Body> {
    let n = masses.len();
    let mut fragments: Vec<Body> = masses
        .iter()
        .enumerate()
        .map(|(i, &mass)| {
            let theta = TAU * i as f64 / n as f64;
            let size = fragment_size(mass);
            Body::rect(
                i as u32 + 1,
                center - DVec2::splat(size / 2.0),
                DVec2::from_angle(theta) * force,
                mass,
                DVec2::splat(size),
            )
        })
        .collect();

    let total_mass: f64 = masses.iter().sum();
    if total_mass > 0.0 {
        let drift = Totals::of(&fragments).momentum / total_mass;
        for fragment in &mut fragments {
            fragment.velocity -= drift;
        }
    }
    fragments
}

#[derive(Debug, Clone)]
pub struct ExplosionScenario {
    params: ExplosionParams,
    domain: Domain,
    rng_state: RngState,
    /// Fragment masses for this run, drawn when the scene is built
    masses: Vec<f64>,
    parent: Body,
    fragments: Vec<Body>,
    phase: Phase,
    events: EventFlags,
    baseline: Baseline,
    ticks: u64,
    event_momentum: Option<DVec2>,
}

impl ExplosionScenario {
    pub fn new(params: ExplosionParams, domain: Domain, seed: u64) -> Result<Self> {
        if !(1..=MAX_FRAGMENTS).contains(&params.fragment_count) {
            return Err(SimError::invalid_parameter(
                "fragment_count",
                format!("must be within [1, {}]", MAX_FRAGMENTS),
            ));
        }
        if !params.force.is_finite() {
            return Err(SimError::invalid_parameter("force", "must be finite"));
        }

        let rng_state = RngState::new(seed);
        let masses = draw_masses(&mut rng_state.to_rng(), params.fragment_count);
        let parent = Body::rect(
            0,
            DVec2::new(domain.width, domain.height) / 2.0 - DVec2::splat(EXPLOSION_BODY_SIZE / 2.0),
            DVec2::ZERO,
            masses.iter().sum(),
            DVec2::splat(EXPLOSION_BODY_SIZE),
        );

        Ok(Self {
            params,
            domain,
            rng_state,
            masses,
            baseline: Baseline::capture([&parent]),
            parent,
            fragments: Vec::new(),
            phase: Phase::Idle,
            events: EventFlags::default(),
            ticks: 0,
            event_momentum: None,
        })
    }

    pub fn fragments(&self) -> &[Body] {
        &self.fragments
    }

    pub fn parent(&self) -> &Body {
        &self.parent
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn events(&self) -> EventFlags {
        self.events
    }

    pub fn default_dt(&self) -> f64 {
        1.0
    }

    /// Re-seed and redraw, so every run after a reset is identical
    pub fn reset(&mut self) {
        self.masses = draw_masses(&mut self.rng_state.to_rng(), self.params.fragment_count);
        self.fragments.clear();
        self.phase = Phase::Idle;
        self.events = EventFlags::default();
        self.ticks = 0;
        self.event_momentum = None;
    }

    pub fn advance(&mut self, dt: f64) {
        self.ticks += 1;
        self.phase = Phase::Running;

        if !self.events.detonated {
            if self.ticks > u64::from(self.params.delay_ticks) {
                self.detonate();
            }
            return;
        }

        for fragment in &mut self.fragments {
            fragment.integrate(dt);
            contain(fragment, &self.domain, Axes::XY);
        }
    }

    fn detonate(&mut self) {
        self.fragments = scatter(&self.masses, self.params.force, self.parent.center());
        let momentum = Totals::of(&self.fragments).momentum;
        self.event_momentum = Some(momentum);
        self.events.detonated = true;
        self.phase = Phase::Resolved;
        log::info!(
            "explosion: {} fragments after {} ticks, net momentum {}",
            self.fragments.len(),
            self.ticks,
            momentum
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        let bodies: Vec<&Body> = if self.events.detonated {
            self.fragments.iter().collect()
        } else {
            vec![&self.parent]
        };
        Snapshot {
            kind: ScenarioKind::Explosion,
            phase: self.phase,
            ticks: self.ticks,
            conservation: ConservationReport::new(
                self.baseline,
                Totals::of(bodies.iter().copied()),
                false,
            ),
            bodies: bodies.into_iter().map(Body::snapshot).collect(),
            particles: Vec::new(),
            events: self.events,
            event_momentum: self.event_momentum,
            anomalies: Vec::new(),
            rocket: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scene(count: u32, force: f64) -> ExplosionScenario {
        let params = ExplosionParams {
            force,
            fragment_count: count,
            delay_ticks: 30,
        };
        ExplosionScenario::new(params, Domain::default(), 7).unwrap()
    }

    #[test]
    fn test_waits_for_delay() {
        let mut s = scene(6, 5.0);
        for _ in 0..30 {
            s.advance(1.0);
            assert!(!s.events().detonated);
            assert_eq!(s.parent().velocity, DVec2::ZERO);
        }
        s.advance(1.0);
        assert!(s.events().detonated);
        assert_eq!(s.phase(), Phase::Resolved);
        assert_eq!(s.fragments().len(), 6);
    }

    #[test]
    fn test_fragment_masses_and_sizes() {
        let mut s = scene(10, 5.0);
        let parent_mass = s.parent().mass();
        for _ in 0..31 {
            s.advance(1.0);
        }
        let total: f64 = s.fragments().iter().map(Body::mass).sum();
        assert!((total - parent_mass).abs() < 1e-9);
        for f in s.fragments() {
            assert!((FRAGMENT_MASS_MIN..FRAGMENT_MASS_MAX).contains(&f.mass()));
            assert_eq!(f.extent.size().x, fragment_size(f.mass()));
            assert!((f.center() - s.parent().center()).length() < 1e-9);
        }
    }

    #[test]
    fn test_equal_masses_keep_radial_velocities() {
        let fragments = scatter(&[2.0; 4], 5.0, DVec2::new(400.0, 200.0));
        let expected = [
            DVec2::new(5.0, 0.0),
            DVec2::new(0.0, 5.0),
            DVec2::new(-5.0, 0.0),
            DVec2::new(0.0, -5.0),
        ];
        for (f, v) in fragments.iter().zip(expected) {
            assert!((f.velocity - v).length() < 1e-12);
        }
    }

    #[test]
    fn test_single_fragment_stays_at_rest() {
        let fragments = scatter(&[3.0], 8.0, DVec2::ZERO);
        assert!(fragments[0].velocity.length() < 1e-12);
    }

    #[test]
    fn test_fragments_stay_in_domain() {
        let mut s = scene(12, 20.0);
        for _ in 0..500 {
            s.advance(1.0);
            for f in s.fragments() {
                assert!(f.min_edge().x >= 0.0 && f.min_edge().y >= 0.0);
                assert!(f.max_edge().x <= 800.0 && f.max_edge().y <= 400.0);
            }
        }
    }

    #[test]
    fn test_reset_replays_the_same_explosion() {
        let mut s = scene(5, 5.0);
        for _ in 0..40 {
            s.advance(1.0);
        }
        let first = s.snapshot();

        s.reset();
        s.reset();
        assert_eq!(s.snapshot(), scene(5, 5.0).snapshot());
        for _ in 0..40 {
            s.advance(1.0);
        }
        assert_eq!(s.snapshot(), first);
    }

    #[test]
    fn test_rejects_fragment_count_out_of_range() {
        let params = ExplosionParams {
            fragment_count: 0,
            ..Default::default()
        };
        assert!(ExplosionScenario::new(params, Domain::default(), 1).is_err());

        let params = ExplosionParams {
            fragment_count: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            ExplosionScenario::new(params, Domain::default(), 1),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_detonation_conserves_zero_momentum(
            count in 1u32..40,
            force in 0.0f64..100.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let masses = draw_masses(&mut rng, count);
            let fragments = scatter(&masses, force, DVec2::new(400.0, 200.0));
            prop_assert_eq!(fragments.len(), count as usize);
            let total = Totals::of(&fragments).momentum;
            prop_assert!(total.length() < 1e-6, "net momentum {}", total);
        }

        #[test]
        fn prop_scene_reports_zero_momentum_at_detonation(
            count in 1u32..20,
            force in 0.0f64..50.0,
            seed in any::<u64>(),
        ) {
            let params = ExplosionParams { force, fragment_count: count, delay_ticks: 3 };
            let mut s = ExplosionScenario::new(params, Domain::default(), seed).unwrap();
            for _ in 0..4 {
                s.advance(1.0);
            }
            let momentum = s.snapshot().event_momentum.unwrap();
            prop_assert!(momentum.length() < 1e-6);
            prop_assert_eq!(s.snapshot().conservation.baseline.momentum, DVec2::ZERO);
        }
    }
}
