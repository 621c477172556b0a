//! Rocket vignette
//!
//! A rocket sits near the bottom of the domain. Once the scene clock passes
//! the ignition time it emits one exhaust particle per tick and gains a fixed
//! upward velocity increment per tick, until its top leaves the domain.
//! This is a per-tick impulse model, not the variable-mass rocket equation.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::conservation::{Baseline, ConservationReport, Totals};
use super::state::{
    Body, EventFlags, Particle, Phase, RealWorldKind, RngState, RocketLedger, ScenarioKind,
    Snapshot,
};
use crate::consts::{EXHAUST_LIFE, REAL_WORLD_STEP, ROCKET_IGNITION_TIME};
use crate::error::{Result, SimError};
use crate::settings::{Domain, RealWorldParams};

pub const ROCKET_MASS: f64 = 10.0;
pub const ROCKET_SIZE: DVec2 = DVec2::new(50.0, 80.0);

/// One exhaust particle leaving the nozzle
///
/// Lateral speed is uniform in `[-1, 1)`, downward speed in `[2, 5)`, size in
/// `[5, 10)`.
pub fn emit_exhaust<R: Rng + ?Sized>(rng: &mut R, rocket: &Body) -> Particle {
    let size = 5.0 + rng.random::<f64>() * 5.0;
    let vel = DVec2::new(
        (rng.random::<f64>() - 0.5) * 2.0,
        2.0 + rng.random::<f64>() * 3.0,
    );
    let nozzle = DVec2::new(
        rocket.center().x - size / 2.0,
        rocket.max_edge().y,
    );
    Particle {
        pos: nozzle,
        vel,
        size,
        life: EXHAUST_LIFE,
    }
}

#[derive(Debug, Clone)]
pub struct RocketScenario {
    thrust: f64,
    default_dt: f64,
    rng_state: RngState,
    rng: Pcg32,
    initial: Body,
    rocket: Body,
    particles: Vec<Particle>,
    phase: Phase,
    events: EventFlags,
    baseline: Baseline,
    ticks: u64,
    clock: f64,
}

impl RocketScenario {
    pub fn new(params: &RealWorldParams, domain: Domain, seed: u64) -> Result<Self> {
        if !params.rocket_thrust.is_finite() {
            return Err(SimError::invalid_parameter("rocket_thrust", "must be finite"));
        }
        let rocket = Body::rect(
            1,
            DVec2::new(domain.width / 2.0 - ROCKET_SIZE.x / 2.0, domain.height - 100.0),
            DVec2::ZERO,
            ROCKET_MASS,
            ROCKET_SIZE,
        );
        let rng_state = RngState::new(seed);
        Ok(Self {
            thrust: params.rocket_thrust,
            default_dt: REAL_WORLD_STEP * params.speed,
            rng: rng_state.to_rng(),
            rng_state,
            baseline: Baseline::capture([&rocket]),
            initial: rocket.clone(),
            rocket,
            particles: Vec::new(),
            phase: Phase::Idle,
            events: EventFlags::default(),
            ticks: 0,
            clock: 0.0,
        })
    }

    pub fn rocket(&self) -> &Body {
        &self.rocket
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn events(&self) -> EventFlags {
        self.events
    }

    pub fn default_dt(&self) -> f64 {
        self.default_dt
    }

    pub fn reset(&mut self) {
        self.rng = self.rng_state.to_rng();
        self.rocket = self.initial.clone();
        self.particles.clear();
        self.phase = Phase::Idle;
        self.events = EventFlags::default();
        self.ticks = 0;
        self.clock = 0.0;
    }

    pub fn advance(&mut self, dt: f64) {
        self.ticks += 1;
        self.clock += dt;
        self.phase = Phase::Running;

        if self.clock > ROCKET_IGNITION_TIME && self.rocket.position.y > 0.0 {
            let particle = emit_exhaust(&mut self.rng, &self.rocket);
            self.particles.push(particle);
            self.rocket.velocity.y -= self.thrust * dt;

            if !self.events.ignited {
                self.events.ignited = true;
                self.phase = Phase::Resolved;
                log::info!("rocket: ignition at clock {:.2}", self.clock);
            }
        }

        self.rocket.integrate(dt);

        for particle in &mut self.particles {
            particle.pos += particle.vel * dt;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Rocket momentum and the exhaust velocity sum shown beside it
    pub fn ledger(&self) -> RocketLedger {
        RocketLedger {
            rocket_momentum: self.rocket.momentum().y,
            exhaust_velocity_sum: self.particles.iter().map(|p| p.vel.y).sum(),
            particle_count: self.particles.len(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            kind: ScenarioKind::RealWorld(RealWorldKind::Rocket),
            phase: self.phase,
            ticks: self.ticks,
            bodies: vec![self.rocket.snapshot()],
            particles: self.particles.clone(),
            conservation: ConservationReport::new(self.baseline, Totals::of([&self.rocket]), false),
            events: self.events,
            event_momentum: None,
            anomalies: Vec::new(),
            rocket: Some(self.ledger()),
        }
    }
}
