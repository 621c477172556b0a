//! Two-body scenes
//!
//! The basic, elastic and inelastic scenes and the billiards, skaters and car
//! crash vignettes differ only in configuration: which collision rule applies,
//! which axes the bodies live on and whether a scripted push happens. One
//! driver runs all of them.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::boundary::{Axes, contain};
use super::collision::{
    CollisionKind, Contact, check_energy, detect_contact, resolve_elastic, resolve_elastic_2d,
    resolve_inelastic, resolve_partially_inelastic, separate,
};
use super::conservation::{Baseline, ConservationReport, Totals};
use super::state::{Body, EventFlags, Extent, Phase, RealWorldKind, ScenarioKind, Snapshot};
use crate::consts::{PAIR_BALL_RADIUS, PAIR_BLOCK_SIZE, REAL_WORLD_STEP, SKATER_PUSH_TIME};
use crate::error::{Result, SimError};
use crate::settings::{Domain, PairParams, RealWorldParams, check_mass};

/// Scripted impulses applied by the scene itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForceSchedule {
    None,
    /// Once the scene clock passes `after`, push the pair apart (see `push_apart`)
    Push { after: f64, force: f64 },
}

/// What distinguishes one two-body scene from another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    /// `None` lets the bodies pass through each other
    pub collision: Option<CollisionKind>,
    pub axes: Axes,
    pub tracks_energy: bool,
    pub schedule: ForceSchedule,
    /// Positions advance by `velocity * dt * step_factor`
    pub step_factor: f64,
    /// Step the driver uses for this scene
    pub default_dt: f64,
}

impl PairConfig {
    fn track(collision: CollisionKind, tracks_energy: bool) -> Self {
        Self {
            collision: Some(collision),
            axes: Axes::X,
            tracks_energy,
            schedule: ForceSchedule::None,
            step_factor: 1.0,
            default_dt: 1.0,
        }
    }
}

/// A two-body scene
#[derive(Debug, Clone)]
pub struct PairScenario {
    kind: ScenarioKind,
    config: PairConfig,
    domain: Domain,
    /// Bodies as built, restored by `reset`
    initial: [Body; 2],
    bodies: Vec<Body>,
    phase: Phase,
    events: EventFlags,
    baseline: Baseline,
    ticks: u64,
    clock: f64,
    event_momentum: Option<DVec2>,
    anomalies: Vec<SimError>,
}

impl PairScenario {
    pub fn new(
        kind: ScenarioKind,
        config: PairConfig,
        bodies: [Body; 2],
        domain: Domain,
    ) -> Result<Self> {
        for body in &bodies {
            check_mass(&format!("body {}", body.id), body.mass())?;
        }
        if let Some(CollisionKind::PartiallyInelastic { restitution }) = config.collision
            && !(0.0..=1.0).contains(&restitution)
        {
            return Err(SimError::invalid_parameter(
                "restitution",
                "must be within [0, 1]",
            ));
        }
        Ok(Self {
            kind,
            config,
            domain,
            baseline: Baseline::capture(&bodies),
            bodies: bodies.to_vec(),
            initial: bodies,
            phase: Phase::Idle,
            events: EventFlags::default(),
            ticks: 0,
            clock: 0.0,
            event_momentum: None,
            anomalies: Vec::new(),
        })
    }

    /// Two balls on a track, one elastic collision; momentum display only
    pub fn basic(params: &PairParams, domain: Domain) -> Result<Self> {
        Self::new(
            ScenarioKind::BasicPair,
            PairConfig::track(CollisionKind::Elastic, false),
            balls_on_track(params, domain),
            domain,
        )
    }

    /// Same motion as `basic`, also reporting kinetic energy
    pub fn elastic(params: &PairParams, domain: Domain) -> Result<Self> {
        Self::new(
            ScenarioKind::ElasticPair,
            PairConfig::track(CollisionKind::Elastic, true),
            balls_on_track(params, domain),
            domain,
        )
    }

    /// Two blocks that stick together on contact
    pub fn inelastic(params: &PairParams, domain: Domain) -> Result<Self> {
        let y = domain.height / 2.0 - PAIR_BLOCK_SIZE / 2.0;
        let size = DVec2::splat(PAIR_BLOCK_SIZE);
        Self::new(
            ScenarioKind::InelasticPair,
            PairConfig::track(CollisionKind::PerfectlyInelastic, true),
            [
                Body::rect(
                    1,
                    DVec2::new(domain.width * 0.25, y),
                    DVec2::new(params.velocity1, 0.0),
                    params.mass1,
                    size,
                ),
                Body::rect(
                    2,
                    DVec2::new(domain.width * 0.75, y),
                    DVec2::new(params.velocity2, 0.0),
                    params.mass2,
                    size,
                ),
            ],
            domain,
        )
    }

    /// Cue ball strikes a resting ball on a table walled on all four sides
    pub fn billiards(params: &RealWorldParams, domain: Domain) -> Result<Self> {
        let y = domain.height / 2.0;
        Self::new(
            ScenarioKind::RealWorld(RealWorldKind::Billiards),
            PairConfig {
                collision: Some(CollisionKind::Elastic),
                axes: Axes::XY,
                tracks_energy: true,
                schedule: ForceSchedule::None,
                step_factor: 1.0,
                default_dt: REAL_WORLD_STEP * params.speed,
            },
            [
                Body::circle(1, DVec2::new(domain.width * 0.2, y), DVec2::new(10.0, 0.0), 1.0, 15.0),
                Body::circle(
                    2,
                    DVec2::new(domain.width * 0.6, y + params.billiards_aim_offset),
                    DVec2::ZERO,
                    1.0,
                    15.0,
                ),
            ],
            domain,
        )
    }

    /// Two skaters at rest push off each other
    pub fn skaters(params: &RealWorldParams, domain: Domain) -> Result<Self> {
        let y = domain.height / 2.0 - 30.0;
        let size = DVec2::new(30.0, 60.0);
        let [m1, m2] = params.skater_masses;
        Self::new(
            ScenarioKind::RealWorld(RealWorldKind::Skaters),
            PairConfig {
                collision: None,
                axes: Axes::X,
                tracks_energy: false,
                schedule: ForceSchedule::Push {
                    after: SKATER_PUSH_TIME,
                    force: params.skater_push,
                },
                // Skaters move ten times further per tick than the other vignettes
                step_factor: 1.0 / REAL_WORLD_STEP,
                default_dt: REAL_WORLD_STEP * params.speed,
            },
            [
                Body::rect(1, DVec2::new(domain.width / 2.0 - 60.0, y), DVec2::ZERO, m1, size),
                Body::rect(2, DVec2::new(domain.width / 2.0 + 30.0, y), DVec2::ZERO, m2, size),
            ],
            domain,
        )
    }

    /// Two cars in a partially inelastic head-on crash
    pub fn car_crash(params: &RealWorldParams, domain: Domain) -> Result<Self> {
        let y = domain.height / 2.0 - 20.0;
        let size = DVec2::new(80.0, 40.0);
        Self::new(
            ScenarioKind::RealWorld(RealWorldKind::CarCrash),
            PairConfig {
                collision: Some(CollisionKind::PartiallyInelastic {
                    restitution: params.car_restitution,
                }),
                axes: Axes::X,
                tracks_energy: true,
                schedule: ForceSchedule::None,
                step_factor: 1.0,
                default_dt: REAL_WORLD_STEP * params.speed,
            },
            [
                Body::rect(1, DVec2::new(domain.width * 0.2, y), DVec2::new(5.0, 0.0), 1500.0, size),
                Body::rect(2, DVec2::new(domain.width * 0.7, y), DVec2::new(-2.0, 0.0), 1000.0, size),
            ],
            domain,
        )
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn config(&self) -> &PairConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn events(&self) -> EventFlags {
        self.events
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub fn default_dt(&self) -> f64 {
        self.config.default_dt
    }

    /// Back to the state the scene was built in
    pub fn reset(&mut self) {
        self.bodies = self.initial.to_vec();
        self.baseline = Baseline::capture(&self.bodies);
        self.phase = Phase::Idle;
        self.events = EventFlags::default();
        self.ticks = 0;
        self.clock = 0.0;
        self.event_momentum = None;
        self.anomalies.clear();
    }

    /// Advance one tick
    pub fn advance(&mut self, dt: f64) {
        self.ticks += 1;
        self.clock += dt;
        self.phase = Phase::Running;

        if let ForceSchedule::Push { after, force } = self.config.schedule
            && !self.events.pushed
            && self.clock > after
        {
            self.push(force);
        }

        let step = dt * self.config.step_factor;
        for body in &mut self.bodies {
            body.integrate(step);
        }

        if let Some(kind) = self.config.collision
            && !self.events.collided
            && self.bodies.len() == 2
        {
            self.collide(kind);
        }

        for body in &mut self.bodies {
            contain(body, &self.domain, self.config.axes);
        }
    }

    fn push(&mut self, force: f64) {
        let [a, b] = self.bodies.as_mut_slice() else {
            return;
        };
        push_apart(a, b, force);

        self.event_momentum = Some(a.momentum() + b.momentum());
        self.events.pushed = true;
        self.phase = Phase::Resolved;
        log::info!(
            "{}: push off, v1 = {:.3}, v2 = {:.3}",
            self.kind.as_str(),
            a.velocity.x,
            b.velocity.x
        );
    }

    fn collide(&mut self, kind: CollisionKind) {
        let axes = self.config.axes;
        let merged_id = self.next_id();
        let [a, b] = self.bodies.as_mut_slice() else {
            return;
        };
        let Some(contact) = detect_contact(a, b, axes) else {
            return;
        };
        let energy_before = a.kinetic_energy() + b.kinetic_energy();

        let energy_after = match kind {
            CollisionKind::PerfectlyInelastic => {
                let merged = merge(a, b, merged_id);
                let energy_after = merged.kinetic_energy();
                log::info!(
                    "{}: merged into mass {} moving at {:.3}",
                    self.kind.as_str(),
                    merged.mass(),
                    merged.velocity.x
                );
                self.bodies = vec![merged];
                self.events.merged = true;
                energy_after
            }
            CollisionKind::Elastic | CollisionKind::PartiallyInelastic { .. } => {
                let result = match axes {
                    Axes::X => Ok(resolve_on_x(kind, a, b)),
                    Axes::XY => resolve_in_plane(kind, a, b, &contact),
                };
                match result {
                    Ok((v1, v2)) => {
                        a.velocity = v1;
                        b.velocity = v2;
                        separate(a, b, &contact);
                    }
                    Err(err) => {
                        log::debug!("{}: {}, retrying next tick", self.kind.as_str(), err);
                        self.phase = Phase::CollisionPending;
                        return;
                    }
                }
                log::info!(
                    "{}: collision resolved, v1 = {}, v2 = {}",
                    self.kind.as_str(),
                    a.velocity,
                    b.velocity
                );
                a.kinetic_energy() + b.kinetic_energy()
            }
        };

        if let Some(anomaly) = check_energy(energy_before, energy_after) {
            log::warn!("{}: {}", self.kind.as_str(), anomaly);
            self.anomalies.push(anomaly);
        }
        self.event_momentum = Some(Totals::of(&self.bodies).momentum);
        self.events.collided = true;
        self.phase = Phase::Resolved;
    }

    fn next_id(&self) -> u32 {
        self.bodies.iter().map(|b| b.id).max().unwrap_or(0) + 1
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            kind: self.kind,
            phase: self.phase,
            ticks: self.ticks,
            bodies: self.bodies.iter().map(Body::snapshot).collect(),
            particles: Vec::new(),
            conservation: ConservationReport::new(
                self.baseline,
                Totals::of(&self.bodies),
                self.config.tracks_energy,
            ),
            events: self.events,
            event_momentum: self.event_momentum,
            anomalies: self.anomalies.clone(),
            rocket: None,
        }
    }
}

/// Equal and opposite impulse along x. The first body ends at
/// `-force * m2 / m1`; the second takes the opposite momentum.
pub fn push_apart(a: &mut Body, b: &mut Body, force: f64) {
    let (m1, m2) = (a.mass(), b.mass());
    a.velocity.x = -force * m2 / m1;
    b.velocity.x = -m1 * a.velocity.x / m2;
}

/// Circles at 25% and 75% of the width, on the horizontal centre line
fn balls_on_track(params: &PairParams, domain: Domain) -> [Body; 2] {
    let y = domain.height / 2.0;
    [
        Body::circle(
            1,
            DVec2::new(domain.width * 0.25, y),
            DVec2::new(params.velocity1, 0.0),
            params.mass1,
            PAIR_BALL_RADIUS,
        ),
        Body::circle(
            2,
            DVec2::new(domain.width * 0.75, y),
            DVec2::new(params.velocity2, 0.0),
            params.mass2,
            PAIR_BALL_RADIUS,
        ),
    ]
}

/// One-dimensional rules applied to the x components
fn resolve_on_x(kind: CollisionKind, a: &Body, b: &Body) -> (DVec2, DVec2) {
    let (m1, m2) = (a.mass(), b.mass());
    let (v1, v2) = match kind {
        CollisionKind::PartiallyInelastic { restitution } => {
            resolve_partially_inelastic(m1, a.velocity.x, m2, b.velocity.x, restitution)
        }
        _ => resolve_elastic(m1, a.velocity.x, m2, b.velocity.x),
    };
    (
        DVec2::new(v1, a.velocity.y),
        DVec2::new(v2, b.velocity.y),
    )
}

/// Plane collisions use the normal/tangent frame of the contact
fn resolve_in_plane(
    kind: CollisionKind,
    a: &Body,
    b: &Body,
    contact: &Contact,
) -> Result<(DVec2, DVec2)> {
    match kind {
        CollisionKind::PartiallyInelastic { restitution } => {
            if contact.is_degenerate() {
                return Err(SimError::DegenerateCollisionNormal);
            }
            let n = contact.normal;
            let t = n.perp();
            let (v1, v2) = resolve_partially_inelastic(
                a.mass(),
                a.velocity.dot(n),
                b.mass(),
                b.velocity.dot(n),
                restitution,
            );
            Ok((
                n * v1 + t * a.velocity.dot(t),
                n * v2 + t * b.velocity.dot(t),
            ))
        }
        _ => resolve_elastic_2d(
            a.mass(),
            a.position,
            a.velocity,
            b.mass(),
            b.position,
            b.velocity,
        ),
    }
}

/// Replace a pair with one body carrying their combined mass and momentum
fn merge(a: &Body, b: &Body, id: u32) -> Body {
    let result = resolve_inelastic(
        a.mass(),
        a.velocity,
        a.position,
        b.mass(),
        b.velocity,
        b.position,
    );
    let extent = match (a.extent, b.extent) {
        (Extent::Circle { radius: ra }, Extent::Circle { radius: rb }) => Extent::Circle {
            radius: (ra * ra + rb * rb).sqrt(),
        },
        _ => {
            let (sa, sb) = (a.extent.size(), b.extent.size());
            Extent::Rect {
                width: sa.x + sb.x,
                height: sa.y.max(sb.y),
            }
        }
    };
    Body::new(id, result.position, result.velocity, result.mass, extent)
}
