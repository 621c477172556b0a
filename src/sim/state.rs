//! Scene identity, bodies and snapshot types
//!
//! Everything the renderer is allowed to see is defined here.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::conservation::ConservationReport;
use super::kinematics;
use crate::error::SimError;

/// The four vignettes of the real-world scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealWorldKind {
    Billiards,
    Rocket,
    Skaters,
    CarCrash,
}

/// Which scene is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    BasicPair,
    ElasticPair,
    InelasticPair,
    Explosion,
    RealWorld(RealWorldKind),
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 8] = [
        ScenarioKind::BasicPair,
        ScenarioKind::ElasticPair,
        ScenarioKind::InelasticPair,
        ScenarioKind::Explosion,
        ScenarioKind::RealWorld(RealWorldKind::Billiards),
        ScenarioKind::RealWorld(RealWorldKind::Rocket),
        ScenarioKind::RealWorld(RealWorldKind::Skaters),
        ScenarioKind::RealWorld(RealWorldKind::CarCrash),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::BasicPair => "basic",
            ScenarioKind::ElasticPair => "elastic",
            ScenarioKind::InelasticPair => "inelastic",
            ScenarioKind::Explosion => "explosion",
            ScenarioKind::RealWorld(RealWorldKind::Billiards) => "billiards",
            ScenarioKind::RealWorld(RealWorldKind::Rocket) => "rocket",
            ScenarioKind::RealWorld(RealWorldKind::Skaters) => "skaters",
            ScenarioKind::RealWorld(RealWorldKind::CarCrash) => "car-crash",
        }
    }
}

/// Lifecycle of a scene within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Freshly built or reset, not yet advanced
    Idle,
    /// Bodies moving, no event this tick
    Running,
    /// Contact detected but could not be resolved this tick (retried next tick)
    CollisionPending,
    /// The scene's one-off event (collision, merge, detonation, push) fired this tick
    Resolved,
}

/// Collision/containment shape of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    /// Positioned by centre
    Circle { radius: f64 },
    /// Positioned by minimum (top-left) corner
    Rect { width: f64, height: f64 },
}

impl Extent {
    /// Offset from the body position back to its lower edge on each axis
    pub fn lower(&self) -> DVec2 {
        match *self {
            Extent::Circle { radius } => DVec2::splat(radius),
            Extent::Rect { .. } => DVec2::ZERO,
        }
    }

    /// Offset from the body position forward to its upper edge on each axis
    pub fn upper(&self) -> DVec2 {
        match *self {
            Extent::Circle { radius } => DVec2::splat(radius),
            Extent::Rect { width, height } => DVec2::new(width, height),
        }
    }

    /// Full size on each axis
    pub fn size(&self) -> DVec2 {
        self.lower() + self.upper()
    }
}

/// A rigid body. Mass is fixed for the body's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    pub extent: Extent,
}

impl Body {
    pub fn new(id: u32, position: DVec2, velocity: DVec2, mass: f64, extent: Extent) -> Self {
        Self {
            id,
            position,
            velocity,
            mass,
            extent,
        }
    }

    pub fn circle(id: u32, center: DVec2, velocity: DVec2, mass: f64, radius: f64) -> Self {
        Self::new(id, center, velocity, mass, Extent::Circle { radius })
    }

    pub fn rect(id: u32, corner: DVec2, velocity: DVec2, mass: f64, size: DVec2) -> Self {
        Self::new(
            id,
            corner,
            velocity,
            mass,
            Extent::Rect {
                width: size.x,
                height: size.y,
            },
        )
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        kinematics::momentum(self.mass, self.velocity)
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        kinematics::kinetic_energy(self.mass, self.velocity)
    }

    /// Lower (left/top) edge coordinates
    pub fn min_edge(&self) -> DVec2 {
        self.position - self.extent.lower()
    }

    /// Upper (right/bottom) edge coordinates
    pub fn max_edge(&self) -> DVec2 {
        self.position + self.extent.upper()
    }

    pub fn center(&self) -> DVec2 {
        (self.min_edge() + self.max_edge()) * 0.5
    }

    /// Move by `velocity * dt`
    pub fn integrate(&mut self, dt: f64) {
        self.position = kinematics::drift(self.position, self.velocity, dt);
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            mass: self.mass,
            extent: self.extent,
        }
    }
}

/// Massless exhaust particle (rocket vignette)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub size: f64,
    /// Remaining life in clock units; removed at or below zero
    pub life: f64,
}

/// RNG seed wrapper; scenes rebuild their generator from it on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One-off events a scene has been through during the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFlags {
    pub collided: bool,
    pub merged: bool,
    pub detonated: bool,
    pub pushed: bool,
    /// Rocket engine has started firing
    pub ignited: bool,
}

/// Read-only body view for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    pub extent: Extent,
}

/// Rocket bookkeeping as shown on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketLedger {
    /// `mass * vy` of the rocket (negative is upward)
    pub rocket_momentum: f64,
    /// Sum of the live particles' vertical velocities. Particles carry no
    /// mass, so this is a velocity sum and not a momentum.
    pub exhaust_velocity_sum: f64,
    pub particle_count: usize,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: ScenarioKind,
    pub phase: Phase,
    /// Ticks advanced since the last reset
    pub ticks: u64,
    pub bodies: Vec<BodySnapshot>,
    pub particles: Vec<Particle>,
    pub conservation: ConservationReport,
    pub events: EventFlags,
    /// Total momentum right after the scene's one-off event, before any wall
    /// contact could change it
    pub event_momentum: Option<DVec2>,
    /// Conditions detected this run that the renderer should surface
    pub anomalies: Vec<SimError>,
    pub rocket: Option<RocketLedger>,
}
