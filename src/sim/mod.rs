//! Deterministic simulation module
//!
//! All scene logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod collision;
pub mod conservation;
pub mod explosion;
pub mod kinematics;
pub mod pair;
pub mod rocket;
pub mod scenario;
pub mod state;
pub mod tick;

pub use boundary::{Axes, Wall, contain, reflect_axis};
pub use collision::{
    CollisionKind, Contact, Merge, check_energy, detect_contact, resolve_elastic,
    resolve_elastic_2d, resolve_inelastic, resolve_partially_inelastic,
};
pub use conservation::{Baseline, ConservationReport, Totals};
pub use explosion::ExplosionScenario;
pub use pair::{ForceSchedule, PairConfig, PairScenario};
pub use rocket::RocketScenario;
pub use scenario::Scenario;
pub use state::{
    Body, BodySnapshot, EventFlags, Extent, Particle, Phase, RealWorldKind, RngState,
    RocketLedger, ScenarioKind, Snapshot,
};
pub use tick::{Playback, Simulation, TickInput, tick};
