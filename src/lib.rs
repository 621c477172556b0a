//! Momentum Lab - momentum conservation scenes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, scenes, accounting)
//! - `settings`: Scene parameters and their validation
//! - `error`: Error taxonomy shared by the whole crate

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{Domain, ExplosionParams, PairParams, Params, RealWorldParams};

/// Simulation constants
pub mod consts {
    /// Tolerance used by the on-screen "conserved" indicator
    pub const CONSERVATION_TOLERANCE: f64 = 0.1;
    /// Relative slack before a kinetic energy gain is reported as an anomaly
    pub const ENERGY_ANOMALY_TOLERANCE: f64 = 1e-6;
    /// Centre distance below which a 2D collision normal is undefined
    pub const DEGENERATE_NORMAL_EPSILON: f64 = 1e-9;

    /// Default domain (canvas) size
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 400.0;
    /// Smallest domain that holds every wall-contained body: the merged
    /// block and the cars are 80 wide, the rocket starts 100 above the floor
    pub const MIN_DOMAIN_WIDTH: f64 = 80.0;
    pub const MIN_DOMAIN_HEIGHT: f64 = 100.0;

    /// Pair scenes: ball radius and block size
    pub const PAIR_BALL_RADIUS: f64 = 20.0;
    pub const PAIR_BLOCK_SIZE: f64 = 40.0;

    /// Explosion parent body size
    pub const EXPLOSION_BODY_SIZE: f64 = 60.0;
    /// Fragment mass range [min, max)
    pub const FRAGMENT_MASS_MIN: f64 = 1.0;
    pub const FRAGMENT_MASS_MAX: f64 = 5.0;
    /// Upper bound of the fragment count slider
    pub const MAX_FRAGMENTS: u32 = 50;

    /// Real-world scenes advance their clock by this much per tick at speed 1
    pub const REAL_WORLD_STEP: f64 = 0.1;
    /// Clock value after which the rocket starts firing
    pub const ROCKET_IGNITION_TIME: f64 = 1.0;
    /// Clock value after which the skaters push off
    pub const SKATER_PUSH_TIME: f64 = 2.0;
    /// Life of a freshly emitted exhaust particle (clock units)
    pub const EXHAUST_LIFE: f64 = 30.0;
}
