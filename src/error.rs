//! Error taxonomy
//!
//! Parameter errors are returned before a scene is built. Runtime geometry and
//! bookkeeping problems are carried in snapshots rather than returned.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimError {
    /// A mass that is not strictly positive and finite
    InvalidMass { name: String, value: f64 },
    /// Any other parameter outside its accepted range
    InvalidParameter { name: String, reason: String },
    /// Two circle centres coincide so there is no contact normal
    DegenerateCollisionNormal,
    /// Kinetic energy went up across a collision that should not add energy
    NegativeEnergyAnomaly { before: f64, after: f64 },
    /// Parameter JSON could not be parsed
    Config(String),
}

impl SimError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidMass { name, value } => {
                write!(f, "invalid mass for {}: {} (must be > 0)", name, value)
            }
            SimError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {}: {}", name, reason)
            }
            SimError::DegenerateCollisionNormal => {
                write!(f, "collision normal is undefined (coincident centres)")
            }
            SimError::NegativeEnergyAnomaly { before, after } => write!(
                f,
                "kinetic energy increased across collision: {:.6} -> {:.6}",
                before, after
            ),
            SimError::Config(msg) => write!(f, "bad parameters: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}
