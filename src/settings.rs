//! Scene parameters
//!
//! These are the values the control panel feeds into the core. They are
//! validated once, here, before any scene is (re)built from them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_FRAGMENTS, MIN_DOMAIN_HEIGHT, MIN_DOMAIN_WIDTH,
};
use crate::error::{Result, SimError};

/// Rectangular simulation domain `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Masses and initial velocities for a two-body scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairParams {
    pub mass1: f64,
    pub velocity1: f64,
    pub mass2: f64,
    pub velocity2: f64,
}

impl PairParams {
    pub const BASIC: PairParams = PairParams::new(5.0, 5.0, 5.0, -5.0);
    pub const ELASTIC: PairParams = PairParams::new(5.0, 5.0, 5.0, 0.0);
    pub const INELASTIC: PairParams = PairParams::new(5.0, 5.0, 5.0, 0.0);

    pub const fn new(mass1: f64, velocity1: f64, mass2: f64, velocity2: f64) -> Self {
        Self {
            mass1,
            velocity1,
            mass2,
            velocity2,
        }
    }

    fn validate(&self, scene: &str) -> Result<()> {
        check_mass(&format!("{}.mass1", scene), self.mass1)?;
        check_mass(&format!("{}.mass2", scene), self.mass2)?;
        check_finite(&format!("{}.velocity1", scene), self.velocity1)?;
        check_finite(&format!("{}.velocity2", scene), self.velocity2)
    }
}

/// Partial pair parameters as they appear in JSON; absent fields keep the
/// scene's own defaults
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PairOverrides {
    mass1: Option<f64>,
    velocity1: Option<f64>,
    mass2: Option<f64>,
    velocity2: Option<f64>,
}

impl PairOverrides {
    fn over(self, base: PairParams) -> PairParams {
        PairParams {
            mass1: self.mass1.unwrap_or(base.mass1),
            velocity1: self.velocity1.unwrap_or(base.velocity1),
            mass2: self.mass2.unwrap_or(base.mass2),
            velocity2: self.velocity2.unwrap_or(base.velocity2),
        }
    }
}

fn basic_pair<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<PairParams, D::Error> {
    Ok(PairOverrides::deserialize(d)?.over(PairParams::BASIC))
}

fn elastic_pair<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<PairParams, D::Error> {
    Ok(PairOverrides::deserialize(d)?.over(PairParams::ELASTIC))
}

fn inelastic_pair<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<PairParams, D::Error> {
    Ok(PairOverrides::deserialize(d)?.over(PairParams::INELASTIC))
}

/// Explosion controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionParams {
    /// Speed given to every fragment along its radial direction
    pub force: f64,
    /// Number of fragments produced at detonation
    pub fragment_count: u32,
    /// Ticks the parent body waits before detonating
    pub delay_ticks: u32,
}

impl Default for ExplosionParams {
    fn default() -> Self {
        Self {
            force: 5.0,
            fragment_count: 8,
            delay_ticks: 30,
        }
    }
}

/// Controls for the four real-world vignettes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealWorldParams {
    /// Animation speed multiplier (1-10 on the page)
    pub speed: f64,
    /// Vertical offset of the target ball; 0 is a head-on shot
    pub billiards_aim_offset: f64,
    /// Upward velocity gained per clock unit while the rocket fires
    pub rocket_thrust: f64,
    pub skater_masses: [f64; 2],
    pub skater_push: f64,
    /// Restitution used by the car crash formula
    pub car_restitution: f64,
}

impl Default for RealWorldParams {
    fn default() -> Self {
        Self {
            speed: 5.0,
            billiards_aim_offset: 0.0,
            rocket_thrust: 0.5,
            skater_masses: [70.0, 50.0],
            skater_push: 0.2,
            car_restitution: 0.2,
        }
    }
}

/// All parameters for every scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub domain: Domain,
    /// Seed for fragment and exhaust randomness
    pub seed: u64,

    // === Collision scenes ===
    #[serde(deserialize_with = "basic_pair")]
    pub basic: PairParams,
    #[serde(deserialize_with = "elastic_pair")]
    pub elastic: PairParams,
    #[serde(deserialize_with = "inelastic_pair")]
    pub inelastic: PairParams,

    // === Explosion ===
    pub explosion: ExplosionParams,

    // === Real world ===
    pub real_world: RealWorldParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            seed: 42,

            basic: PairParams::BASIC,
            elastic: PairParams::ELASTIC,
            inelastic: PairParams::INELASTIC,

            explosion: ExplosionParams::default(),

            real_world: RealWorldParams::default(),
        }
    }
}

impl Params {
    /// Parse parameters from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject anything the scenes cannot run with
    pub fn validate(&self) -> Result<()> {
        // Every wall-contained body must fit between the walls
        if !(self.domain.width >= MIN_DOMAIN_WIDTH && self.domain.width.is_finite()) {
            return Err(SimError::invalid_parameter(
                "domain.width",
                format!("must be at least {}", MIN_DOMAIN_WIDTH),
            ));
        }
        if !(self.domain.height >= MIN_DOMAIN_HEIGHT && self.domain.height.is_finite()) {
            return Err(SimError::invalid_parameter(
                "domain.height",
                format!("must be at least {}", MIN_DOMAIN_HEIGHT),
            ));
        }

        self.basic.validate("basic")?;
        self.elastic.validate("elastic")?;
        self.inelastic.validate("inelastic")?;

        check_finite("explosion.force", self.explosion.force)?;
        if !(1..=MAX_FRAGMENTS).contains(&self.explosion.fragment_count) {
            return Err(SimError::invalid_parameter(
                "explosion.fragment_count",
                format!("must be within [1, {}]", MAX_FRAGMENTS),
            ));
        }

        let rw = &self.real_world;
        if !(rw.speed > 0.0 && rw.speed.is_finite()) {
            return Err(SimError::invalid_parameter("real_world.speed", "must be > 0"));
        }
        check_finite("real_world.billiards_aim_offset", rw.billiards_aim_offset)?;
        check_finite("real_world.rocket_thrust", rw.rocket_thrust)?;
        check_mass("real_world.skater_masses[0]", rw.skater_masses[0])?;
        check_mass("real_world.skater_masses[1]", rw.skater_masses[1])?;
        check_finite("real_world.skater_push", rw.skater_push)?;
        if !(0.0..=1.0).contains(&rw.car_restitution) {
            return Err(SimError::invalid_parameter(
                "real_world.car_restitution",
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Masses divide every resolver formula, so they must be strictly positive
pub fn check_mass(name: &str, mass: f64) -> Result<()> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidMass {
            name: name.to_string(),
            value: mass,
        })
    }
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(name, "must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let mut params = Params::default();
        params.inelastic.mass2 = 0.0;
        assert_eq!(
            params.validate(),
            Err(SimError::InvalidMass {
                name: "inelastic.mass2".to_string(),
                value: 0.0
            })
        );

        let mut params = Params::default();
        params.real_world.skater_masses[0] = -70.0;
        assert!(matches!(params.validate(), Err(SimError::InvalidMass { .. })));
    }

    #[test]
    fn test_rejects_zero_fragments() {
        let mut params = Params::default();
        params.explosion.fragment_count = 0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = Params::from_json(r#"{ "seed": 7, "explosion": { "fragment_count": 3 } }"#)
            .unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.explosion.fragment_count, 3);
        assert_eq!(params.explosion.delay_ticks, 30);
        assert_eq!(params.basic, Params::default().basic);
    }

    #[test]
    fn test_json_validation_runs() {
        let json = r#"{ "basic": { "mass1": -1, "velocity1": 5, "mass2": 5, "velocity2": -5 } }"#;
        assert!(matches!(
            Params::from_json(json),
            Err(SimError::InvalidMass { .. })
        ));
        assert!(matches!(Params::from_json("{"), Err(SimError::Config(_))));
    }

    #[test]
    fn test_partial_pair_json_keeps_scene_defaults() {
        let params = Params::from_json(r#"{ "basic": { "mass1": 3 } }"#).unwrap();
        assert_eq!(params.basic, PairParams::new(3.0, 5.0, 5.0, -5.0));

        let params = Params::from_json(r#"{ "inelastic": { "velocity2": -1 } }"#).unwrap();
        assert_eq!(params.inelastic, PairParams::new(5.0, 5.0, 5.0, -1.0));
        assert_eq!(params.basic, PairParams::BASIC);

        assert!(matches!(
            Params::from_json(r#"{ "elastic": { "mas1": 3 } }"#),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_partial_domain_json() {
        let params = Params::from_json(r#"{ "domain": { "width": 1000 } }"#).unwrap();
        assert_eq!(params.domain.width, 1000.0);
        assert_eq!(params.domain.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_rejects_domain_smaller_than_bodies() {
        let mut params = Params::default();
        params.domain.width = 30.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { ref name, .. }) if name == "domain.width"
        ));

        let mut params = Params::default();
        params.domain.height = MIN_DOMAIN_HEIGHT - 1.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.domain = Domain {
            width: MIN_DOMAIN_WIDTH,
            height: MIN_DOMAIN_HEIGHT,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_caps_fragment_count() {
        let mut params = Params::default();
        params.explosion.fragment_count = MAX_FRAGMENTS;
        assert!(params.validate().is_ok());
        params.explosion.fragment_count = u32::MAX;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let params = Params::default();
        let json = params.to_json().unwrap();
        assert_eq!(Params::from_json(&json).unwrap(), params);
    }
}
