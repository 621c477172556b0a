//! Scene dispatch
//!
//! Builds the active scene from validated parameters and forwards the
//! per-tick calls to it.

use super::explosion::ExplosionScenario;
use super::pair::PairScenario;
use super::rocket::RocketScenario;
use super::state::{Phase, RealWorldKind, ScenarioKind, Snapshot};
use crate::error::Result;
use crate::settings::Params;

#[derive(Debug, Clone)]
pub enum Scenario {
    /// Two bodies on a track or table (basic, elastic, inelastic, billiards, skaters, car crash)
    Pair(PairScenario),
    Explosion(ExplosionScenario),
    Rocket(RocketScenario),
}

impl Scenario {
    /// Build a fresh scene of the given kind
    pub fn build(kind: ScenarioKind, params: &Params) -> Result<Self> {
        params.validate()?;
        let domain = params.domain;
        let rw = &params.real_world;

        let scenario = match kind {
            ScenarioKind::BasicPair => Scenario::Pair(PairScenario::basic(&params.basic, domain)?),
            ScenarioKind::ElasticPair => {
                Scenario::Pair(PairScenario::elastic(&params.elastic, domain)?)
            }
            ScenarioKind::InelasticPair => {
                Scenario::Pair(PairScenario::inelastic(&params.inelastic, domain)?)
            }
            ScenarioKind::Explosion => Scenario::Explosion(ExplosionScenario::new(
                params.explosion,
                domain,
                params.seed,
            )?),
            ScenarioKind::RealWorld(RealWorldKind::Billiards) => {
                Scenario::Pair(PairScenario::billiards(rw, domain)?)
            }
            ScenarioKind::RealWorld(RealWorldKind::Rocket) => {
                Scenario::Rocket(RocketScenario::new(rw, domain, params.seed)?)
            }
            ScenarioKind::RealWorld(RealWorldKind::Skaters) => {
                Scenario::Pair(PairScenario::skaters(rw, domain)?)
            }
            ScenarioKind::RealWorld(RealWorldKind::CarCrash) => {
                Scenario::Pair(PairScenario::car_crash(rw, domain)?)
            }
        };

        log::debug!("built scene '{}'", kind.as_str());
        Ok(scenario)
    }

    pub fn kind(&self) -> ScenarioKind {
        match self {
            Scenario::Pair(s) => s.kind(),
            Scenario::Explosion(_) => ScenarioKind::Explosion,
            Scenario::Rocket(_) => ScenarioKind::RealWorld(RealWorldKind::Rocket),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Scenario::Pair(s) => s.phase(),
            Scenario::Explosion(s) => s.phase(),
            Scenario::Rocket(s) => s.phase(),
        }
    }

    /// Step size one tick uses when the caller has no opinion
    pub fn default_dt(&self) -> f64 {
        match self {
            Scenario::Pair(s) => s.default_dt(),
            Scenario::Explosion(s) => s.default_dt(),
            Scenario::Rocket(s) => s.default_dt(),
        }
    }

    pub fn advance(&mut self, dt: f64) {
        match self {
            Scenario::Pair(s) => s.advance(dt),
            Scenario::Explosion(s) => s.advance(dt),
            Scenario::Rocket(s) => s.advance(dt),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Scenario::Pair(s) => s.reset(),
            Scenario::Explosion(s) => s.reset(),
            Scenario::Rocket(s) => s.reset(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match self {
            Scenario::Pair(s) => s.snapshot(),
            Scenario::Explosion(s) => s.snapshot(),
            Scenario::Rocket(s) => s.snapshot(),
        }
    }
}
