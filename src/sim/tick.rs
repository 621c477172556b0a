//! Fixed timestep simulation driver
//!
//! Owns the parameters and the active scene, and advances it one tick at a
//! time while playing.

use serde::{Deserialize, Serialize};

use super::scenario::Scenario;
use super::state::{ScenarioKind, Snapshot};
use crate::error::Result;
use crate::settings::Params;

/// Play/pause state of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    /// Built or reset, never started
    Stopped,
    Playing,
    Paused,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start (or resume) the active scene
    pub play: bool,
    /// Freeze the active scene
    pub pause: bool,
    /// Restore the active scene to its initial state
    pub reset: bool,
    /// Switch to another scene
    pub select: Option<ScenarioKind>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    params: Params,
    scenario: Scenario,
    playback: Playback,
    /// Ticks advanced since the last reset or rebuild
    ticks: u64,
}

impl Simulation {
    pub fn new(params: Params, kind: ScenarioKind) -> Result<Self> {
        let scenario = Scenario::build(kind, &params)?;
        Ok(Self {
            params,
            scenario,
            playback: Playback::Stopped,
            ticks: 0,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn kind(&self) -> ScenarioKind {
        self.scenario.kind()
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Switch scenes. The new scene starts stopped and from its initial state.
    pub fn select(&mut self, kind: ScenarioKind) -> Result<()> {
        self.scenario = Scenario::build(kind, &self.params)?;
        self.playback = Playback::Stopped;
        self.ticks = 0;
        log::info!("selected scene '{}'", kind.as_str());
        Ok(())
    }

    /// Replace the parameters and rebuild the active scene from them.
    /// On error the previous parameters and scene are left untouched.
    pub fn set_params(&mut self, params: Params) -> Result<()> {
        params.validate()?;
        let scenario = Scenario::build(self.kind(), &params)?;
        self.params = params;
        self.scenario = scenario;
        self.playback = Playback::Stopped;
        self.ticks = 0;
        log::debug!("parameters changed, rebuilt '{}'", self.kind().as_str());
        Ok(())
    }

    pub fn play(&mut self) {
        self.playback = Playback::Playing;
    }

    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    /// Back to the initial state of the active scene. Calling it twice is
    /// the same as calling it once.
    pub fn reset(&mut self) {
        self.scenario.reset();
        self.playback = Playback::Stopped;
        self.ticks = 0;
    }

    /// Advance one tick at the scene's own step. Does nothing unless playing.
    pub fn advance(&mut self) -> bool {
        if self.playback != Playback::Playing {
            return false;
        }
        let dt = self.scenario.default_dt();
        self.scenario.advance(dt);
        self.ticks += 1;
        true
    }

    /// Advance up to `n` ticks, returning how many actually ran
    pub fn advance_n(&mut self, n: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..n {
            if !self.advance() {
                break;
            }
            ran += 1;
        }
        ran
    }

    pub fn snapshot(&self) -> Snapshot {
        self.scenario.snapshot()
    }
}

/// Apply one tick's input, then advance the simulation
///
/// Commands are applied in the order select, reset, pause, play. Selecting a
/// scene that fails to build keeps the current one.
pub fn tick(sim: &mut Simulation, input: &TickInput) -> Result<()> {
    if let Some(kind) = input.select
        && kind != sim.kind()
    {
        sim.select(kind)?;
    }
    if input.reset {
        sim.reset();
    }
    if input.pause {
        sim.pause();
    }
    if input.play {
        sim.play();
    }
    sim.advance();
    Ok(())
}
