//! Momentum Lab headless runner
//!
//! Runs one scene for a number of ticks and prints the final snapshot as
//! JSON. Set `RUST_LOG=info` to see collisions and other events as they fire.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use momentum_lab::Params;
use momentum_lab::sim::{RealWorldKind, ScenarioKind, Simulation, Snapshot};

/// Scene names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    Basic,
    Elastic,
    Inelastic,
    Explosion,
    Billiards,
    Rocket,
    Skaters,
    #[value(alias = "car_crash", alias = "carcrash")]
    CarCrash,
}

impl From<Scene> for ScenarioKind {
    fn from(scene: Scene) -> Self {
        match scene {
            Scene::Basic => ScenarioKind::BasicPair,
            Scene::Elastic => ScenarioKind::ElasticPair,
            Scene::Inelastic => ScenarioKind::InelasticPair,
            Scene::Explosion => ScenarioKind::Explosion,
            Scene::Billiards => ScenarioKind::RealWorld(RealWorldKind::Billiards),
            Scene::Rocket => ScenarioKind::RealWorld(RealWorldKind::Rocket),
            Scene::Skaters => ScenarioKind::RealWorld(RealWorldKind::Skaters),
            Scene::CarCrash => ScenarioKind::RealWorld(RealWorldKind::CarCrash),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "momentum-lab", about = "Run a momentum scene headless")]
struct Args {
    /// Scene to run
    #[arg(value_enum, default_value_t = Scene::Basic)]
    scene: Scene,
    /// Ticks to advance
    #[arg(default_value_t = 300)]
    ticks: u64,
    /// JSON file overriding the default parameters
    params: Option<PathBuf>,
}

fn load_params(path: &Path) -> Result<Params> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Params::from_json(&json).with_context(|| format!("bad parameters in {}", path.display()))
}

fn run(args: &Args) -> Result<Snapshot> {
    let kind = ScenarioKind::from(args.scene);
    let params = match &args.params {
        Some(path) => load_params(path)?,
        None => Params::default(),
    };

    log::info!(
        "running '{}' for {} ticks (seed {})",
        kind.as_str(),
        args.ticks,
        params.seed
    );

    let mut sim = Simulation::new(params, kind)?;
    sim.play();
    let ran = sim.advance_n(args.ticks);

    let snapshot = sim.snapshot();
    let report = &snapshot.conservation;
    log::info!(
        "{} ticks: momentum {} (baseline {}), conserved: {}",
        ran,
        report.current.momentum,
        report.baseline.momentum,
        report.momentum_conserved
    );
    for anomaly in &snapshot.anomalies {
        log::warn!("{}", anomaly);
    }
    Ok(snapshot)
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();
    let snapshot = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
