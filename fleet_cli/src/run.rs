use std::{fs::File, io::BufReader, path::PathBuf, thread};

use anyhow::Context;
use clap::Args;
use comfy_table::Table;
use fleet_sim::{
    json::types::JsonScenario,
    simulation::{
        command::Command,
        dashboard::DashboardSnapshot,
        demo::DEMO_ROUTE_ID,
        playback::{Playback, TimedCommand},
        simulation::Simulation,
        simulation_params::SimulationParams,
    },
};
use indicatif::{ProgressBar, ProgressStyle};
use jiff::SignedDuration;
use serde::Serialize;
use tracing::info;

use crate::{parsers, tracing_renderer::TracingRenderer};

const SEED_ENV: &str = "FLEET_SEED";

#[derive(Args)]
pub struct RunArgs {
    /// Scenario file, the demo fleet is used when absent
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Simulated time to play (e.g., "60s", "5m", "PT1H")
    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "60s")]
    duration: SignedDuration,

    /// Frames per simulated second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed of the traffic random source, falls back to $FLEET_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Global simulation speed multiplier
    #[arg(long, value_parser = parsers::parse_speed)]
    sim_speed: Option<f64>,

    /// Waits between frames so the run takes as long as it simulates
    #[arg(long)]
    realtime: bool,

    /// Writes a JSON summary of the run
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: None,
            duration: SignedDuration::from_secs(60),
            fps: 30,
            seed: None,
            sim_speed: None,
            realtime: false,
            out: None,
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    duration: SignedDuration,
    frames: usize,
    deliveries: usize,
    traffic_changes: usize,
    warnings: usize,
    dashboard: DashboardSnapshot,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let seed = match args.seed {
        Some(seed) => Some(seed),
        None => seed_from_env()?,
    };
    let frame_interval = Playback::frame_interval_for(args.fps);

    let mut playback = match &args.input {
        Some(input) => {
            info!("Playing scenario {:?}", input);
            let file = File::open(input).with_context(|| format!("Cannot open {input:?}"))?;
            let scenario: JsonScenario = serde_json::from_reader(BufReader::new(file))?;
            scenario.build_playback(seed, frame_interval)?
        }
        None => {
            info!("Playing the demo fleet");
            demo_playback(seed, frame_interval)?
        }
    };

    if let Some(sim_speed) = args.sim_speed {
        playback.simulation_mut().set_sim_speed(sim_speed)?;
    }

    let frames = args.duration.as_secs_f64() / frame_interval.as_secs_f64();
    let bar = ProgressBar::new(frames.max(0.0) as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} frames ({elapsed})")?,
    );

    let mut renderer = TracingRenderer::default();
    let mut frame_count = 0;

    while playback.now() + frame_interval <= args.duration {
        playback.step(&mut renderer);
        frame_count += 1;
        bar.inc(1);

        if args.realtime {
            thread::sleep(frame_interval.unsigned_abs());
        }
    }

    bar.finish_and_clear();
    info!(
        "Played {} frames, {} deliveries, {} traffic changes",
        frame_count, renderer.deliveries, renderer.traffic_changes
    );

    let simulation = playback.simulation();
    println!("{}", fleet_table(simulation));

    if let Some(out) = args.out {
        let summary = RunSummary {
            duration: playback.now(),
            frames: frame_count,
            deliveries: renderer.deliveries,
            traffic_changes: renderer.traffic_changes,
            warnings: renderer.warnings,
            dashboard: simulation.snapshot(),
        };

        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out, serde_json::to_string_pretty(&summary)?)?;
    }

    Ok(())
}

fn seed_from_env() -> anyhow::Result<Option<u64>> {
    match std::env::var(SEED_ENV) {
        Ok(value) => Ok(Some(
            value
                .parse()
                .with_context(|| format!("{SEED_ENV} is not a number: {value}"))?,
        )),
        Err(_) => Ok(None),
    }
}

/// The demo fleet with its first truck sent along the demo route.
fn demo_playback(seed: Option<u64>, frame_interval: SignedDuration) -> anyhow::Result<Playback> {
    let simulation = Simulation::with_demo_data(SimulationParams {
        seed,
        ..SimulationParams::default()
    })?;

    let timeline = vec![TimedCommand {
        at: SignedDuration::from_secs(1),
        command: Command::Assign {
            vehicle_id: "TRK-1001".into(),
            route_id: DEMO_ROUTE_ID.into(),
        },
    }];

    Ok(Playback::new(simulation, timeline, frame_interval))
}

fn fleet_table(simulation: &Simulation) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Vehicle", "Kind", "Status", "Position", "Route", "ETA"]);

    for vehicle in simulation.vehicles() {
        let route = simulation
            .assignment(vehicle.id())
            .map(|route_id| route_id.to_string())
            .unwrap_or_else(|| String::from("—"));
        let eta = simulation
            .vehicle_eta(vehicle.id())
            .map(|eta| eta.to_string())
            .unwrap_or_else(|_| String::from("—"));

        table.add_row(vec![
            vehicle.id().to_string(),
            vehicle.kind().to_string(),
            vehicle.status().to_string(),
            format!(
                "{:.4}, {:.4}",
                vehicle.position().lat(),
                vehicle.position().lon()
            ),
            route,
            eta,
        ]);
    }

    table
}
