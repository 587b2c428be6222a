#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Packet Striker sessions headless.

mod autopilot;
mod headless;

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use packet_striker_config::ConfigTables;
use packet_striker_core::{NullAudio, WELCOME_BANNER};
use packet_striker_rendering::{
    Color, FrameControl, FrameTiming, Presentation, RenderingBackend, Scene,
};
use packet_striker_session::{Session, SessionConfig};
use packet_striker_system_signal_bridge::{BridgeConfig, SignalBridge, SyntheticTraffic};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use autopilot::Autopilot;
use headless::HeadlessBackend;

const SIGNAL_COOLDOWN: Duration = Duration::from_secs(1);
const SIGNAL_QUEUE: usize = 64;

/// Arcade shooter whose enemies arrive with your network traffic.
#[derive(Parser, Debug)]
#[command(name = "packet-striker")]
#[command(version)]
struct Args {
    /// Directory holding enemy_config.json, boss_config.json and wave_config.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Write the builtin configuration tables to DIR and exit
    #[arg(long, value_name = "DIR")]
    export_config: Option<PathBuf>,

    /// Seed for every generator in the session
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of frames to simulate at 60 frames per second
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Number of waves before victory
    #[arg(long)]
    max_waves: Option<u32>,

    /// Feed the signal bridge with generated packets instead of leaving it disabled
    #[arg(long)]
    synthetic_traffic: bool,

    /// Average packets per second produced by --synthetic-traffic
    #[arg(long, default_value_t = 5.0)]
    traffic_rate: f32,

    /// Let a scripted pilot fly and fire the ship
    #[arg(long)]
    autopilot: bool,
}

/// Entry point for the Packet Striker command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    println!("{WELCOME_BANNER}");

    if let Some(dir) = &args.export_config {
        ConfigTables::builtin()
            .save(dir)
            .with_context(|| format!("failed to export configuration to {}", dir.display()))?;
        println!("configuration written to {}", dir.display());
        return Ok(());
    }

    let tables = match &args.config_dir {
        Some(dir) => ConfigTables::load_or_builtin(dir),
        None => ConfigTables::builtin(),
    };
    let mut config = SessionConfig::new(tables, args.seed);
    if let Some(max_waves) = args.max_waves {
        config.encounter = config.encounter.with_max_waves(max_waves);
    }

    let bridge = if args.synthetic_traffic {
        let source = SyntheticTraffic::new(args.traffic_rate, args.seed);
        let bridge_config = BridgeConfig::new(SIGNAL_COOLDOWN, SIGNAL_QUEUE, config.playfield);
        SignalBridge::spawn(bridge_config, source).context("failed to start the signal bridge")?
    } else {
        SignalBridge::disabled(config.playfield)
    };

    let session = Rc::new(RefCell::new(Session::new(
        config,
        bridge,
        Box::new(NullAudio),
    )));
    let presentation = Presentation::new(
        "Packet Striker",
        Color::from_rgb_u8(0, 0, 0),
        FrameTiming::default(),
    );
    let backend = HeadlessBackend::new(args.frames, args.autopilot.then_some(Autopilot));

    let stepped = Rc::clone(&session);
    backend.run(presentation, move |dt, input| {
        let mut session = stepped.borrow_mut();
        let _ = session.step(dt, input.intent());
        let control = if session.is_over() {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        };
        (Scene::capture(&session), control)
    })?;

    let mut session = session.borrow_mut();
    session.shutdown();
    let summary = session.summary();
    println!("outcome: {:?}", summary.status);
    println!("frames: {}", summary.frames);
    println!("wave reached: {}", summary.wave);
    println!("score: {} ({} kills)", summary.score, summary.kills);
    println!("lives left: {}", summary.lives);
    println!("network spawns: {}", summary.network_spawns);
    Ok(())
}
