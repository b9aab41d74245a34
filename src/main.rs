//! Grid Chase headless runner
//!
//! Runs the chase against the sandbox host with a wandering target and
//! periodic operator obstacle changes, then prints a JSON summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use grid_chase::consts::MAX_SUBSTEPS;
use grid_chase::sim::{Actor, ChaseHost, ChaseState, ChaseStats, TickInput, tick};
use grid_chase::{ChaseError, ChaseResult, SandboxHost, SimSettings};

/// Ticks between target direction changes
const WANDER_INTERVAL: u64 = 45;
/// Force applied to the target on each direction change
const WANDER_STRENGTH: f32 = 0.12;

#[derive(Parser, Debug)]
#[command(name = "grid-chase", about = "Seeker/target chase on a tile grid")]
struct Args {
    /// Simulation ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Run seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Grid columns (overrides the settings file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid rows (overrides the settings file)
    #[arg(long)]
    height: Option<usize>,

    /// Render frame period in milliseconds; ticks are fixed-step inside it
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f32,

    /// Add an obstacle every N ticks (0 disables)
    #[arg(long, default_value_t = 150)]
    add_every: u64,

    /// Remove an obstacle every N ticks (0 disables)
    #[arg(long, default_value_t = 400)]
    remove_every: u64,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    dump_settings: bool,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    stats: ChaseStats,
    hidden_tiles: Vec<usize>,
    seeker: Vec3,
    target: Vec3,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> ChaseResult<()> {
    let mut settings = match &args.settings {
        Some(path) => SimSettings::load(path)?,
        None => SimSettings::default(),
    };
    if let Some(width) = args.width {
        settings.grid_width = width;
    }
    if let Some(height) = args.height {
        settings.grid_height = height;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;
    if !(args.frame_ms > 0.0) {
        return Err(ChaseError::InvalidSettings(format!(
            "frame period must be positive, got {} ms",
            args.frame_ms
        )));
    }

    if args.dump_settings {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let seed = settings.seed_or_clock();
    log::info!("Grid Chase starting with seed {}", seed);

    let mut state = ChaseState::new(&settings, seed)?;
    let (seeker, target) = state.spawn_points()?;
    let mut host = SandboxHost::new(seeker, target, state.grid.area());
    let mut wander = Pcg32::seed_from_u64(seed ^ 0x5eed_cafe);

    let frame_dt = args.frame_ms / 1000.0;
    let dt = settings.sim_dt;
    let mut accumulator = 0.0;
    let mut input = TickInput::default();

    while state.time_ticks < args.ticks {
        accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while accumulator >= dt && substeps < MAX_SUBSTEPS && state.time_ticks < args.ticks {
            let n = state.time_ticks;
            input.add_obstacle = args.add_every > 0 && n % args.add_every == 0;
            input.remove_obstacle = args.remove_every > 0 && n % args.remove_every == 0;

            if n % WANDER_INTERVAL == 0 {
                let angle = wander.random_range(0.0..std::f32::consts::TAU);
                host.push_target(Vec2::from_angle(angle), WANDER_STRENGTH);
            }
            host.step();
            keep_on_grid(&mut host, settings.grid_height, settings.grid_width);

            tick(&mut state, &mut host, &input, dt);
            accumulator -= dt;
            substeps += 1;
        }
    }

    let summary = Summary {
        seed,
        ticks: state.time_ticks,
        stats: state.stats.clone(),
        hidden_tiles: state.grid.hidden().to_vec(),
        seeker: host.position(Actor::Seeker),
        target: host.position(Actor::Target),
    };
    log::info!(
        "Done: {} collisions, {} searches ({} failed)",
        summary.stats.collisions,
        summary.stats.searches,
        summary.stats.paths_failed
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Stop the wandering target at the grid edge
fn keep_on_grid(host: &mut SandboxHost, rows: usize, cols: usize) {
    let body = &mut host.target;
    let max = Vec3::new(rows as f32 - 0.01, f32::MAX, cols as f32 - 0.01);
    let min = Vec3::new(0.01, f32::MIN, 0.01);
    let clamped = body.position.clamp(min, max);
    if clamped != body.position {
        body.position = clamped;
        body.velocity = Vec3::ZERO;
    }
}
