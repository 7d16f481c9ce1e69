//! Battle Tank entry point
//!
//! Runs the simulation headless through the fixed-step clock, renders every
//! frame into a triangle mesh and prints a JSON summary when done.

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use battle_tank::platform::{FixedStep, InputState, Key};
use battle_tank::renderer::{MeshSurface, render};
use battle_tank::sim::{GameEvent, GamePhase, GameStatus, Tank, Team};
use battle_tank::{GameEngine, Settings};

#[derive(Parser)]
#[command(name = "battle-tank")]
#[command(about = "Run a headless Battle Tank session and report the outcome")]
struct Args {
    /// JSON settings file (missing fields use defaults)
    #[arg(long)]
    config: Option<String>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Simulated frame interval in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,

    /// Let a simple bot drive the player tank
    #[arg(long)]
    autopilot: bool,

    /// Render target size
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

#[derive(Serialize)]
struct RunSummary {
    status: GameStatus,
    seed: u64,
    frames: u64,
    ticks: u64,
    simulated_seconds: f32,
    shots_fired: u64,
    enemies_destroyed: u64,
    last_frame_triangles: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let options = settings.render;
    let seed = settings.seed;

    let mut engine = GameEngine::new(settings).context("starting engine")?;
    let mut clock = FixedStep::default();
    let mut mesh = MeshSurface::new();
    let surface_size = Vec2::new(args.width, args.height);

    let frame_dt = (args.frame_ms / 1000.0).max(0.001);
    let total_frames = (args.seconds.max(0.0) / frame_dt).ceil() as u64;

    let mut input = InputState::new();
    let mut ticks = 0u64;
    let mut frames = 0u64;
    let mut shots_fired = 0u64;
    let mut enemies_destroyed = 0u64;

    log::info!(
        "Running {} frames at {:.1} ms (seed {}, autopilot {})",
        total_frames,
        args.frame_ms,
        seed,
        args.autopilot
    );

    while frames < total_frames {
        if args.autopilot {
            autopilot(&engine, &mut input);
        }

        for _ in 0..clock.advance(frame_dt) {
            engine.update(clock.step(), &input);
            ticks += 1;
        }

        for event in engine.drain_events() {
            match event {
                GameEvent::Fired { .. } => shots_fired += 1,
                GameEvent::TankDestroyed { team: Team::Enemy } => enemies_destroyed += 1,
                other => log::debug!("{other:?}"),
            }
        }

        mesh.clear();
        render(&engine, &mut mesh, surface_size, None, &options);
        frames += 1;

        match engine.phase() {
            GamePhase::LevelWon => engine.handle_confirm()?,
            GamePhase::GameOver | GamePhase::GameCleared => break,
            GamePhase::Running | GamePhase::Paused => {}
        }
    }

    let summary = RunSummary {
        status: engine.status(),
        seed,
        frames,
        ticks,
        simulated_seconds: ticks as f32 * clock.step(),
        shots_fired,
        enemies_destroyed,
        last_frame_triangles: mesh.triangle_count(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Close the short axis to the nearest enemy, then face it and fire
fn autopilot(engine: &GameEngine, input: &mut InputState) {
    input.clear();
    let Some(player) = engine.player().filter(|p| p.alive) else {
        return;
    };

    let nearest = engine
        .tanks()
        .iter()
        .filter(|t| t.alive && !t.is_player())
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player.pos);
            let db = b.pos.distance_squared(player.pos);
            da.total_cmp(&db)
        });

    let Some(target) = nearest else {
        // Nothing to chase: patrol upward
        input.key_down(Key::Up);
        input.key_down(Key::Space);
        return;
    };

    let delta = target.pos - player.pos;
    if lined_up(player, target) {
        let key = match (delta.x.abs() > delta.y.abs(), delta.x >= 0.0, delta.y >= 0.0) {
            (true, true, _) => Key::Right,
            (true, false, _) => Key::Left,
            (false, _, true) => Key::Down,
            (false, _, false) => Key::Up,
        };
        input.key_down(key);
        input.key_down(Key::Space);
    } else if delta.x.abs() < delta.y.abs() {
        input.key_down(if delta.x >= 0.0 { Key::Right } else { Key::Left });
    } else {
        input.key_down(if delta.y >= 0.0 { Key::Down } else { Key::Up });
    }
}

fn lined_up(a: &Tank, b: &Tank) -> bool {
    let r = a.bounds().w * 0.5;
    (a.pos.x - b.pos.x).abs() < r || (a.pos.y - b.pos.y).abs() < r
}
