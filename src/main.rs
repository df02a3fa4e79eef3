//! Aero Hockey entry point
//!
//! Headless driver: loads settings, runs the fixed-step simulation for a
//! while and reports what the puck did.
//!
//! Usage: `aero-hockey [settings.json] [--seconds N] [--dt SECS] [--dump-forecast]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use aero_hockey::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use aero_hockey::settings::Settings;
#[cfg(not(target_arch = "wasm32"))]
use aero_hockey::sim::{SimState, StepOutcome, TickInput, tick};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
struct Args {
    settings_path: Option<PathBuf>,
    seconds: f64,
    dt: f64,
    dump_forecast: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self {
            settings_path: None,
            seconds: 30.0,
            dt: SIM_DT,
            dump_forecast: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seconds" => parsed.seconds = positive(&arg, args.next())?,
                "--dt" => parsed.dt = positive(&arg, args.next())?,
                "--dump-forecast" => parsed.dump_forecast = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
                path => {
                    if parsed.settings_path.is_some() {
                        return Err(format!("unexpected argument {path}"));
                    }
                    parsed.settings_path = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn positive(flag: &str, value: Option<String>) -> Result<f64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{flag} expects a positive number, got {value}")),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Aero Hockey (headless) starting...");

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            eprintln!("usage: aero-hockey [settings.json] [--seconds N] [--dt SECS] [--dump-forecast]");
            std::process::exit(2);
        }
    };

    let settings = match &args.settings_path {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut state = SimState::new(settings);

    if args.dump_forecast {
        match serde_json::to_string_pretty(&state.full_forecast()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize forecast: {e}"),
        }
        return;
    }

    let steps = (args.seconds / args.dt).ceil() as u64;
    let input = TickInput::default();
    let mut rested_at = None;

    for _ in 0..steps {
        let outcome = tick(&mut state, &input, args.dt);
        if outcome == StepOutcome::ObstacleHit {
            log::debug!("Paddle contact at t = {:.3}s", state.elapsed);
        }
        if rested_at.is_none() && state.forecast.is_exhausted() && state.puck.vel == glam::DVec2::ZERO {
            rested_at = Some(state.elapsed);
            log::info!("Puck at rest at ({:.3}, {:.3})", state.puck.pos.x, state.puck.pos.y);
        }
    }

    println!("simulated {:.2}s in {} ticks", state.elapsed, state.time_ticks);
    println!("wall bounces: {}", state.wall_bounces);
    println!("paddle hits:  {}", state.paddle_hits);
    println!(
        "puck:   pos ({:.3}, {:.3}) vel ({:.3}, {:.3})",
        state.puck.pos.x, state.puck.pos.y, state.puck.vel.x, state.puck.vel.y
    );
    println!("paddle: pos ({:.3}, {:.3})", state.paddle.pos.x, state.paddle.pos.y);
    match rested_at {
        Some(t) => println!("puck came to rest after {t:.2}s"),
        None => println!("puck still moving, {} bounces pending", state.forecast.pending()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver in the browser
}
