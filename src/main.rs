//! Brick Pong headless runner
//!
//! Drives the simulation with a manual 60 Hz clock and an autopilot pointer
//! that tracks the ball nearest the paddle, then prints the final state as
//! JSON. Usage: `brick-pong [settings.json] [--score-mode MODE]`

use std::path::Path;
use std::process::ExitCode;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use brick_pong::{ScoreMode, Settings, SettingsError};
use brick_pong::platform::{InputEvent, Key, ManualClock, ScriptedInput};
use brick_pong::sim::{GameState, TickOutcome, update_game_state};

/// Simulated frame length (seconds)
const FRAME_DT: f64 = 1.0 / 60.0;
/// Five simulated minutes
const MAX_TICKS: u64 = 60 * 60 * 5;
/// Serve an extra ball every 20 simulated seconds
const SERVE_INTERVAL: u64 = 60 * 20;

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: brick-pong [settings.json] [--score-mode MODE]");
            return ExitCode::FAILURE;
        }
    };

    let mut settings = match &args.settings_path {
        Some(path) => match Settings::load(Path::new(path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Some(mode) = args.score_mode {
        settings.score_mode = mode;
    }
    log::info!(
        "Brick Pong (headless) starting with seed {}, score mode {}",
        settings.seed,
        settings.score_mode.as_str()
    );

    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let mut state = match GameState::new(&settings, &mut rng) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start a game: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut input = ScriptedInput::new();
    let clock = ManualClock::new();
    let mut cleared = false;

    while state.time_ticks < MAX_TICKS {
        if state.time_ticks > 0 && state.time_ticks % SERVE_INTERVAL == 0 {
            input.push_event(InputEvent::KeyDown(Key::Space));
        }
        if let Some(y) = autopilot_target(&state) {
            input.set_pointer(Vec2::new(0.0, y));
        }

        clock.advance(FRAME_DT);
        if update_game_state(&mut state, &mut input, &mut rng, &clock) == TickOutcome::Quit {
            break;
        }
        if state.is_game_over() {
            break;
        }
        if !cleared && state.blocks.is_empty() {
            cleared = true;
            log::info!("All blocks cleared at tick {}", state.time_ticks);
        }
    }

    log::info!(
        "Finished after {} ticks: score {}, {} balls live, {} blocks left",
        state.time_ticks,
        state.score,
        state.balls.len(),
        state.blocks.len()
    );

    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize final state: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Command line: optional settings file, optional score mode override
#[derive(Debug, Default, PartialEq)]
struct Args {
    settings_path: Option<String>,
    score_mode: Option<ScoreMode>,
}

impl Args {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self, SettingsError> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            if arg == "--score-mode" {
                let value = args.next().ok_or_else(|| {
                    SettingsError::Invalid("--score-mode needs a value".to_string())
                })?;
                parsed.score_mode = Some(value.parse()?);
            } else if let Some(value) = arg.strip_prefix("--score-mode=") {
                parsed.score_mode = Some(value.parse()?);
            } else if parsed.settings_path.is_none() {
                parsed.settings_path = Some(arg);
            } else {
                return Err(SettingsError::Invalid(format!(
                    "unexpected argument {:?}",
                    arg
                )));
            }
        }
        Ok(parsed)
    }
}

/// Pointer y that lines the paddle up with the ball closest to the right edge
fn autopilot_target(state: &GameState) -> Option<f32> {
    state
        .balls
        .iter()
        .max_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|ball| ball.pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, SettingsError> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_args_empty() {
        assert_eq!(parse(&[]).expect("no args"), Args::default());
    }

    #[test]
    fn test_args_score_mode_override() {
        let args = parse(&["game.json", "--score-mode", "last"]).expect("valid args");
        assert_eq!(args.settings_path.as_deref(), Some("game.json"));
        assert_eq!(args.score_mode, Some(ScoreMode::LastBallWins));

        let args = parse(&["--score-mode=Accumulate"]).expect("valid args");
        assert_eq!(args.settings_path, None);
        assert_eq!(args.score_mode, Some(ScoreMode::Accumulate));
    }

    #[test]
    fn test_args_rejects_bad_score_mode() {
        assert!(matches!(
            parse(&["--score-mode", "nope"]),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            parse(&["--score-mode"]),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            parse(&["a.json", "b.json"]),
            Err(SettingsError::Invalid(_))
        ));
    }
}
