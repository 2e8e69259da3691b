//! Fairway entry point
//!
//! Headless scripted playthrough: wires the demo collaborators into the
//! game core, plays the first level and reports the resulting progress.
//! Useful for exercising the whole stack end to end from a terminal.

use fairway::consts::SIM_DT;
use fairway::demo::{DemoLoader, LogCues, LogPanels, TiltedRig};
use fairway::game::FrameInput;
use fairway::progress::JsonFileStore;
use fairway::{GameApp, GameMode, Progression};

/// Pointer gestures scheduled at fixed ticks: (tick, pressed, height)
const SCRIPT: &[(u64, bool, f32)] = &[
    // Full-strength shot straight down-range
    (30, true, 500.0),
    (60, false, 250.0),
    // Attempted shot while the ball is still rolling (rejected)
    (120, true, 500.0),
    (150, false, 420.0),
];

fn main() {
    env_logger::init();
    log::info!("Fairway (headless demo) starting");

    let progression = Progression::load(Box::new(JsonFileStore::at_default_path()));
    let app = GameApp::builder()
        .progression(progression)
        .presentation(Box::new(LogPanels))
        .audio(Box::new(LogCues::default()))
        .camera(Box::new(TiltedRig::default()))
        .loader(Box::new(DemoLoader::new(30)))
        .build();

    let mut app = match app {
        Ok(app) => app,
        Err(e) => {
            log::error!("Cannot assemble game: {e}");
            std::process::exit(1);
        }
    };

    app.open_level_selection();
    app.start_game(0);

    // 20 seconds of simulated time, frame and fixed ticks in lockstep
    let mut completed_at = None;
    for tick in 0..(20.0 / SIM_DT) as u64 {
        let mut input = FrameInput {
            pointer_height: 250.0,
            ..Default::default()
        };
        for &(at, pressed, height) in SCRIPT {
            if at == tick {
                if pressed {
                    input.pointer_pressed = true;
                } else {
                    input.pointer_released = true;
                }
                input.pointer_height = height;
            }
        }

        // Exercise pause/resume mid-flight
        if tick == 200 {
            app.pause_game();
        }
        if tick == 230 {
            app.resume_game();
        }

        app.frame(&input, SIM_DT);
        app.fixed_step(SIM_DT);

        if app.mode() == GameMode::LevelSelection && completed_at.is_none() {
            completed_at = Some(tick as f32 * SIM_DT);
            break;
        }
    }

    match completed_at {
        Some(t) => log::info!(
            "Level completed after {t:.1}s; unlocked through level {}",
            app.progression().unlocked_level()
        ),
        None => log::info!("Demo ended without completing the level"),
    }

    app.shutdown();
}
