//! Night Drive headless driver
//!
//! Runs a scripted session at 60 Hz against a synthetic clock and prints the
//! final snapshot as JSON. Usage: `night-drive [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use night_drive::Settings;
#[cfg(not(target_arch = "wasm32"))]
use night_drive::sim::{GameEvent, GameState, Snapshot, TickInput, tick};

/// Simulated frame rate
#[cfg(not(target_arch = "wasm32"))]
const FRAME_HZ: u32 = 60;
/// Length of the scripted session
#[cfg(not(target_arch = "wasm32"))]
const SESSION_SECS: u32 = 90;
/// Delay between a crash and the scripted restart
#[cfg(not(target_arch = "wasm32"))]
const RESTART_DELAY_FRAMES: u32 = FRAME_HZ;

/// Key events the script sends on a given frame: `(key, pressed)`
#[cfg(not(target_arch = "wasm32"))]
fn scripted_keys(frame: u32) -> Vec<(&'static str, bool)> {
    let mut events = Vec::new();

    // Weave across the lane every 4 s
    match frame % (4 * FRAME_HZ) {
        0 => events.push(("a", true)),
        f if f == FRAME_HZ => events.push(("a", false)),
        f if f == 2 * FRAME_HZ => events.push(("d", true)),
        f if f == 3 * FRAME_HZ => events.push(("d", false)),
        _ => {}
    }

    // Tap jump every 3.5 s
    match frame % (7 * FRAME_HZ / 2) {
        0 => events.push((" ", true)),
        1 => events.push((" ", false)),
        _ => {}
    }

    events
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    log::info!("Night Drive (headless) starting, {} s at {} Hz", SESSION_SECS, FRAME_HZ);

    let mut state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let dt = 1.0 / FRAME_HZ as f32;
    let mut crashes = 0u32;
    let mut restart_at: Option<u32> = None;

    for frame in 0..SESSION_SECS * FRAME_HZ {
        for (key, pressed) in scripted_keys(frame) {
            if pressed {
                state.key_down(key);
            } else {
                state.key_up(key);
            }
        }

        let input = TickInput {
            dt,
            now_ms: frame as f64 * 1000.0 / FRAME_HZ as f64,
            restart: restart_at == Some(frame),
        };
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::Collision { epoch, obstacle_id } => {
                    crashes += 1;
                    log::info!("Crash into obstacle {} (epoch {})", obstacle_id, epoch);
                    restart_at = Some(frame + RESTART_DELAY_FRAMES);
                }
                GameEvent::Restarted { .. } => restart_at = None,
                other => log::debug!("{:?}", other),
            }
        }
    }

    log::info!("Session finished: {} crash(es), epoch {}", crashes, state.epoch());

    match Snapshot::capture(&state).to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
