//! Horseshoe Breakout headless demo
//!
//! Runs the simulation in autoplay for a fixed number of frames, logging
//! events and printing the final frame snapshot as JSON.
//!
//! Usage: `horseshoe-breakout [settings.json] [frames] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::path::PathBuf;

    use anyhow::Context;
    use horseshoe_breakout::audio::{AudioManager, LogSink};
    use horseshoe_breakout::consts::FPS;
    use horseshoe_breakout::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use horseshoe_breakout::{FrameSnapshot, Settings};

    env_logger::init();
    log::info!("Horseshoe Breakout (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().filter(|a| a != "-").map(PathBuf::from);
    let frames: u64 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid frame count {arg:?}"))?,
        None => 600,
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid seed {arg:?}"))?,
        None => 0x5eed,
    };

    let settings = Settings::load_or_default(settings_path.as_deref());
    let mut audio = AudioManager::new(LogSink, &settings);
    let mut state = GameState::new(settings, seed);

    let mut bricks_broken = 0usize;
    for frame in 0..frames {
        let input = TickInput {
            toggle_autoplay: frame == 0,
            launch: frame == 1,
            now_ms: frame * 1000 / u64::from(FPS),
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        audio.dispatch(&events);

        for event in &events {
            match event {
                GameEvent::BrickDestroyed { .. } => bricks_broken += 1,
                GameEvent::SpecialBrickDestroyed { cleared, .. } => {
                    bricks_broken += 1 + cleared.len();
                }
                GameEvent::RoundCleared => log::info!("Frame {frame}: round cleared"),
                _ => {}
            }
        }

        if state.phase == GamePhase::Cleared {
            break;
        }
    }

    log::info!(
        "Ran {} frames: {} bricks broken, {} remaining",
        state.frame,
        bricks_broken,
        state.remaining()
    );

    let json = FrameSnapshot::capture(&state)
        .to_json()
        .context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive the library directly on wasm
}
