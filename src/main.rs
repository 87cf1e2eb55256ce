//! Star Collector entry point
//!
//! The browser build is driven by a JavaScript host through the library's
//! wasm exports. Natively there is no engine to render with, so the binary
//! plays a short scripted run headless and logs what the HUD would show.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Collector (native, headless) starting...");

    if let Err(e) = demo::run() {
        log::error!("{}", e.player_message());
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points are the library exports, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use star_collector::cheats::{self, keys};
    use star_collector::hud::HudText;
    use star_collector::platform::MemoryStorage;
    use star_collector::sim::{
        EntityRef, GameEvent, GameState, Keys, TickInput, WorldConfig, tick,
    };
    use star_collector::{GameError, HighScore, Settings};

    const FRAME: f32 = 1.0 / 60.0;
    const LEVELS: u32 = 7;

    fn log_hud(state: &GameState) {
        let hud = HudText::from_state(state, f64::from(1.0 / FRAME));
        log::info!(
            "{} | {} | {} | {}",
            hud.score,
            hud.level,
            hud.lives,
            hud.high_score
        );
        log::info!("Info: {}", hud.info.replace('\n', " "));
        if let Some(fps) = hud.fps {
            log::debug!("{}", fps);
        }
    }

    pub fn run() -> Result<(), GameError> {
        let mut storage = MemoryStorage::new();
        let settings = Settings::load(&storage);
        let high_score = HighScore::load(&storage);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mut state = GameState::with_settings(seed, settings, high_score.best);
        log::info!("World: {:?}", WorldConfig::default());
        log_hud(&state);

        // Run right, picking up one star per frame
        while state.level <= LEVELS && !state.game_is_over() {
            let next = state
                .stars
                .iter()
                .find(|s| s.body.enabled)
                .map(|s| EntityRef::Star(s.id));
            let input = TickInput {
                keys: Keys {
                    right: true,
                    ..Default::default()
                },
                touching_down: true,
                contacts: next.into_iter().collect(),
                ..Default::default()
            };
            tick(&mut state, &input, FRAME)?;

            for event in state.take_events() {
                if let GameEvent::LevelUp { .. } = event {
                    log_hud(&state);
                }
            }
        }

        // Walk into a bomb, then end the run
        if let Some(bomb) = state.bombs.first().map(|b| EntityRef::Bomb(b.id)) {
            let input = TickInput {
                contacts: vec![bomb],
                touching_down: true,
                ..Default::default()
            };
            tick(&mut state, &input, FRAME)?;
            log_hud(&state);
        }
        let mut presses = cheats::key_codes("kill");
        presses.push(keys::ENTER);
        let input = TickInput {
            key_presses: presses,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME)?;
        log_hud(&state);

        let debug = state.settings.debug;
        if high_score.record(&mut storage, state.score, debug)? {
            log::info!("Stored high score: {}", HighScore::load(&storage).best);
        }
        // Next run starts with a bonus life every 3 levels
        let next = Settings {
            bonus_life_levels: 3,
            ..state.settings.clone()
        };
        next.save(&mut storage)?;
        log::info!("Next run settings: {:?}", Settings::load(&storage));
        Ok(())
    }
}
