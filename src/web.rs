//! Browser bindings
//!
//! The JavaScript host owns physics, rendering and audio. Each frame it
//! calls [`WebGame::tick`] with a JSON [`TickInput`], then reads the
//! snapshot, HUD strings and events back out as JSON.

use wasm_bindgen::prelude::*;

use crate::error::GameError;
use crate::highscores::HighScore;
use crate::hud::HudText;
use crate::platform::{self, LocalStorage, MemoryStorage, Storage};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, WorldConfig, tick};

const MOBILE_MESSAGE: &str =
    "Sorry, but this game can only be played on a computer or a tablet with an external keyboard.";

/// Replace the contents of the `loading` element
fn show_banner(html: &str) {
    if let Some(loading) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("loading"))
    {
        loading.set_inner_html(html);
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Install the panic hook and logger, then check the device.
/// Returns false when the game must not start.
#[wasm_bindgen]
pub fn init_platform() -> bool {
    console_error_panic_hook::set_once();
    // A second init (page hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);

    let user_agent = web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default();
    if platform::is_mobile(&user_agent) {
        let err = GameError::UnsupportedDevice("phone-class user agent");
        log::warn!("{}", err);
        show_banner(MOBILE_MESSAGE);
        return false;
    }
    log::info!("Star Collector starting...");
    true
}

/// World size, gravity and player spawn for setting up the host physics
#[wasm_bindgen]
pub fn world_config() -> Result<String, JsValue> {
    serde_json::to_string(&WorldConfig::default()).map_err(to_js)
}

/// One game session bound to browser storage
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    storage: Box<dyn Storage>,
    high_score: HighScore,
    halted: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// Without a seed the run is seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> WebGame {
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(local) => Box::new(local),
            Err(e) => {
                log::warn!("{}; progress will not be saved", e);
                Box::new(MemoryStorage::new())
            }
        };
        let settings = Settings::load(storage.as_ref());
        let high_score = HighScore::load(storage.as_ref());
        let state = GameState::with_settings(seed, settings, high_score.best);
        Self {
            state,
            storage,
            high_score,
            halted: false,
        }
    }

    /// Run one frame. Any error halts the game for good.
    pub fn tick(&mut self, dt: f32, input_json: &str) -> Result<(), JsValue> {
        if self.halted {
            return Ok(());
        }
        let result = serde_json::from_str::<TickInput>(input_json)
            .map_err(GameError::from)
            .and_then(|input| tick(&mut self.state, &input, dt));
        if let Err(e) = result {
            self.halt(&e);
            return Err(to_js(e));
        }

        let beaten = self.state.events.iter().find_map(|event| match event {
            GameEvent::NewHighScore { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = beaten {
            self.save_high_score(score);
        }
        Ok(())
    }

    /// Full game state as JSON (bodies, player intents, flags)
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(to_js)
    }

    /// HUD strings as JSON; `fps` feeds the debug readout
    pub fn hud(&self, fps: f64) -> Result<String, JsValue> {
        serde_json::to_string(&HudText::from_state(&self.state, fps)).map_err(to_js)
    }

    /// Store new settings; they apply from the next run
    pub fn save_settings(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings: Settings = serde_json::from_str(settings_json).map_err(to_js)?;
        settings.save(self.storage.as_mut()).map_err(to_js)
    }

    /// Settings of the running game as JSON
    pub fn settings(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.settings).map_err(to_js)
    }

    /// Events raised since the last call, as JSON
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.take_events()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Page is closing: keep a better score
    pub fn unload(&mut self) {
        self.save_high_score(self.state.score);
    }
}

impl WebGame {
    fn save_high_score(&mut self, score: u64) {
        let debug = self.state.settings.debug;
        if let Err(e) = self.high_score.record(self.storage.as_mut(), score, debug) {
            log::warn!("Failed to save high score: {}", e);
        }
    }

    fn halt(&mut self, err: &GameError) {
        log::error!("Game halted: {}", err);
        self.halted = true;
        self.state.events.push(GameEvent::ShutdownPhysics);
        show_banner(&err.player_message());
    }
}
