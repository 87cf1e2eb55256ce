//! HUD text, info board and colours
//!
//! The host draws the strings; this module decides what they say.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

pub const COLOR_RED: u32 = 0xff0000;
pub const COLOR_WHITE: u32 = 0xffffff;
pub const COLOR_ARMOR: u32 = 0x64eb34;
pub const COLOR_INVINCIBLE: u32 = 0xffff00;
pub const COLOR_MERCY: u32 = 0xffab00;

/// What the info board shows once a timed message runs out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Revert {
    /// The hint for the current level
    LevelHint,
    /// A specific follow-up message (which stays up)
    Text(String),
}

/// The info line at the top of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InfoBoard {
    text: String,
    revert: Option<(f64, Revert)>,
}

impl InfoBoard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revert: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show a message until something else replaces it.
    /// Cancels any pending revert.
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revert = None;
    }

    /// Show a message that reverts at `until`
    pub fn flash(&mut self, text: impl Into<String>, until: f64, revert: Revert) {
        self.text = text.into();
        self.revert = Some((until, revert));
    }

    /// Take the pending revert if its time has come
    pub fn take_due(&mut self, now: f64) -> Option<Revert> {
        match self.revert {
            Some((until, _)) if now >= until => self.revert.take().map(|(_, r)| r),
            _ => None,
        }
    }
}

/// Every HUD string for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudText {
    pub score: String,
    pub level: String,
    pub lives: String,
    pub high_score: String,
    pub info: String,
    pub daredevil: Option<&'static str>,
    /// Only shown in debug mode
    pub fps: Option<String>,
    pub debug_label: Option<&'static str>,
}

impl HudText {
    /// `fps` is the host's measured frame rate
    pub fn from_state(state: &GameState, fps: f64) -> Self {
        let debug = state.settings.debug;
        Self {
            score: format!("Score: {}", state.score),
            level: format!("Level: {}", state.level),
            lives: format!("Lives: {}", state.lives),
            high_score: format!("High Score: {}", shown_high_score(state)),
            info: state.info.text().to_string(),
            daredevil: state.daredevil.then_some("Daredevil mode"),
            fps: debug.then(|| fps_text(fps)),
            debug_label: debug.then_some("Debug mode enabled"),
        }
    }
}

/// The live score replaces the stored best once beaten (never in debug)
pub fn shown_high_score(state: &GameState) -> u64 {
    if !state.settings.debug && state.score > state.high_score {
        state.score
    } else {
        state.high_score
    }
}

/// Debug FPS readout with two decimals; a trailing zero is kept so
/// `59.9` reads `59.90`
pub fn fps_text(fps: f64) -> String {
    let rounded = (fps * 100.0).round() / 100.0;
    let mut text = rounded.to_string();
    if text.len() == 4 {
        text.push('0');
    }
    format!("FPS: {text}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Lives;

    #[test]
    fn test_flash_reverts_once() {
        let mut board = InfoBoard::new("hello");
        board.flash("You gained some armor!", 1500.0, Revert::LevelHint);
        assert_eq!(board.text(), "You gained some armor!");
        assert_eq!(board.take_due(1000.0), None);
        assert_eq!(board.take_due(1500.0), Some(Revert::LevelHint));
        assert_eq!(board.take_due(2000.0), None);
    }

    #[test]
    fn test_show_cancels_revert() {
        let mut board = InfoBoard::default();
        board.flash("Nice!", 100.0, Revert::Text("later".into()));
        board.show("Ouch!");
        assert_eq!(board.take_due(1e9), None);
        assert_eq!(board.text(), "Ouch!");
    }

    #[test]
    fn test_fps_text_padding() {
        assert_eq!(fps_text(59.9), "FPS: 59.90");
        assert_eq!(fps_text(59.876), "FPS: 59.88");
        assert_eq!(fps_text(60.0), "FPS: 60");
    }

    #[test]
    fn test_hud_strings() {
        let mut state = GameState::with_settings(1, Settings::default(), 50);
        state.score = 80;
        let hud = HudText::from_state(&state, 60.0);
        assert_eq!(hud.score, "Score: 80");
        assert_eq!(hud.level, "Level: 1");
        assert_eq!(hud.lives, "Lives: 5");
        assert_eq!(hud.high_score, "High Score: 80");
        assert!(hud.daredevil.is_none());
        assert!(hud.fps.is_none() && hud.debug_label.is_none());

        state.lives = Lives::Infinite;
        state.score = 10;
        let hud = HudText::from_state(&state, 60.0);
        assert_eq!(hud.lives, "Lives: ∞");
        assert_eq!(hud.high_score, "High Score: 50");
    }

    #[test]
    fn test_debug_hides_live_high_score() {
        let settings = Settings {
            debug: true,
            ..Default::default()
        };
        let mut state = GameState::with_settings(1, settings, 50);
        state.score = 500;
        assert_eq!(shown_high_score(&state), 50);

        let hud = HudText::from_state(&state, 59.9);
        assert_eq!(hud.fps.as_deref(), Some("FPS: 59.90"));
        assert_eq!(hud.debug_label, Some("Debug mode enabled"));
        assert_eq!(hud.high_score, "High Score: 50");
    }
}
