//! Cheat codes
//!
//! Combos are matched against browser key codes as the host reports key
//! presses. Matching is pure; [`apply`] performs the effect on the state.

use serde::{Deserialize, Serialize};

use crate::consts::{STARTING_LIVES, TIME_MESSAGE};
use crate::hud::{COLOR_RED, COLOR_WHITE, Revert};
use crate::sim::level;
use crate::sim::powerup::{self, POWER_UP_KINDS};
use crate::sim::state::{DOOM_TAUNTS, DoomScript, GameEvent, GamePhase, GameState};
use crate::sim::status::{Guard, Tint};

/// Browser key codes used by the combos
pub mod keys {
    pub const ENTER: u32 = 13;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const B: u32 = 66;
}

/// Key codes for a word typed on the keyboard (letters map to upper case)
pub fn key_codes(word: &str) -> Vec<u32> {
    word.chars()
        .map(|c| u32::from(c.to_ascii_uppercase()))
        .collect()
}

pub fn key_codes_plus_enter(word: &str) -> Vec<u32> {
    let mut codes = key_codes(word);
    codes.push(keys::ENTER);
    codes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cheat {
    /// Up up down down left right left right B A
    Konami,
    /// Down down up up right left right left A B
    ReverseKonami,
    SpawnPowerUps,
    SpawnBomb,
    Daredevil,
    Kill,
}

pub const CHEATS: [Cheat; 6] = [
    Cheat::Konami,
    Cheat::ReverseKonami,
    Cheat::SpawnPowerUps,
    Cheat::SpawnBomb,
    Cheat::Daredevil,
    Cheat::Kill,
];

impl Cheat {
    pub fn sequence(&self) -> Vec<u32> {
        use keys::*;
        match self {
            Cheat::Konami => vec![UP, UP, DOWN, DOWN, LEFT, RIGHT, LEFT, RIGHT, B, A],
            Cheat::ReverseKonami => vec![DOWN, DOWN, UP, UP, RIGHT, LEFT, RIGHT, LEFT, A, B],
            Cheat::SpawnPowerUps => key_codes("powerups"),
            Cheat::SpawnBomb => key_codes("bomb"),
            Cheat::Daredevil => key_codes_plus_enter("daredevil"),
            Cheat::Kill => key_codes_plus_enter("kill"),
        }
    }

    /// Can fire again after matching
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            Cheat::ReverseKonami | Cheat::SpawnPowerUps | Cheat::SpawnBomb
        )
    }
}

/// Progress through one cheat's key sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Combo {
    cheat: Cheat,
    sequence: Vec<u32>,
    progress: usize,
    /// One-shot combo already fired
    spent: bool,
}

impl Combo {
    fn new(cheat: Cheat) -> Self {
        Self {
            cheat,
            sequence: cheat.sequence(),
            progress: 0,
            spent: false,
        }
    }

    /// Feed one key; true when the sequence completes
    fn press(&mut self, key: u32) -> bool {
        if self.spent {
            return false;
        }
        if self.sequence.get(self.progress) == Some(&key) {
            self.progress += 1;
        } else {
            // A wrong key may still start the sequence over
            self.progress = usize::from(self.sequence.first() == Some(&key));
        }
        if self.progress < self.sequence.len() {
            return false;
        }
        self.progress = 0;
        self.spent = !self.cheat.repeats();
        true
    }
}

/// Every combo the game listens for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheatBook {
    combos: Vec<Combo>,
}

impl Default for CheatBook {
    fn default() -> Self {
        Self::new()
    }
}

impl CheatBook {
    pub fn new() -> Self {
        Self {
            combos: CHEATS.into_iter().map(Combo::new).collect(),
        }
    }

    /// Feed a key press, returning the cheats it completed
    pub fn press(&mut self, key: u32) -> Vec<Cheat> {
        self.combos
            .iter_mut()
            .filter_map(|combo| combo.press(key).then_some(combo.cheat))
            .collect()
    }
}

/// Perform a matched cheat
pub fn apply(state: &mut GameState, cheat: Cheat) {
    log::info!("Cheat activated: {:?}", cheat);
    match cheat {
        Cheat::Konami => doom(state),
        Cheat::ReverseKonami => {
            state.lives.gain(STARTING_LIVES);
            let until = state.now_ms + TIME_MESSAGE;
            state.info.flash(
                format!("Lives increased by {STARTING_LIVES}."),
                until,
                Revert::LevelHint,
            );
        }
        Cheat::SpawnPowerUps => {
            if state.settings.debug {
                for kind in POWER_UP_KINDS {
                    powerup::spawn_anywhere(state, kind);
                }
            }
        }
        Cheat::SpawnBomb => {
            if state.settings.debug {
                level::create_bomb(state);
            }
        }
        Cheat::Daredevil => {
            state.enter_daredevil();
            let until = state.now_ms + TIME_MESSAGE;
            state
                .info
                .flash("Daredevil mode activated!", until, Revert::LevelHint);
        }
        Cheat::Kill => state.game_over(),
    }
}

/// Konami: the run is lost, but only after the taunts play out
fn doom(state: &mut GameState) {
    state.guard = Guard::Vulnerable;
    state.buttons.pause_visible = false;
    state.phase = GamePhase::Doomed;
    state.freeze_until = None;
    state.despawn_everything();
    state.events.push(GameEvent::SceneTint {
        background: COLOR_RED,
        text: COLOR_WHITE,
    });
    state.player.tint = Tint::Fill(COLOR_RED);
    state.info.show(DOOM_TAUNTS[0]);
    state.doom = Some(DoomScript {
        step: 0,
        next_at: state.now_ms + TIME_MESSAGE,
    });
}
