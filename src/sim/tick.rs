//! Per-frame update
//!
//! The host calls [`tick`] once per rendered frame after its physics step,
//! with the keys held, the contacts it saw and fresh body samples.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact;
use super::powerup;
use super::state::{DOOM_TAUNTS, DoomScript, EntityRef, GamePhase, GameState};
use super::status::{self, GuardExpiry};
use crate::cheats;
use crate::consts::*;
use crate::error::GameError;
use crate::hud::Revert;

/// Keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub shift: bool,
}

/// Position/velocity of a body after the host's physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySample {
    pub entity: EntityRef,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Everything the host tells the game for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub keys: Keys,
    /// Player position after physics
    pub player_pos: Option<Vec2>,
    /// Player is standing on something
    pub touching_down: bool,
    pub samples: Vec<BodySample>,
    /// Contacts in the order the host saw them
    pub contacts: Vec<EntityRef>,
    /// Key codes pressed since the last frame (for cheat combos)
    pub key_presses: Vec<u32>,
    /// Pause button clicked
    pub pause: bool,
    /// Resume button clicked
    pub resume: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), GameError> {
    state.begin_frame();

    if input.pause {
        state.pause();
    }
    if input.resume {
        state.resume();
    }
    // Paused: the clock stops, so no deadline can pass
    if state.phase == GamePhase::Paused {
        return Ok(());
    }

    state.now_ms += f64::from(dt) * 1000.0;
    state.time_ticks += 1;

    sync_samples(state, input);
    run_deadlines(state);

    for &key in &input.key_presses {
        if state.daredevil || state.game_is_over() {
            break;
        }
        for cheat in state.cheats.press(key) {
            cheats::apply(state, cheat);
        }
    }

    for &entity in &input.contacts {
        if state.game_is_over() {
            break;
        }
        contact::resolve(state, entity, &input.keys);
    }

    if state.game_is_over() {
        return Ok(());
    }

    steer_player(state, &input.keys);
    state.player.tint = status::tint_for(state.has_armor, &state.guard);

    // Clipped through the ground
    if state.player.pos.y >= CLIP_FLOOR_Y {
        let pos = Vec2::new(state.player.pos.x, CLIP_RESET_Y);
        state.player.move_to(pos);
    }

    state.check_invariants()
}

fn sync_samples(state: &mut GameState, input: &TickInput) {
    if let Some(pos) = input.player_pos {
        state.player.pos = pos;
    }
    state.player.touching_down = input.touching_down;
    for sample in &input.samples {
        if let Some(body) = state.body_mut(sample.entity) {
            body.pos = sample.pos;
            body.vel = sample.vel;
        }
    }
}

/// Fire everything whose time has come
fn run_deadlines(state: &mut GameState) {
    let now = state.now_ms;

    while let Some(expiry) = status::expire(&mut state.guard, now) {
        match expiry {
            GuardExpiry::Lectured => {
                state.info.show("You can't ground pound bombs!");
                state.bomb_ground_pounded = true;
            }
            GuardExpiry::PowerUpEnded(kind) => {
                log::info!("{:?} wore off", kind);
                state.reset_info_text();
            }
            GuardExpiry::Recovered => state.reset_info_text(),
        }
    }

    if state.freeze_until.is_some_and(|until| now >= until) {
        powerup::unfreeze_objects(state);
        state.reset_info_text();
    }

    match state.info.take_due(now) {
        Some(Revert::LevelHint) => state.reset_info_text(),
        Some(Revert::Text(text)) => state.info.show(text),
        None => {}
    }

    run_doom(state, now);
}

/// Step the konami taunts; the run ends after the last one
fn run_doom(state: &mut GameState, now: f64) {
    while let Some(DoomScript { step, next_at }) = state.doom {
        if now < next_at {
            break;
        }
        let next = step + 1;
        if next < DOOM_TAUNTS.len() {
            state.info.show(DOOM_TAUNTS[next]);
            state.doom = Some(DoomScript {
                step: next,
                next_at: next_at + TIME_MESSAGE,
            });
        } else {
            state.game_over();
        }
    }
}

/// Walk, run, ground pound and jump
fn steer_player(state: &mut GameState, keys: &Keys) {
    let running = state
        .stamina
        .update(keys.shift && !keys.down, state.now_ms);
    let control = &mut state.player.control;

    if !keys.down {
        let speed = if running { SPEED_RUN } else { SPEED_WALK };
        control.vel_x = if keys.left {
            -speed
        } else if keys.right {
            speed
        } else {
            0.0
        };
    } else {
        control.vel_x = 0.0;
        let airborne = !state.jump_enabled || !state.player.touching_down;
        control.vel_y = Some(if airborne { SPEED_GROUND_POUND } else { 0.0 });
    }

    // Jumps need a fresh press of up
    if keys.up {
        if !state.up_key_down && state.jump_enabled {
            control.vel_y = Some(-SPEED_JUMP);
            state.jump_enabled = false;
        }
        state.up_key_down = true;
    } else {
        state.up_key_down = false;
    }

    state.jump_enabled = state.player.touching_down;
}
