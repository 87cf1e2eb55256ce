//! Contacts reported by the host physics engine
//!
//! Stars and power-ups are overlaps; bombs are collisions. The host reports
//! them during its physics step and the tick resolves them in order.

use super::level;
use super::powerup;
use super::state::{EntityRef, GameState, SoundCue};
use super::status::Guard;
use super::tick::Keys;
use crate::consts::*;

/// Resolve one contact between the player and an entity
pub fn resolve(state: &mut GameState, contact: EntityRef, keys: &Keys) {
    match contact {
        EntityRef::Star(id) => level::collect_star(state, id),
        EntityRef::PowerUp(kind) => powerup::collect(state, kind),
        EntityRef::Bomb(id) => hit_by_bomb(state, id, keys),
    }
}

/// Text after losing a life
pub fn lives_left_message(state: &GameState) -> String {
    match state.lives.count() {
        Some(1) => "1 life left! Better be careful!".to_string(),
        _ => format!("{} lives left!", state.lives),
    }
}

fn hit_by_bomb(state: &mut GameState, id: u32, keys: &Keys) {
    let Some(idx) = state.bombs.iter().position(|b| b.id == id && b.body.enabled) else {
        return;
    };

    // Pounding down from the air with no potion active
    let ground_pounding = keys.down && !state.jump_enabled && !state.invincible_powerup();
    let immune = state.invincible_ground_pound && ground_pounding;
    let invincible = state.invincible() || immune;
    let can_destroy = state.can_destroy() || immune;

    if !invincible && state.has_armor {
        state.info.show("The armor absorbed damage!");
        state.has_armor = false;
        state.guard = Guard::ArmorMercy {
            until: state.now_ms + TIME_MERCY,
        };
        log::info!("Armor absorbed a hit");
    } else if !invincible {
        if state.lives.lose_one() {
            let ouch = ground_pounding && !state.bomb_ground_pounded;
            let message = if ouch {
                "Ouch!".to_string()
            } else {
                lives_left_message(state)
            };
            state.info.show(message);
            state.player.move_to(PLAYER_RESPAWN.into());
            let mercy = if ouch { TIME_MERCY / 2.0 } else { TIME_MERCY };
            state.guard = Guard::Mercy {
                until: state.now_ms + mercy,
                ouch,
            };
            log::info!("Hit by bomb {}, {} lives left", id, state.lives);
        } else {
            state.game_over();
        }
    } else if can_destroy {
        state.bombs[idx].body.disable();
        state.score += BOMB_POINTS;
        state.play(SoundCue::StarCollect, VOLUME_CHIME);
    }
}
