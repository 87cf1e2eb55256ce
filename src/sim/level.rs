//! Stars, bombs and level progression

use glam::Vec2;
use rand::Rng;

use super::powerup::{self, PowerUpKind};
use super::state::{Body, Bomb, GameEvent, GameState, SoundCue, Star};
use super::status::Guard;
use crate::consts::*;
use crate::hud::Revert;

/// Stars per level
pub const STAR_COUNT: usize = 12;
/// Horizontal spacing between stars
pub const STAR_STEP_X: f32 = 70.0;
pub const STAR_START_X: f32 = 12.0;
/// Stars start bouncing around on this level
pub const MOVING_STARS_LEVEL: u32 = 6;
/// Random power-up rolls start after this level
pub const RANDOM_POWER_UPS_AFTER: u32 = 5;

/// Info text per level (level N shows entry N-1, nothing past the end)
pub const LEVEL_HINTS: [&str; 14] = [
    "Welcome to Star Collector!\nUse the arrow keys to move, jump, and \nground pound. Hold shift to move faster.\nCollect every star to progress through the game!",
    "Don't touch the bomb!",
    "Yikes! Another bomb!",
    "Hey look, a life potion! \nGrab it for an extra life!",
    "Other powerups have a chance of spawning \nas well. Be sure to take advantage of them \nif they spawn!",
    "Hey look, the stars move now!",
    "Does that make this game harder?",
    "Hey, this game wasn't meant to be easy.",
    "It would quickly get boring if \nthat was the case.",
    "Are these messages distracting?",
    "Ok, I'll stop.",
    "So, how was your day so far?",
    "Good? That's good.",
    "Ok ok, I'm stopping for real this time! \n\nSheesh...",
];

pub fn hint_for(hints: &[String], level: u32) -> &str {
    level
        .checked_sub(1)
        .and_then(|idx| hints.get(idx as usize))
        .map_or("", String::as_str)
}

pub fn stars_move(level: u32) -> bool {
    level >= MOVING_STARS_LEVEL
}

/// Fill the star row for a new game
pub fn spawn_stars(state: &mut GameState) {
    for i in 0..STAR_COUNT {
        let id = state.next_entity_id();
        let mut body = Body::new(Vec2::new(STAR_START_X + STAR_STEP_X * i as f32, 0.0));
        body.bounce.y = state.rng.random_range(0.4..0.8);
        state.stars.push(Star { id, body });
    }
}

/// Drop a bomb on the half of the screen away from the player
pub fn create_bomb(state: &mut GameState) {
    let x = state.far_side_x();
    let vel = state.random_launch_velocity();
    let id = state.next_entity_id();
    let mut body = Body::new(Vec2::new(x, 16.0));
    body.launch(vel);
    state.bombs.push(Bomb { id, body });
    log::debug!("Bomb {} dropped at x={}", id, x);
}

/// The player touched a star
pub fn collect_star(state: &mut GameState, id: u32) {
    let Some(star) = state.stars.iter_mut().find(|s| s.id == id) else {
        return;
    };
    if !star.body.enabled {
        return;
    }
    star.body.disable();
    state.score += STAR_POINTS;
    state.play(SoundCue::StarCollect, VOLUME_CHIME);

    if state.stars.iter().all(|s| !s.body.enabled) {
        advance_level(state);
    }
}

/// Every star is collected: respawn them, add a bomb, maybe a power-up
pub fn advance_level(state: &mut GameState) {
    state.level += 1;
    let level = state.level;
    log::info!("Level {} (score {})", level, state.score);
    state.events.push(GameEvent::LevelUp { level });

    for i in 0..state.stars.len() {
        let vel = state.random_launch_velocity();
        let body = &mut state.stars[i].body;
        body.enable_at(Vec2::new(body.pos.x, 0.0));
        if stars_move(level) {
            body.launch(vel);
        }
    }

    state.reset_info_text();
    create_bomb(state);

    if state.daredevil {
        return;
    }
    if level > RANDOM_POWER_UPS_AFTER {
        if let Some(kind) = powerup::roll_spawn(state) {
            powerup::spawn_anywhere(state, kind);
        }
    } else if level == 4 {
        // Introduces power-ups
        powerup::spawn_far_side(state, PowerUpKind::OneUp);
    } else if level == 5 && state.roll_hundredths() < 0.5 {
        powerup::spawn_far_side(state, PowerUpKind::Armor);
    }

    award_bonus_life(state);
}

fn award_bonus_life(state: &mut GameState) {
    let every = state.settings.bonus_life_levels;
    if every == 0 || state.daredevil || state.settings.debug || state.level % every != 0 {
        return;
    }
    state.lives.gain(1);
    let volume = state.settings.powerup_volume;
    state.play(SoundCue::PowerUpCollect, volume);

    let until = state.now_ms + TIME_MESSAGE;
    let noun = if every == 1 { "level" } else { "levels" };
    state.info.flash(
        format!("You got an extra life for passing {every} {noun}!"),
        until,
        Revert::LevelHint,
    );
    if state.guard == Guard::Vulnerable {
        state.guard = Guard::BonusLife { until };
    }
    log::info!("Bonus life at level {}", state.level);
}
