//! Power-ups: table, spawn rolls and collect effects
//!
//! Each kind has one pooled sprite. Collecting applies an effect right away;
//! anything temporary is a deadline the tick checks later.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, SoundCue};
use super::status::Guard;
use crate::consts::TIME_MERCY;
use crate::hud::Revert;

/// Power-up kinds. Serialized as the texture key the host loads the sprite
/// under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Ultimate,
    Armor,
    Invincibility,
    #[serde(rename = "1up")]
    OneUp,
    Stop,
}

/// Table order; the spawn roll walks it front to back
pub const POWER_UP_KINDS: [PowerUpKind; 5] = [
    PowerUpKind::Ultimate,
    PowerUpKind::Armor,
    PowerUpKind::Invincibility,
    PowerUpKind::OneUp,
    PowerUpKind::Stop,
];

/// Long power-up duration (ms)
const LONG_EFFECT_MS: f64 = 10_000.0;

impl PowerUpKind {
    /// Chance to spawn when rolled (0.0 - 1.0)
    pub fn spawn_rate(&self) -> f64 {
        match self {
            PowerUpKind::Ultimate => 0.05,
            PowerUpKind::Armor => 0.4,
            PowerUpKind::Invincibility => 0.3,
            PowerUpKind::OneUp => 0.6,
            // Only reachable through the debug cheat
            PowerUpKind::Stop => 0.0,
        }
    }

    /// Effect or message duration (ms)
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerUpKind::Ultimate | PowerUpKind::Invincibility | PowerUpKind::Stop => {
                LONG_EFFECT_MS
            }
            PowerUpKind::Armor | PowerUpKind::OneUp => TIME_MERCY / 2.0,
        }
    }
}

/// Roll for a random power-up. At most one spawns; kinds already on screen
/// are skipped.
pub fn roll_spawn(state: &mut GameState) -> Option<PowerUpKind> {
    for kind in POWER_UP_KINDS {
        let visible = state.powerup_slot(kind).is_some_and(|slot| slot.body.enabled);
        let roll = state.roll_hundredths();
        let will_spawn = !visible && roll < kind.spawn_rate();
        log::debug!(
            "Power-up roll {:?}: rate={} roll={} spawn={}",
            kind,
            kind.spawn_rate(),
            roll,
            will_spawn
        );
        if will_spawn {
            return Some(kind);
        }
    }
    None
}

/// Put a power-up in play, bouncing from `pos`
pub fn spawn(state: &mut GameState, kind: PowerUpKind, pos: Vec2) {
    let vel = state.random_launch_velocity();
    let Some(slot) = state.powerups.iter_mut().find(|p| p.kind == kind) else {
        return;
    };
    slot.body.enable_at(pos);
    slot.body.launch(vel);
    log::info!("Spawned power-up {:?} at {}", kind, pos);
}

/// Spawn at a random x near the top of the screen
pub fn spawn_anywhere(state: &mut GameState, kind: PowerUpKind) {
    let x = state.random_spawn_x();
    spawn(state, kind, Vec2::new(x, 10.0));
}

/// Spawn near the top, on the half of the screen away from the player
pub fn spawn_far_side(state: &mut GameState, kind: PowerUpKind) {
    let x = state.far_side_x();
    spawn(state, kind, Vec2::new(x, 10.0));
}

/// The player touched a power-up
pub fn collect(state: &mut GameState, kind: PowerUpKind) {
    let Some(slot) = state.powerups.iter_mut().find(|p| p.kind == kind) else {
        return;
    };
    if !slot.body.enabled {
        return;
    }
    slot.body.disable();
    let volume = state.settings.powerup_volume;
    state.play(SoundCue::PowerUpCollect, volume);
    log::info!("Collected power-up {:?}", kind);

    let now = state.now_ms;
    let until = now + kind.duration_ms();
    match kind {
        PowerUpKind::Ultimate => {
            // Replacing an ouch mercy skips its lecture, but the lesson stands
            if matches!(state.guard, Guard::Mercy { ouch: true, .. }) {
                state.bomb_ground_pounded = true;
            }
            state.guard = Guard::PowerUp { kind, until };
            state.lives.gain(1);
            freeze_objects(state, until);
            state.info.show(
                "Lives increased by one, \nyou are now invincible, \nand all game objects have been stopped!",
            );
        }
        PowerUpKind::Armor => {
            state.has_armor = true;
            state
                .info
                .flash("You gained some armor!", until, Revert::LevelHint);
        }
        PowerUpKind::Invincibility => {
            if !state.invincible() && !state.can_destroy() {
                state.guard = Guard::PowerUp { kind, until };
                state
                    .info
                    .show("You obtained an invincibility potion! \nYou're invincible!");
            }
        }
        PowerUpKind::OneUp => {
            state.lives.gain(1);
            if state.level == 4 {
                state.info.flash(
                    "Nice!",
                    until,
                    Revert::Text("Be sure to take advantage of extra lives!".to_string()),
                );
            } else {
                state
                    .info
                    .flash("You got an extra life!", until, Revert::LevelHint);
            }
        }
        PowerUpKind::Stop => {
            freeze_objects(state, until);
            state.info.show("Game objects stopped!");
        }
    }
}

/// Stop bombs, moving stars and visible power-ups until `until`.
/// Overlapping freezes end at the later deadline.
pub fn freeze_objects(state: &mut GameState, until: f64) {
    state.freeze_until = Some(state.freeze_until.map_or(until, |t| t.max(until)));
    for bomb in &mut state.bombs {
        bomb.body.freeze();
    }
    for star in &mut state.stars {
        if star.body.is_moving_horizontally() {
            star.body.freeze();
        }
    }
    for slot in &mut state.powerups {
        if slot.body.enabled {
            slot.body.freeze();
        }
    }
    log::debug!("Objects frozen until {}", until);
}

/// Set frozen objects bouncing again. Bombs and power-ups are lifted so they
/// don't launch from inside a platform. Resting stars only start moving on
/// levels where stars move.
pub fn unfreeze_objects(state: &mut GameState) {
    state.freeze_until = None;
    let stars_move = super::level::stars_move(state.level);

    for i in 0..state.bombs.len() {
        let vel = state.random_launch_velocity();
        let body = &mut state.bombs[i].body;
        body.launch(vel);
        body.pos.y -= FREEZE_LIFT;
    }
    for i in 0..state.stars.len() {
        if state.stars[i].body.is_moving_horizontally() || !stars_move {
            continue;
        }
        let vel = state.random_launch_velocity();
        state.stars[i].body.launch(vel);
    }
    for i in 0..state.powerups.len() {
        if !state.powerups[i].body.enabled {
            continue;
        }
        let vel = state.random_launch_velocity();
        let body = &mut state.powerups[i].body;
        body.launch(vel);
        body.pos.y -= FREEZE_LIFT;
    }
    log::debug!("Objects unfrozen");
}

/// How far frozen bodies are lifted when released
const FREEZE_LIFT: f32 = 60.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STARTING_LIVES;
    use crate::sim::level::LEVEL_HINTS;
    use crate::sim::state::{Body, Bomb, EntityRef, Lives};
    use crate::sim::tick::{TickInput, tick};

    fn with_visible(state: &mut GameState, kind: PowerUpKind) {
        spawn(state, kind, Vec2::new(300.0, 10.0));
    }

    fn add_bomb(state: &mut GameState, vel: Vec2) {
        let id = state.next_entity_id();
        let mut body = Body::new(Vec2::new(200.0, 300.0));
        body.launch(vel);
        state.bombs.push(Bomb { id, body });
    }

    #[test]
    fn test_kinds_serialize_as_texture_keys() {
        let keys: Vec<String> = POWER_UP_KINDS
            .iter()
            .map(|kind| serde_json::to_string(kind).unwrap())
            .collect();
        assert_eq!(
            keys,
            [r#""ultimate""#, r#""armor""#, r#""invincibility""#, r#""1up""#, r#""stop""#]
        );
        let kind: PowerUpKind = serde_json::from_str(r#""1up""#).unwrap();
        assert_eq!(kind, PowerUpKind::OneUp);
        assert!(serde_json::from_str::<PowerUpKind>(r#""nope""#).is_err());
    }

    #[test]
    fn test_roll_never_picks_stop_or_visible() {
        let mut state = GameState::new(42);
        for _ in 0..500 {
            if let Some(kind) = roll_spawn(&mut state) {
                assert_ne!(kind, PowerUpKind::Stop);
            }
        }
        for kind in POWER_UP_KINDS {
            with_visible(&mut state, kind);
        }
        for _ in 0..100 {
            assert_eq!(roll_spawn(&mut state), None);
        }
    }

    #[test]
    fn test_collect_ignores_hidden() {
        let mut state = GameState::new(1);
        collect(&mut state, PowerUpKind::OneUp);
        assert_eq!(state.lives, Lives::Finite(STARTING_LIVES));
    }

    #[test]
    fn test_collect_one_up() {
        let mut state = GameState::new(1);
        with_visible(&mut state, PowerUpKind::OneUp);
        collect(&mut state, PowerUpKind::OneUp);
        assert_eq!(state.lives, Lives::Finite(STARTING_LIVES + 1));
        assert_eq!(state.info.text(), "You got an extra life!");
        assert!(!state.powerup_slot(PowerUpKind::OneUp).unwrap().body.enabled);
    }

    #[test]
    fn test_collect_one_up_on_level_four_follows_up() {
        let mut state = GameState::new(1);
        state.level = 4;
        with_visible(&mut state, PowerUpKind::OneUp);
        collect(&mut state, PowerUpKind::OneUp);
        assert_eq!(state.info.text(), "Nice!");
        assert_eq!(
            state.info.take_due(1500.0),
            Some(Revert::Text(
                "Be sure to take advantage of extra lives!".to_string()
            ))
        );
    }

    #[test]
    fn test_collect_armor() {
        let mut state = GameState::new(1);
        with_visible(&mut state, PowerUpKind::Armor);
        collect(&mut state, PowerUpKind::Armor);
        assert!(state.has_armor);
        assert!(!state.invincible());
        assert_eq!(state.info.take_due(1500.0), Some(Revert::LevelHint));
    }

    #[test]
    fn test_collect_invincibility() {
        let mut state = GameState::new(1);
        with_visible(&mut state, PowerUpKind::Invincibility);
        collect(&mut state, PowerUpKind::Invincibility);
        assert!(state.invincible() && state.can_destroy() && state.invincible_powerup());
        assert_eq!(state.guard.deadline(), Some(10_000.0));
    }

    #[test]
    fn test_invincibility_does_not_override_mercy() {
        let mut state = GameState::new(1);
        state.guard = Guard::Mercy {
            until: 3000.0,
            ouch: false,
        };
        with_visible(&mut state, PowerUpKind::Invincibility);
        collect(&mut state, PowerUpKind::Invincibility);
        assert!(!state.can_destroy());
        assert_eq!(state.info.text(), LEVEL_HINTS[0]);
    }

    #[test]
    fn test_collect_ultimate_freezes_everything() {
        let mut state = GameState::new(1);
        add_bomb(&mut state, Vec2::new(150.0, 20.0));
        with_visible(&mut state, PowerUpKind::Ultimate);
        with_visible(&mut state, PowerUpKind::Armor);
        collect(&mut state, PowerUpKind::Ultimate);

        assert!(state.can_destroy());
        assert_eq!(state.lives, Lives::Finite(STARTING_LIVES + 1));
        assert_eq!(state.freeze_until, Some(10_000.0));
        assert_eq!(state.bombs[0].body.vel, Vec2::new(0.0, 5.0));
        let armor = &state.powerup_slot(PowerUpKind::Armor).unwrap().body;
        assert_eq!(armor.vel, Vec2::new(0.0, 5.0));
        assert_eq!(armor.bounce, Vec2::splat(0.1));
    }

    #[test]
    fn test_unfreeze_lifts_and_relaunches() {
        let mut state = GameState::new(1);
        add_bomb(&mut state, Vec2::new(150.0, 20.0));
        freeze_objects(&mut state, 500.0);
        let y = state.bombs[0].body.pos.y;
        unfreeze_objects(&mut state);

        let bomb = &state.bombs[0].body;
        assert_eq!(bomb.bounce, Vec2::ONE);
        assert_eq!(bomb.vel.y, 20.0);
        assert_eq!(bomb.pos.y, y - 60.0);
        assert_eq!(state.freeze_until, None);
        // Level 1 stars stay put
        assert!(state.stars.iter().all(|s| !s.body.is_moving_horizontally()));
    }

    #[test]
    fn test_ultimate_over_ouch_mercy_keeps_lecture_flag() {
        let mut state = GameState::new(1);
        state.guard = Guard::Mercy {
            until: 1500.0,
            ouch: true,
        };
        with_visible(&mut state, PowerUpKind::Ultimate);
        collect(&mut state, PowerUpKind::Ultimate);
        assert!(state.bomb_ground_pounded);
        assert!(state.can_destroy());
    }

    #[test]
    fn test_collect_stop_freezes_then_releases() {
        let mut state = GameState::new(1);
        add_bomb(&mut state, Vec2::new(150.0, 20.0));
        with_visible(&mut state, PowerUpKind::Stop);
        let mut input = TickInput {
            touching_down: true,
            contacts: vec![EntityRef::PowerUp(PowerUpKind::Stop)],
            ..Default::default()
        };
        tick(&mut state, &input, 0.1).unwrap();
        assert_eq!(state.info.text(), "Game objects stopped!");
        assert!(!state.invincible());
        let until = state.freeze_until.unwrap();
        assert!((until - 10_100.0).abs() < 1e-3);
        assert_eq!(state.bombs[0].body.vel, Vec2::new(0.0, 5.0));

        input.contacts.clear();
        for _ in 0..99 {
            tick(&mut state, &input, 0.1).unwrap();
        }
        assert!(state.freeze_until.is_some());
        assert_eq!(state.info.text(), "Game objects stopped!");

        for _ in 0..2 {
            tick(&mut state, &input, 0.1).unwrap();
        }
        assert_eq!(state.freeze_until, None);
        assert_eq!(state.bombs[0].body.bounce, Vec2::ONE);
        assert_eq!(state.info.text(), LEVEL_HINTS[0]);
    }

    #[test]
    fn test_roll_stops_at_first_spawn_in_table_order() {
        for seed in 0..200 {
            let mut state = GameState::new(seed);
            let mut shadow = state.clone();
            let expected = POWER_UP_KINDS
                .into_iter()
                .find(|kind| shadow.roll_hundredths() < kind.spawn_rate());
            assert_eq!(roll_spawn(&mut state), expected);
            // Exactly as many draws were made
            assert_eq!(state.roll_hundredths(), shadow.roll_hundredths());
        }
    }

    #[test]
    fn test_roll_skips_visible_kinds() {
        let mut state = GameState::new(5);
        with_visible(&mut state, PowerUpKind::Ultimate);
        with_visible(&mut state, PowerUpKind::Armor);
        for _ in 0..200 {
            if let Some(kind) = roll_spawn(&mut state) {
                assert!(matches!(kind, PowerUpKind::Invincibility | PowerUpKind::OneUp));
            }
        }
    }

    #[test]
    fn test_overlapping_freezes_keep_later_deadline() {
        let mut state = GameState::new(1);
        freeze_objects(&mut state, 9000.0);
        freeze_objects(&mut state, 4000.0);
        assert_eq!(state.freeze_until, Some(9000.0));
    }
}
