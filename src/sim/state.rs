//! Game state and core simulation types
//!
//! All state the frame handlers touch lives in [`GameState`] and is passed
//! by reference. Bodies are owned by the host physics engine; the state keeps
//! the last sampled position plus whatever the game wants changed.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{self, LEVEL_HINTS};
use super::powerup::{POWER_UP_KINDS, PowerUpKind};
use super::status::{Guard, Stamina, Tint};
use crate::cheats::CheatBook;
use crate::consts::*;
use crate::error::GameError;
use crate::hud::InfoBoard;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Physics and timers halted by the pause button
    Paused,
    /// Konami code entered: taunts play out, then the game ends
    Doomed,
    /// Run ended
    GameOver,
}

/// Remaining lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lives {
    Finite(u32),
    /// Debug runs never lose
    Infinite,
}

impl Lives {
    pub fn gain(&mut self, n: u32) {
        if let Lives::Finite(count) = self {
            *count = count.saturating_add(n);
        }
    }

    /// Lose one life. Returns true while at least one is left.
    pub fn lose_one(&mut self) -> bool {
        match self {
            Lives::Finite(count) => {
                *count = count.saturating_sub(1);
                *count >= 1
            }
            Lives::Infinite => true,
        }
    }

    pub fn is_depleted(&self) -> bool {
        *self == Lives::Finite(0)
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            Lives::Finite(count) => Some(*count),
            Lives::Infinite => None,
        }
    }
}

impl fmt::Display for Lives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lives::Finite(count) => write!(f, "{count}"),
            Lives::Infinite => f.write_str("∞"),
        }
    }
}

/// A physics body as the game sees it.
///
/// `dirty` marks bodies whose flags or velocity the game changed this frame;
/// the host applies those and leaves the rest to its own integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Active and visible
    pub enabled: bool,
    pub dirty: bool,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            bounce: Vec2::ZERO,
            allow_gravity: true,
            collide_world_bounds: false,
            enabled: true,
            dirty: true,
        }
    }

    /// A pooled body waiting to be spawned
    pub fn dormant(pos: Vec2) -> Self {
        Self {
            enabled: false,
            ..Self::new(pos)
        }
    }

    /// Deactivate and hide
    pub fn disable(&mut self) {
        self.enabled = false;
        self.dirty = true;
    }

    /// Reactivate and show at `pos`
    pub fn enable_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.enabled = true;
        self.dirty = true;
    }

    /// Bounce around the screen forever, ignoring gravity
    pub fn launch(&mut self, vel: Vec2) {
        self.bounce = Vec2::ONE;
        self.vel = vel;
        self.allow_gravity = false;
        self.collide_world_bounds = true;
        self.dirty = true;
    }

    /// Drift slowly downward, barely bouncing
    pub fn freeze(&mut self) {
        self.vel = Vec2::new(0.0, 5.0);
        self.bounce = Vec2::splat(0.1);
        self.allow_gravity = false;
        self.dirty = true;
    }

    pub fn is_moving_horizontally(&self) -> bool {
        self.vel.x != 0.0
    }
}

/// A body the host reports contacts and samples for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Star(u32),
    Bomb(u32),
    PowerUp(PowerUpKind),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub body: Body,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub body: Body,
}

/// The single pooled sprite for one power-up kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpSlot {
    pub kind: PowerUpKind,
    pub body: Body,
}

/// Player velocity requested for this frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Control {
    pub vel_x: f32,
    /// None leaves vertical motion to gravity
    pub vel_y: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Last sampled position
    pub pos: Vec2,
    pub touching_down: bool,
    pub enabled: bool,
    pub tint: Tint,
    pub control: Control,
    /// Position the host must move the player to this frame
    pub teleport: Option<Vec2>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::from(PLAYER_START),
            touching_down: false,
            enabled: true,
            tint: Tint::Clear,
            control: Control::default(),
            teleport: None,
        }
    }
}

impl Player {
    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.teleport = Some(pos);
    }
}

/// Pause/resume buttons (only one is visible at a time while playing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub pause_visible: bool,
    pub resume_visible: bool,
}

impl Default for Buttons {
    fn default() -> Self {
        Self {
            pause_visible: true,
            resume_visible: false,
        }
    }
}

/// Sound effects the host can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Music,
    Explosion,
    StarCollect,
    PowerUpCollect,
}

/// One-shot notifications for the host, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound { cue: SoundCue, volume: f32, looped: bool },
    StopMusic,
    PauseAudio,
    ResumeAudio,
    PausePhysics,
    ResumePhysics,
    /// Physics stops for good
    ShutdownPhysics,
    CameraShake { duration_ms: u32 },
    /// Recolour the scene (background tint, HUD text fill)
    SceneTint { background: u32, text: u32 },
    ShowDaredevilLabel,
    LevelUp { level: u32 },
    GameOver { score: u64 },
    /// The run beat the stored high score and should be saved
    NewHighScore { score: u64 },
}

/// World parameters the host physics engine is set up with
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity_y: f32,
    /// Player bounce off platforms
    pub player_bounce: f32,
    pub player_start: Vec2,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            gravity_y: GRAVITY_Y,
            player_bounce: SPEED_BOUNCE,
            player_start: Vec2::from(PLAYER_START),
        }
    }
}

/// Konami taunts, one every [`TIME_MESSAGE`] ms before the game ends
pub const DOOM_TAUNTS: [&str; 6] = [
    "Konami code?",
    "Ah, you're so clever.",
    "Why did you enter this code?",
    "Did you think it would help you out?",
    "Nope, it actually kills you.",
    "LOL",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoomScript {
    pub step: usize,
    pub next_at: f64,
}

pub const GAME_OVER_TEXT: &str = "You died! Refresh the page to try again.";

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub lives: Lives,
    /// Best score stored before this session
    pub high_score: u64,
    pub phase: GamePhase,
    /// Game clock in ms (frozen while paused)
    pub now_ms: f64,
    pub time_ticks: u64,
    pub guard: Guard,
    /// Absorbs the next hit
    pub has_armor: bool,
    pub stamina: Stamina,
    pub daredevil: bool,
    /// Ground-pounding bombs destroys them instead of hurting
    pub invincible_ground_pound: bool,
    /// The ground-pound lecture has been given
    pub bomb_ground_pounded: bool,
    /// Standing on something at the end of the last frame
    pub jump_enabled: bool,
    /// Up was held last frame (jumps need a fresh press)
    pub up_key_down: bool,
    /// Objects are frozen by a stop or ultimate potion until this time
    pub freeze_until: Option<f64>,
    pub player: Player,
    pub stars: Vec<Star>,
    pub bombs: Vec<Bomb>,
    /// One slot per kind, in table order
    pub powerups: Vec<PowerUpSlot>,
    pub info: InfoBoard,
    /// Per-level hints (daredevil blanks the power-up ones)
    pub hints: Vec<String>,
    pub buttons: Buttons,
    pub doom: Option<DoomScript>,
    pub cheats: CheatBook,
    /// Host notifications for this frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default settings and no stored high score
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default(), 0)
    }

    pub fn with_settings(seed: u64, settings: Settings, high_score: u64) -> Self {
        let lives = if settings.debug {
            Lives::Infinite
        } else {
            Lives::Finite(settings.starting_lives)
        };
        let powerups = POWER_UP_KINDS
            .iter()
            .map(|&kind| PowerUpSlot {
                kind,
                body: Body::dormant(Vec2::new(10.0, 10.0)),
            })
            .collect();

        let mut state = Self {
            invincible_ground_pound: settings.effective_ground_pound_immunity(),
            settings,
            score: 0,
            level: 1,
            lives,
            high_score,
            phase: GamePhase::Playing,
            now_ms: 0.0,
            time_ticks: 0,
            guard: Guard::Vulnerable,
            has_armor: false,
            stamina: Stamina::default(),
            daredevil: false,
            bomb_ground_pounded: false,
            jump_enabled: false,
            up_key_down: false,
            freeze_until: None,
            player: Player::default(),
            stars: Vec::new(),
            bombs: Vec::new(),
            powerups,
            info: InfoBoard::new(LEVEL_HINTS[0]),
            hints: LEVEL_HINTS.iter().map(|s| s.to_string()).collect(),
            buttons: Buttons::default(),
            doom: None,
            cheats: CheatBook::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        // Power-up sprites are placed at random even while dormant
        for i in 0..state.powerups.len() {
            let x = state.random_spawn_x();
            state.powerups[i].body.pos.x = x;
        }
        level::spawn_stars(&mut state);

        if state.settings.daredevil {
            state.enter_daredevil();
        }
        if state.settings.music_enabled {
            let volume = state.settings.music_volume;
            state.events.push(GameEvent::Sound {
                cue: SoundCue::Music,
                volume,
                looped: true,
            });
        }
        if state.lives.is_depleted() {
            state.game_over();
        }

        log::info!(
            "Game created: lives={}, daredevil={}, debug={}",
            state.lives,
            state.daredevil,
            state.settings.debug
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Status flags ===

    pub fn invincible(&self) -> bool {
        self.guard.invincible()
    }

    pub fn can_destroy(&self) -> bool {
        self.guard.can_destroy()
    }

    pub fn invincible_powerup(&self) -> bool {
        self.guard.from_powerup()
    }

    pub fn is_tired(&self) -> bool {
        self.stamina.is_tired()
    }

    /// Set once the run can no longer be played (doomed or over)
    pub fn game_is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Doomed | GamePhase::GameOver)
    }

    /// Frame-end consistency check; a failure halts the game
    pub fn check_invariants(&self) -> Result<(), GameError> {
        if self.can_destroy() && !self.invincible() {
            return Err(GameError::InvariantViolated(
                "can_destroy is set but invincible is not",
            ));
        }
        if self.level == 0 {
            return Err(GameError::InvariantViolated("level dropped below 1"));
        }
        Ok(())
    }

    // === Randomness ===

    /// Velocity for a freshly launched body: random horizontal, slow fall
    pub fn random_launch_velocity(&mut self) -> Vec2 {
        let vx = self.rng.random_range(-LAUNCH_SPREAD..=LAUNCH_SPREAD);
        Vec2::new(vx as f32, LAUNCH_FALL_SPEED)
    }

    /// Random x on the half of the screen away from the player
    pub fn far_side_x(&mut self) -> f32 {
        let half = (CANVAS_WIDTH / 2.0) as i32;
        let x = if self.player.pos.x < CANVAS_WIDTH / 2.0 {
            self.rng.random_range(half..=CANVAS_WIDTH as i32)
        } else {
            self.rng.random_range(0..=half)
        };
        x as f32
    }

    /// Random x anywhere a power-up fits
    pub fn random_spawn_x(&mut self) -> f32 {
        self.rng.random_range(10..=(CANVAS_WIDTH as i32 - 30)) as f32
    }

    /// Spawn roll in hundredths: floor(r * 100) / 100
    pub fn roll_hundredths(&mut self) -> f64 {
        (self.rng.random::<f64>() * 100.0).floor() / 100.0
    }

    // === Effects ===

    /// Queue a sound effect (respects the sfx toggle)
    pub fn play(&mut self, cue: SoundCue, volume: f32) {
        if self.settings.sfx_enabled {
            self.events.push(GameEvent::Sound {
                cue,
                volume,
                looped: false,
            });
        }
    }

    /// Put the level hint back on the info board
    pub fn reset_info_text(&mut self) {
        let hint = level::hint_for(&self.hints, self.level).to_string();
        self.info.show(hint);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn despawn_powerups(&mut self) {
        for slot in &mut self.powerups {
            slot.body.disable();
        }
    }

    pub fn despawn_everything(&mut self) {
        for bomb in &mut self.bombs {
            bomb.body.disable();
        }
        for star in &mut self.stars {
            star.body.disable();
        }
        self.despawn_powerups();
    }

    /// Switch to daredevil rules: one life, no power-ups
    pub fn enter_daredevil(&mut self) {
        self.daredevil = true;
        self.lives = Lives::Finite(1);
        self.despawn_powerups();
        for idx in [3, 4] {
            if let Some(hint) = self.hints.get_mut(idx) {
                hint.clear();
            }
        }
        self.invincible_ground_pound = false;
        self.events.push(GameEvent::ShowDaredevilLabel);
        log::info!("Daredevil mode on");
    }

    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing || !self.buttons.pause_visible {
            return;
        }
        self.phase = GamePhase::Paused;
        self.events.push(GameEvent::PausePhysics);
        self.events.push(GameEvent::PauseAudio);
        self.info.show("Game paused.");
        self.buttons = Buttons {
            pause_visible: false,
            resume_visible: true,
        };
    }

    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::ResumePhysics);
        self.events.push(GameEvent::ResumeAudio);
        self.reset_info_text();
        self.buttons = Buttons::default();
    }

    /// End the run. Safe to call more than once.
    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.doom = None;
        self.freeze_until = None;
        self.guard = Guard::Vulnerable;
        self.lives = Lives::Finite(0);
        self.despawn_everything();
        self.info.show(GAME_OVER_TEXT);
        self.play(SoundCue::Explosion, 1.0);
        self.events.push(GameEvent::ShutdownPhysics);
        self.events.push(GameEvent::CameraShake { duration_ms: 500 });
        if self.settings.music_enabled {
            self.events.push(GameEvent::StopMusic);
        }
        self.player.enabled = false;
        self.buttons = Buttons {
            pause_visible: false,
            resume_visible: false,
        };
        self.events.push(GameEvent::GameOver { score: self.score });
        if !self.settings.debug && self.score > self.high_score {
            self.events.push(GameEvent::NewHighScore { score: self.score });
        }
        log::info!(
            "Game over at level {} with score {} after {} frames",
            self.level,
            self.score,
            self.time_ticks
        );
    }

    /// Clear per-frame output flags
    pub(crate) fn begin_frame(&mut self) {
        self.player.teleport = None;
        self.player.control = Control::default();
        let bodies = self
            .stars
            .iter_mut()
            .map(|s| &mut s.body)
            .chain(self.bombs.iter_mut().map(|b| &mut b.body))
            .chain(self.powerups.iter_mut().map(|p| &mut p.body));
        for body in bodies {
            body.dirty = false;
        }
    }

    pub fn body_mut(&mut self, entity: EntityRef) -> Option<&mut Body> {
        match entity {
            EntityRef::Star(id) => self.stars.iter_mut().find(|s| s.id == id).map(|s| &mut s.body),
            EntityRef::Bomb(id) => self.bombs.iter_mut().find(|b| b.id == id).map(|b| &mut b.body),
            EntityRef::PowerUp(kind) => self
                .powerups
                .iter_mut()
                .find(|p| p.kind == kind)
                .map(|p| &mut p.body),
        }
    }

    pub fn powerup_slot(&self, kind: PowerUpKind) -> Option<&PowerUpSlot> {
        self.powerups.iter().find(|p| p.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let state = GameState::new(12345);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, Lives::Finite(STARTING_LIVES));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stars.len(), 12);
        assert!(state.stars.iter().all(|s| s.body.enabled));
        assert!(state.bombs.is_empty());
        assert_eq!(state.powerups.len(), POWER_UP_KINDS.len());
        assert!(state.powerups.iter().all(|p| !p.body.enabled));
        assert_eq!(state.info.text(), LEVEL_HINTS[0]);
        assert!(!state.invincible() && !state.can_destroy() && !state.has_armor);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Sound {
                cue: SoundCue::Music,
                looped: true,
                ..
            }
        )));
    }

    #[test]
    fn test_debug_has_infinite_lives() {
        let settings = Settings {
            debug: true,
            ..Default::default()
        };
        let mut state = GameState::with_settings(1, settings, 0);
        assert_eq!(state.lives, Lives::Infinite);
        for _ in 0..100 {
            assert!(state.lives.lose_one());
        }
    }

    #[test]
    fn test_daredevil_setting() {
        let settings = Settings {
            daredevil: true,
            ground_pound_immunity: true,
            ..Default::default()
        };
        let state = GameState::with_settings(1, settings, 0);
        assert!(state.daredevil);
        assert_eq!(state.lives, Lives::Finite(1));
        assert!(state.hints[3].is_empty() && state.hints[4].is_empty());
        assert!(!state.invincible_ground_pound);
        assert!(state.events.contains(&GameEvent::ShowDaredevilLabel));
    }

    #[test]
    fn test_zero_starting_lives_is_game_over() {
        let settings = Settings {
            starting_lives: 0,
            ..Default::default()
        };
        let state = GameState::with_settings(1, settings, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.info.text(), GAME_OVER_TEXT);
    }

    #[test]
    fn test_lives() {
        let mut lives = Lives::Finite(2);
        assert!(lives.lose_one());
        assert!(!lives.lose_one());
        assert!(lives.is_depleted());
        lives.gain(3);
        assert_eq!(lives.count(), Some(3));
        assert_eq!(lives.to_string(), "3");
        assert_eq!(Lives::Infinite.to_string(), "∞");
    }

    #[test]
    fn test_game_over_reports_high_score() {
        let mut state = GameState::with_settings(1, Settings::default(), 40);
        state.score = 60;
        state.take_events();
        state.game_over();
        let events = state.take_events();
        assert!(events.contains(&GameEvent::NewHighScore { score: 60 }));
        assert!(events.contains(&GameEvent::ShutdownPhysics));
        assert!(!state.player.enabled);
        assert!(state.stars.iter().all(|s| !s.body.enabled));
        assert!(!state.buttons.pause_visible && !state.buttons.resume_visible);

        // Second call is a no-op
        state.game_over();
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = GameState::new(7);
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.info.text(), "Game paused.");
        assert!(state.buttons.resume_visible);

        state.resume();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.info.text(), LEVEL_HINTS[0]);
        assert!(state.buttons.pause_visible);
    }

    #[test]
    fn test_game_over_cancels_freeze() {
        let mut state = GameState::new(1);
        state.freeze_until = Some(5000.0);
        state.game_over();
        assert_eq!(state.freeze_until, None);
    }

    #[test]
    fn test_world_config() {
        let world = WorldConfig::default();
        assert_eq!(world.gravity_y, 300.0);
        assert_eq!(world.player_bounce, 0.0);
        assert_eq!(world.player_start, Vec2::new(10.0, 380.0));
        let json = serde_json::to_string(&world).unwrap();
        assert!(json.contains("\"gravity_y\":300.0"));
    }

    #[test]
    fn test_far_side_x() {
        let mut state = GameState::new(3);
        state.player.pos.x = 100.0;
        for _ in 0..50 {
            assert!(state.far_side_x() >= 400.0);
        }
        state.player.pos.x = 700.0;
        for _ in 0..50 {
            assert!(state.far_side_x() <= 400.0);
        }
    }
}
