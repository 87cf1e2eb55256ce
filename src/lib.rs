//! Star Collector - a single-screen platformer
//!
//! Core modules:
//! - `sim`: Player status machine, contacts, level progression (no physics)
//! - `cheats`: Key-combo recognition and cheat effects
//! - `hud`: HUD strings, info board and tint colours
//! - `platform`: Browser/native platform abstraction and storage
//! - `settings`: Persisted player preferences
//! - `highscores`: The single persisted high score
//!
//! Gravity, bounce, integration, rendering and audio belong to the host
//! engine. It feeds samples and contacts into [`sim::tick`] and applies the
//! intents written back into [`sim::GameState`].

pub mod cheats;
pub mod error;
pub mod highscores;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::GameError;
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// World gravity handed to the host physics engine (pixels/s²)
    pub const GRAVITY_Y: f32 = 300.0;

    /// Invincibility after a hit (ms)
    pub const TIME_MERCY: f64 = 3000.0;
    /// How long transient messages stay up (ms)
    pub const TIME_MESSAGE: f64 = 2000.0;
    /// Shift can be held this long before the player tires, and tiredness lasts as long (ms)
    pub const TIME_RUNNING: f64 = 5000.0;

    /// Player speeds (pixels/s)
    pub const SPEED_WALK: f32 = 160.0;
    pub const SPEED_RUN: f32 = 250.0;
    pub const SPEED_JUMP: f32 = 330.0;
    /// Player bounce off platforms
    pub const SPEED_BOUNCE: f32 = 0.0;
    pub const SPEED_GROUND_POUND: f32 = 500.0;

    /// Volume for star and bomb chimes
    pub const VOLUME_CHIME: f32 = 0.25;

    pub const STARTING_LIVES: u32 = 5;
    pub const STAR_POINTS: u64 = 10;
    pub const BOMB_POINTS: u64 = 20;

    /// Player spawn point and the point used after losing a life
    pub const PLAYER_START: (f32, f32) = (10.0, CANVAS_HEIGHT - 220.0);
    pub const PLAYER_RESPAWN: (f32, f32) = (10.0, CANVAS_HEIGHT - 80.0);
    /// Below this y the player has clipped through the ground
    pub const CLIP_FLOOR_Y: f32 = 530.0;
    pub const CLIP_RESET_Y: f32 = 510.0;

    /// Bodies set bouncing get a horizontal speed in [-LAUNCH_SPREAD, LAUNCH_SPREAD]
    pub const LAUNCH_SPREAD: i32 = 200;
    pub const LAUNCH_FALL_SPEED: f32 = 20.0;
}
