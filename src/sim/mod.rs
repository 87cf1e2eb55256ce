//! Deterministic game rules
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Game clock advanced only by `tick`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies
//!
//! The host physics engine moves bodies; this module decides what happens
//! when they touch and what the player asks for each frame.

pub mod contact;
pub mod level;
pub mod powerup;
pub mod state;
pub mod status;
pub mod tick;

pub use powerup::{POWER_UP_KINDS, PowerUpKind};
pub use state::{
    Body, Control, DoomScript, EntityRef, GameEvent, GamePhase, GameState, Lives, Player,
    SoundCue, WorldConfig,
};
pub use status::{Guard, Stamina, Tint};
pub use tick::{BodySample, Keys, TickInput, tick};
