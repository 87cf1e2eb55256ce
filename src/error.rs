//! Error types
//!
//! Any error that reaches the host is fatal: the game stops and the player is
//! shown [`GameError::player_message`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A status-flag invariant failed during a frame
    #[error("invariant violated: {0}")]
    InvariantViolated(&'static str),
    /// Key/value storage could not be reached or written
    #[error("storage error: {0}")]
    Storage(String),
    /// Stored settings did not parse
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// The game refuses to run on this device
    #[error("unsupported device: {0}")]
    UnsupportedDevice(&'static str),
}

impl GameError {
    /// End-user text shown when the game halts
    pub fn player_message(&self) -> String {
        format!(
            "An error has been detected and the game has been stopped to prevent a crash. \
             Please refresh the page. <br> Technical details: {self}"
        )
    }
}
