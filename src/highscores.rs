//! High score persistence
//!
//! A single decimal integer stored under `highScore`. The value read at
//! startup stays fixed for the session; the stored value is replaced when a
//! run ends (or the page unloads) with a better score.

use crate::error::GameError;
use crate::platform::Storage;

/// The best score recorded before this session started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScore";

    /// Parse a stored value. Missing or malformed values count as zero.
    pub fn parse(raw: Option<&str>) -> Self {
        let best = match raw {
            Some(text) => text.trim().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed high score {:?}", text);
                0
            }),
            None => 0,
        };
        Self { best }
    }

    /// Load the high score from storage
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(raw) => {
                let score = Self::parse(raw.as_deref());
                log::info!("High score: {}", score.best);
                score
            }
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Check if a score beats the stored best
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Write `score` if it beats the best. Debug runs never write.
    /// Returns whether a write happened.
    pub fn record(
        &self,
        storage: &mut dyn Storage,
        score: u64,
        debug: bool,
    ) -> Result<bool, GameError> {
        if debug || !self.beats(score) {
            return Ok(false);
        }
        storage.set_item(Self::STORAGE_KEY, &score.to_string())?;
        log::info!("New high score saved: {}", score);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_parse() {
        assert_eq!(HighScore::parse(None).best, 0);
        assert_eq!(HighScore::parse(Some("250")).best, 250);
        assert_eq!(HighScore::parse(Some(" 90 ")).best, 90);
        assert_eq!(HighScore::parse(Some("lots")).best, 0);
    }

    #[test]
    fn test_record_only_when_beaten() {
        let mut store = MemoryStorage::new();
        store.set_item(HighScore::STORAGE_KEY, "100").unwrap();
        let high = HighScore::load(&store);
        assert_eq!(high.best, 100);

        assert!(!high.record(&mut store, 100, false).unwrap());
        assert_eq!(HighScore::load(&store).best, 100);

        assert!(high.record(&mut store, 130, false).unwrap());
        assert_eq!(HighScore::load(&store).best, 130);
    }

    #[test]
    fn test_debug_never_records() {
        let mut store = MemoryStorage::new();
        let high = HighScore::load(&store);
        assert!(!high.record(&mut store, 9000, true).unwrap());
        assert_eq!(store.get_item(HighScore::STORAGE_KEY).unwrap(), None);
    }
}
