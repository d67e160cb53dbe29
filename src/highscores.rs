//! Best score across sessions
//!
//! A single integer under a fixed key in whatever store the host provides.

use crate::persistence::KeyValueStore;

/// Best score ever achieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key (same name the browser build has always used)
    pub const STORAGE_KEY: &'static str = "spaceShooterHighScore";

    /// Read the stored best score. Missing or unreadable values count as zero.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(best) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it beats the best and persist it. Returns true on a new record.
    pub fn submit<S: KeyValueStore + ?Sized>(&mut self, score: u64, store: &mut S) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        store.set(Self::STORAGE_KEY, score);
        log::info!("High score saved ({})", score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_value_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_submit_only_saves_records() {
        let mut store = MemoryStore::with_value(HighScore::STORAGE_KEY, 500);
        let mut high = HighScore::load(&store);
        assert_eq!(high.best, 500);

        assert!(!high.submit(500, &mut store));
        assert!(high.submit(750, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY), Some(750));

        assert!(!high.submit(300, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY), Some(750));
        assert_eq!(high.best, 750);
    }
}
