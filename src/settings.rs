//! Game settings and preferences
//!
//! Persisted separately from the high score, in LocalStorage on the web and a
//! JSON file on native. Anything missing or unreadable falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_OVER_DELAY_TICKS;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks between the player's death and the game over screen
    pub game_over_delay_ticks: u32,
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Draw explosion particles (they are simulated either way)
    pub particles: bool,
    /// Scrolling starfield background
    pub starfield: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (static starfield)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_over_delay_ticks: GAME_OVER_DELAY_TICKS,
            seed: None,
            particles: true,
            starfield: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective starfield scrolling (respects reduced_motion)
    pub fn starfield_scrolls(&self) -> bool {
        self.starfield && !self.reduced_motion
    }

    /// Death delay, never zero
    pub fn effective_game_over_delay(&self) -> u32 {
        self.game_over_delay_ticks.max(1)
    }

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "space_shooter_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save settings to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}
