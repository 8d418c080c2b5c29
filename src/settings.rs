//! Player-facing preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::BACKGROUND_URL;

/// Model used for the post-game tip when none is configured
pub const DEFAULT_TIP_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Catch bursts
    pub particles: bool,
    /// Background image; falls back to a flat sky when it fails to load
    pub background_url: String,

    // === Accessibility ===
    /// Freeze background scrolling
    pub reduced_motion: bool,

    // === Tips ===
    /// No key means every tip is the canned fallback
    pub tip_api_key: Option<String>,
    pub tip_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            background_url: BACKGROUND_URL.to_string(),
            reduced_motion: false,
            tip_api_key: None,
            tip_model: DEFAULT_TIP_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Background follows the run unless reduced motion is on
    pub fn effective_scroll(&self) -> bool {
        !self.reduced_motion
    }

    /// Flip the particle toggle, returning the new value
    pub fn toggle_particles(&mut self) -> bool {
        self.particles = !self.particles;
        self.particles
    }

    /// Flip reduced motion, returning the new value
    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    /// Key to hand the tip client, ignoring blank values
    pub fn tip_key(&self) -> Option<&str> {
        self.tip_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "market_momentum_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.particles);
        assert!(!s.reduced_motion);
        assert_eq!(s.tip_model, DEFAULT_TIP_MODEL);
        assert_eq!(s.tip_key(), None);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"particles":false}"#).unwrap();
        assert!(!s.particles);
        assert_eq!(s.background_url, BACKGROUND_URL);
        assert_eq!(s.tip_model, DEFAULT_TIP_MODEL);
    }

    #[test]
    fn test_blank_key_is_no_key() {
        let mut s = Settings::default();
        s.tip_api_key = Some("   ".to_string());
        assert_eq!(s.tip_key(), None);
        s.tip_api_key = Some(" abc ".to_string());
        assert_eq!(s.tip_key(), Some("abc"));
    }

    #[test]
    fn test_toggles_survive_round_trip() {
        let mut s = Settings::default();
        assert!(!s.toggle_particles());
        assert!(s.toggle_reduced_motion());
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(!back.particles);
        assert!(!back.effective_scroll());
        assert!(back.clone().toggle_particles());
    }

    #[test]
    fn test_scroll_respects_reduced_motion() {
        let mut s = Settings::default();
        assert!(s.effective_scroll());
        s.reduced_motion = true;
        assert!(!s.effective_scroll());
    }
}
