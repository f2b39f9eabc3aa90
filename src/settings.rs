//! Player preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Selectable ship skins; purely cosmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShipSkin {
    /// Classic rocket silhouette (uses the vector sprite when loaded)
    #[default]
    Rocket,
    /// Swept-wing procedural fighter
    Interceptor,
}

impl ShipSkin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipSkin::Rocket => "Rocket",
            ShipSkin::Interceptor => "Interceptor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rocket" => Some(ShipSkin::Rocket),
            "interceptor" => Some(ShipSkin::Interceptor),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Which ship to fly
    pub ship_skin: ShipSkin,
    /// Hold fire automatically on touch devices
    pub auto_fire: bool,
    /// Shadow boxes behind HUD text for busy backgrounds
    pub enhance_text: bool,
    /// FPS readout in the corner
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ship_skin: ShipSkin::Rocket,
            auto_fire: true,
            enhance_text: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "astro_strike_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
    fn skin_round_trips_through_strings() {
        for skin in [ShipSkin::Rocket, ShipSkin::Interceptor] {
            assert_eq!(ShipSkin::from_str(skin.as_str()), Some(skin));
        }
        assert_eq!(ShipSkin::from_str("saucer"), None);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            ship_skin: ShipSkin::Interceptor,
            auto_fire: false,
            enhance_text: true,
            show_fps: true,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ship_skin, ShipSkin::Interceptor);
        assert!(!back.auto_fire);
        assert!(back.show_fps);
    }
}
