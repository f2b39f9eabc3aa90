//! High score persistence
//!
//! A single integer under a well-known LocalStorage key, written on each
//! improvement and read back at session start. The simulation itself never
//! does I/O; the loop driver feeds score changes in here.

/// Best score seen on this device
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "astro_strike_high_score";

    /// Record a score; persists and returns true when it beats the best
    pub fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the stored best (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse() {
                    return Self { best };
                }
            }
        }

        Self::default()
    }

    /// Persist the best (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("High score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}
