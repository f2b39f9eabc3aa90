//! Astro Strike - a wave-based 2D space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, tick update, collisions, waves)
//! - `renderer`: WebGPU rendering pipeline (CPU-tessellated colored triangles)
//! - `assets`: Async sprite-mesh loading with procedural fallbacks
//! - `highscores` / `settings`: LocalStorage-backed persistence

pub mod assets;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::{Settings, ShipSkin};

/// Game configuration constants
pub mod consts {
    /// Logical playfield size; the host embeds the canvas responsively but
    /// internal coordinates are never re-scaled mid-game.
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Target simulation rate. Ticks arriving faster than this are skipped,
    /// not queued, so game speed is wall-clock paced.
    pub const TICK_RATE: f32 = 60.0;
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / TICK_RATE as f64;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_SPEED: f32 = 8.0;
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_MAX_LIVES: u32 = 5;
    pub const PLAYER_MAX_POWER: u8 = 3;
    pub const PLAYER_FIRE_RATE: u32 = 15;

    /// Invulnerability windows (ticks)
    pub const HIT_INVULN_TICKS: u32 = 120;
    pub const SHIELD_INVULN_TICKS: u32 = 300;

    /// Enemy / meteor defaults
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const METEOR_BASE_SIZE: f32 = 30.0;
    pub const MAX_WAVE_ENEMIES: u32 = 15;
    pub const MAX_WAVE_METEORS: u32 = 8;
    pub const WAVES_PER_LEVEL: u32 = 3;
    pub const DIFFICULTY_STEP: f32 = 0.2;

    /// Bullet defaults
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;

    /// Pickup / effect defaults
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const EXPLOSION_TICKS: u32 = 30;
}

/// Lightweight deterministic hash used for cosmetic scatter (starfield,
/// explosion particles). Gameplay randomness goes through the seeded RNG in
/// `GameState` instead.
#[inline]
pub fn scatter_hash(seed: u32, salt: u32) -> u32 {
    seed.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(7919))
}

/// Map a hash to `[0, 1)`
#[inline]
pub fn hash_unit(h: u32) -> f32 {
    (h % 1000) as f32 / 1000.0
}
