//! Game state and core simulation types
//!
//! Plain data records; behavior selection is by tag enum (`variant`,
//! `MovePattern`, `PowerUpKind`) switched on at update/render time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Enemy motion laws, applied each tick in `tick::update_enemies`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    /// Gentle horizontal weave, steady descent
    Horizontal,
    /// Cosine drift, faster descent
    Diagonal,
    /// Wide fast weave, slow descent
    Sine,
}

impl MovePattern {
    pub const ALL: [MovePattern; 3] = [
        MovePattern::Horizontal,
        MovePattern::Diagonal,
        MovePattern::Sine,
    ];
}

/// Pickup effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Health,
    Power,
    Shield,
    Speed,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::Power,
        PowerUpKind::Shield,
        PowerUpKind::Speed,
    ];
}

/// The player's ship. Exactly one per game; deactivated when lives hit 0.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub lives: u32,
    pub score: u32,
    /// Weapon tier, 1..=3; controls how many bullets a shot emits
    pub power: u8,
    pub active: bool,
    pub invulnerable: bool,
    pub invulnerable_timer: u32,
    pub fire_rate: u32,
    pub fire_timer: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(
                GAME_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                GAME_HEIGHT - 100.0,
            ),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            lives: PLAYER_LIVES,
            score: 0,
            power: 1,
            active: true,
            // Spawn grace period
            invulnerable: true,
            invulnerable_timer: HIT_INVULN_TICKS,
            fire_rate: PLAYER_FIRE_RATE,
            fire_timer: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// An enemy ship. Recycled above the viewport when it scrolls off the bottom,
/// never removed from the list; wave completion checks `active`, not length.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub active: bool,
    /// 0..=2, selects tint and point value
    pub variant: u8,
    pub fire_rate: u32,
    pub fire_timer: u32,
    pub pattern: MovePattern,
    pub move_timer: u32,
    pub points: u32,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A tumbling meteor. Same recycle-not-remove policy as `Enemy`.
#[derive(Debug, Clone)]
pub struct Meteor {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub active: bool,
    /// 0..=2, scales size, health and points
    pub variant: u8,
    pub angle: f32,
    pub rotation_speed: f32,
    pub points: u32,
}

impl Meteor {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A bullet. Pruned from its container the tick it deactivates.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub active: bool,
    pub from_player: bool,
}

impl Bullet {
    /// Player shot; damage scales with weapon tier
    pub fn player(pos: Vec2, power: u8) -> Self {
        Self {
            pos,
            size: Vec2::new(3.0, 15.0),
            speed: PLAYER_BULLET_SPEED,
            damage: power as i32,
            active: true,
            from_player: true,
        }
    }

    /// Enemy shot, always 1 damage
    pub fn enemy(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(2.0, 10.0),
            speed: ENEMY_BULLET_SPEED,
            damage: 1,
            active: true,
            from_player: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A cosmetic explosion flash; expires on its own
#[derive(Debug, Clone)]
pub struct Explosion {
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub timer: u32,
    pub max_time: u32,
    pub color: [f32; 4],
}

impl Explosion {
    pub fn new(pos: Vec2, size: f32, color: [f32; 4]) -> Self {
        Self {
            pos,
            size,
            timer: EXPLOSION_TICKS,
            max_time: EXPLOSION_TICKS,
            color,
        }
    }
}

/// A falling pickup. Pruned when collected or off-screen.
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub active: bool,
    pub kind: PowerUpKind,
}

impl PowerUp {
    /// Spawn with a random kind, top-left anchored so the disc is centered
    /// on `center`
    pub fn random(center: Vec2, rng: &mut Pcg32) -> Self {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        Self {
            pos: center - Vec2::splat(POWER_UP_SIZE / 2.0),
            size: Vec2::splat(POWER_UP_SIZE),
            speed: 1.0,
            active: true,
            kind,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Complete game state. Owned exclusively by the loop driver; the renderer
/// only reads the post-tick snapshot, so a tick is the atomic unit of
/// observation.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// All gameplay randomness (fire rolls, drops, spawns) draws from here,
    /// so a run is a pure function of (seed, inputs)
    pub rng: Pcg32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub meteors: Vec<Meteor>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub power_ups: Vec<PowerUp>,
    pub level: u32,
    /// Wave within the level, cycles 1..=3
    pub wave: u32,
    /// Simulation tick counter
    pub game_time: u64,
    pub paused: bool,
    pub game_over: bool,
    /// Scales enemy fire probability and speed; +0.2 per level
    pub difficulty: f32,
}

impl GameState {
    /// Create a fresh game with the first enemy wave and meteor batch
    /// already spawned.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(),
            enemies: Vec::new(),
            meteors: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            power_ups: Vec::new(),
            level: 1,
            wave: 1,
            game_time: 0,
            paused: false,
            game_over: false,
            difficulty: 1.0,
        };

        state.enemies = super::wave::spawn_wave(state.level, state.difficulty, &mut state.rng);
        state.meteors = super::wave::spawn_meteors(state.level, &mut state.rng);

        state
    }
}
