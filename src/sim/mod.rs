//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, wall-clock paced by the loop driver
//! - Seeded RNG only, owned by `GameState`
//! - No rendering or platform dependencies
//!
//! Container policy is deliberately split: bullets and pickups are pruned
//! the tick they deactivate; enemies and meteors are only deactivated or
//! recycled, because wave completion checks "all inactive", not "list
//! empty".

pub mod collision;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{aabb_overlap, resolve_collisions};
pub use state::{
    Bullet, Enemy, Explosion, GameState, Meteor, MovePattern, Player, PowerUp, PowerUpKind,
};
pub use tick::{InputState, advance};
pub use wave::{check_wave_completion, spawn_meteors, spawn_wave};
