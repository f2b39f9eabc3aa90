//! Wave director: spawn policy and difficulty progression
//!
//! The (level, wave) machine is terminal-free and cycles forever: wave runs
//! 1..=3, then resets while the level increments and difficulty steps up.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, GameState, Meteor, MovePattern};
use crate::consts::*;

/// Generate a fresh enemy wave, sized `min(5 + level, 15)`
pub fn spawn_wave(level: u32, difficulty: f32, rng: &mut Pcg32) -> Vec<Enemy> {
    let count = (5 + level).min(MAX_WAVE_ENEMIES);
    let mut enemies = Vec::with_capacity(count as usize);

    for i in 0..count {
        let variant = rng.random_range(0..3u8);
        let pattern = MovePattern::ALL[rng.random_range(0..MovePattern::ALL.len())];

        enemies.push(Enemy {
            pos: Vec2::new(
                30.0 + (GAME_WIDTH - 60.0) * (i as f32 / count as f32),
                50.0 + rng.random::<f32>() * 100.0,
            ),
            size: Vec2::splat(ENEMY_SIZE),
            speed: 1.0 + difficulty * 0.5,
            health: (1 + level / 3) as i32,
            active: true,
            variant,
            fire_rate: (60u32.saturating_sub(level * 5)).max(30),
            fire_timer: rng.random_range(0..60),
            pattern,
            move_timer: rng.random_range(0..120),
            points: 10 + variant as u32 * 5 + level * 2,
        });
    }

    enemies
}

/// Generate a meteor batch, sized `min(level, 8)`, staggered above the
/// viewport so they drift in over time.
pub fn spawn_meteors(level: u32, rng: &mut Pcg32) -> Vec<Meteor> {
    let count = level.min(MAX_WAVE_METEORS);
    let mut meteors = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let variant = rng.random_range(0..3u8);
        let size = METEOR_BASE_SIZE + variant as f32 * 10.0;

        meteors.push(Meteor {
            pos: Vec2::new(
                rng.random::<f32>() * (GAME_WIDTH - size),
                -size - rng.random::<f32>() * 300.0,
            ),
            size: Vec2::splat(size),
            speed: 1.0 + rng.random::<f32>() * 2.0,
            health: 1 + variant as i32,
            active: true,
            variant,
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.05,
            points: 5 + variant as u32 * 3,
        });
    }

    meteors
}

/// Advance the wave machine once every enemy in the current wave is
/// inactive. Enemies are replaced wholesale; meteors accumulate.
pub fn check_wave_completion(state: &mut GameState) {
    if !state.enemies.iter().all(|e| !e.active) {
        return;
    }

    state.wave += 1;
    if state.wave > WAVES_PER_LEVEL {
        state.wave = 1;
        state.level += 1;
        state.difficulty += DIFFICULTY_STEP;
        log::info!(
            "level {} reached (difficulty {:.1})",
            state.level,
            state.difficulty
        );
    }

    state.enemies = spawn_wave(state.level, state.difficulty, &mut state.rng);
    let fresh = spawn_meteors(state.level, &mut state.rng);
    state.meteors.extend(fresh);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn kill_all(state: &mut GameState) {
        for e in &mut state.enemies {
            e.active = false;
        }
    }

    #[test]
    fn wave_size_scales_and_caps() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(spawn_wave(1, 1.0, &mut rng).len(), 6);
        assert_eq!(spawn_wave(9, 1.0, &mut rng).len(), 14);
        assert_eq!(spawn_wave(10, 1.0, &mut rng).len(), 15);
        assert_eq!(spawn_wave(50, 1.0, &mut rng).len(), 15);
    }

    #[test]
    fn enemy_stats_follow_level() {
        let mut rng = Pcg32::seed_from_u64(2);
        for e in spawn_wave(7, 2.0, &mut rng) {
            assert_eq!(e.health, 3); // 1 + 7/3
            assert_eq!(e.fire_rate, 30); // max(60 - 35, 30)
            assert_eq!(e.speed, 2.0); // 1 + 2.0 * 0.5
            assert_eq!(e.points, 10 + e.variant as u32 * 5 + 14);
        }
    }

    #[test]
    fn meteor_variant_scales_size_and_health() {
        let mut rng = Pcg32::seed_from_u64(3);
        for m in spawn_meteors(8, &mut rng) {
            assert_eq!(m.size.x, 30.0 + m.variant as f32 * 10.0);
            assert_eq!(m.health, 1 + m.variant as i32);
            assert_eq!(m.points, 5 + m.variant as u32 * 3);
            assert!(m.pos.y < 0.0, "meteors spawn above the viewport");
        }
    }

    #[test]
    fn wave_cycles_three_then_level_up() {
        let mut state = GameState::new(42);

        kill_all(&mut state);
        check_wave_completion(&mut state);
        assert_eq!((state.level, state.wave), (1, 2));

        kill_all(&mut state);
        check_wave_completion(&mut state);
        assert_eq!((state.level, state.wave), (1, 3));

        kill_all(&mut state);
        check_wave_completion(&mut state);
        assert_eq!((state.level, state.wave), (2, 1));
        assert!((state.difficulty - 1.2).abs() < 1e-6);
        // New level: min(5 + 2, 15) fresh enemies, all active
        assert_eq!(state.enemies.len(), 7);
        assert!(state.enemies.iter().all(|e| e.active));
    }

    #[test]
    fn meteors_accumulate_across_waves() {
        let mut state = GameState::new(42);
        let before = state.meteors.len();

        kill_all(&mut state);
        check_wave_completion(&mut state);
        assert!(state.meteors.len() > before, "meteor batches append");
    }

    #[test]
    fn incomplete_wave_does_not_advance() {
        let mut state = GameState::new(42);
        // One survivor holds the wave open even with the rest dead
        for e in state.enemies.iter_mut().skip(1) {
            e.active = false;
        }
        let enemies_before = state.enemies.len();
        check_wave_completion(&mut state);
        assert_eq!((state.level, state.wave), (1, 1));
        assert_eq!(state.enemies.len(), enemies_before);
    }

    #[test]
    fn wave_clear_is_deterministic_per_seed() {
        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        kill_all(&mut a);
        kill_all(&mut b);
        check_wave_completion(&mut a);
        check_wave_completion(&mut b);

        assert_eq!(a.enemies.len(), b.enemies.len());
        for (x, y) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.variant, y.variant);
            assert_eq!(x.pattern, y.pattern);
        }
    }
}
