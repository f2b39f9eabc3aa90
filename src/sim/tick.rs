//! Fixed-tick simulation update
//!
//! `advance` is the atomic unit of observation: the renderer only ever sees
//! the state between calls, never mid-update. Update order matters for
//! collision fairness and is fixed: player, enemies, meteors, bullets,
//! explosions, pickups, collisions, wave check, game-over check.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_collisions;
use super::state::{Bullet, Explosion, GameState};
use super::wave::check_wave_completion;
use crate::consts::*;
use crate::renderer::vertex::colors;

/// Input vector for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Absolute drag-to-move target from touch input; converted into a
    /// direct position assignment each tick, ship y restricted to the lower
    /// half of the playfield
    pub drag_target: Option<Vec2>,
}

/// Advance the game state by one tick. No-op while paused or after game
/// over; callers must not assume ticking continues.
pub fn advance(state: &mut GameState, input: &InputState) {
    if state.paused || state.game_over {
        return;
    }

    state.game_time += 1;

    update_player(state, input);
    update_enemies(state);
    update_meteors(state);
    update_bullets(state);
    update_explosions(state);
    update_power_ups(state);

    resolve_collisions(state);
    check_wave_completion(state);

    // Collisions may have deactivated bullets/pickups; those containers
    // must not carry stale entries across the tick boundary.
    state.bullets.retain(|b| b.active);
    state.power_ups.retain(|p| p.active);

    if state.player.lives == 0 && state.player.active {
        state.player.active = false;
        state.game_over = true;
        state
            .explosions
            .push(Explosion::new(state.player.center(), 50.0, colors::HIT_EXPLOSION));
        log::info!("game over at level {} with {} points", state.level, state.player.score);
    }
}

fn update_player(state: &mut GameState, input: &InputState) {
    let player = &mut state.player;

    if !player.active {
        return;
    }

    if player.invulnerable {
        player.invulnerable_timer = player.invulnerable_timer.saturating_sub(1);
        if player.invulnerable_timer == 0 {
            player.invulnerable = false;
        }
    }

    if player.fire_timer > 0 {
        player.fire_timer -= 1;
    }

    if let Some(target) = input.drag_target {
        player.pos.x = (target.x - player.size.x / 2.0).clamp(0.0, GAME_WIDTH - player.size.x);
        player.pos.y = (target.y - player.size.y / 2.0)
            .clamp(GAME_HEIGHT / 2.0, GAME_HEIGHT - player.size.y);
    }

    // Horizontal before vertical; with opposed flags the later axis wins
    if input.left {
        player.pos.x -= player.speed;
    }
    if input.right {
        player.pos.x += player.speed;
    }
    if input.up {
        player.pos.y -= player.speed;
    }
    if input.down {
        player.pos.y += player.speed;
    }

    player.pos.x = player.pos.x.clamp(0.0, GAME_WIDTH - player.size.x);
    player.pos.y = player.pos.y.clamp(0.0, GAME_HEIGHT - player.size.y);

    if input.fire && player.fire_timer == 0 {
        player.fire_timer = player.fire_rate;

        let muzzle = Vec2::new(
            player.pos.x + player.size.x / 2.0 - 1.5,
            player.pos.y - 15.0,
        );
        match player.power {
            1 => {
                state.bullets.push(Bullet::player(muzzle, 1));
            }
            2 => {
                state.bullets.push(Bullet::player(
                    Vec2::new(player.pos.x + 10.0, player.pos.y),
                    2,
                ));
                state.bullets.push(Bullet::player(
                    Vec2::new(player.pos.x + player.size.x - 10.0, player.pos.y),
                    2,
                ));
            }
            _ => {
                state.bullets.push(Bullet::player(muzzle, player.power));
                state.bullets.push(Bullet::player(
                    Vec2::new(player.pos.x + 5.0, player.pos.y),
                    player.power,
                ));
                state.bullets.push(Bullet::player(
                    Vec2::new(player.pos.x + player.size.x - 5.0, player.pos.y),
                    player.power,
                ));
            }
        }
    }
}

fn update_enemies(state: &mut GameState) {
    let GameState {
        enemies,
        bullets,
        rng,
        difficulty,
        ..
    } = state;

    for enemy in enemies.iter_mut().filter(|e| e.active) {
        if enemy.fire_timer > 0 {
            enemy.fire_timer -= 1;
        }
        enemy.move_timer += 1;

        let phase = enemy.move_timer as f32;
        match enemy.pattern {
            super::state::MovePattern::Horizontal => {
                enemy.pos.x += (phase * 0.05).sin() * enemy.speed;
                enemy.pos.y += 0.5;
            }
            super::state::MovePattern::Diagonal => {
                enemy.pos.x += (phase * 0.05).cos() * enemy.speed;
                enemy.pos.y += 0.7;
            }
            super::state::MovePattern::Sine => {
                enemy.pos.x += (phase * 0.1).sin() * enemy.speed * 2.0;
                enemy.pos.y += 0.3;
            }
        }

        enemy.pos.x = enemy.pos.x.clamp(0.0, GAME_WIDTH - enemy.size.x);

        // Off the bottom: loop back above the viewport, not a lifecycle end
        if enemy.pos.y > GAME_HEIGHT {
            enemy.pos.y = -enemy.size.y - rng.random::<f32>() * 100.0;
            enemy.pos.x = rng.random::<f32>() * (GAME_WIDTH - enemy.size.x);
        }

        if enemy.fire_timer == 0 && rng.random::<f32>() < 0.01 * *difficulty {
            enemy.fire_timer = enemy.fire_rate;
            bullets.push(Bullet::enemy(Vec2::new(
                enemy.pos.x + enemy.size.x / 2.0 - 1.0,
                enemy.pos.y + enemy.size.y,
            )));
        }
    }
}

fn update_meteors(state: &mut GameState) {
    let GameState { meteors, rng, .. } = state;

    for meteor in meteors.iter_mut().filter(|m| m.active) {
        meteor.pos.y += meteor.speed;
        meteor.angle += meteor.rotation_speed;

        if meteor.pos.y > GAME_HEIGHT {
            meteor.pos.y = -meteor.size.y - rng.random::<f32>() * 100.0;
            meteor.pos.x = rng.random::<f32>() * (GAME_WIDTH - meteor.size.x);
            meteor.rotation_speed = (rng.random::<f32>() - 0.5) * 0.05;
        }
    }
}

fn update_bullets(state: &mut GameState) {
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        if bullet.from_player {
            bullet.pos.y -= bullet.speed;
        } else {
            bullet.pos.y += bullet.speed;
        }

        if bullet.pos.y < -bullet.size.y || bullet.pos.y > GAME_HEIGHT {
            bullet.active = false;
        }
    }

    state.bullets.retain(|b| b.active);
}

fn update_explosions(state: &mut GameState) {
    for explosion in state.explosions.iter_mut() {
        explosion.timer = explosion.timer.saturating_sub(1);
    }
    state.explosions.retain(|e| e.timer > 0);
}

fn update_power_ups(state: &mut GameState) {
    for power_up in state.power_ups.iter_mut().filter(|p| p.active) {
        power_up.pos.y += power_up.speed;
        if power_up.pos.y > GAME_HEIGHT {
            power_up.active = false;
        }
    }
    state.power_ups.retain(|p| p.active);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, MovePattern, Player};
    use proptest::prelude::*;

    /// State with the initial wave cleared out so tests control the field
    fn empty_field(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        // A lone pacifist survivor keeps the wave director quiet
        state.enemies.truncate(1);
        state.enemies[0].pos = Vec2::new(0.0, 0.0);
        state.enemies[0].fire_timer = u32::MAX;
        state.enemies[0].speed = 0.0;
        state.meteors.clear();
        state.player.invulnerable = false;
        state.player.invulnerable_timer = 0;
        state
    }

    fn overlapped_enemy(player: &Player) -> Enemy {
        Enemy {
            pos: player.pos,
            size: Vec2::splat(30.0),
            speed: 0.0,
            health: 5,
            active: true,
            variant: 0,
            fire_rate: 60,
            fire_timer: u32::MAX,
            pattern: MovePattern::Horizontal,
            move_timer: 0,
            points: 10,
        }
    }

    #[test]
    fn paused_and_game_over_are_noops() {
        let mut state = GameState::new(1);
        state.paused = true;
        let before = state.clone();
        advance(&mut state, &InputState::default());
        assert_eq!(state.game_time, before.game_time);
        assert_eq!(state.player.pos, before.player.pos);

        state.paused = false;
        state.game_over = true;
        advance(&mut state, &InputState::default());
        assert_eq!(state.game_time, before.game_time);
    }

    #[test]
    fn fire_spawns_single_bullet_at_muzzle() {
        let mut state = empty_field(1);
        state.player.fire_timer = 0;
        let p = state.player.clone();

        let input = InputState {
            fire: true,
            ..Default::default()
        };
        advance(&mut state, &input);

        let shots: Vec<_> = state.bullets.iter().filter(|b| b.from_player).collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(state.player.fire_timer, PLAYER_FIRE_RATE);
        // Muzzle offset, then one tick of upward travel
        assert_eq!(shots[0].pos.x, p.pos.x + p.size.x / 2.0 - 1.5);
        assert_eq!(shots[0].pos.y, p.pos.y - 15.0 - PLAYER_BULLET_SPEED);
        assert_eq!(shots[0].damage, 1);
    }

    #[test]
    fn power_ladder_controls_shot_count() {
        for (power, expected) in [(1u8, 1usize), (2, 2), (3, 3)] {
            let mut state = empty_field(1);
            state.player.power = power;
            state.player.fire_timer = 0;

            let input = InputState {
                fire: true,
                ..Default::default()
            };
            advance(&mut state, &input);

            let shots = state.bullets.iter().filter(|b| b.from_player).count();
            assert_eq!(shots, expected, "power {power}");
        }
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut state = empty_field(1);
        state.player.fire_timer = 0;
        let input = InputState {
            fire: true,
            ..Default::default()
        };

        advance(&mut state, &input);
        advance(&mut state, &input);

        assert_eq!(
            state.bullets.iter().filter(|b| b.from_player).count(),
            1,
            "second trigger lands inside the cooldown window"
        );
        assert_eq!(state.player.fire_timer, PLAYER_FIRE_RATE - 1);
    }

    #[test]
    fn invulnerability_strictly_decreases_then_clears() {
        let mut state = empty_field(1);
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 2;

        advance(&mut state, &InputState::default());
        assert!(state.player.invulnerable);
        assert_eq!(state.player.invulnerable_timer, 1);

        advance(&mut state, &InputState::default());
        assert!(!state.player.invulnerable);
        assert_eq!(state.player.invulnerable_timer, 0);
    }

    #[test]
    fn drag_target_assigns_position_directly() {
        let mut state = empty_field(1);
        let input = InputState {
            drag_target: Some(Vec2::new(200.0, 500.0)),
            ..Default::default()
        };
        advance(&mut state, &input);

        assert_eq!(state.player.pos.x, 200.0 - state.player.size.x / 2.0);
        assert_eq!(state.player.pos.y, 500.0 - state.player.size.y / 2.0);

        // Dragging toward the top is pinned to the lower half
        let input = InputState {
            drag_target: Some(Vec2::new(200.0, 0.0)),
            ..Default::default()
        };
        advance(&mut state, &input);
        assert_eq!(state.player.pos.y, GAME_HEIGHT / 2.0);
    }

    #[test]
    fn bullet_kill_is_fully_accounted_in_one_tick() {
        let mut state = empty_field(2);
        let enemy_pos = Vec2::new(200.0, 200.0);
        state.enemies[0] = Enemy {
            pos: enemy_pos,
            health: 1,
            ..overlapped_enemy(&state.player)
        };
        // Bullet placed so one tick of travel leaves it overlapping
        state.bullets.push(Bullet::player(
            Vec2::new(210.0, 215.0 + PLAYER_BULLET_SPEED),
            1,
        ));
        let explosions_before = state.explosions.len();

        advance(&mut state, &InputState::default());

        // Killing the last enemy hands control to the wave director, which
        // spawns wave 2 immediately
        assert_eq!(state.wave, 2);
        assert_eq!(state.player.score, 10);
        assert_eq!(state.explosions.len(), explosions_before + 1);
        assert!(state.bullets.iter().all(|b| !b.from_player), "spent bullet pruned");
    }

    #[test]
    fn lethal_contact_triggers_game_over_once() {
        let mut state = empty_field(3);
        state.player.lives = 1;
        state.enemies.push(overlapped_enemy(&state.player));

        advance(&mut state, &InputState::default());

        assert_eq!(state.player.lives, 0);
        assert!(state.game_over);
        assert!(!state.player.active);
        let last = state.explosions.last().unwrap();
        assert_eq!(last.size, 50.0);
        assert_eq!(last.color, colors::HIT_EXPLOSION);
        assert_eq!(last.pos, state.player.center());

        // Game over is terminal and idempotent
        let explosions = state.explosions.len();
        advance(&mut state, &InputState::default());
        assert_eq!(state.explosions.len(), explosions);
    }

    #[test]
    fn enemy_scrolling_off_recycles_instead_of_dying() {
        let mut state = empty_field(4);
        state.enemies[0].pos.y = GAME_HEIGHT + 5.0;
        state.enemies[0].speed = 1.0;

        advance(&mut state, &InputState::default());

        let enemy = &state.enemies[0];
        assert!(enemy.active, "recycled, not destroyed");
        assert!(enemy.pos.y < 0.0, "teleported above the viewport");
        assert_eq!(state.wave, 1, "recycling must not look like a wave clear");
    }

    #[test]
    fn bullets_leaving_bounds_are_pruned() {
        let mut state = empty_field(5);
        // One tick from crossing y < -height and y > height respectively
        state.bullets.push(Bullet::player(Vec2::new(100.0, -6.0), 1));
        state.bullets.push(Bullet::enemy(Vec2::new(100.0, GAME_HEIGHT - 1.0)));

        advance(&mut state, &InputState::default());

        assert!(state.bullets.is_empty());
    }

    #[test]
    fn expired_explosions_are_pruned() {
        let mut state = empty_field(6);
        state
            .explosions
            .push(Explosion::new(Vec2::new(50.0, 50.0), 30.0, colors::ENEMY_EXPLOSION));
        state.explosions[0].timer = 1;

        advance(&mut state, &InputState::default());
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn power_ups_fall_and_prune_off_screen() {
        let mut state = empty_field(7);
        let mut p = crate::sim::state::PowerUp::random(Vec2::new(100.0, 100.0), &mut state.rng);
        p.pos.y = GAME_HEIGHT - 0.5;
        state.power_ups.push(p);

        advance(&mut state, &InputState::default());
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn same_seed_same_inputs_same_run() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        let inputs = [
            InputState { right: true, fire: true, ..Default::default() },
            InputState { left: true, ..Default::default() },
            InputState { up: true, fire: true, ..Default::default() },
            InputState::default(),
        ];

        for _ in 0..120 {
            for input in &inputs {
                advance(&mut a, input);
                advance(&mut b, input);
            }
        }

        assert_eq!(a.game_time, b.game_time);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.player.score, b.player.score);
        assert_eq!(a.bullets.len(), b.bullets.len());
        for (x, y) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(x.pos, y.pos);
        }
    }

    proptest! {
        #[test]
        fn player_stays_in_bounds(
            seed in 0u64..1000,
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..200)
        ) {
            let mut state = GameState::new(seed);
            for (left, right, up, down) in moves {
                let input = InputState { left, right, up, down, ..Default::default() };
                advance(&mut state, &input);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= GAME_WIDTH - state.player.size.x);
                prop_assert!(state.player.pos.y >= 0.0);
                prop_assert!(state.player.pos.y <= GAME_HEIGHT - state.player.size.y);
            }
        }

        #[test]
        fn lives_never_exceed_cap_and_score_is_monotonic(seed in 0u64..200) {
            let mut state = GameState::new(seed);
            let mut last_score = 0;
            for tick in 0..600u32 {
                let input = InputState {
                    fire: true,
                    left: tick % 40 < 20,
                    right: tick % 40 >= 20,
                    ..Default::default()
                };
                advance(&mut state, &input);
                prop_assert!(state.player.lives <= PLAYER_MAX_LIVES);
                prop_assert!(state.player.score >= last_score);
                last_score = state.player.score;
                if state.game_over {
                    break;
                }
            }
        }
    }
}
