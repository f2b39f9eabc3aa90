//! Collision detection and scoring
//!
//! Everything is an axis-aligned box. Within one tick each bullet resolves
//! against at most one enemy and at most one meteor, and direct player
//! contact takes the first matching entity per category; iteration order
//! decides ties.

use glam::Vec2;
use rand::Rng;

use super::state::{Explosion, GameState, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::renderer::vertex::colors;

/// Strict AABB overlap: touching edges do not collide
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Resolve all pairwise interactions for this tick
pub fn resolve_collisions(state: &mut GameState) {
    let GameState {
        player,
        enemies,
        meteors,
        bullets,
        explosions,
        power_ups,
        rng,
        ..
    } = state;

    if !player.active {
        return;
    }

    // Player bullets vs enemies and meteors. A bullet consumed by an enemy
    // still tests meteors this tick; it can take both out at once.
    for bullet in bullets.iter_mut().filter(|b| b.active && b.from_player) {
        for enemy in enemies.iter_mut().filter(|e| e.active) {
            if !aabb_overlap(bullet.pos, bullet.size, enemy.pos, enemy.size) {
                continue;
            }

            enemy.health -= bullet.damage;
            bullet.active = false;

            if enemy.health <= 0 {
                enemy.active = false;
                explosions.push(Explosion::new(enemy.center(), 30.0, colors::ENEMY_EXPLOSION));
                player.score += enemy.points;

                if rng.random::<f32>() < 0.2 {
                    power_ups.push(PowerUp::random(enemy.center(), rng));
                }
            }
            break;
        }

        for meteor in meteors.iter_mut().filter(|m| m.active) {
            if !aabb_overlap(bullet.pos, bullet.size, meteor.pos, meteor.size) {
                continue;
            }

            meteor.health -= bullet.damage;
            bullet.active = false;

            if meteor.health <= 0 {
                meteor.active = false;
                explosions.push(Explosion::new(
                    meteor.center(),
                    meteor.size.x,
                    colors::METEOR_EXPLOSION,
                ));
                player.score += meteor.points;

                if rng.random::<f32>() < 0.1 {
                    power_ups.push(PowerUp::random(meteor.center(), rng));
                }
            }
            break;
        }
    }

    // Enemy bullets vs player, skipped wholesale while shielded
    if !player.invulnerable {
        for bullet in bullets.iter_mut().filter(|b| b.active && !b.from_player) {
            if !aabb_overlap(bullet.pos, bullet.size, player.pos, player.size) {
                continue;
            }

            bullet.active = false;
            player.lives = player.lives.saturating_sub(1);
            player.invulnerable = true;
            player.invulnerable_timer = HIT_INVULN_TICKS;
            explosions.push(Explosion::new(bullet.center(), 20.0, colors::HIT_EXPLOSION));
            break;
        }
    }

    // Direct contact with enemies / meteors. The rammed entity takes 1
    // damage with the usual kill accounting, but contact kills never drop
    // pickups. The gate is evaluated once for both categories, so an enemy
    // ram does not shield the player from a meteor in the same tick.
    if !player.invulnerable {
        for enemy in enemies.iter_mut().filter(|e| e.active) {
            if !aabb_overlap(player.pos, player.size, enemy.pos, enemy.size) {
                continue;
            }

            player.lives = player.lives.saturating_sub(1);
            player.invulnerable = true;
            player.invulnerable_timer = HIT_INVULN_TICKS;

            enemy.health -= 1;
            if enemy.health <= 0 {
                enemy.active = false;
                explosions.push(Explosion::new(enemy.center(), 30.0, colors::ENEMY_EXPLOSION));
                player.score += enemy.points;
            }

            explosions.push(Explosion::new(player.center(), 30.0, colors::HIT_EXPLOSION));
            break;
        }

        for meteor in meteors.iter_mut().filter(|m| m.active) {
            if !aabb_overlap(player.pos, player.size, meteor.pos, meteor.size) {
                continue;
            }

            player.lives = player.lives.saturating_sub(1);
            player.invulnerable = true;
            player.invulnerable_timer = HIT_INVULN_TICKS;

            meteor.health -= 1;
            if meteor.health <= 0 {
                meteor.active = false;
                explosions.push(Explosion::new(
                    meteor.center(),
                    meteor.size.x,
                    colors::METEOR_EXPLOSION,
                ));
                player.score += meteor.points;
            }

            explosions.push(Explosion::new(player.center(), 30.0, colors::HIT_EXPLOSION));
            break;
        }
    }

    // Pickups are collected even while invulnerable
    for power_up in power_ups.iter_mut().filter(|p| p.active) {
        if !aabb_overlap(player.pos, player.size, power_up.pos, power_up.size) {
            continue;
        }

        power_up.active = false;
        match power_up.kind {
            PowerUpKind::Health => {
                player.lives = (player.lives + 1).min(PLAYER_MAX_LIVES);
            }
            PowerUpKind::Power => {
                player.power = (player.power + 1).min(PLAYER_MAX_POWER);
            }
            PowerUpKind::Shield => {
                player.invulnerable = true;
                player.invulnerable_timer = SHIELD_INVULN_TICKS;
            }
            PowerUpKind::Speed => {
                player.speed = (player.speed + 1.0).min(PLAYER_MAX_SPEED);
            }
        }

        explosions.push(Explosion::new(power_up.center(), 20.0, colors::PICKUP_FLASH));
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Enemy, Meteor, MovePattern};

    fn test_state() -> GameState {
        let mut state = GameState::new(123);
        state.enemies.clear();
        state.meteors.clear();
        state.player.invulnerable = false;
        state.player.invulnerable_timer = 0;
        state
    }

    fn enemy_at(pos: Vec2, health: i32) -> Enemy {
        Enemy {
            pos,
            size: Vec2::splat(30.0),
            speed: 1.0,
            health,
            active: true,
            variant: 0,
            fire_rate: 60,
            fire_timer: 60,
            pattern: MovePattern::Horizontal,
            move_timer: 0,
            points: 10,
        }
    }

    fn meteor_at(pos: Vec2, health: i32) -> Meteor {
        Meteor {
            pos,
            size: Vec2::splat(30.0),
            speed: 1.0,
            health,
            active: true,
            variant: 0,
            angle: 0.0,
            rotation_speed: 0.0,
            points: 5,
        }
    }

    #[test]
    fn overlap_by_one_unit_hits() {
        // b's left edge one unit inside a's right edge
        assert!(aabb_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn adjacent_boxes_do_not_hit() {
        assert!(!aabb_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn bullet_kills_enemy_and_scores() {
        let mut state = test_state();
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 1));
        state
            .bullets
            .push(Bullet::player(Vec2::new(110.0, 105.0), 1));

        resolve_collisions(&mut state);

        assert!(!state.enemies[0].active);
        assert!(!state.bullets[0].active);
        assert_eq!(state.player.score, 10);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].color, colors::ENEMY_EXPLOSION);
        assert_eq!(state.explosions[0].size, 30.0);
    }

    #[test]
    fn bullet_damages_without_killing() {
        let mut state = test_state();
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 3));
        state
            .bullets
            .push(Bullet::player(Vec2::new(110.0, 105.0), 1));

        resolve_collisions(&mut state);

        assert!(state.enemies[0].active);
        assert_eq!(state.enemies[0].health, 2);
        assert!(!state.bullets[0].active);
        assert_eq!(state.player.score, 0);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn bullet_hits_first_enemy_in_order_only() {
        let mut state = test_state();
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 1));
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 1));
        state
            .bullets
            .push(Bullet::player(Vec2::new(110.0, 105.0), 1));

        resolve_collisions(&mut state);

        assert!(!state.enemies[0].active, "first in iteration order dies");
        assert!(state.enemies[1].active, "second is untouched");
    }

    #[test]
    fn meteor_explosion_matches_meteor_width() {
        let mut state = test_state();
        let mut m = meteor_at(Vec2::new(100.0, 100.0), 1);
        m.size = Vec2::splat(50.0);
        state.meteors.push(m);
        state
            .bullets
            .push(Bullet::player(Vec2::new(110.0, 105.0), 1));

        resolve_collisions(&mut state);

        assert!(!state.meteors[0].active);
        assert_eq!(state.explosions[0].size, 50.0);
        assert_eq!(state.explosions[0].color, colors::METEOR_EXPLOSION);
    }

    #[test]
    fn enemy_bullet_costs_a_life_and_grants_grace() {
        let mut state = test_state();
        let hit = state.player.center();
        state.bullets.push(Bullet::enemy(hit));

        resolve_collisions(&mut state);

        assert_eq!(state.player.lives, PLAYER_LIVES - 1);
        assert!(state.player.invulnerable);
        assert_eq!(state.player.invulnerable_timer, HIT_INVULN_TICKS);
        assert!(!state.bullets[0].active);
    }

    #[test]
    fn invulnerability_gates_all_damage_sources() {
        let mut state = test_state();
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 60;

        state.bullets.push(Bullet::enemy(state.player.center()));
        state.enemies.push(enemy_at(state.player.pos, 5));
        state.meteors.push(meteor_at(state.player.pos, 5));

        resolve_collisions(&mut state);

        assert_eq!(state.player.lives, PLAYER_LIVES);
        assert!(state.bullets[0].active, "gated bullet is not consumed");
        assert_eq!(state.enemies[0].health, 5);
        assert_eq!(state.meteors[0].health, 5);
    }

    #[test]
    fn ramming_damages_both_sides() {
        let mut state = test_state();
        state.enemies.push(enemy_at(state.player.pos, 1));

        resolve_collisions(&mut state);

        assert_eq!(state.player.lives, PLAYER_LIVES - 1);
        assert!(!state.enemies[0].active);
        assert_eq!(state.player.score, 10);
        // Enemy death flash plus the player's own hit flash
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(state.explosions[1].color, colors::HIT_EXPLOSION);
        assert!(state.power_ups.is_empty(), "contact kills never drop pickups");
    }

    #[test]
    fn pickups_collected_even_while_shielded() {
        let mut state = test_state();
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 10;
        let mut p = PowerUp::random(state.player.center(), &mut rand_pcg::Pcg32::new(1, 1));
        p.kind = PowerUpKind::Health;
        state.power_ups.push(p);

        resolve_collisions(&mut state);

        assert!(!state.power_ups[0].active);
        assert_eq!(state.player.lives, PLAYER_LIVES + 1);
    }

    #[test]
    fn pickup_effects_respect_caps() {
        for (kind, check) in [
            (PowerUpKind::Health, 0usize),
            (PowerUpKind::Power, 1),
            (PowerUpKind::Shield, 2),
            (PowerUpKind::Speed, 3),
        ] {
            let mut state = test_state();
            state.player.lives = PLAYER_MAX_LIVES;
            state.player.power = PLAYER_MAX_POWER;
            state.player.speed = PLAYER_MAX_SPEED;
            let mut p = PowerUp::random(state.player.center(), &mut state.rng.clone());
            p.kind = kind;
            state.power_ups.push(p);

            resolve_collisions(&mut state);

            match check {
                0 => assert_eq!(state.player.lives, PLAYER_MAX_LIVES),
                1 => assert_eq!(state.player.power, PLAYER_MAX_POWER),
                2 => {
                    assert!(state.player.invulnerable);
                    assert_eq!(state.player.invulnerable_timer, SHIELD_INVULN_TICKS);
                }
                _ => assert_eq!(state.player.speed, PLAYER_MAX_SPEED),
            }
            assert_eq!(state.explosions.last().unwrap().color, colors::PICKUP_FLASH);
        }
    }
}
