//! Scene builder
//!
//! Pure functions from game state to a frame's vertex list. Layer order is
//! load-bearing: later draws occlude earlier ones, so background comes
//! first and overlays last.

use glam::Vec2;
use std::f32::consts::TAU;

use super::shapes;
use super::text::{self, Align};
use super::vertex::{Vertex, colors, rgba};
use crate::assets::AssetBundle;
use crate::consts::*;
use crate::settings::ShipSkin;
use crate::sim::state::{Bullet, Enemy, Explosion, GameState, Meteor, Player, PowerUp, PowerUpKind};
use crate::{hash_unit, scatter_hash};

/// Per-frame rendering options sourced from settings and the driver
#[derive(Debug, Clone, Copy)]
pub struct FrameOptions {
    pub ship_skin: ShipSkin,
    /// Shadow boxes behind HUD text
    pub enhance_text: bool,
    pub show_fps: bool,
    pub fps: u32,
    /// Wall-clock milliseconds; drives blink/pulse cosmetics only, never
    /// gameplay
    pub time_ms: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            ship_skin: ShipSkin::Rocket,
            enhance_text: false,
            show_fps: false,
            fps: 0,
            time_ms: 0.0,
        }
    }
}

/// Build one frame of the running game
pub fn build_frame(state: &GameState, assets: &AssetBundle, opts: &FrameOptions) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    draw_background(&mut out, state.game_time);
    draw_player(&mut out, &state.player, assets, opts);
    draw_enemies(&mut out, &state.enemies, assets);
    draw_meteors(&mut out, &state.meteors, assets);
    draw_bullets(&mut out, &state.bullets);
    draw_explosions(&mut out, &state.explosions, state.game_time);
    draw_power_ups(&mut out, &state.power_ups, state.game_time);
    draw_hud(&mut out, state, opts);

    if state.paused {
        draw_pause_overlay(&mut out);
    } else if state.game_over {
        draw_game_over_overlay(&mut out, state);
    }

    out
}

/// Starfield over a vertical gradient, with a few nebulae for depth. Star
/// placement is hash-scattered so the field is stable frame to frame and
/// scrolls with the tick counter.
fn draw_background(out: &mut Vec<Vertex>, game_time: u64) {
    shapes::gradient_rect(
        out,
        Vec2::ZERO,
        Vec2::new(GAME_WIDTH, GAME_HEIGHT / 2.0),
        colors::SKY_TOP,
        colors::SKY_MID,
    );
    shapes::gradient_rect(
        out,
        Vec2::new(0.0, GAME_HEIGHT / 2.0),
        Vec2::new(GAME_WIDTH, GAME_HEIGHT / 2.0),
        colors::SKY_MID,
        colors::SKY_BOTTOM,
    );

    let scroll = game_time as f32;
    for i in 0..200u32 {
        let h = scatter_hash(i, 11);
        let x = hash_unit(h) * GAME_WIDTH;
        let depth = 0.2 + hash_unit(scatter_hash(i, 13)) * 0.3;
        let y = (hash_unit(scatter_hash(i, 17)) * GAME_HEIGHT + scroll * depth) % GAME_HEIGHT;
        let size = 1.0 + hash_unit(scatter_hash(i, 19)) * 2.0;
        shapes::rect(out, Vec2::new(x, y), Vec2::splat(size), colors::STAR_WHITE);
    }

    for i in 0..50u32 {
        let h = scatter_hash(i, 23);
        let x = hash_unit(h) * GAME_WIDTH;
        let depth = 0.3 + hash_unit(scatter_hash(i, 29)) * 0.4;
        let y = (hash_unit(scatter_hash(i, 31)) * GAME_HEIGHT + scroll * depth) % GAME_HEIGHT;
        let size = 0.5 + hash_unit(scatter_hash(i, 37)) * 2.0;
        let tint = colors::STAR_TINTS[(h % 5) as usize];
        shapes::rect(out, Vec2::new(x, y), Vec2::splat(size), tint);
    }

    for i in 0..3u32 {
        let h = scatter_hash(i, 41);
        let center = Vec2::new(
            hash_unit(h) * GAME_WIDTH,
            hash_unit(scatter_hash(i, 43)) * GAME_HEIGHT,
        );
        let radius = 50.0 + hash_unit(scatter_hash(i, 47)) * 100.0;
        shapes::soft_circle(out, center, radius, colors::NEBULA, 24);
    }
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player, assets: &AssetBundle, opts: &FrameOptions) {
    if !player.active {
        return;
    }

    // Blink on a ~60ms cadence while invulnerable; blink frames draw
    // nothing at all, shield included
    if player.invulnerable && (opts.time_ms / 60.0) as u64 % 2 == 0 {
        return;
    }

    let center = player.center();

    match (&assets.player_ship, opts.ship_skin) {
        (Some(mesh), ShipSkin::Rocket) => {
            mesh.emit(out, center, player.size, 0.0, [1.0; 4]);
        }
        _ => draw_fallback_ship(out, player, opts.ship_skin),
    }

    draw_engine_flame(out, player, opts.time_ms);

    if player.invulnerable {
        draw_shield(out, player);
    }
}

/// Procedural ship used whenever the vector sprite is missing (or the
/// selected skin has no sprite at all)
fn draw_fallback_ship(out: &mut Vec<Vertex>, player: &Player, skin: ShipSkin) {
    let center = player.center();
    let w = player.size.x;
    let h = player.size.y;

    match skin {
        ShipSkin::Rocket => {
            shapes::triangle(out, [
                (center + Vec2::new(0.0, -h / 2.0), colors::SHIP_NOSE),
                (center + Vec2::new(-w / 2.0, h / 2.0), colors::SHIP_TAIL),
                (center + Vec2::new(w / 2.0, h / 2.0), colors::SHIP_TAIL),
            ]);
            shapes::rect(
                out,
                center + Vec2::new(-w * 0.2, h * 0.1),
                Vec2::new(w * 0.4, h * 0.3),
                colors::SHIP_CANOPY,
            );
        }
        ShipSkin::Interceptor => {
            // Narrow fuselage with swept wings
            shapes::triangle(out, [
                (center + Vec2::new(0.0, -h / 2.0), colors::SHIP_NOSE),
                (center + Vec2::new(-w * 0.2, h / 2.0), colors::SHIP_TAIL),
                (center + Vec2::new(w * 0.2, h / 2.0), colors::SHIP_TAIL),
            ]);
            shapes::triangle(out, [
                (center + Vec2::new(-w * 0.1, 0.0), colors::SHIP_TAIL),
                (center + Vec2::new(-w * 0.5, h * 0.45), colors::SHIP_NOSE),
                (center + Vec2::new(-w * 0.1, h * 0.45), colors::SHIP_TAIL),
            ]);
            shapes::triangle(out, [
                (center + Vec2::new(w * 0.1, 0.0), colors::SHIP_TAIL),
                (center + Vec2::new(w * 0.5, h * 0.45), colors::SHIP_NOSE),
                (center + Vec2::new(w * 0.1, h * 0.45), colors::SHIP_TAIL),
            ]);
            shapes::circle(out, center, w * 0.12, colors::SHIP_CANOPY, 10);
        }
    }
}

fn draw_engine_flame(out: &mut Vec<Vertex>, player: &Player, time_ms: f64) {
    let base = Vec2::new(player.pos.x + player.size.x / 2.0, player.pos.y + player.size.y);
    let w = player.size.x;
    let h = player.size.y;
    let pulse = 1.0 + ((time_ms * 0.01).sin() as f32) * 0.2;

    shapes::triangle(out, [
        (base + Vec2::new(-w * 0.3, 0.0), colors::FLAME_OUTER),
        (base + Vec2::new(w * 0.3, 0.0), colors::FLAME_OUTER),
        (base + Vec2::new(0.0, h * 0.6 * pulse), rgba(0xFFFF64, 0.4)),
    ]);
    shapes::triangle(out, [
        (base + Vec2::new(-w * 0.15, 0.0), colors::FLAME_INNER),
        (base + Vec2::new(w * 0.15, 0.0), colors::FLAME_INNER),
        (base + Vec2::new(0.0, h * 0.4 * pulse), rgba(0xFFC864, 0.5)),
    ]);
}

fn draw_shield(out: &mut Vec<Vertex>, player: &Player) {
    let center = player.center();
    let radius = player.size.x * 0.7;
    shapes::ring(out, center, radius * 0.85, radius * 0.3, colors::SHIELD_GLOW, 28);
    shapes::ring(out, center, radius, 2.0, colors::SHIELD, 28);
}

fn draw_enemies(out: &mut Vec<Vertex>, enemies: &[Enemy], assets: &AssetBundle) {
    for enemy in enemies.iter().filter(|e| e.active) {
        let variant = (enemy.variant as usize).min(2);

        if let Some(mesh) = &assets.enemy_ships[variant] {
            // Variant tint stands in for the canvas hue-rotate filter
            mesh.emit(
                out,
                enemy.center(),
                enemy.size,
                0.0,
                colors::ENEMY_VARIANTS[variant],
            );
        } else {
            shapes::rect(out, enemy.pos, enemy.size, colors::ENEMY_VARIANTS[variant]);
            shapes::circle(out, enemy.center(), enemy.size.x * 0.3, colors::ENEMY_HULL_DARK, 14);
            shapes::circle(out, enemy.center(), enemy.size.x * 0.15, colors::ENEMY_CORE, 10);
        }
    }
}

fn draw_meteors(out: &mut Vec<Vertex>, meteors: &[Meteor], assets: &AssetBundle) {
    for meteor in meteors.iter().filter(|m| m.active) {
        let variant = (meteor.variant as usize).min(2);
        let center = meteor.center();

        if let Some(mesh) = &assets.meteors[variant] {
            mesh.emit(out, center, meteor.size, meteor.angle, [1.0; 4]);
        } else {
            shapes::circle(out, center, meteor.size.x / 2.0, colors::METEOR_ROCK, 18);
            // Craters rotate with the body
            for i in 0..5 {
                let angle = i as f32 * TAU / 5.0 + meteor.angle;
                let offset = Vec2::new(angle.cos(), angle.sin()) * meteor.size.x * 0.2;
                shapes::circle(out, center + offset, meteor.size.x * 0.1, colors::METEOR_CRATER, 10);
            }
        }
    }
}

fn draw_bullets(out: &mut Vec<Vertex>, bullets: &[Bullet]) {
    for bullet in bullets.iter().filter(|b| b.active) {
        if bullet.from_player {
            shapes::rect(out, bullet.pos, bullet.size, colors::PLAYER_BULLET);
            shapes::rect(
                out,
                bullet.pos - Vec2::new(1.0, 2.0),
                bullet.size + Vec2::new(2.0, 2.0),
                colors::PLAYER_BULLET_GLOW,
            );
        } else {
            shapes::rect(out, bullet.pos, bullet.size, colors::ENEMY_BULLET);
            shapes::rect(
                out,
                bullet.pos - Vec2::new(1.0, 0.0),
                bullet.size + Vec2::new(2.0, 2.0),
                colors::ENEMY_BULLET_GLOW,
            );
        }
    }
}

fn draw_explosions(out: &mut Vec<Vertex>, explosions: &[Explosion], game_time: u64) {
    for explosion in explosions {
        let fade = explosion.timer as f32 / explosion.max_time as f32;
        let size = explosion.size * (1.0 - fade * 0.5);

        let mut outer = explosion.color;
        outer[3] = fade;
        shapes::circle(out, explosion.pos, size, outer, 20);

        let mut core = colors::EXPLOSION_CORE;
        core[3] = fade * 0.9;
        shapes::circle(out, explosion.pos, size * 0.6, core, 16);

        // Orbiting sparks; scatter radius is hashed per spark, not random,
        // so replays render identically
        for i in 0..5u32 {
            let angle = i as f32 * TAU / 5.0 + game_time as f32 * 0.01;
            let jitter = hash_unit(scatter_hash(explosion.timer, i));
            let distance = size * (0.5 + jitter * 0.5);
            let pos = explosion.pos + Vec2::new(angle.cos(), angle.sin()) * distance;
            shapes::circle(out, pos, size * 0.1, colors::STAR_WHITE, 8);
        }
    }
}

pub(crate) fn power_up_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::Health => colors::POWER_UP_HEALTH,
        PowerUpKind::Power => colors::POWER_UP_POWER,
        PowerUpKind::Shield => colors::POWER_UP_SHIELD,
        PowerUpKind::Speed => colors::POWER_UP_SPEED,
    }
}

pub(crate) fn power_up_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Health => '+',
        PowerUpKind::Power => 'P',
        PowerUpKind::Shield => 'S',
        PowerUpKind::Speed => '>',
    }
}

fn draw_power_ups(out: &mut Vec<Vertex>, power_ups: &[PowerUp], game_time: u64) {
    for power_up in power_ups.iter().filter(|p| p.active) {
        let center = power_up.center();
        let radius = power_up.size.x / 2.0;
        let color = power_up_color(power_up.kind);

        shapes::circle(out, center, radius, color, 16);
        text::draw_glyph_centered(out, power_up_glyph(power_up.kind), center, 2.0, colors::HUD_TEXT);

        let pulse = 1.0 + (game_time as f32 * 0.1).sin() * 0.1;
        let mut halo = color;
        halo[3] = 0.5;
        shapes::ring(out, center, radius * pulse, 2.0, halo, 16);
    }
}

fn draw_hud(out: &mut Vec<Vertex>, state: &GameState, opts: &FrameOptions) {
    if opts.enhance_text {
        shapes::rect(out, Vec2::new(5.0, 5.0), Vec2::new(200.0, 30.0), colors::HUD_BACKDROP);
        shapes::rect(
            out,
            Vec2::new(GAME_WIDTH / 2.0 - 150.0, 40.0),
            Vec2::new(300.0, 30.0),
            colors::HUD_BACKDROP,
        );
        shapes::rect(
            out,
            Vec2::new(GAME_WIDTH - 150.0, 5.0),
            Vec2::new(145.0, 30.0),
            colors::HUD_BACKDROP,
        );
        shapes::rect(out, Vec2::new(5.0, 75.0), Vec2::new(150.0, 30.0), colors::HUD_BACKDROP);
    }

    text::draw_text(
        out,
        &format!("SCORE: {}", state.player.score),
        10.0,
        10.0,
        2.0,
        colors::HUD_TEXT,
        Align::Left,
    );
    text::draw_text(
        out,
        &format!("LEVEL {}  WAVE {}", state.level, state.wave),
        GAME_WIDTH / 2.0,
        45.0,
        2.0,
        colors::HUD_TEXT,
        Align::Center,
    );
    text::draw_text(
        out,
        &format!("LIVES: {}", state.player.lives),
        GAME_WIDTH - 10.0,
        10.0,
        2.0,
        colors::HUD_TEXT,
        Align::Right,
    );

    for i in 0..state.player.lives {
        let x = GAME_WIDTH - 20.0 - i as f32 * 25.0;
        shapes::triangle(out, [
            (Vec2::new(x, 70.0), colors::LIFE_ICON),
            (Vec2::new(x + 10.0, 70.0), colors::LIFE_ICON),
            (Vec2::new(x + 5.0, 60.0), colors::LIFE_ICON),
        ]);
    }

    text::draw_text(
        out,
        &format!("POWER: {}", state.player.power),
        10.0,
        80.0,
        2.0,
        colors::HUD_TEXT,
        Align::Left,
    );
    for i in 0..state.player.power {
        shapes::rect(
            out,
            Vec2::new(15.0 + i as f32 * 25.0, 115.0),
            Vec2::new(20.0, 5.0),
            colors::POWER_BAR[(i as usize).min(2)],
        );
    }

    if opts.show_fps {
        text::draw_text(
            out,
            &format!("FPS: {}", opts.fps),
            10.0,
            GAME_HEIGHT - 20.0,
            1.5,
            colors::HUD_TEXT,
            Align::Left,
        );
    }
}

fn draw_pause_overlay(out: &mut Vec<Vertex>) {
    shapes::rect(out, Vec2::ZERO, Vec2::new(GAME_WIDTH, GAME_HEIGHT), colors::PAUSE_DIM);
    draw_text_middle(out, "PAUSED", GAME_HEIGHT / 2.0 - 40.0, 4.0, colors::HUD_TEXT);
    draw_text_middle(out, "PRESS P TO CONTINUE", GAME_HEIGHT / 2.0 + 20.0, 1.5, colors::HUD_TEXT);
}

fn draw_game_over_overlay(out: &mut Vec<Vertex>, state: &GameState) {
    shapes::rect(out, Vec2::ZERO, Vec2::new(GAME_WIDTH, GAME_HEIGHT), colors::GAME_OVER_DIM);
    draw_text_middle(out, "GAME OVER", GAME_HEIGHT / 2.0 - 60.0, 4.0, colors::GAME_OVER_TITLE);
    draw_text_middle(
        out,
        &format!("FINAL SCORE: {}", state.player.score),
        GAME_HEIGHT / 2.0,
        2.0,
        colors::HUD_TEXT,
    );
    draw_text_middle(
        out,
        &format!("LEVEL: {}", state.level),
        GAME_HEIGHT / 2.0 + 40.0,
        2.0,
        colors::HUD_TEXT,
    );
    draw_text_middle(
        out,
        "PRESS ENTER TO PLAY AGAIN",
        GAME_HEIGHT / 2.0 + 100.0,
        1.5,
        colors::HUD_TEXT,
    );
}

/// Centered text with the anchor on the vertical midline of the glyphs
fn draw_text_middle(out: &mut Vec<Vertex>, s: &str, y: f32, scale: f32, color: [f32; 4]) {
    text::draw_text(
        out,
        s,
        GAME_WIDTH / 2.0,
        y - text::text_height(scale) / 2.0,
        scale,
        color,
        Align::Center,
    );
}

/// Pre-game help screen; shown until dismissed, then never again
pub fn instructions_frame(high_score: u32, time_ms: f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(2048);

    shapes::rect(&mut out, Vec2::ZERO, Vec2::new(GAME_WIDTH, GAME_HEIGHT), colors::SKY_BOTTOM);
    for i in 0..100u32 {
        let x = hash_unit(scatter_hash(i, 53)) * GAME_WIDTH;
        let y = hash_unit(scatter_hash(i, 59)) * GAME_HEIGHT;
        let size = 1.0 + hash_unit(scatter_hash(i, 61)) * 2.0;
        shapes::rect(&mut out, Vec2::new(x, y), Vec2::splat(size), colors::STAR_WHITE);
    }

    let center = GAME_WIDTH / 2.0;
    text::draw_text(&mut out, "ASTRO STRIKE", center, 50.0, 3.0, colors::HUD_TEXT, Align::Center);
    text::draw_text(&mut out, "HOW TO PLAY", center, 100.0, 2.0, colors::HUD_TEXT, Align::Center);

    for (line, y) in [
        ("KEYBOARD CONTROLS:", 150.0),
        ("ARROWS / WASD - MOVE", 180.0),
        ("SPACE - FIRE", 210.0),
        ("P / ESC - PAUSE", 240.0),
        ("TOUCH CONTROLS:", 280.0),
        ("TOUCH AND DRAG - MOVE SHIP", 310.0),
        ("AUTO-FIRE ENABLED", 340.0),
    ] {
        text::draw_text(&mut out, line, center, y, 1.5, colors::HUD_TEXT, Align::Center);
    }

    let pulse = 0.7 + 0.3 * (time_ms * 0.005).sin() as f32;
    let mut prompt = colors::START_PROMPT;
    prompt[3] = pulse;
    text::draw_text(&mut out, "PRESS ENTER OR TOUCH", center, GAME_HEIGHT - 100.0, 2.0, prompt, Align::Center);
    text::draw_text(&mut out, "TO START", center, GAME_HEIGHT - 70.0, 2.0, prompt, Align::Center);

    text::draw_text(
        &mut out,
        &format!("HIGH SCORE: {high_score}"),
        center,
        GAME_HEIGHT - 30.0,
        1.5,
        colors::HUD_TEXT,
        Align::Center,
    );

    out
}

/// Translucent ring under an active touch point
pub fn touch_indicator(out: &mut Vec<Vertex>, pos: Vec2) {
    shapes::ring(out, pos, 20.0, 2.0, colors::TOUCH_RING, 24);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_at(time_ms: f64, state: &GameState) -> Vec<Vertex> {
        build_frame(
            state,
            &AssetBundle::empty(),
            &FrameOptions {
                time_ms,
                ..Default::default()
            },
        )
    }

    #[test]
    fn frame_is_whole_triangles() {
        let state = GameState::new(5);
        let frame = frame_at(90.0, &state);
        assert!(!frame.is_empty());
        assert_eq!(frame.len() % 3, 0);
    }

    #[test]
    fn frames_are_pure_functions_of_inputs() {
        let state = GameState::new(5);
        assert_eq!(frame_at(90.0, &state).len(), frame_at(90.0, &state).len());
        let a = frame_at(90.0, &state);
        let b = frame_at(90.0, &state);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn invulnerable_ship_blinks_on_60ms_cadence() {
        let state = GameState::new(5);
        assert!(state.player.invulnerable, "fresh player has spawn grace");
        // (time/60) even -> hidden, odd -> visible
        let hidden = frame_at(0.0, &state);
        let visible = frame_at(60.0, &state);
        assert!(visible.len() > hidden.len());
    }

    #[test]
    fn pause_overlay_draws_on_top() {
        let mut state = GameState::new(5);
        let base = frame_at(90.0, &state);
        state.paused = true;
        let paused = frame_at(90.0, &state);
        assert!(paused.len() > base.len());
    }

    #[test]
    fn game_over_overlay_replaces_pause() {
        let mut state = GameState::new(5);
        state.game_over = true;
        state.player.active = false;
        let frame = frame_at(90.0, &state);
        assert!(!frame.is_empty());
    }

    #[test]
    fn enhance_text_adds_exactly_four_backdrops() {
        let state = GameState::new(5);
        let plain = frame_at(90.0, &state);
        let enhanced = build_frame(
            &state,
            &AssetBundle::empty(),
            &FrameOptions {
                time_ms: 90.0,
                enhance_text: true,
                ..Default::default()
            },
        );
        assert_eq!(enhanced.len(), plain.len() + 4 * 6);
    }

    #[test]
    fn sprite_mesh_replaces_fallback_ship() {
        let state = GameState::new(5);
        let mut assets = AssetBundle::empty();
        assets.player_ship = crate::assets::parse_sprite(
            r##"<polygon points="12,0 0,24 24,24" fill="#44AAFF"/>"##,
        );
        let with_mesh = build_frame(
            &state,
            &assets,
            &FrameOptions {
                time_ms: 90.0,
                ..Default::default()
            },
        );
        assert!(!with_mesh.is_empty());
    }

    #[test]
    fn power_up_badges_cover_every_kind() {
        for kind in PowerUpKind::ALL {
            let glyph = power_up_glyph(kind);
            assert!("+PS>".contains(glyph));
            assert_eq!(power_up_color(kind)[3], 1.0);
        }
    }

    #[test]
    fn instructions_screen_pulses_but_stays_visible() {
        for t in [0.0, 300.0, 700.0] {
            let frame = instructions_frame(1234, t);
            assert!(!frame.is_empty());
            let min_alpha = frame
                .iter()
                .map(|v| v.color[3])
                .fold(f32::MAX, f32::min);
            assert!(min_alpha >= 0.35, "prompt never fades out fully");
        }
    }
}
