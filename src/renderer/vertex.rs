//! Vertex types and the game palette

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Expand a packed `0xRRGGBB` color with the given alpha
pub const fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::rgba;

    // Explosion tones
    pub const ENEMY_EXPLOSION: [f32; 4] = rgba(0xFF6600, 1.0);
    pub const METEOR_EXPLOSION: [f32; 4] = rgba(0xAA6600, 1.0);
    pub const HIT_EXPLOSION: [f32; 4] = rgba(0xFF0000, 1.0);
    pub const PICKUP_FLASH: [f32; 4] = rgba(0xFFFFFF, 1.0);
    pub const EXPLOSION_CORE: [f32; 4] = rgba(0xFFFF00, 0.9);

    // Bullets
    pub const PLAYER_BULLET: [f32; 4] = rgba(0x00FF00, 1.0);
    pub const PLAYER_BULLET_GLOW: [f32; 4] = rgba(0x00FF00, 0.3);
    pub const ENEMY_BULLET: [f32; 4] = rgba(0xFF0000, 1.0);
    pub const ENEMY_BULLET_GLOW: [f32; 4] = rgba(0xFF0000, 0.3);

    // Player ship
    pub const SHIP_NOSE: [f32; 4] = rgba(0x44AAFF, 1.0);
    pub const SHIP_TAIL: [f32; 4] = rgba(0x0088FF, 1.0);
    pub const SHIP_CANOPY: [f32; 4] = rgba(0x00FFFF, 1.0);
    pub const SHIELD: [f32; 4] = rgba(0x44AAFF, 0.7);
    pub const SHIELD_GLOW: [f32; 4] = rgba(0x44AAFF, 0.25);
    pub const FLAME_OUTER: [f32; 4] = rgba(0xFF6400, 0.9);
    pub const FLAME_INNER: [f32; 4] = rgba(0xFFFFFF, 0.9);

    // Enemy variant tints
    pub const ENEMY_VARIANTS: [[f32; 4]; 3] = [
        rgba(0xFF5555, 1.0),
        rgba(0xFF55FF, 1.0),
        rgba(0x5555FF, 1.0),
    ];
    pub const ENEMY_HULL_DARK: [f32; 4] = rgba(0x000000, 1.0);
    pub const ENEMY_CORE: [f32; 4] = rgba(0xFFFF00, 1.0);

    // Meteors
    pub const METEOR_ROCK: [f32; 4] = rgba(0xAAAAAA, 1.0);
    pub const METEOR_CRATER: [f32; 4] = rgba(0x888888, 1.0);

    // Pickups
    pub const POWER_UP_HEALTH: [f32; 4] = rgba(0xFF5555, 1.0);
    pub const POWER_UP_POWER: [f32; 4] = rgba(0x55FF55, 1.0);
    pub const POWER_UP_SHIELD: [f32; 4] = rgba(0x5555FF, 1.0);
    pub const POWER_UP_SPEED: [f32; 4] = rgba(0xFFFF55, 1.0);

    // HUD
    pub const HUD_TEXT: [f32; 4] = rgba(0xFFFFFF, 1.0);
    pub const HUD_BACKDROP: [f32; 4] = rgba(0x000000, 0.5);
    pub const LIFE_ICON: [f32; 4] = rgba(0x55FF55, 1.0);
    pub const POWER_BAR: [[f32; 4]; 3] = [
        rgba(0x55FF55, 1.0),
        rgba(0x5555FF, 1.0),
        rgba(0xFF55FF, 1.0),
    ];
    pub const GAME_OVER_TITLE: [f32; 4] = rgba(0xFF5555, 1.0);
    pub const START_PROMPT: [f32; 4] = rgba(0x55FF55, 1.0);
    pub const PAUSE_DIM: [f32; 4] = rgba(0x000000, 0.7);
    pub const GAME_OVER_DIM: [f32; 4] = rgba(0x000000, 0.8);

    // Background
    pub const SKY_TOP: [f32; 4] = rgba(0x0A1030, 1.0);
    pub const SKY_MID: [f32; 4] = rgba(0x1A0A30, 1.0);
    pub const SKY_BOTTOM: [f32; 4] = rgba(0x000000, 1.0);
    pub const STAR_WHITE: [f32; 4] = rgba(0xFFFFFF, 1.0);
    pub const STAR_TINTS: [[f32; 4]; 5] = [
        rgba(0x88AAFF, 1.0),
        rgba(0xFF88AA, 1.0),
        rgba(0xAAFFAA, 1.0),
        rgba(0xFFAAFF, 1.0),
        rgba(0xFFFFAA, 1.0),
    ];
    pub const NEBULA: [f32; 4] = rgba(0x6464FF, 0.1);
    pub const TOUCH_RING: [f32; 4] = rgba(0xFFFFFF, 0.3);
}
