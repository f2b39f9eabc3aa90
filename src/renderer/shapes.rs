//! Shape tessellation for 2D primitives
//!
//! Everything renders as triangles; these helpers append into the frame's
//! vertex list so one draw call covers the whole scene.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: [f32; 4]) {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
    out.push(Vertex::new(x0, y1, color));
}

/// Rectangle with a vertical color gradient; per-vertex colors interpolate
/// across the face, standing in for the canvas linear gradient.
pub fn gradient_rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);

    out.push(Vertex::new(x0, y0, top));
    out.push(Vertex::new(x1, y0, top));
    out.push(Vertex::new(x0, y1, bottom));

    out.push(Vertex::new(x1, y0, top));
    out.push(Vertex::new(x1, y1, bottom));
    out.push(Vertex::new(x0, y1, bottom));
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Circle with a bright core fading toward the rim, standing in for the
/// canvas radial gradient (nebulae, soft glows)
pub fn soft_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, core: [f32; 4], segments: u32) {
    let rim = [core[0], core[1], core[2], 0.0];
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        out.push(Vertex::new(center.x, center.y, core));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            rim,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            rim,
        ));
    }
}

/// Hollow circle of the given stroke thickness
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    thickness: f32,
    color: [f32; 4],
    segments: u32,
) {
    let inner = (radius - thickness / 2.0).max(0.0);
    let outer = radius + thickness / 2.0;

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let i1 = center + inner * Vec2::new(theta1.cos(), theta1.sin());
        let o1 = center + outer * Vec2::new(theta1.cos(), theta1.sin());
        let i2 = center + inner * Vec2::new(theta2.cos(), theta2.sin());
        let o2 = center + outer * Vec2::new(theta2.cos(), theta2.sin());

        out.push(Vertex::new(i1.x, i1.y, color));
        out.push(Vertex::new(o1.x, o1.y, color));
        out.push(Vertex::new(i2.x, i2.y, color));

        out.push(Vertex::new(i2.x, i2.y, color));
        out.push(Vertex::new(o1.x, o1.y, color));
        out.push(Vertex::new(o2.x, o2.y, color));
    }
}

/// Triangle with an independent color per corner
pub fn triangle(out: &mut Vec<Vertex>, corners: [(Vec2, [f32; 4]); 3]) {
    for (pos, color) in corners {
        out.push(Vertex::new(pos.x, pos.y, color));
    }
}

/// Convex polygon outline points fanned around `center`, rotated by `angle`
pub fn rotated_fan(
    out: &mut Vec<Vertex>,
    center: Vec2,
    points: &[Vec2],
    angle: f32,
    color: [f32; 4],
) {
    if points.len() < 3 {
        return;
    }

    let (sin, cos) = angle.sin_cos();
    let rotate = |p: Vec2| Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + center;

    let first = rotate(points[0]);
    for pair in points[1..].windows(2) {
        let a = rotate(pair[0]);
        let b = rotate(pair[1]);
        out.push(Vertex::new(first.x, first.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_emits_two_triangles() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::ZERO, Vec2::new(10.0, 20.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        assert!(out.iter().any(|v| v.position == [10.0, 20.0]));
    }

    #[test]
    fn circle_vertex_count_follows_segments() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 16);
        assert_eq!(out.len(), 16 * 3);
    }

    #[test]
    fn ring_stays_within_radii() {
        let mut out = Vec::new();
        let center = Vec2::new(50.0, 50.0);
        ring(&mut out, center, 10.0, 2.0, [1.0; 4], 24);
        for v in &out {
            let d = (Vec2::from(v.position) - center).length();
            assert!((8.9..=11.1).contains(&d), "vertex at distance {d}");
        }
    }

    #[test]
    fn soft_circle_rim_is_transparent() {
        let mut out = Vec::new();
        soft_circle(&mut out, Vec2::ZERO, 5.0, [1.0, 0.0, 0.0, 0.5], 8);
        let rim_verts = out.iter().filter(|v| v.color[3] == 0.0).count();
        let core_verts = out.iter().filter(|v| v.color[3] == 0.5).count();
        assert_eq!(rim_verts, 16);
        assert_eq!(core_verts, 8);
    }

    #[test]
    fn rotated_fan_quarter_turn() {
        let mut out = Vec::new();
        let points = [
            Vec2::new(0.0, -10.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(-5.0, 5.0),
        ];
        rotated_fan(&mut out, Vec2::ZERO, &points, std::f32::consts::FRAC_PI_2, [1.0; 4]);
        assert_eq!(out.len(), 3);
        // (0, -10) rotates to (10, 0)
        assert!((out[0].position[0] - 10.0).abs() < 1e-4);
        assert!(out[0].position[1].abs() < 1e-4);
    }

    #[test]
    fn degenerate_fan_is_skipped() {
        let mut out = Vec::new();
        rotated_fan(&mut out, Vec2::ZERO, &[Vec2::ZERO, Vec2::ONE], 0.0, [1.0; 4]);
        assert!(out.is_empty());
    }
}
