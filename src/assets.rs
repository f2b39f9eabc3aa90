//! Sprite-mesh assets
//!
//! Ships and meteors are vector art: SVG polygons fetched at startup and
//! tessellated into unit-space triangle meshes. Loading is asynchronous and
//! races the game loop; every slot in the bundle may stay empty forever and
//! the renderer falls back to procedural shapes, so a failed or slow load
//! can never produce a blank frame.

use glam::Vec2;

use crate::renderer::vertex::Vertex;

/// A tessellated sprite in unit space: centered on the origin, longest
/// extent normalized to 1.0.
#[derive(Debug, Clone)]
pub struct SpriteMesh {
    pub vertices: Vec<Vertex>,
}

impl SpriteMesh {
    /// Stamp the mesh into a frame: rotate, scale to `size`, move to
    /// `center`, multiply by `tint`.
    pub fn emit(&self, out: &mut Vec<Vertex>, center: Vec2, size: Vec2, angle: f32, tint: [f32; 4]) {
        let (sin, cos) = angle.sin_cos();
        for v in &self.vertices {
            let p = Vec2::new(v.position[0] * size.x, v.position[1] * size.y);
            let p = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + center;
            let color = [
                v.color[0] * tint[0],
                v.color[1] * tint[1],
                v.color[2] * tint[2],
                v.color[3] * tint[3],
            ];
            out.push(Vertex::new(p.x, p.y, color));
        }
    }
}

/// Possibly-partial sprite set; any entry may be absent
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    pub player_ship: Option<SpriteMesh>,
    pub enemy_ships: [Option<SpriteMesh>; 3],
    pub meteors: [Option<SpriteMesh>; 3],
}

impl AssetBundle {
    pub const fn empty() -> Self {
        Self {
            player_ship: None,
            enemy_ships: [None, None, None],
            meteors: [None, None, None],
        }
    }

    /// "loaded/total" for log lines
    pub fn summary(&self) -> String {
        let loaded = self.player_ship.is_some() as usize
            + self.enemy_ships.iter().filter(|m| m.is_some()).count()
            + self.meteors.iter().filter(|m| m.is_some()).count();
        format!("{loaded}/7 sprites")
    }
}

/// Parse SVG text into a mesh. Only `<polygon points fill>` elements are
/// understood; that is all the vector art uses. Returns `None` when nothing
/// drawable is found.
pub fn parse_sprite(svg: &str) -> Option<SpriteMesh> {
    let mut polygons: Vec<(Vec<Vec2>, [f32; 4])> = Vec::new();

    let mut rest = svg;
    while let Some(start) = rest.find("<polygon") {
        let tag_body = &rest[start..];
        let end = tag_body.find('>')?;
        let tag = &tag_body[..end];

        if let Some(points) = attr_value(tag, "points") {
            let pts = parse_points(points);
            if pts.len() >= 3 {
                let color = attr_value(tag, "fill")
                    .and_then(parse_hex_color)
                    .unwrap_or([0.8, 0.8, 0.8, 1.0]);
                polygons.push((pts, color));
            }
        }

        rest = &tag_body[end..];
    }

    if polygons.is_empty() {
        return None;
    }

    // Normalize all polygons together so multi-part art keeps its layout
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for (pts, _) in &polygons {
        for p in pts {
            min = min.min(*p);
            max = max.max(*p);
        }
    }
    let center = (min + max) / 2.0;
    let extent = (max - min).max_element().max(1e-6);

    let mut vertices = Vec::new();
    for (pts, color) in &polygons {
        let norm: Vec<Vec2> = pts.iter().map(|p| (*p - center) / extent).collect();
        // Convex fan around the first point
        let first = norm[0];
        for pair in norm[1..].windows(2) {
            vertices.push(Vertex::new(first.x, first.y, *color));
            vertices.push(Vertex::new(pair[0].x, pair[0].y, *color));
            vertices.push(Vertex::new(pair[1].x, pair[1].y, *color));
        }
    }

    Some(SpriteMesh { vertices })
}

/// Extract `name="value"` from inside a tag
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

/// "x1,y1 x2,y2 ..." with commas or whitespace as separators
fn parse_points(s: &str) -> Vec<Vec2> {
    let scalars: Vec<f32> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse().ok())
        .collect();

    scalars
        .chunks_exact(2)
        .map(|xy| Vec2::new(xy[0], xy[1]))
        .collect()
}

/// `#RGB` or `#RRGGBB`
fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let v: Vec<u8> = hex
                .chars()
                .map(|c| u8::from_str_radix(&c.to_string(), 16))
                .collect::<Result<_, _>>()
                .ok()?;
            (v[0] * 17, v[1] * 17, v[2] * 17)
        }
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
}

/// Sprite slots resolved relative to the page
const PLAYER_SHIP_URL: &str = "assets/player-ship.svg";

fn enemy_url(variant: usize) -> String {
    format!("assets/enemy-{variant}.svg")
}

fn meteor_url(variant: usize) -> String {
    format!("assets/meteor-{variant}.svg")
}

/// Fetch one sprite; any failure is logged and collapses to `None`
#[cfg(target_arch = "wasm32")]
pub async fn fetch_sprite(url: &str) -> Option<SpriteMesh> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window()?;
    let resp = match JsFuture::from(window.fetch_with_str(url)).await {
        Ok(r) => r,
        Err(_) => {
            log::warn!("asset fetch failed: {url}");
            return None;
        }
    };
    let resp: web_sys::Response = resp.dyn_into().ok()?;
    if !resp.ok() {
        log::warn!("asset fetch failed: {url} (status {})", resp.status());
        return None;
    }

    let text = JsFuture::from(resp.text().ok()?).await.ok()?;
    let mesh = parse_sprite(&text.as_string()?);
    if mesh.is_none() {
        log::warn!("asset decode failed: {url}");
    }
    mesh
}

/// Resolve the whole bundle, tolerating any combination of failures
#[cfg(target_arch = "wasm32")]
pub async fn load_bundle() -> AssetBundle {
    let mut bundle = AssetBundle::empty();

    bundle.player_ship = fetch_sprite(PLAYER_SHIP_URL).await;
    for i in 0..3 {
        bundle.enemy_ships[i] = fetch_sprite(&enemy_url(i)).await;
        bundle.meteors[i] = fetch_sprite(&meteor_url(i)).await;
    }

    log::info!("asset bundle ready: {}", bundle.summary());
    bundle
}

/// Native loads the same files from disk, mostly for the headless demo
#[cfg(not(target_arch = "wasm32"))]
pub fn load_bundle() -> AssetBundle {
    fn read_sprite(path: &str) -> Option<SpriteMesh> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let mesh = parse_sprite(&text);
                if mesh.is_none() {
                    log::warn!("asset decode failed: {path}");
                }
                mesh
            }
            Err(_) => None,
        }
    }

    let mut bundle = AssetBundle::empty();
    bundle.player_ship = read_sprite(PLAYER_SHIP_URL);
    for i in 0..3 {
        bundle.enemy_ships[i] = read_sprite(&enemy_url(i));
        bundle.meteors[i] = read_sprite(&meteor_url(i));
    }
    bundle
}
