//! Target shapes the particles seek: the nebula snow field, the unit sphere
//! lattice and word glyphs sampled from a rasterized label.

use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;
use crate::world::World;

const SEAM_BAND_Y: f32 = 0.08;
const SEAM_BAND_THETA: f32 = 0.2;

/// Per-particle target storage. All vectors are parallel to the particle buffers.
#[derive(Clone, Debug, Default)]
pub struct TargetSet {
    /// What the particles currently seek in NEBULA and TEXT modes.
    pub base: Vec<Vec3>,
    /// Nebula layout, copied into `base` on entering NEBULA.
    pub nebula: Vec<Vec3>,
    /// Unit Fibonacci lattice.
    pub sphere: Vec<Vec3>,
    pub seams: Vec<bool>,
}

impl TargetSet {
    pub fn new(count: usize, world: World, snow_offsets: &mut [f32], rng: &mut StdRng) -> Self {
        let (sphere, seams) = fibonacci_sphere(count);
        let nebula = nebula_targets(count, world, snow_offsets, rng);
        Self {
            base: nebula.clone(),
            nebula,
            sphere,
            seams,
        }
    }

    pub fn use_nebula(&mut self) {
        self.base.copy_from_slice(&self.nebula);
    }
}

/// `n` points evenly spread over the unit sphere, plus dark seam flags
/// (an equatorial band and four meridian bands).
pub fn fibonacci_sphere(n: usize) -> (Vec<Vec3>, Vec<bool>) {
    let mut points = Vec::with_capacity(n);
    let mut seams = Vec::with_capacity(n);
    if n == 0 {
        return (points, seams);
    }
    let offset = 2.0 / n as f32;
    let increment = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    for i in 0..n {
        let y = i as f32 * offset - 1.0 + offset * 0.5;
        let r = (1.0 - y * y).max(0.0).sqrt();
        let phi = i as f32 * increment;
        let p = Vec3::new(phi.cos() * r, y, phi.sin() * r);
        let theta = p.z.atan2(p.x);
        seams.push(y.abs() < SEAM_BAND_Y || (theta * 2.0).sin().abs() < SEAM_BAND_THETA);
        points.push(p);
    }
    (points, seams)
}

/// Random layout across the world plus fresh snow phase offsets in `[0, height)`.
pub fn nebula_targets(count: usize, world: World, snow_offsets: &mut [f32], rng: &mut StdRng) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(Vec3::new(
            (rng.gen::<f32>() - 0.5) * world.width,
            (rng.gen::<f32>() - 0.5) * world.height,
            0.0,
        ));
        if let Some(offset) = snow_offsets.get_mut(i) {
            *offset = rng.gen::<f32>() * world.height;
        }
    }
    out
}

/// Single-channel coverage image, row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl GlyphBitmap {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width * height) as usize],
        }
    }
}

/// Renders a label into a fixed-size coverage bitmap.
pub trait GlyphRasterizer {
    /// `None` when the platform could not draw the label.
    fn rasterize(&self, label: &str) -> Option<GlyphBitmap>;
}

/// Covered pixels of a rasterized label, centered on the bitmap with y up.
#[derive(Clone, Debug, Default)]
pub struct GlyphPool {
    pub points: Vec<Vec2>,
    pub width: f32,
    pub height: f32,
}

impl GlyphPool {
    pub fn from_bitmap(bitmap: &GlyphBitmap) -> Self {
        let (w, h) = (bitmap.width as usize, bitmap.height as usize);
        let half_w = bitmap.width as f32 * 0.5;
        let half_h = bitmap.height as f32 * 0.5;
        let mut points = Vec::new();
        if w == 0 || bitmap.alpha.len() < w * h {
            log::warn!(
                "glyph bitmap {}x{} carries {} alpha bytes; ignoring it",
                w,
                h,
                bitmap.alpha.len()
            );
            return Self {
                points,
                width: bitmap.width as f32,
                height: bitmap.height as f32,
            };
        }
        for (y, row) in bitmap.alpha.chunks_exact(w).take(h).enumerate() {
            for (x, &a) in row.iter().enumerate() {
                if a > GLYPH_ALPHA_THRESHOLD {
                    points.push(Vec2::new(x as f32 - half_w, half_h - y as f32));
                }
            }
        }
        Self {
            points,
            width: bitmap.width as f32,
            height: bitmap.height as f32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Rasterized pools keyed by label. Each label is rasterized at most once.
pub struct GlyphCache {
    rasterizer: Box<dyn GlyphRasterizer>,
    pools: FnvHashMap<String, GlyphPool>,
}

impl GlyphCache {
    pub fn new(rasterizer: Box<dyn GlyphRasterizer>) -> Self {
        Self {
            rasterizer,
            pools: FnvHashMap::default(),
        }
    }

    pub fn pool(&mut self, label: &str) -> &GlyphPool {
        let rasterizer = &self.rasterizer;
        self.pools.entry(label.to_string()).or_insert_with(|| {
            match rasterizer.rasterize(label) {
                Some(bitmap) => GlyphPool::from_bitmap(&bitmap),
                None => {
                    log::warn!("could not rasterize {label:?}");
                    GlyphPool::default()
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Spread the pool over `targets`, fitted to the world. An empty pool leaves
/// the targets untouched and returns `false`.
pub fn fill_text_targets(targets: &mut [Vec3], pool: &GlyphPool, world: World, rng: &mut StdRng) -> bool {
    if pool.is_empty() || pool.width <= 0.0 || pool.height <= 0.0 {
        return false;
    }
    let scale = (world.width / pool.width).min(world.height / pool.height) * GLYPH_FIT_SCALE;
    let len = pool.points.len();
    for (i, t) in targets.iter_mut().enumerate() {
        let p = pool.points[(i * GLYPH_SAMPLE_STRIDE) % len];
        *t = Vec3::new(
            p.x * scale + (rng.gen::<f32>() - 0.5) * GLYPH_JITTER,
            p.y * scale * GLYPH_Y_STRETCH + (rng.gen::<f32>() - 0.5) * GLYPH_JITTER,
            0.0,
        );
    }
    true
}

/// Block-letter rasterizer for hosts without a font engine.
///
/// Draws a 5x7 dot font, scaled to the same canvas the browser rasterizer
/// uses, so text shapes keep the same overall proportions.
#[derive(Clone, Copy, Debug)]
pub struct FallbackRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Default for FallbackRasterizer {
    fn default() -> Self {
        Self {
            width: GLYPH_CANVAS_WIDTH,
            height: GLYPH_CANVAS_HEIGHT,
        }
    }
}

const FONT_W: usize = 5;
const FONT_H: usize = 7;
// Cell height as a fraction of the canvas height; close to the 190px font on 540px.
const FONT_HEIGHT_FRACTION: f32 = 0.35;

fn block_glyph(c: char) -> [u8; FONT_H] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => [0; FONT_H],
    }
}

impl GlyphRasterizer for FallbackRasterizer {
    fn rasterize(&self, label: &str) -> Option<GlyphBitmap> {
        let mut bitmap = GlyphBitmap::blank(self.width, self.height);
        let chars: Vec<char> = label.chars().collect();
        if chars.is_empty() {
            return Some(bitmap);
        }
        // One blank column between letters.
        let cols = chars.len() * (FONT_W + 1) - 1;
        let by_height = (self.height as f32 * FONT_HEIGHT_FRACTION / FONT_H as f32).floor();
        let by_width = (self.width as f32 * 0.9 / cols as f32).floor();
        let cell = by_height.min(by_width).max(1.0) as usize;
        let (w, h) = (self.width as usize, self.height as usize);
        let x0 = w.saturating_sub(cols * cell) / 2;
        let y0 = h.saturating_sub(FONT_H * cell) / 2;

        for (ci, &c) in chars.iter().enumerate() {
            let rows = block_glyph(c);
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..FONT_W {
                    if bits & (1 << (FONT_W - 1 - rx)) == 0 {
                        continue;
                    }
                    let px = x0 + (ci * (FONT_W + 1) + rx) * cell;
                    let py = y0 + ry * cell;
                    for y in py..(py + cell).min(h) {
                        let row = y * w;
                        for x in px..(px + cell).min(w) {
                            bitmap.alpha[row + x] = 255;
                        }
                    }
                }
            }
        }
        Some(bitmap)
    }
}
