// Host-side tests for target builders and the glyph cache.

use std::cell::Cell;
use std::rc::Rc;

use flux_core::targets::*;
use flux_core::World;
use glam::Vec3;
use rand::prelude::*;

#[test]
fn fibonacci_points_lie_on_the_unit_sphere() {
    let (points, seams) = fibonacci_sphere(1000);
    assert_eq!(points.len(), 1000);
    assert_eq!(seams.len(), 1000);
    for p in &points {
        assert!((p.length() - 1.0).abs() < 1e-4, "|p| = {}", p.length());
    }
}

#[test]
fn fibonacci_points_are_evenly_spaced() {
    let n = 1000;
    let (points, _) = fibonacci_sphere(n);
    let mut min_dist = f32::MAX;
    for i in 0..n {
        for j in (i + 1)..n {
            min_dist = min_dist.min(points[i].distance(points[j]));
        }
    }
    let nominal = (4.0 * std::f32::consts::PI / n as f32).sqrt();
    assert!(min_dist > 0.5 * nominal, "min spacing {min_dist} vs nominal {nominal}");
}

#[test]
fn seams_cover_equator_and_meridians_but_not_everything() {
    let (points, seams) = fibonacci_sphere(2000);
    let dark = seams.iter().filter(|s| **s).count();
    assert!(dark > 0 && dark < seams.len() / 2);
    for (p, seam) in points.iter().zip(&seams) {
        if p.y.abs() < 0.08 {
            assert!(*seam);
        }
    }
}

#[test]
fn empty_lattice_is_empty() {
    let (points, seams) = fibonacci_sphere(0);
    assert!(points.is_empty() && seams.is_empty());
}

#[test]
fn nebula_targets_stay_inside_the_world() {
    let world = World::new(800.0, 450.0);
    let mut rng = StdRng::seed_from_u64(3);
    let mut offsets = vec![0.0; 500];
    let targets = nebula_targets(500, world, &mut offsets, &mut rng);
    assert_eq!(targets.len(), 500);
    for t in &targets {
        assert!(t.x.abs() <= world.width * 0.5);
        assert!(t.y.abs() <= world.height * 0.5);
        assert_eq!(t.z, 0.0);
    }
    assert!(offsets.iter().all(|o| (0.0..world.height).contains(o)));
}

#[test]
fn fallback_rasterizer_draws_centered_text() {
    let raster = FallbackRasterizer::default();
    let bitmap = raster.rasterize("HELLO").unwrap();
    assert_eq!(bitmap.alpha.len(), (bitmap.width * bitmap.height) as usize);
    let pool = GlyphPool::from_bitmap(&bitmap);
    assert!(pool.points.len() > 1000);

    let n = pool.points.len() as f32;
    let mean_x: f32 = pool.points.iter().map(|p| p.x).sum::<f32>() / n;
    let mean_y: f32 = pool.points.iter().map(|p| p.y).sum::<f32>() / n;
    // Block letters are symmetric enough to stay near the center.
    assert!(mean_x.abs() < bitmap.width as f32 * 0.1);
    assert!(mean_y.abs() < bitmap.height as f32 * 0.1);
    for p in &pool.points {
        assert!(p.x.abs() <= pool.width * 0.5);
        assert!(p.y.abs() <= pool.height * 0.5);
    }
}

#[test]
fn blank_labels_produce_no_points() {
    let raster = FallbackRasterizer::default();
    for label in ["", "   ", "@#!"] {
        let pool = GlyphPool::from_bitmap(&raster.rasterize(label).unwrap());
        assert!(pool.is_empty(), "{label:?}");
    }
}

#[test]
fn pool_keeps_only_covered_pixels() {
    let mut bitmap = GlyphBitmap::blank(4, 2);
    bitmap.alpha[0] = 255; // (0, 0) top-left
    bitmap.alpha[7] = 31; // (3, 1)
    bitmap.alpha[5] = 30; // at the threshold: dropped
    let pool = GlyphPool::from_bitmap(&bitmap);
    assert_eq!(pool.points.len(), 2);
    assert_eq!(pool.points[0], glam::Vec2::new(-2.0, 1.0));
    assert_eq!(pool.points[1], glam::Vec2::new(1.0, 0.0));
}

#[test]
fn text_fill_fits_the_world() {
    let pool = GlyphPool::from_bitmap(&FallbackRasterizer::default().rasterize("AWESOME").unwrap());
    let mut rng = StdRng::seed_from_u64(11);
    for world in [World::new(1600.0, 900.0), World::new(400.0, 900.0), World::new(1600.0, 200.0)] {
        let mut targets = vec![Vec3::ZERO; 3000];
        assert!(fill_text_targets(&mut targets, &pool, world, &mut rng));
        for t in &targets {
            assert!(t.x.abs() <= world.width * 0.55 + 1.2);
            assert!(t.y.abs() <= world.height * 0.75 + 1.2);
            assert_eq!(t.z, 0.0);
        }
    }
}

#[test]
fn empty_pool_leaves_targets_untouched() {
    let mut rng = StdRng::seed_from_u64(1);
    let before = vec![Vec3::new(1.0, 2.0, 3.0); 16];
    let mut targets = before.clone();
    assert!(!fill_text_targets(&mut targets, &GlyphPool::default(), World::new(100.0, 100.0), &mut rng));
    assert_eq!(targets, before);
}

struct CountingRasterizer {
    calls: Rc<Cell<usize>>,
}

impl GlyphRasterizer for CountingRasterizer {
    fn rasterize(&self, label: &str) -> Option<GlyphBitmap> {
        self.calls.set(self.calls.get() + 1);
        FallbackRasterizer::default().rasterize(label)
    }
}

#[test]
fn glyph_cache_rasterizes_each_label_once() {
    let calls = Rc::new(Cell::new(0));
    let mut cache = GlyphCache::new(Box::new(CountingRasterizer { calls: calls.clone() }));
    let first = cache.pool("FLUX").points.len();
    let second = cache.pool("FLUX").points.len();
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
    cache.pool("HELLO");
    assert_eq!(calls.get(), 2);
    assert_eq!(cache.len(), 2);
}

struct BrokenRasterizer;

impl GlyphRasterizer for BrokenRasterizer {
    fn rasterize(&self, _label: &str) -> Option<GlyphBitmap> {
        None
    }
}

#[test]
fn failed_rasterization_yields_an_empty_pool() {
    let mut cache = GlyphCache::new(Box::new(BrokenRasterizer));
    assert!(cache.pool("HELLO").is_empty());
}

#[test]
fn short_bitmaps_yield_an_empty_pool() {
    let short = GlyphBitmap {
        width: 10,
        height: 10,
        alpha: vec![255; 20],
    };
    assert!(GlyphPool::from_bitmap(&short).is_empty());

    let zero_width = GlyphBitmap {
        width: 0,
        height: 4,
        alpha: Vec::new(),
    };
    assert!(GlyphPool::from_bitmap(&zero_width).is_empty());
}
