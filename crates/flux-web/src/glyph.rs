//! Label rasterizer backed by an offscreen 2D canvas.

use flux_core::constants::{GLYPH_CANVAS_HEIGHT, GLYPH_CANVAS_WIDTH, GLYPH_FONT};
use flux_core::{GlyphBitmap, GlyphRasterizer};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct CanvasRasterizer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!(format!("create canvas: {:?}", e)))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        canvas.set_width(GLYPH_CANVAS_WIDTH);
        canvas.set_height(GLYPH_CANVAS_HEIGHT);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!(format!("get_context: {:?}", e)))?
            .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        Ok(Self { canvas, ctx })
    }
}

impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(&self, label: &str) -> Option<GlyphBitmap> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str("#ffffff"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_font(GLYPH_FONT);
        if let Err(e) = self.ctx.fill_text(label, w as f64 * 0.5, h as f64 * 0.5) {
            log::warn!("fill_text failed for {:?}: {:?}", label, e);
            return None;
        }
        let image = match self.ctx.get_image_data(0.0, 0.0, w as f64, h as f64) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("get_image_data failed: {:?}", e);
                return None;
            }
        };
        // RGBA rows; keep only the alpha channel.
        let alpha = image.data().0.chunks_exact(4).map(|px| px[3]).collect();
        Some(GlyphBitmap {
            width: w,
            height: h,
            alpha,
        })
    }
}
