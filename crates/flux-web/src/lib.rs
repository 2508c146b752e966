#![cfg(target_arch = "wasm32")]
mod audio;
mod constants;
mod dom;
mod frame;
mod glyph;
mod render;

use flux_core::constants::{RIBBON_COUNT, RIBBON_SEGMENTS};
use flux_core::{
    Camera, FallbackRasterizer, GlyphRasterizer, HandPipeline, HandTracker, LandmarkBatch, LandmarkSender, SimParams,
    Simulation, TrackerParams,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::audio::Chime;
use crate::constants::CANVAS_ID;
use crate::frame::FrameContext;

thread_local! {
    static SENDER: RefCell<Option<LandmarkSender>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("flux-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Deliver one landmark frame: 63 floats (21 × x,y,z) per hand, one label
/// (`"Left"`/`"Right"`) per hand. An empty call means no hands are visible.
#[wasm_bindgen]
pub fn push_hands(landmarks: &[f32], labels: js_sys::Array) {
    let labels: Vec<String> = labels.iter().filter_map(|v| v.as_string()).collect();
    let batch = match LandmarkBatch::from_flat(landmarks, &labels) {
        Ok(batch) => batch,
        Err(e) => {
            log::warn!("dropping malformed landmark frame: {}", e);
            LandmarkBatch::empty()
        }
    };
    SENDER.with(|s| {
        if let Some(tx) = s.borrow().as_ref() {
            if !tx.send(batch) {
                log::debug!("landmark receiver gone");
            }
        }
    });
}

/// Pull every particle toward its target for a short window.
#[wasm_bindgen]
pub fn attract() {
    frame::request_attract();
}

#[wasm_bindgen]
pub fn stop() {
    frame::stop_loop();
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Keep the backing store at CSS size × devicePixelRatio
    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        dom::add_window_listener("resize", move || dom::sync_canvas_backing_size(&canvas_resize));
    }

    let rasterizer: Box<dyn GlyphRasterizer> = match glyph::CanvasRasterizer::new(&document) {
        Ok(r) => Box::new(r),
        Err(e) => {
            log::warn!("2d canvas unavailable, using block font: {:?}", e);
            Box::new(FallbackRasterizer::default())
        }
    };

    let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
    let camera = Camera::for_aspect(aspect);
    let params = SimParams::default();
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let sim = Simulation::new(params.clone(), camera.world(), rasterizer, seed);

    // Audio needs a user gesture before it may start.
    let chime = Rc::new(RefCell::new(Chime::default()));
    for event in ["pointerdown", "keydown"] {
        let chime = chime.clone();
        dom::add_window_listener(event, move || chime.borrow_mut().unlock());
    }

    let mut tracker = HandTracker::new(TrackerParams::default());
    tracker.on_left_action_change(move |action| chime.borrow_mut().play(action));
    let (pipeline, sender) = HandPipeline::new(tracker);
    SENDER.with(|s| *s.borrow_mut() = Some(sender));

    let capacity = params.particle_count + params.spark_count + RIBBON_COUNT * RIBBON_SEGMENTS;
    let gpu = frame::init_gpu(&canvas, capacity).await;
    if gpu.is_none() {
        log::warn!("running without a renderer");
    }

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        canvas,
        pipeline,
        sim,
        camera,
        gpu,
        started: Instant::now(),
        backing_size: (0, 0),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
