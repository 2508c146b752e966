use crate::dom;
use crate::render;
use flux_core::{Camera, HandPipeline, Simulation};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static RUNNING: Cell<bool> = const { Cell::new(false) };
    static ATTRACT_REQUESTED: Cell<bool> = const { Cell::new(false) };
}

pub struct FrameContext<'a> {
    pub canvas: web::HtmlCanvasElement,
    pub pipeline: HandPipeline,
    pub sim: Simulation,
    pub camera: Camera,
    pub gpu: Option<render::GpuState<'a>>,
    pub started: Instant,
    pub backing_size: (u32, u32),
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.sync_size();

        if ATTRACT_REQUESTED.with(|a| a.replace(false)) {
            self.sim.attract(now_ms);
        }

        // Every batch that arrived since the last frame goes through the
        // tracker before the simulation shapes targets.
        let world = self.sim.world();
        let hands = self.pipeline.pump(&world);
        self.sim.tick(now_ms, hands);

        let dirty = self.sim.take_dirty();
        if let Some(g) = &mut self.gpu {
            g.upload(self.sim.buffers(), dirty, self.sim.sparks(), self.sim.ribbons());
            if let Err(e) = g.render(&self.camera, dom::device_pixel_ratio()) {
                log::warn!("render error: {:?}", e);
            }
        }
    }

    fn sync_size(&mut self) {
        let size = (self.canvas.width().max(1), self.canvas.height().max(1));
        if size == self.backing_size {
            return;
        }
        self.backing_size = size;
        self.camera = Camera::for_aspect(size.0 as f32 / size.1 as f32);
        let world = self.camera.world();
        log::debug!(
            "resize {}x{} px -> world {:.0}x{:.0}",
            size.0,
            size.1,
            world.width,
            world.height
        );
        self.sim.resize(world);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(size.0, size.1);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Ask the next frame to start a forced attract window.
pub fn request_attract() {
    ATTRACT_REQUESTED.with(|a| a.set(true));
}

/// No further frames are requested after this returns.
pub fn stop_loop() {
    RUNNING.with(|r| r.set(false));
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    RUNNING.with(|r| r.set(true));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !RUNNING.with(|r| r.get()) {
            log::info!("frame loop stopped");
            // Dropping the closure here would free it while it runs.
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone())) else {
        return;
    };
    if let Err(e) = w.request_animation_frame(cb.unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {:?}", e);
    }
}
