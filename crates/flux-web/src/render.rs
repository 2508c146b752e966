use flux_core::{Camera, Dirty, ParticleBuffers, RibbonSet, SparkField};
use web_sys as web;
use wgpu::util::DeviceExt;

use crate::constants::*;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct Instance {
    center: [f32; 3],
    size: f32,
    color: [f32; 3],
    boost: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    viewport: [f32; 2],
    pixel_ratio: f32,
    camera_z: f32,
    max_point_px: f32,
    _pad: [f32; 3],
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// CPU staging for the single instance buffer.
///
/// Layout: `[particles | sparks | ribbon points]`. The particle region is
/// patched field by field according to the simulation's dirty flags; the
/// overlay region is rewritten every frame it is visible.
struct InstanceStaging {
    data: Vec<Instance>,
    particle_count: usize,
    overlay_count: usize,
}

impl InstanceStaging {
    fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            particle_count: 0,
            overlay_count: 0,
        }
    }

    fn patch_particles(&mut self, buffers: &ParticleBuffers, dirty: Dirty) {
        if self.particle_count != buffers.len() {
            self.particle_count = buffers.len();
            self.data.resize(self.particle_count, Instance::default());
        }
        let slots = &mut self.data[..self.particle_count];
        if dirty.positions {
            for (slot, p) in slots.iter_mut().zip(buffers.positions_flat().chunks_exact(3)) {
                slot.center = [p[0], p[1], p[2]];
            }
        }
        if dirty.colors {
            for (slot, c) in slots.iter_mut().zip(buffers.colors_flat().chunks_exact(3)) {
                slot.color = [c[0], c[1], c[2]];
            }
        }
        if dirty.sizes {
            for (slot, s) in slots.iter_mut().zip(buffers.sizes_flat()) {
                slot.size = *s;
            }
        }
        if dirty.boosts {
            for (slot, b) in slots.iter_mut().zip(buffers.boosts_flat()) {
                slot.boost = *b;
            }
        }
    }

    fn rebuild_overlays(&mut self, sparks: &SparkField, ribbons: &RibbonSet) {
        self.data.truncate(self.particle_count);
        if sparks.is_active() {
            let points = sparks.positions_flat().chunks_exact(3);
            let colors = sparks.colors_flat().chunks_exact(3);
            for (((p, c), size), alpha) in points.zip(colors).zip(&sparks.sizes).zip(&sparks.alphas) {
                self.data.push(Instance {
                    center: [p[0], p[1], p[2]],
                    size: size * SPARK_SIZE_SCALE,
                    color: [c[0], c[1], c[2]],
                    boost: *alpha,
                });
            }
        }
        if ribbons.is_visible() {
            for ring in &ribbons.rings {
                for (p, c) in ring.positions.iter().zip(&ring.colors) {
                    self.data.push(Instance {
                        center: p.to_array(),
                        size: ring.point_size * RIBBON_SIZE_SCALE,
                        color: c.to_array(),
                        boost: 1.0,
                    });
                }
            }
        }
        self.overlay_count = self.data.len() - self.particle_count;
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    staging: InstanceStaging,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    /// `capacity` is the most instances ever drawn in one frame.
    pub async fn new(canvas: &'a web::HtmlCanvasElement, capacity: usize) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits on web; older WebGPU impls reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles_shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLES_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad corners (two triangles), unit radius
        let quad_vertices: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_capacity = capacity.max(1);
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<Instance>() * instance_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-point center, size, color, boost
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Instance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 16,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 28,
                        shader_location: 4,
                    },
                ],
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particles_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        log::info!(
            "WebGPU ready: {:?} {}x{}, {} instance slots",
            format,
            width,
            height,
            instance_capacity
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            quad_vb,
            instance_vb,
            instance_capacity,
            staging: InstanceStaging::new(instance_capacity),
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_R,
                g: CLEAR_G,
                b: CLEAR_B,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Copy changed particle fields and the current overlays into the instance buffer.
    pub fn upload(&mut self, buffers: &ParticleBuffers, dirty: Dirty, sparks: &SparkField, ribbons: &RibbonSet) {
        let resized = self.staging.particle_count != buffers.len();
        let dirty = if resized { Dirty::all() } else { dirty };
        self.staging.patch_particles(buffers, dirty);
        self.staging.rebuild_overlays(sparks, ribbons);

        let count = self.staging.data.len().min(self.instance_capacity);
        let particles = self.staging.particle_count.min(count);
        if dirty.any() && particles > 0 {
            self.queue.write_buffer(
                &self.instance_vb,
                0,
                bytemuck::cast_slice(&self.staging.data[..particles]),
            );
        }
        if count > particles {
            let offset = (particles * std::mem::size_of::<Instance>()) as u64;
            self.queue.write_buffer(
                &self.instance_vb,
                offset,
                bytemuck::cast_slice(&self.staging.data[particles..count]),
            );
        }
    }

    pub fn render(&mut self, camera: &Camera, pixel_ratio: f32) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                viewport: [self.width as f32, self.height as f32],
                pixel_ratio,
                camera_z: (camera.eye - camera.target).length(),
                max_point_px: MAX_POINT_PX,
                _pad: [0.0; 3],
            }),
        );

        let count = (self.staging.particle_count + self.staging.overlay_count).min(self.instance_capacity);
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("particles_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..6, 0..(count as u32));
        drop(rpass);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
