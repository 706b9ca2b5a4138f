use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

use glam::{Mat4, Vec3};
use morph_core::{
    overlay_model_matrix, overlay_opacity, CloudParams, ConnectionGraph, FrameInput, GraphParams,
    LineVertex, ParticleCloud, SpringSignal,
};

mod input;

const CAMERA_Z: f32 = 15.0;
const CAMERA_FOV_DEG: f32 = 75.0;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    tint: [f32; 4],
    misc: [f32; 4], // x: point size, y: overlay opacity
}

// Two triangles spanning a unit quad, billboarded in the vertex stage.
const QUAD_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

/// Everything the frame loop mutates outside the GPU.
struct SceneState {
    cloud: ParticleCloud,
    spring: SpringSignal,
    hovered: bool,
    cursor_px: Option<(f32, f32)>,
    start: Instant,
    last_frame: Instant,
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_uniforms: wgpu::Buffer,
    line_uniforms: wgpu::Buffer,
    point_bind_group: wgpu::BindGroup,
    line_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    line_vb: wgpu::Buffer,
    line_vertex_count: u32,
    particle_count: u32,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(
        window: &'w winit::window::Window,
        particle_count: usize,
        line_vertices: &[LineVertex],
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(morph_core::SCENE_WGSL.into()),
        });

        let point_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let line_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<[f32; 3]>() * particle_count.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Edges never change after construction; upload them once.
        let line_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line_vb"),
            contents: bytemuck::cast_slice(line_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        let bind_group = |label, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let point_bind_group = bind_group("point bg", &point_uniforms);
        let line_bind_group = bind_group("line bg", &line_uniforms);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let point_buffers = [
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
            // slot 1: per-particle center
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }];

        let point_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_point"),
                buffers: &point_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_point"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &line_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            point_pipeline,
            line_pipeline,
            point_uniforms,
            line_uniforms,
            point_bind_group,
            line_bind_group,
            quad_vb,
            instance_vb,
            line_vb,
            line_vertex_count: line_vertices.len() as u32,
            particle_count: particle_count as u32,
            width: size.width,
            height: size.height,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn camera_matrices(&self) -> (Mat4, Mat4) {
        let aspect = self.width as f32 / self.height as f32;
        let proj = Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
        (view, proj)
    }

    fn render(&mut self, scene: &mut SceneState) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - scene.last_frame).as_secs_f32();
        scene.last_frame = now;
        let t = (now - scene.start).as_secs_f32();

        // Sample the inputs once, then run the whole frame off the snapshot.
        let morph = scene.spring.step(dt);
        let mut frame_input = FrameInput::new(t, morph);
        if let Some((x, y)) = scene.cursor_px {
            frame_input = frame_input.with_pointer(input::pointer_offset(
                x,
                y,
                self.width,
                self.height,
            ));
        }
        scene.cloud.set_emphasis(scene.hovered);
        scene.cloud.tick(&frame_input);

        let frame = self.surface.get_current_texture()?;
        let view_tex = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (view, proj) = self.camera_matrices();
        let material = scene.cloud.material();
        self.queue.write_buffer(
            &self.point_uniforms,
            0,
            bytemuck::bytes_of(&Uniforms {
                view: view.to_cols_array_2d(),
                proj: proj.to_cols_array_2d(),
                model: scene.cloud.model_matrix().to_cols_array_2d(),
                tint: [material.color[0], material.color[1], material.color[2], 1.0],
                misc: [material.size, 0.0, 0.0, 0.0],
            }),
        );
        self.queue.write_buffer(
            &self.line_uniforms,
            0,
            bytemuck::bytes_of(&Uniforms {
                view: view.to_cols_array_2d(),
                proj: proj.to_cols_array_2d(),
                model: overlay_model_matrix(t).to_cols_array_2d(),
                tint: [1.0, 1.0, 1.0, 1.0],
                misc: [0.0, overlay_opacity(morph), 0.0, 0.0],
            }),
        );
        if !scene.cloud.is_empty() {
            self.queue.write_buffer(
                &self.instance_vb,
                0,
                bytemuck::cast_slice(scene.cloud.positions()),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view_tex,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.point_pipeline);
            rpass.set_bind_group(0, &self.point_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..self.particle_count);

            if self.line_vertex_count > 0 {
                rpass.set_pipeline(&self.line_pipeline);
                rpass.set_bind_group(0, &self.line_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.line_vb.slice(..));
                rpass.draw(0..self.line_vertex_count, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cloud = ParticleCloud::new(CloudParams::default())?;
    let graph = ConnectionGraph::new(GraphParams::default())?;
    let max_degree = (0..graph.node_count())
        .map(|i| graph.degree(i))
        .max()
        .unwrap_or(0);
    log::info!(
        "[scene] particles={} nodes={} edges={} max_degree={}",
        cloud.len(),
        graph.node_count(),
        graph.edge_count(),
        max_degree
    );
    let line_vertices = graph.line_vertices();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Morphfield (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, cloud.len(), &line_vertices))?;
    let now = Instant::now();
    let mut scene = SceneState {
        cloud,
        spring: SpringSignal::new(0.0),
        hovered: false,
        cursor_px: None,
        start: now,
        last_frame: now,
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                scene.cursor_px = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorEntered { .. } => {
                scene.hovered = true;
                scene.spring.set_target(1.0);
            }
            WindowEvent::CursorLeft { .. } => {
                scene.hovered = false;
                scene.spring.set_target(0.0);
            }
            _ => {}
        },
        Event::AboutToWait => match state.render(&mut scene) {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(_) => {}
        },
        _ => {}
    })?;
    Ok(())
}
