use glam::Mat4;
use web_sys as web;
use wgpu::util::DeviceExt;

use crate::core::scene::SceneContext;
use crate::core::STONE_WGSL;

pub mod cloth_shader;

// ===================== WebGPU state =====================

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniformsRaw {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniformsRaw {
    model: [[f32; 4]; 4],
}

/// Layout mirrors `cloth_shader::CLOTH_UNIFORM_DECL`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ClothParamsRaw {
    model: [[f32; 4]; 4],
    contact_point: [f32; 4],
    contact_uv: [f32; 2],
    time: f32,
    intensity: f32,
}

/// One uploaded mesh plus its per-draw model uniform slot.
struct MeshEntry {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    model_buf: wgpu::Buffer,
    model_bg: wgpu::BindGroup,
}

struct ClothResources {
    pipeline: wgpu::RenderPipeline,
    params_buf: wgpu::Buffer,
    params_bg: wgpu::BindGroup,
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    stone_pipeline: wgpu::RenderPipeline,
    scene_buf: wgpu::Buffer,
    scene_bg: wgpu::BindGroup,
    scene_bgl: wgpu::BindGroupLayout,
    model_bgl: wgpu::BindGroupLayout,

    meshes: Vec<MeshEntry>,
    cloth: Option<ClothResources>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

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
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
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
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, width, height);

        let scene_bgl = uniform_bgl(&device, "scene_bgl");
        let model_bgl = uniform_bgl(&device, "model_bgl");

        let scene_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniformsRaw>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buf.as_entire_binding(),
            }],
        });

        let stone_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stone_shader"),
            source: wgpu::ShaderSource::Wgsl(STONE_WGSL.into()),
        });
        let stone_pipeline = mesh_pipeline(
            &device,
            "stone_pipeline",
            &stone_shader,
            &scene_bgl,
            &model_bgl,
            format,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            stone_pipeline,
            scene_buf,
            scene_bg,
            scene_bgl,
            model_bgl,
            meshes: Vec::new(),
            cloth: None,
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.035,
                a: 1.0,
            },
        })
    }

    /// Upload a mesh and allocate its per-draw uniform slot. Returns the
    /// mesh handle stored on scene nodes.
    pub fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> usize {
        let vertex_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vb"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_ib"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let model_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_uniforms"),
            size: std::mem::size_of::<ModelUniformsRaw>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bg"),
            layout: &self.model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buf.as_entire_binding(),
            }],
        });
        self.meshes.push(MeshEntry {
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
            model_buf,
            model_bg,
        });
        self.meshes.len() - 1
    }

    /// Compile the built cloth shader variant and its parameter slot.
    pub fn install_cloth(&mut self, shader_src: &str) {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("cloth_shader"),
                source: wgpu::ShaderSource::Wgsl(shader_src.into()),
            });
        let pipeline = mesh_pipeline(
            &self.device,
            "cloth_pipeline",
            &shader,
            &self.scene_bgl,
            &self.model_bgl,
            self.config.format,
        );
        let params_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloth_params"),
            size: std::mem::size_of::<ClothParamsRaw>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let params_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cloth_bg"),
            layout: &self.model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buf.as_entire_binding(),
            }],
        });
        self.cloth = Some(ClothResources {
            pipeline,
            params_buf,
            params_bg,
        });
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
            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }

    pub fn render(&mut self, scene: &SceneContext) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.scene_buf,
            0,
            bytemuck::bytes_of(&SceneUniformsRaw {
                view_proj: scene.camera.view_proj().to_cols_array_2d(),
            }),
        );

        // Push this frame's model matrices and gather the draw list.
        let mut draws: Vec<usize> = Vec::new();
        if let Some(stone) = scene.stone.as_ref().filter(|s| s.visible) {
            for node in &stone.nodes {
                if let Some(mesh) = node.mesh {
                    let matrix: Mat4 = stone.node_matrix(node);
                    self.queue.write_buffer(
                        &self.meshes[mesh].model_buf,
                        0,
                        bytemuck::bytes_of(&ModelUniformsRaw {
                            model: matrix.to_cols_array_2d(),
                        }),
                    );
                    draws.push(mesh);
                }
            }
        }

        let cloth_draw = match (&self.cloth, &scene.cloth) {
            (Some(res), Some(surface)) if surface.bridge.scale > 1e-3 => {
                let u = &surface.bridge.uniforms;
                self.queue.write_buffer(
                    &res.params_buf,
                    0,
                    bytemuck::bytes_of(&ClothParamsRaw {
                        model: surface.model_matrix().to_cols_array_2d(),
                        contact_point: [
                            u.contact_point.x,
                            u.contact_point.y,
                            u.contact_point.z,
                            0.0,
                        ],
                        contact_uv: u.contact_uv.to_array(),
                        time: u.time,
                        intensity: u.intensity,
                    }),
                );
                Some(surface.mesh)
            }
            _ => None,
        };

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.stone_pipeline);
            rpass.set_bind_group(0, &self.scene_bg, &[]);
            for mesh in &draws {
                let entry = &self.meshes[*mesh];
                rpass.set_bind_group(1, &entry.model_bg, &[]);
                rpass.set_vertex_buffer(0, entry.vertex_buf.slice(..));
                rpass.set_index_buffer(entry.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..entry.index_count, 0, 0..1);
            }

            if let (Some(res), Some(mesh)) = (&self.cloth, cloth_draw) {
                let entry = &self.meshes[mesh];
                rpass.set_pipeline(&res.pipeline);
                rpass.set_bind_group(0, &self.scene_bg, &[]);
                rpass.set_bind_group(1, &res.params_bg, &[]);
                rpass.set_vertex_buffer(0, entry.vertex_buf.slice(..));
                rpass.set_index_buffer(entry.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..entry.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn uniform_bgl(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
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
    })
}

fn mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    scene_bgl: &wgpu::BindGroupLayout,
    model_bgl: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[scene_bgl, model_bgl],
        push_constant_ranges: &[],
    });
    let vertex_buffers = [wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
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
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    }];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
